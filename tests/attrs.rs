//! Attribute-granularity mode: tags come out piecewise as `TagName` and
//! `Attr` tokens, and the terminal tag token is suppressed.

mod common;

use common::{render, tokenize_attrs};
use html5span::{Token, Tokenizer};
use pretty_assertions::assert_eq;

#[test]
fn tag_name_replaces_the_tag() {
    let src = b"<p>hi</p>";
    assert_eq!(
        render(src, &tokenize_attrs(src)),
        vec!["tag_name(p)", "text(hi)", "tag_name(p)"]
    );
}

#[test]
fn quote_disciplines_are_reported() {
    let src = b"<input type=\"text\" name='q' disabled value=search>";
    assert_eq!(
        render(src, &tokenize_attrs(src)),
        vec![
            "tag_name(input)",
            "attr(type=text, double)",
            "attr(name=q, single)",
            "attr(disabled)",
            "attr(value=search, unquoted)",
        ]
    );
}

#[test]
fn self_closing_tag_emits_no_terminal_token() {
    let src = b"<img src=\"a.png\"/>";
    assert_eq!(
        render(src, &tokenize_attrs(src)),
        vec!["tag_name(img)", "attr(src=a.png, double)"]
    );
    let src = b"<br/>";
    assert_eq!(render(src, &tokenize_attrs(src)), vec!["tag_name(br)"]);
}

#[test]
fn bare_attributes_keep_source_order() {
    let src = b"<p class=foo bar>";
    assert_eq!(
        render(src, &tokenize_attrs(src)),
        vec!["tag_name(p)", "attr(class=foo, unquoted)", "attr(bar)"]
    );
}

#[test]
fn attribute_errors_still_surface() {
    let src = b"<x<y>";
    assert_eq!(
        render(src, &tokenize_attrs(src)),
        vec![
            "tag_name(x)",
            "error(unexpected-character-in-attribute-name)",
            "attr(<y)",
        ]
    );
    let src = b"<p a=>";
    assert_eq!(
        render(src, &tokenize_attrs(src)),
        vec!["tag_name(p)", "error(missing-attribute-value)", "attr(a)"]
    );
}

#[test]
fn duplicate_attribute_names_are_passed_through() {
    // deduplication is a tree-builder concern; the lexical layer reports
    // each attribute where it appears
    let src = b"<p a=1 a=2>";
    assert_eq!(
        render(src, &tokenize_attrs(src)),
        vec![
            "tag_name(p)",
            "attr(a=1, unquoted)",
            "attr(a=2, unquoted)",
        ]
    );
}

#[test]
fn equals_sign_can_start_an_attribute_name() {
    let src = b"<p =a>";
    assert_eq!(
        render(src, &tokenize_attrs(src)),
        vec![
            "tag_name(p)",
            "error(unexpected-equals-sign-before-attribute-name)",
            "attr(=a)",
        ]
    );
}

#[test]
fn eof_salvages_the_in_flight_piece() {
    let src = b"<p";
    assert_eq!(
        render(src, &tokenize_attrs(src)),
        vec!["error(eof-in-tag)", "tag_name(p)"]
    );
    let src = b"<a href=\"x";
    assert_eq!(
        render(src, &tokenize_attrs(src)),
        vec![
            "tag_name(a)",
            "error(eof-in-attribute-value)",
            "attr(href=x, double)",
        ]
    );
}

#[test]
fn rcdata_end_tags_are_reported_by_name() {
    let src = b"<title>x</title >";
    let mut tokenizer = Tokenizer::new();
    tokenizer.emit_attributes(true);
    let mut out = Vec::new();
    while let Some(token) = tokenizer.next(src) {
        if let Token::TagName(name) = token {
            if name.slice(src).eq_ignore_ascii_case(b"title") && out.is_empty() {
                tokenizer.enter_rcdata(b"title");
            }
        }
        out.push(token);
    }
    assert_eq!(
        render(src, &out),
        vec!["tag_name(title)", "text(x)", "tag_name(title)"]
    );
}
