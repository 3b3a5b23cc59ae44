//! Machine-level invariants checked over arbitrary byte soup.

mod common;

use common::tokenize;
use html5span::{Span, Token, Tokenizer};
use quickcheck_macros::quickcheck;

/// Map arbitrary bytes onto an alphabet dense in interesting state
/// transitions, so random inputs actually reach the tag, comment and doctype
/// machinery instead of tokenizing as one long text run.
fn squeeze(bytes: &[u8], alphabet: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .map(|&b| alphabet[b as usize % alphabet.len()])
        .collect()
}

const MARKUP: &[u8] = b"<>/=\"'` \t\n!?-[]DOCTYPEdoctypeabcPUBLICsystem\0";
const MARKUP_NO_NUL: &[u8] = b"<>/=\"'` \t\n!?-[]DOCTYPEdoctypeabcPUBLICsystem";

fn spans_of(token: &Token) -> Vec<Span> {
    match *token {
        Token::Text(span) | Token::TagName(span) | Token::Comment(span) => vec![span],
        Token::Tag(tag) => vec![tag.span, tag.name],
        Token::Attr(attr) => {
            let mut spans = vec![attr.name];
            if let Some(value) = attr.value {
                spans.push(value.span);
            }
            spans
        }
        Token::Doctype(doctype) => {
            let mut spans = vec![doctype.span, doctype.extra];
            spans.extend(doctype.name);
            spans
        }
        Token::Error { span, .. } => vec![span],
    }
}

fn outer_span(token: &Token) -> Span {
    match *token {
        Token::Text(span) | Token::TagName(span) | Token::Comment(span) => span,
        Token::Tag(tag) => tag.span,
        Token::Attr(attr) => attr.name,
        Token::Doctype(doctype) => doctype.span,
        Token::Error { span, .. } => span,
    }
}

#[quickcheck]
fn spans_stay_in_bounds(bytes: Vec<u8>) -> bool {
    let src = squeeze(&bytes, MARKUP);
    tokenize(&src).iter().all(|token| {
        spans_of(token)
            .iter()
            .all(|span| span.start <= span.end && span.end <= src.len())
    })
}

#[quickcheck]
fn tokenization_is_deterministic(bytes: Vec<u8>) -> bool {
    let src = squeeze(&bytes, MARKUP);
    tokenize(&src) == tokenize(&src)
}

#[quickcheck]
fn tokenization_terminates(bytes: Vec<u8>) -> bool {
    let src = squeeze(&bytes, MARKUP);
    let mut tokenizer = Tokenizer::new();
    let budget = 4 * src.len() + 16;
    for _ in 0..budget {
        if tokenizer.next(&src).is_none() {
            return true;
        }
    }
    false
}

#[quickcheck]
fn exhausted_tokenizer_stays_exhausted(bytes: Vec<u8>) -> bool {
    let src = squeeze(&bytes, MARKUP);
    let mut tokenizer = Tokenizer::new();
    while tokenizer.next(&src).is_some() {}
    (0..3).all(|_| tokenizer.next(&src).is_none())
}

#[quickcheck]
fn non_error_spans_start_monotonically(bytes: Vec<u8>) -> bool {
    let src = squeeze(&bytes, MARKUP);
    let tokens = tokenize(&src);
    tokens
        .iter()
        .filter(|token| !matches!(token, Token::Error { .. }))
        .map(|token| outer_span(token).start)
        .collect::<Vec<_>>()
        .windows(2)
        .all(|pair| pair[0] <= pair[1])
}

/// Every non-whitespace byte is inside some emitted span. NUL is excluded
/// from the alphabet here: it abandons the surrounding text run, which is
/// the one documented hole in coverage.
#[quickcheck]
fn tokens_cover_the_input(bytes: Vec<u8>) -> bool {
    let src = squeeze(&bytes, MARKUP_NO_NUL);
    let mut covered = vec![false; src.len()];
    for token in tokenize(&src) {
        let span = outer_span(&token);
        for slot in &mut covered[span.start..span.end] {
            *slot = true;
        }
    }
    covered
        .iter()
        .zip(&src)
        .all(|(&covered, &byte)| covered || matches!(byte, b'\t' | b'\x0A' | b'\x0C' | b' '))
}

#[quickcheck]
fn script_data_mode_terminates(bytes: Vec<u8>) -> bool {
    let mut src = b"<script>".to_vec();
    src.extend(squeeze(&bytes, MARKUP));
    let mut tokenizer = Tokenizer::new();
    let budget = 4 * src.len() + 16;
    for _ in 0..budget {
        match tokenizer.next(&src) {
            Some(Token::Tag(tag))
                if tag.kind.is_start() && tag.name_eq_ignore_case(&src, b"script") =>
            {
                tokenizer.enter_script_data();
            }
            Some(_) => {}
            None => return true,
        }
    }
    false
}

#[quickcheck]
fn attribute_mode_is_deterministic_and_bounded(bytes: Vec<u8>) -> bool {
    let src = squeeze(&bytes, MARKUP);
    let run = || {
        let mut tokenizer = Tokenizer::new();
        tokenizer.emit_attributes(true);
        let mut out = Vec::new();
        let budget = 4 * src.len() + 16;
        for _ in 0..budget {
            match tokenizer.next(&src) {
                Some(token) => out.push(token),
                None => return Some(out),
            }
        }
        None
    };
    match (run(), run()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
