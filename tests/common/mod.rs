//! Helpers shared by the integration tests.
#![allow(dead_code)]

use html5span::{Quote, TagKind, Token, Tokenizer};

/// Run the tokenizer over `src` and collect every token.
pub fn tokenize(src: &[u8]) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new();
    collect(&mut tokenizer, src)
}

/// Like [`tokenize`], but in attribute-granularity mode.
pub fn tokenize_attrs(src: &[u8]) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new();
    tokenizer.emit_attributes(true);
    collect(&mut tokenizer, src)
}

pub fn collect(tokenizer: &mut Tokenizer, src: &[u8]) -> Vec<Token> {
    let mut out = Vec::new();
    while let Some(token) = tokenizer.next(src) {
        out.push(token);
    }
    out
}

/// Render tokens into compact strings, resolving all spans against `src`, so
/// expected sequences can be written out literally.
pub fn render(src: &[u8], tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(|token| render_one(src, token)).collect()
}

fn s(src: &[u8], span: html5span::Span) -> String {
    String::from_utf8_lossy(span.slice(src)).into_owned()
}

fn render_one(src: &[u8], token: &Token) -> String {
    match *token {
        Token::Text(span) => format!("text({})", s(src, span)),
        Token::Tag(tag) => {
            let kind = match tag.kind {
                TagKind::Start => "start",
                TagKind::StartAttrs => "start_attrs",
                TagKind::StartSelf => "start_self",
                TagKind::StartAttrsSelf => "start_attrs_self",
                TagKind::End => "end",
            };
            format!("{}({})", kind, s(src, tag.name))
        }
        Token::TagName(span) => format!("tag_name({})", s(src, span)),
        Token::Attr(attr) => match attr.value {
            Some(value) => {
                let quote = match value.quote {
                    Quote::None => "unquoted",
                    Quote::Single => "single",
                    Quote::Double => "double",
                };
                format!("attr({}={}, {})", s(src, attr.name), s(src, value.span), quote)
            }
            None => format!("attr({})", s(src, attr.name)),
        },
        Token::Doctype(doctype) => {
            let name = doctype.name.map(|name| s(src, name)).unwrap_or_default();
            if doctype.force_quirks {
                format!("doctype({}, quirks)", name)
            } else {
                format!("doctype({})", name)
            }
        }
        Token::Comment(span) => format!("comment({})", s(src, span)),
        Token::Error { error, .. } => format!("error({})", error),
    }
}
