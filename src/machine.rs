//! The state dispatch.
//!
//! [`step`] runs one state's worth of work: consume a byte (or a whole run
//! of boring bytes), transition, and possibly emit. States that only move
//! the cursor return [`Step::Continue`]; the driver in `tokenizer.rs` loops
//! until something is emitted. Transitions that produce two tokens return
//! the first and park the second in the tokenizer's deferred slot.

use memchr::{memchr, memchr2, memchr3};

use crate::span::{is_whitespace, Span};
use crate::state::{PendingDoctype, PendingTag, State};
use crate::token::{Attr, AttrValue, Doctype, Quote, Tag, TagKind, Token};
use crate::tokenizer::Tokenizer;
use crate::Error;

pub(crate) enum Step {
    Continue,
    Emit(Token),
    Done,
}

fn switch(slf: &mut Tokenizer, state: State) -> Step {
    slf.state = state;
    Step::Continue
}

fn emit(slf: &mut Tokenizer, state: State, token: Token) -> Step {
    slf.state = state;
    Step::Emit(token)
}

fn emit2(slf: &mut Tokenizer, state: State, first: Token, second: Token) -> Step {
    slf.defer(second);
    emit(slf, state, first)
}

fn parse_error(error: Error, span: Span) -> Token {
    Token::Error { error, span }
}

/// Span of the byte consumed last.
fn here(slf: &Tokenizer) -> Span {
    Span::new(slf.idx - 1, slf.idx)
}

/// Advance the cursor over bytes matching `pred`.
fn eat_while(slf: &mut Tokenizer, src: &[u8], pred: impl Fn(u8) -> bool) {
    while src.get(slf.idx).is_some_and(|&c| pred(c)) {
        slf.idx += 1;
    }
}

/// Jump the cursor to the next occurrence of either needle, or to the end of
/// input.
fn skip_until2(slf: &mut Tokenizer, src: &[u8], a: u8, b: u8) {
    match memchr2(a, b, &src[slf.idx..]) {
        Some(pos) => slf.idx += pos,
        None => slf.idx = src.len(),
    }
}

fn skip_until3(slf: &mut Tokenizer, src: &[u8], a: u8, b: u8, c: u8) {
    match memchr3(a, b, c, &src[slf.idx..]) {
        Some(pos) => slf.idx += pos,
        None => slf.idx = src.len(),
    }
}

fn starts_with_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

fn ws_suffix(chunk: &[u8]) -> usize {
    chunk.iter().rev().take_while(|&&c| is_whitespace(c)).count()
}

/// `src[start..end]` trimmed of whitespace on both ends, or `None` if
/// nothing remains.
fn text_token(src: &[u8], start: usize, end: usize) -> Option<Token> {
    let span = Span::new(start, end).trim(src);
    (!span.is_empty()).then(|| Token::Text(span))
}

fn tag_token(tag: PendingTag, end: usize) -> Token {
    Token::Tag(Tag {
        span: Span::new(tag.start, end),
        name: tag.name,
        kind: tag.kind,
    })
}

fn bare_attr(name: Span) -> Token {
    Token::Attr(Attr { name, value: None })
}

fn valued_attr(name: Span, quote: Quote, span: Span) -> Token {
    Token::Attr(Attr {
        name,
        value: Some(AttrValue { quote, span }),
    })
}

fn comment_token(lt: usize, end: usize) -> Token {
    Token::Comment(Span::new(lt, end))
}

fn doctype_token(doctype: PendingDoctype, end: usize) -> Token {
    Token::Doctype(Doctype {
        span: Span::new(doctype.start, end),
        name: doctype.name,
        extra: doctype.extra.unwrap_or(Span { start: end, end }),
        force_quirks: doctype.force_quirks,
    })
}

fn grow_extra(doctype: &mut PendingDoctype, end: usize) {
    if let Some(extra) = doctype.extra.as_mut() {
        extra.end = end;
    }
}

/// Finish the tag name in attribute-granularity mode, where the name is its
/// own token; with tag granularity the name stays part of the pending tag.
fn finish_tag_name(slf: &mut Tokenizer, tag: PendingTag, next: State) -> Step {
    if slf.return_attrs {
        emit(slf, next, Token::TagName(tag.name))
    } else {
        switch(slf, next)
    }
}

/// The `>` of a tag. With tag granularity this is where the whole tag is
/// emitted; in attribute-granularity mode the pieces are already out.
fn finish_tag(slf: &mut Tokenizer, tag: PendingTag) -> Step {
    if slf.return_attrs {
        switch(slf, State::Data)
    } else {
        emit(slf, State::Data, tag_token(tag, slf.idx))
    }
}

fn finish_bare_attr(slf: &mut Tokenizer, name: Span, next: State) -> Step {
    if slf.return_attrs {
        emit(slf, next, bare_attr(name))
    } else {
        switch(slf, next)
    }
}

fn finish_valued_attr(
    slf: &mut Tokenizer,
    name: Span,
    quote: Quote,
    span: Span,
    next: State,
) -> Step {
    if slf.return_attrs {
        emit(slf, next, valued_attr(name, quote, span))
    } else {
        switch(slf, next)
    }
}

/// Emit an `eof-in-…` error and park the machine in the terminal state. The
/// best-effort token for the unterminated tag goes into the deferred slot;
/// callers in attribute-granularity mode pass their own salvage.
fn eof_in_tag(
    slf: &mut Tokenizer,
    error: Error,
    span: Span,
    tag: PendingTag,
    attr_salvage: Option<Token>,
) -> Step {
    let salvage = if slf.return_attrs {
        attr_salvage
    } else {
        Some(tag_token(tag, span.end))
    };
    if let Some(token) = salvage {
        slf.defer(token);
    }
    emit(slf, State::Eof, parse_error(error, span))
}

fn eof_in_value(
    slf: &mut Tokenizer,
    src: &[u8],
    tag: PendingTag,
    name: Span,
    quote: Quote,
    value: usize,
) -> Step {
    let span = Span::new(value, src.len());
    let salvage = valued_attr(name, quote, span);
    eof_in_tag(slf, Error::EofInAttributeValue, span, tag, Some(salvage))
}

fn eof_in_comment(slf: &mut Tokenizer, lt: usize, len: usize) -> Step {
    slf.defer(comment_token(lt, len));
    emit(
        slf,
        State::Eof,
        parse_error(Error::EofInComment, Span::new(lt, len)),
    )
}

fn eof_in_doctype(slf: &mut Tokenizer, mut doctype: PendingDoctype, len: usize) -> Step {
    doctype.force_quirks = true;
    let span = Span::new(doctype.start, len);
    slf.defer(doctype_token(doctype, len));
    emit(slf, State::Eof, parse_error(Error::EofInDoctype, span))
}

/// End of input inside RCDATA/RAWTEXT/plain script data: flush the text run
/// and stop. This is not an error; the host simply never closed the element.
fn finish_text_mode(slf: &mut Tokenizer, src: &[u8], start: usize) -> Step {
    slf.state = State::Eof;
    match text_token(src, start, src.len()) {
        Some(text) => Step::Emit(text),
        None => Step::Done,
    }
}

fn eof_in_script_comment(slf: &mut Tokenizer, src: &[u8], start: usize) -> Step {
    let error = parse_error(
        Error::EofInScriptHtmlCommentLikeText,
        Span::new(start, src.len()),
    );
    slf.state = State::Eof;
    if let Some(text) = text_token(src, start, src.len()) {
        slf.defer(text);
    }
    Step::Emit(error)
}

/// Hand over from a text content mode to `next`, emitting the accumulated
/// text run (trimmed, whitespace-only runs dropped) first. `extra` rides in
/// the deferred slot, or becomes the primary emission when there is no text.
fn leave_text_mode(
    slf: &mut Tokenizer,
    src: &[u8],
    start: usize,
    lt: usize,
    next: State,
    extra: Option<Token>,
) -> Step {
    match (text_token(src, start, lt), extra) {
        (Some(text), Some(extra)) => emit2(slf, next, text, extra),
        (Some(text), None) => emit(slf, next, text),
        (None, Some(extra)) => emit(slf, next, extra),
        (None, None) => switch(slf, next),
    }
}

/// The end-tag-name state shared by RCDATA, RAWTEXT and both script data
/// flavors. Only an appropriate end tag leaves the mode; anything else turns
/// the `</name` back into literal text by falling back to `back`.
///
/// `script` selects the solidus rule: script data treats `</script/` as a
/// self-closing start tag state, the others scan for attributes right away.
fn end_tag_name(
    slf: &mut Tokenizer,
    src: &[u8],
    start: usize,
    lt: usize,
    name: usize,
    back: State,
    script: bool,
) -> Step {
    eat_while(slf, src, |c| c.is_ascii_alphabetic());
    let name_span = Span::new(name, slf.idx);
    match slf.consume(src) {
        Some(c @ (b'\t' | b'\x0A' | b'\x0C' | b' ' | b'/' | b'>'))
            if slf.is_appropriate_end_tag(name_span.slice(src)) =>
        {
            let tag = PendingTag {
                start: lt,
                name: name_span,
                kind: TagKind::End,
            };
            match c {
                b'>' => {
                    let token = if slf.return_attrs {
                        Token::TagName(name_span)
                    } else {
                        tag_token(tag, slf.idx)
                    };
                    leave_text_mode(slf, src, start, lt, State::Data, Some(token))
                }
                b'/' if script => {
                    let next = State::SelfClosingStartTag { tag };
                    let extra = slf.return_attrs.then(|| Token::TagName(name_span));
                    leave_text_mode(slf, src, start, lt, next, extra)
                }
                b'/' => {
                    // a matching end tag with a trailing solidus: flag it
                    // and keep scanning for attributes
                    let next = State::BeforeAttributeName { tag };
                    let solidus = parse_error(Error::EndTagWithTrailingSolidus, here(slf));
                    if slf.return_attrs {
                        // one deferred slot; the tag name wins over the
                        // error when pending text takes the primary
                        match text_token(src, start, lt) {
                            Some(text) => emit2(slf, next, text, Token::TagName(name_span)),
                            None => emit2(slf, next, solidus, Token::TagName(name_span)),
                        }
                    } else {
                        leave_text_mode(slf, src, start, lt, next, Some(solidus))
                    }
                }
                _ => {
                    let next = State::BeforeAttributeName { tag };
                    let extra = slf.return_attrs.then(|| Token::TagName(name_span));
                    leave_text_mode(slf, src, start, lt, next, extra)
                }
            }
        }
        Some(_) => {
            slf.reconsume();
            switch(slf, back)
        }
        None => switch(slf, back),
    }
}

pub(crate) fn step(slf: &mut Tokenizer, src: &[u8]) -> Step {
    match slf.state {
        State::Data => match slf.consume(src) {
            Some(b'<') => switch(slf, State::TagOpen { lt: slf.idx - 1 }),
            Some(b'\0') => emit(
                slf,
                State::Data,
                parse_error(Error::UnexpectedNullCharacter, here(slf)),
            ),
            Some(c) => switch(
                slf,
                State::Text {
                    start: slf.idx - 1,
                    whitespace_only: is_whitespace(c),
                    whitespace_streak: usize::from(is_whitespace(c)),
                },
            ),
            None => {
                slf.state = State::Eof;
                Step::Done
            }
        },

        State::Text {
            mut start,
            mut whitespace_only,
            mut whitespace_streak,
        } => {
            let rest = &src[slf.idx..];
            let stop = memchr2(b'<', b'\0', rest).unwrap_or(rest.len());
            let chunk = &rest[..stop];
            if !chunk.is_empty() {
                if whitespace_only {
                    if let Some(k) = chunk.iter().position(|&c| !is_whitespace(c)) {
                        // first non-whitespace byte of the run: re-anchor,
                        // which is what implements the left trim
                        start = slf.idx + k;
                        whitespace_only = false;
                    }
                }
                let suffix = ws_suffix(chunk);
                if suffix == chunk.len() {
                    whitespace_streak += suffix;
                } else {
                    whitespace_streak = suffix;
                }
                slf.idx += chunk.len();
            }
            match slf.consume(src) {
                Some(b'<') => {
                    let lt = slf.idx - 1;
                    if whitespace_only {
                        switch(slf, State::TagOpen { lt })
                    } else {
                        let text = Token::Text(Span::new(start, lt - whitespace_streak));
                        emit(slf, State::TagOpen { lt }, text)
                    }
                }
                Some(_) => {
                    // NUL: report it and abandon the run
                    emit(
                        slf,
                        State::Data,
                        parse_error(Error::UnexpectedNullCharacter, here(slf)),
                    )
                }
                None => {
                    slf.state = State::Eof;
                    if whitespace_only {
                        Step::Done
                    } else {
                        Step::Emit(Token::Text(Span::new(
                            start,
                            src.len() - whitespace_streak,
                        )))
                    }
                }
            }
        }

        State::TagOpen { lt } => match slf.consume(src) {
            Some(b'!') => switch(slf, State::MarkupDeclarationOpen { lt }),
            Some(b'/') => switch(slf, State::EndTagOpen { lt }),
            Some(c) if c.is_ascii_alphabetic() => {
                slf.reconsume();
                switch(
                    slf,
                    State::TagName {
                        tag: PendingTag {
                            start: lt,
                            name: Span::new(slf.idx, slf.idx),
                            kind: TagKind::Start,
                        },
                    },
                )
            }
            Some(b'?') => {
                let error = parse_error(Error::InvalidFirstCharacterOfTagName, here(slf));
                slf.reconsume();
                emit(slf, State::BogusComment { lt }, error)
            }
            Some(_) => {
                // the `<` becomes literal text, together with this byte
                let error = parse_error(Error::InvalidFirstCharacterOfTagName, here(slf));
                slf.reconsume();
                emit(
                    slf,
                    State::Text {
                        start: lt,
                        whitespace_only: false,
                        whitespace_streak: 0,
                    },
                    error,
                )
            }
            None => emit(
                slf,
                State::Eof,
                parse_error(Error::EofBeforeTagName, Span::new(lt, src.len())),
            ),
        },

        State::EndTagOpen { lt } => match slf.consume(src) {
            Some(c) if c.is_ascii_alphabetic() => {
                slf.reconsume();
                switch(
                    slf,
                    State::TagName {
                        tag: PendingTag {
                            start: lt,
                            name: Span::new(slf.idx, slf.idx),
                            kind: TagKind::End,
                        },
                    },
                )
            }
            Some(b'>') => emit(
                slf,
                State::Data,
                parse_error(Error::MissingEndTagName, Span::new(lt, slf.idx)),
            ),
            Some(_) => {
                let error = parse_error(Error::InvalidFirstCharacterOfTagName, here(slf));
                slf.reconsume();
                emit(slf, State::BogusComment { lt }, error)
            }
            None => emit(
                slf,
                State::Eof,
                parse_error(Error::EofBeforeTagName, Span::new(lt, src.len())),
            ),
        },

        State::TagName { mut tag } => {
            eat_while(slf, src, |c| c.is_ascii_alphanumeric());
            tag.name.end = slf.idx;
            match slf.consume(src) {
                Some(b'\t' | b'\x0A' | b'\x0C' | b' ') => {
                    finish_tag_name(slf, tag, State::BeforeAttributeName { tag })
                }
                Some(b'/') => finish_tag_name(slf, tag, State::SelfClosingStartTag { tag }),
                Some(b'>') => {
                    if slf.return_attrs {
                        emit(slf, State::Data, Token::TagName(tag.name))
                    } else {
                        emit(slf, State::Data, tag_token(tag, slf.idx))
                    }
                }
                Some(b'\0') => {
                    // the NUL stays part of the name span
                    tag.name.end = slf.idx;
                    emit(
                        slf,
                        State::TagName { tag },
                        parse_error(Error::UnexpectedNullCharacter, here(slf)),
                    )
                }
                Some(_) => {
                    slf.reconsume();
                    finish_tag_name(slf, tag, State::BeforeAttributeName { tag })
                }
                None => eof_in_tag(
                    slf,
                    Error::EofInTag,
                    Span::new(tag.start, src.len()),
                    tag,
                    Some(Token::TagName(tag.name)),
                ),
            }
        }

        State::BeforeAttributeName { mut tag } => {
            eat_while(slf, src, is_whitespace);
            match slf.consume(src) {
                Some(b'/') => switch(slf, State::SelfClosingStartTag { tag }),
                Some(b'>') => finish_tag(slf, tag),
                Some(b'=') => {
                    let error =
                        parse_error(Error::UnexpectedEqualsSignBeforeAttributeName, here(slf));
                    tag.kind = tag.kind.with_attrs();
                    // the equals sign becomes the first byte of the name
                    let name = Span::new(slf.idx - 1, slf.idx);
                    emit(slf, State::AttributeName { tag, name }, error)
                }
                Some(_) => {
                    slf.reconsume();
                    tag.kind = tag.kind.with_attrs();
                    let name = Span::new(slf.idx, slf.idx);
                    switch(slf, State::AttributeName { tag, name })
                }
                None => eof_in_tag(
                    slf,
                    Error::EofInTag,
                    Span::new(tag.start, src.len()),
                    tag,
                    None,
                ),
            }
        }

        State::AttributeName { tag, mut name } => {
            eat_while(slf, src, |c| {
                !matches!(
                    c,
                    b'\t' | b'\x0A'
                        | b'\x0C'
                        | b' '
                        | b'/'
                        | b'>'
                        | b'='
                        | b'\0'
                        | b'"'
                        | b'\''
                        | b'<'
                )
            });
            name.end = slf.idx;
            match slf.consume(src) {
                Some(b'\t' | b'\x0A' | b'\x0C' | b' ' | b'/' | b'>') => {
                    slf.reconsume();
                    switch(slf, State::AfterAttributeName { tag, name })
                }
                Some(b'=') => switch(slf, State::BeforeAttributeValue { tag, name }),
                Some(b'\0') => {
                    name.end = slf.idx;
                    emit(
                        slf,
                        State::AttributeName { tag, name },
                        parse_error(Error::UnexpectedNullCharacter, here(slf)),
                    )
                }
                Some(b'"' | b'\'' | b'<') => {
                    name.end = slf.idx;
                    emit(
                        slf,
                        State::AttributeName { tag, name },
                        parse_error(Error::UnexpectedCharacterInAttributeName, here(slf)),
                    )
                }
                Some(_) => {
                    name.end = slf.idx;
                    switch(slf, State::AttributeName { tag, name })
                }
                None => eof_in_tag(
                    slf,
                    Error::EofInTag,
                    Span::new(tag.start, src.len()),
                    tag,
                    Some(bare_attr(name)),
                ),
            }
        }

        State::AfterAttributeName { tag, name } => {
            eat_while(slf, src, is_whitespace);
            match slf.consume(src) {
                Some(b'=') => switch(slf, State::BeforeAttributeValue { tag, name }),
                Some(b'/') => finish_bare_attr(slf, name, State::SelfClosingStartTag { tag }),
                Some(b'>') => {
                    if slf.return_attrs {
                        emit(slf, State::Data, bare_attr(name))
                    } else {
                        emit(slf, State::Data, tag_token(tag, slf.idx))
                    }
                }
                Some(_) => {
                    slf.reconsume();
                    let next = State::AttributeName {
                        tag,
                        name: Span::new(slf.idx, slf.idx),
                    };
                    finish_bare_attr(slf, name, next)
                }
                None => eof_in_tag(
                    slf,
                    Error::EofInTag,
                    Span::new(tag.start, src.len()),
                    tag,
                    Some(bare_attr(name)),
                ),
            }
        }

        State::BeforeAttributeValue { tag, name } => {
            eat_while(slf, src, is_whitespace);
            match slf.consume(src) {
                Some(b'"') => switch(
                    slf,
                    State::AttributeValueDoubleQuoted {
                        tag,
                        name,
                        value: slf.idx,
                    },
                ),
                Some(b'\'') => switch(
                    slf,
                    State::AttributeValueSingleQuoted {
                        tag,
                        name,
                        value: slf.idx,
                    },
                ),
                Some(b'>') => {
                    let error = parse_error(Error::MissingAttributeValue, here(slf));
                    if slf.return_attrs {
                        emit2(slf, State::Data, error, bare_attr(name))
                    } else {
                        emit2(slf, State::Data, error, tag_token(tag, slf.idx))
                    }
                }
                Some(_) => {
                    slf.reconsume();
                    switch(
                        slf,
                        State::AttributeValueUnquoted {
                            tag,
                            name,
                            value: slf.idx,
                        },
                    )
                }
                None => eof_in_tag(
                    slf,
                    Error::EofInTag,
                    Span::new(tag.start, src.len()),
                    tag,
                    Some(bare_attr(name)),
                ),
            }
        }

        State::AttributeValueDoubleQuoted { tag, name, value } => {
            skip_until2(slf, src, b'"', b'\0');
            match slf.consume(src) {
                Some(b'"') => {
                    let span = Span::new(value, slf.idx - 1);
                    finish_valued_attr(
                        slf,
                        name,
                        Quote::Double,
                        span,
                        State::AfterAttributeValueQuoted { tag },
                    )
                }
                Some(_) => emit(
                    slf,
                    State::AttributeValueDoubleQuoted { tag, name, value },
                    parse_error(Error::UnexpectedNullCharacter, here(slf)),
                ),
                None => eof_in_value(slf, src, tag, name, Quote::Double, value),
            }
        }

        State::AttributeValueSingleQuoted { tag, name, value } => {
            skip_until2(slf, src, b'\'', b'\0');
            match slf.consume(src) {
                Some(b'\'') => {
                    let span = Span::new(value, slf.idx - 1);
                    finish_valued_attr(
                        slf,
                        name,
                        Quote::Single,
                        span,
                        State::AfterAttributeValueQuoted { tag },
                    )
                }
                Some(_) => emit(
                    slf,
                    State::AttributeValueSingleQuoted { tag, name, value },
                    parse_error(Error::UnexpectedNullCharacter, here(slf)),
                ),
                None => eof_in_value(slf, src, tag, name, Quote::Single, value),
            }
        }

        State::AttributeValueUnquoted { tag, name, value } => {
            eat_while(slf, src, |c| {
                !matches!(
                    c,
                    b'\t' | b'\x0A'
                        | b'\x0C'
                        | b' '
                        | b'>'
                        | b'\0'
                        | b'"'
                        | b'\''
                        | b'<'
                        | b'='
                        | b'`'
                )
            });
            match slf.consume(src) {
                Some(b'\t' | b'\x0A' | b'\x0C' | b' ') => {
                    let span = Span::new(value, slf.idx - 1);
                    finish_valued_attr(
                        slf,
                        name,
                        Quote::None,
                        span,
                        State::BeforeAttributeName { tag },
                    )
                }
                Some(b'>') => {
                    let span = Span::new(value, slf.idx - 1);
                    if slf.return_attrs {
                        emit(slf, State::Data, valued_attr(name, Quote::None, span))
                    } else {
                        emit(slf, State::Data, tag_token(tag, slf.idx))
                    }
                }
                Some(b'\0') => emit(
                    slf,
                    State::AttributeValueUnquoted { tag, name, value },
                    parse_error(Error::UnexpectedNullCharacter, here(slf)),
                ),
                Some(b'"' | b'\'' | b'<' | b'=' | b'`') => emit(
                    slf,
                    State::AttributeValueUnquoted { tag, name, value },
                    parse_error(Error::UnexpectedCharacterInUnquotedAttributeValue, here(slf)),
                ),
                Some(_) => switch(slf, State::AttributeValueUnquoted { tag, name, value }),
                None => eof_in_value(slf, src, tag, name, Quote::None, value),
            }
        }

        State::AfterAttributeValueQuoted { tag } => match slf.consume(src) {
            Some(b'\t' | b'\x0A' | b'\x0C' | b' ') => {
                switch(slf, State::BeforeAttributeName { tag })
            }
            Some(b'/') => switch(slf, State::SelfClosingStartTag { tag }),
            Some(b'>') => finish_tag(slf, tag),
            Some(_) => {
                let error = parse_error(Error::MissingWhitespaceBetweenAttributes, here(slf));
                slf.reconsume();
                emit(slf, State::BeforeAttributeName { tag }, error)
            }
            None => eof_in_tag(
                slf,
                Error::EofInTag,
                Span::new(tag.start, src.len()),
                tag,
                None,
            ),
        },

        State::SelfClosingStartTag { mut tag } => match slf.consume(src) {
            Some(b'>') => {
                if matches!(tag.kind, TagKind::End) {
                    let error = parse_error(Error::EndTagWithTrailingSolidus, here(slf));
                    if slf.return_attrs {
                        emit(slf, State::Data, error)
                    } else {
                        emit2(slf, State::Data, error, tag_token(tag, slf.idx))
                    }
                } else {
                    tag.kind = tag.kind.with_self_closing();
                    finish_tag(slf, tag)
                }
            }
            Some(_) => {
                let error = parse_error(Error::UnexpectedSolidusInTag, here(slf));
                slf.reconsume();
                emit(slf, State::BeforeAttributeName { tag }, error)
            }
            None => eof_in_tag(
                slf,
                Error::EofInTag,
                Span::new(tag.start, src.len()),
                tag,
                None,
            ),
        },

        State::MarkupDeclarationOpen { lt } => {
            let rest = &src[slf.idx..];
            if rest.starts_with(b"--") {
                slf.idx += 2;
                switch(slf, State::CommentStart { lt })
            } else if starts_with_ignore_case(rest, b"doctype") {
                slf.idx += 7;
                switch(slf, State::Doctype { lt })
            } else if rest.starts_with(b"[CDATA[") {
                slf.idx += 7;
                switch(slf, State::CdataSection { lt })
            } else {
                let error = parse_error(Error::IncorrectlyOpenedComment, Span::new(lt, slf.idx));
                emit(slf, State::BogusComment { lt }, error)
            }
        }

        State::BogusComment { lt } => {
            skip_until2(slf, src, b'>', b'\0');
            match slf.consume(src) {
                Some(b'>') => emit(slf, State::Data, comment_token(lt, slf.idx)),
                Some(_) => emit(
                    slf,
                    State::BogusComment { lt },
                    parse_error(Error::UnexpectedNullCharacter, here(slf)),
                ),
                None => emit(slf, State::Eof, comment_token(lt, src.len())),
            }
        }

        State::CommentStart { lt } => match slf.consume(src) {
            Some(b'-') => switch(slf, State::CommentStartDash { lt }),
            Some(b'>') => {
                let error = parse_error(Error::AbruptClosingOfEmptyComment, here(slf));
                emit2(slf, State::Data, error, comment_token(lt, slf.idx))
            }
            Some(_) => {
                slf.reconsume();
                switch(slf, State::Comment { lt })
            }
            None => eof_in_comment(slf, lt, src.len()),
        },

        State::CommentStartDash { lt } => match slf.consume(src) {
            Some(b'-') => switch(slf, State::CommentEnd { lt }),
            Some(b'>') => {
                let error = parse_error(Error::AbruptClosingOfEmptyComment, here(slf));
                emit2(slf, State::Data, error, comment_token(lt, slf.idx))
            }
            Some(_) => {
                slf.reconsume();
                switch(slf, State::Comment { lt })
            }
            None => eof_in_comment(slf, lt, src.len()),
        },

        State::Comment { lt } => {
            skip_until3(slf, src, b'<', b'-', b'\0');
            match slf.consume(src) {
                Some(b'<') => switch(slf, State::CommentLessThanSign { lt }),
                Some(b'-') => switch(slf, State::CommentEndDash { lt }),
                Some(_) => emit(
                    slf,
                    State::Comment { lt },
                    parse_error(Error::UnexpectedNullCharacter, here(slf)),
                ),
                None => eof_in_comment(slf, lt, src.len()),
            }
        }

        State::CommentLessThanSign { lt } => match slf.consume(src) {
            Some(b'!') => switch(slf, State::CommentLessThanSignBang { lt }),
            Some(b'<') => switch(slf, State::CommentLessThanSign { lt }),
            Some(_) => {
                slf.reconsume();
                switch(slf, State::Comment { lt })
            }
            None => switch(slf, State::Comment { lt }),
        },

        State::CommentLessThanSignBang { lt } => match slf.consume(src) {
            Some(b'-') => switch(slf, State::CommentLessThanSignBangDash { lt }),
            Some(_) => {
                slf.reconsume();
                switch(slf, State::Comment { lt })
            }
            None => switch(slf, State::Comment { lt }),
        },

        State::CommentLessThanSignBangDash { lt } => match slf.consume(src) {
            Some(b'-') => switch(slf, State::CommentLessThanSignBangDashDash { lt }),
            Some(_) => {
                slf.reconsume();
                switch(slf, State::CommentEndDash { lt })
            }
            None => switch(slf, State::CommentEndDash { lt }),
        },

        State::CommentLessThanSignBangDashDash { lt } => match slf.consume(src) {
            Some(b'>') => {
                slf.reconsume();
                switch(slf, State::CommentEnd { lt })
            }
            Some(_) => {
                // `<!--` inside a comment
                let error = parse_error(Error::NestedComment, here(slf));
                slf.reconsume();
                emit(slf, State::CommentEnd { lt }, error)
            }
            None => switch(slf, State::CommentEnd { lt }),
        },

        State::CommentEndDash { lt } => match slf.consume(src) {
            Some(b'-') => switch(slf, State::CommentEnd { lt }),
            Some(_) => {
                slf.reconsume();
                switch(slf, State::Comment { lt })
            }
            None => eof_in_comment(slf, lt, src.len()),
        },

        State::CommentEnd { lt } => match slf.consume(src) {
            Some(b'>') => emit(slf, State::Data, comment_token(lt, slf.idx)),
            Some(b'!') => switch(slf, State::CommentEndBang { lt }),
            Some(b'-') => switch(slf, State::CommentEnd { lt }),
            Some(_) => {
                slf.reconsume();
                switch(slf, State::Comment { lt })
            }
            None => eof_in_comment(slf, lt, src.len()),
        },

        State::CommentEndBang { lt } => match slf.consume(src) {
            Some(b'-') => switch(slf, State::CommentEndDash { lt }),
            Some(b'>') => {
                let error = parse_error(Error::IncorrectlyClosedComment, here(slf));
                emit2(slf, State::Data, error, comment_token(lt, slf.idx))
            }
            Some(_) => {
                slf.reconsume();
                switch(slf, State::Comment { lt })
            }
            None => eof_in_comment(slf, lt, src.len()),
        },

        State::Doctype { lt } => match slf.consume(src) {
            Some(b'\t' | b'\x0A' | b'\x0C' | b' ') => switch(slf, State::BeforeDoctypeName { lt }),
            Some(b'>') => {
                slf.reconsume();
                switch(slf, State::BeforeDoctypeName { lt })
            }
            Some(_) => {
                let error = parse_error(Error::MissingWhitespaceBeforeDoctypeName, here(slf));
                slf.reconsume();
                emit(slf, State::BeforeDoctypeName { lt }, error)
            }
            None => eof_in_doctype(
                slf,
                PendingDoctype {
                    start: lt,
                    name: None,
                    extra: None,
                    force_quirks: false,
                },
                src.len(),
            ),
        },

        State::BeforeDoctypeName { lt } => {
            eat_while(slf, src, is_whitespace);
            match slf.consume(src) {
                Some(b'>') => {
                    let error = parse_error(Error::MissingDoctypeName, here(slf));
                    let doctype = PendingDoctype {
                        start: lt,
                        name: None,
                        extra: None,
                        force_quirks: true,
                    };
                    emit2(slf, State::Data, error, doctype_token(doctype, slf.idx))
                }
                Some(c) => {
                    let doctype = PendingDoctype {
                        start: lt,
                        name: Some(Span::new(slf.idx - 1, slf.idx)),
                        extra: None,
                        force_quirks: false,
                    };
                    if c == b'\0' {
                        let error = parse_error(Error::UnexpectedNullCharacter, here(slf));
                        emit(slf, State::DoctypeName { doctype }, error)
                    } else {
                        switch(slf, State::DoctypeName { doctype })
                    }
                }
                None => eof_in_doctype(
                    slf,
                    PendingDoctype {
                        start: lt,
                        name: None,
                        extra: None,
                        force_quirks: false,
                    },
                    src.len(),
                ),
            }
        }

        State::DoctypeName { mut doctype } => {
            eat_while(slf, src, |c| {
                !matches!(c, b'\t' | b'\x0A' | b'\x0C' | b' ' | b'>' | b'\0')
            });
            if let Some(name) = doctype.name.as_mut() {
                name.end = slf.idx;
            }
            match slf.consume(src) {
                Some(b'\t' | b'\x0A' | b'\x0C' | b' ') => {
                    switch(slf, State::AfterDoctypeName { doctype })
                }
                Some(b'>') => emit(slf, State::Data, doctype_token(doctype, slf.idx)),
                Some(_) => {
                    // NUL: stays part of the name span
                    if let Some(name) = doctype.name.as_mut() {
                        name.end = slf.idx;
                    }
                    emit(
                        slf,
                        State::DoctypeName { doctype },
                        parse_error(Error::UnexpectedNullCharacter, here(slf)),
                    )
                }
                None => eof_in_doctype(slf, doctype, src.len()),
            }
        }

        State::AfterDoctypeName { mut doctype } => {
            eat_while(slf, src, is_whitespace);
            match slf.consume(src) {
                Some(b'>') => emit(slf, State::Data, doctype_token(doctype, slf.idx)),
                Some(_) => {
                    slf.reconsume();
                    let kw = slf.idx;
                    let rest = &src[kw..];
                    if starts_with_ignore_case(rest, b"public") {
                        slf.idx += 6;
                        doctype.extra = Some(Span::new(kw, slf.idx));
                        switch(slf, State::AfterDoctypePublicKeyword { doctype })
                    } else if starts_with_ignore_case(rest, b"system") {
                        slf.idx += 6;
                        doctype.extra = Some(Span::new(kw, slf.idx));
                        switch(slf, State::AfterDoctypeSystemKeyword { doctype })
                    } else {
                        let error = parse_error(
                            Error::InvalidCharacterSequenceAfterDoctypeName,
                            Span::new(kw, kw + 1),
                        );
                        doctype.force_quirks = true;
                        emit(slf, State::BogusDoctype { doctype }, error)
                    }
                }
                None => eof_in_doctype(slf, doctype, src.len()),
            }
        }

        State::AfterDoctypePublicKeyword { mut doctype } => match slf.consume(src) {
            Some(b'\t' | b'\x0A' | b'\x0C' | b' ') => {
                switch(slf, State::BeforeDoctypePublicIdentifier { doctype })
            }
            Some(b'"') => {
                let error =
                    parse_error(Error::MissingWhitespaceAfterDoctypePublicKeyword, here(slf));
                grow_extra(&mut doctype, slf.idx);
                emit(
                    slf,
                    State::DoctypePublicIdentifierDoubleQuoted { doctype },
                    error,
                )
            }
            Some(b'\'') => {
                let error =
                    parse_error(Error::MissingWhitespaceAfterDoctypePublicKeyword, here(slf));
                grow_extra(&mut doctype, slf.idx);
                emit(
                    slf,
                    State::DoctypePublicIdentifierSingleQuoted { doctype },
                    error,
                )
            }
            Some(b'>') => {
                let error = parse_error(Error::MissingDoctypePublicIdentifier, here(slf));
                doctype.force_quirks = true;
                emit2(slf, State::Data, error, doctype_token(doctype, slf.idx))
            }
            Some(_) => {
                let error = parse_error(Error::MissingQuoteBeforeDoctypePublicIdentifier, here(slf));
                doctype.force_quirks = true;
                slf.reconsume();
                emit(slf, State::BogusDoctype { doctype }, error)
            }
            None => eof_in_doctype(slf, doctype, src.len()),
        },

        State::BeforeDoctypePublicIdentifier { mut doctype } => {
            eat_while(slf, src, is_whitespace);
            match slf.consume(src) {
                Some(b'"') => {
                    grow_extra(&mut doctype, slf.idx);
                    switch(slf, State::DoctypePublicIdentifierDoubleQuoted { doctype })
                }
                Some(b'\'') => {
                    grow_extra(&mut doctype, slf.idx);
                    switch(slf, State::DoctypePublicIdentifierSingleQuoted { doctype })
                }
                Some(b'>') => {
                    let error = parse_error(Error::MissingDoctypePublicIdentifier, here(slf));
                    doctype.force_quirks = true;
                    emit2(slf, State::Data, error, doctype_token(doctype, slf.idx))
                }
                Some(_) => {
                    let error =
                        parse_error(Error::MissingQuoteBeforeDoctypePublicIdentifier, here(slf));
                    doctype.force_quirks = true;
                    slf.reconsume();
                    emit(slf, State::BogusDoctype { doctype }, error)
                }
                None => eof_in_doctype(slf, doctype, src.len()),
            }
        }

        State::DoctypePublicIdentifierDoubleQuoted { doctype } => doctype_identifier(
            slf,
            src,
            doctype,
            b'"',
            Error::AbruptDoctypePublicIdentifier,
            |doctype| State::DoctypePublicIdentifierDoubleQuoted { doctype },
            |doctype| State::AfterDoctypePublicIdentifier { doctype },
        ),

        State::DoctypePublicIdentifierSingleQuoted { doctype } => doctype_identifier(
            slf,
            src,
            doctype,
            b'\'',
            Error::AbruptDoctypePublicIdentifier,
            |doctype| State::DoctypePublicIdentifierSingleQuoted { doctype },
            |doctype| State::AfterDoctypePublicIdentifier { doctype },
        ),

        State::AfterDoctypePublicIdentifier { mut doctype } => match slf.consume(src) {
            Some(b'\t' | b'\x0A' | b'\x0C' | b' ') => switch(
                slf,
                State::BetweenDoctypePublicAndSystemIdentifiers { doctype },
            ),
            Some(b'>') => emit(slf, State::Data, doctype_token(doctype, slf.idx)),
            Some(b'"') => {
                let error = parse_error(
                    Error::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                    here(slf),
                );
                grow_extra(&mut doctype, slf.idx);
                emit(
                    slf,
                    State::DoctypeSystemIdentifierDoubleQuoted { doctype },
                    error,
                )
            }
            Some(b'\'') => {
                let error = parse_error(
                    Error::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                    here(slf),
                );
                grow_extra(&mut doctype, slf.idx);
                emit(
                    slf,
                    State::DoctypeSystemIdentifierSingleQuoted { doctype },
                    error,
                )
            }
            Some(_) => {
                let error = parse_error(Error::MissingQuoteBeforeDoctypeSystemIdentifier, here(slf));
                doctype.force_quirks = true;
                slf.reconsume();
                emit(slf, State::BogusDoctype { doctype }, error)
            }
            None => eof_in_doctype(slf, doctype, src.len()),
        },

        State::BetweenDoctypePublicAndSystemIdentifiers { mut doctype } => {
            eat_while(slf, src, is_whitespace);
            match slf.consume(src) {
                Some(b'>') => emit(slf, State::Data, doctype_token(doctype, slf.idx)),
                Some(b'"') => {
                    grow_extra(&mut doctype, slf.idx);
                    switch(slf, State::DoctypeSystemIdentifierDoubleQuoted { doctype })
                }
                Some(b'\'') => {
                    grow_extra(&mut doctype, slf.idx);
                    switch(slf, State::DoctypeSystemIdentifierSingleQuoted { doctype })
                }
                Some(_) => {
                    let error =
                        parse_error(Error::MissingQuoteBeforeDoctypeSystemIdentifier, here(slf));
                    doctype.force_quirks = true;
                    slf.reconsume();
                    emit(slf, State::BogusDoctype { doctype }, error)
                }
                None => eof_in_doctype(slf, doctype, src.len()),
            }
        }

        State::AfterDoctypeSystemKeyword { mut doctype } => match slf.consume(src) {
            Some(b'\t' | b'\x0A' | b'\x0C' | b' ') => {
                switch(slf, State::BeforeDoctypeSystemIdentifier { doctype })
            }
            Some(b'"') => {
                let error =
                    parse_error(Error::MissingWhitespaceAfterDoctypeSystemKeyword, here(slf));
                grow_extra(&mut doctype, slf.idx);
                emit(
                    slf,
                    State::DoctypeSystemIdentifierDoubleQuoted { doctype },
                    error,
                )
            }
            Some(b'\'') => {
                let error =
                    parse_error(Error::MissingWhitespaceAfterDoctypeSystemKeyword, here(slf));
                grow_extra(&mut doctype, slf.idx);
                emit(
                    slf,
                    State::DoctypeSystemIdentifierSingleQuoted { doctype },
                    error,
                )
            }
            Some(b'>') => {
                let error = parse_error(Error::MissingDoctypeSystemIdentifier, here(slf));
                doctype.force_quirks = true;
                emit2(slf, State::Data, error, doctype_token(doctype, slf.idx))
            }
            Some(_) => {
                let error = parse_error(Error::MissingQuoteBeforeDoctypeSystemIdentifier, here(slf));
                doctype.force_quirks = true;
                slf.reconsume();
                emit(slf, State::BogusDoctype { doctype }, error)
            }
            None => eof_in_doctype(slf, doctype, src.len()),
        },

        State::BeforeDoctypeSystemIdentifier { mut doctype } => {
            eat_while(slf, src, is_whitespace);
            match slf.consume(src) {
                Some(b'"') => {
                    grow_extra(&mut doctype, slf.idx);
                    switch(slf, State::DoctypeSystemIdentifierDoubleQuoted { doctype })
                }
                Some(b'\'') => {
                    grow_extra(&mut doctype, slf.idx);
                    switch(slf, State::DoctypeSystemIdentifierSingleQuoted { doctype })
                }
                Some(b'>') => {
                    let error = parse_error(Error::MissingDoctypeSystemIdentifier, here(slf));
                    doctype.force_quirks = true;
                    emit2(slf, State::Data, error, doctype_token(doctype, slf.idx))
                }
                Some(_) => {
                    let error =
                        parse_error(Error::MissingQuoteBeforeDoctypeSystemIdentifier, here(slf));
                    doctype.force_quirks = true;
                    slf.reconsume();
                    emit(slf, State::BogusDoctype { doctype }, error)
                }
                None => eof_in_doctype(slf, doctype, src.len()),
            }
        }

        State::DoctypeSystemIdentifierDoubleQuoted { doctype } => doctype_identifier(
            slf,
            src,
            doctype,
            b'"',
            Error::AbruptDoctypeSystemIdentifier,
            |doctype| State::DoctypeSystemIdentifierDoubleQuoted { doctype },
            |doctype| State::AfterDoctypeSystemIdentifier { doctype },
        ),

        State::DoctypeSystemIdentifierSingleQuoted { doctype } => doctype_identifier(
            slf,
            src,
            doctype,
            b'\'',
            Error::AbruptDoctypeSystemIdentifier,
            |doctype| State::DoctypeSystemIdentifierSingleQuoted { doctype },
            |doctype| State::AfterDoctypeSystemIdentifier { doctype },
        ),

        State::AfterDoctypeSystemIdentifier { doctype } => {
            eat_while(slf, src, is_whitespace);
            match slf.consume(src) {
                Some(b'>') => emit(slf, State::Data, doctype_token(doctype, slf.idx)),
                Some(_) => {
                    let error = parse_error(
                        Error::UnexpectedCharacterAfterDoctypeSystemIdentifier,
                        here(slf),
                    );
                    slf.reconsume();
                    emit(slf, State::BogusDoctype { doctype }, error)
                }
                None => eof_in_doctype(slf, doctype, src.len()),
            }
        }

        State::BogusDoctype { doctype } => {
            skip_until2(slf, src, b'>', b'\0');
            match slf.consume(src) {
                Some(b'>') => emit(slf, State::Data, doctype_token(doctype, slf.idx)),
                Some(_) => emit(
                    slf,
                    State::BogusDoctype { doctype },
                    parse_error(Error::UnexpectedNullCharacter, here(slf)),
                ),
                None => emit(slf, State::Eof, doctype_token(doctype, src.len())),
            }
        }

        State::CdataSection { lt } => {
            match memchr(b']', &src[slf.idx..]) {
                Some(pos) => slf.idx += pos,
                None => slf.idx = src.len(),
            }
            match slf.consume(src) {
                Some(_) => switch(slf, State::CdataSectionBracket { lt }),
                None => {
                    let error = parse_error(Error::EofInCdata, Span::new(lt, src.len()));
                    slf.defer(comment_token(lt, src.len()));
                    emit(slf, State::Eof, error)
                }
            }
        }

        State::CdataSectionBracket { lt } => match slf.consume(src) {
            Some(b']') => switch(slf, State::CdataSectionEnd { lt }),
            Some(_) => {
                slf.reconsume();
                switch(slf, State::CdataSection { lt })
            }
            None => switch(slf, State::CdataSection { lt }),
        },

        State::CdataSectionEnd { lt } => match slf.consume(src) {
            Some(b']') => switch(slf, State::CdataSectionEnd { lt }),
            Some(b'>') => emit(slf, State::Data, comment_token(lt, slf.idx)),
            Some(_) => {
                slf.reconsume();
                switch(slf, State::CdataSection { lt })
            }
            None => switch(slf, State::CdataSection { lt }),
        },

        State::RcData { start } => {
            skip_until2(slf, src, b'<', b'\0');
            match slf.consume(src) {
                Some(b'<') => switch(
                    slf,
                    State::RcDataLessThanSign {
                        start,
                        lt: slf.idx - 1,
                    },
                ),
                Some(_) => emit(
                    slf,
                    State::RcData { start },
                    parse_error(Error::UnexpectedNullCharacter, here(slf)),
                ),
                None => finish_text_mode(slf, src, start),
            }
        }

        State::RcDataLessThanSign { start, lt } => match slf.consume(src) {
            Some(b'/') => switch(slf, State::RcDataEndTagOpen { start, lt }),
            Some(_) => {
                slf.reconsume();
                switch(slf, State::RcData { start })
            }
            None => switch(slf, State::RcData { start }),
        },

        State::RcDataEndTagOpen { start, lt } => match slf.consume(src) {
            Some(c) if c.is_ascii_alphabetic() => {
                slf.reconsume();
                switch(
                    slf,
                    State::RcDataEndTagName {
                        start,
                        lt,
                        name: slf.idx,
                    },
                )
            }
            Some(_) => {
                slf.reconsume();
                switch(slf, State::RcData { start })
            }
            None => switch(slf, State::RcData { start }),
        },

        State::RcDataEndTagName { start, lt, name } => {
            end_tag_name(slf, src, start, lt, name, State::RcData { start }, false)
        }

        State::RawText { start } => {
            skip_until2(slf, src, b'<', b'\0');
            match slf.consume(src) {
                Some(b'<') => switch(
                    slf,
                    State::RawTextLessThanSign {
                        start,
                        lt: slf.idx - 1,
                    },
                ),
                Some(_) => emit(
                    slf,
                    State::RawText { start },
                    parse_error(Error::UnexpectedNullCharacter, here(slf)),
                ),
                None => finish_text_mode(slf, src, start),
            }
        }

        State::RawTextLessThanSign { start, lt } => match slf.consume(src) {
            Some(b'/') => switch(slf, State::RawTextEndTagOpen { start, lt }),
            Some(_) => {
                slf.reconsume();
                switch(slf, State::RawText { start })
            }
            None => switch(slf, State::RawText { start }),
        },

        State::RawTextEndTagOpen { start, lt } => match slf.consume(src) {
            Some(c) if c.is_ascii_alphabetic() => {
                slf.reconsume();
                switch(
                    slf,
                    State::RawTextEndTagName {
                        start,
                        lt,
                        name: slf.idx,
                    },
                )
            }
            Some(_) => {
                slf.reconsume();
                switch(slf, State::RawText { start })
            }
            None => switch(slf, State::RawText { start }),
        },

        State::RawTextEndTagName { start, lt, name } => {
            end_tag_name(slf, src, start, lt, name, State::RawText { start }, false)
        }

        State::ScriptData { start } => {
            skip_until2(slf, src, b'<', b'\0');
            match slf.consume(src) {
                Some(b'<') => switch(
                    slf,
                    State::ScriptDataLessThanSign {
                        start,
                        lt: slf.idx - 1,
                    },
                ),
                Some(_) => emit(
                    slf,
                    State::ScriptData { start },
                    parse_error(Error::UnexpectedNullCharacter, here(slf)),
                ),
                None => finish_text_mode(slf, src, start),
            }
        }

        State::ScriptDataLessThanSign { start, lt } => match slf.consume(src) {
            Some(b'/') => switch(slf, State::ScriptDataEndTagOpen { start, lt }),
            Some(b'!') => switch(slf, State::ScriptDataEscapeStart { start }),
            Some(_) => {
                slf.reconsume();
                switch(slf, State::ScriptData { start })
            }
            None => switch(slf, State::ScriptData { start }),
        },

        State::ScriptDataEndTagOpen { start, lt } => match slf.consume(src) {
            Some(c) if c.is_ascii_alphabetic() => {
                slf.reconsume();
                switch(
                    slf,
                    State::ScriptDataEndTagName {
                        start,
                        lt,
                        name: slf.idx,
                    },
                )
            }
            Some(_) => {
                slf.reconsume();
                switch(slf, State::ScriptData { start })
            }
            None => switch(slf, State::ScriptData { start }),
        },

        State::ScriptDataEndTagName { start, lt, name } => {
            end_tag_name(slf, src, start, lt, name, State::ScriptData { start }, true)
        }

        State::ScriptDataEscapeStart { start } => match slf.consume(src) {
            Some(b'-') => switch(slf, State::ScriptDataEscapeStartDash { start }),
            Some(_) => {
                slf.reconsume();
                switch(slf, State::ScriptData { start })
            }
            None => switch(slf, State::ScriptData { start }),
        },

        State::ScriptDataEscapeStartDash { start } => match slf.consume(src) {
            Some(b'-') => switch(slf, State::ScriptDataEscapedDashDash { start }),
            Some(_) => {
                slf.reconsume();
                switch(slf, State::ScriptData { start })
            }
            None => switch(slf, State::ScriptData { start }),
        },

        State::ScriptDataEscaped { start } => {
            skip_until3(slf, src, b'-', b'<', b'\0');
            match slf.consume(src) {
                Some(b'-') => switch(slf, State::ScriptDataEscapedDash { start }),
                Some(b'<') => switch(
                    slf,
                    State::ScriptDataEscapedLessThanSign {
                        start,
                        lt: slf.idx - 1,
                    },
                ),
                Some(_) => emit(
                    slf,
                    State::ScriptDataEscaped { start },
                    parse_error(Error::UnexpectedNullCharacter, here(slf)),
                ),
                None => eof_in_script_comment(slf, src, start),
            }
        }

        State::ScriptDataEscapedDash { start } => match slf.consume(src) {
            Some(b'-') => switch(slf, State::ScriptDataEscapedDashDash { start }),
            Some(b'<') => switch(
                slf,
                State::ScriptDataEscapedLessThanSign {
                    start,
                    lt: slf.idx - 1,
                },
            ),
            Some(b'\0') => emit(
                slf,
                State::ScriptDataEscaped { start },
                parse_error(Error::UnexpectedNullCharacter, here(slf)),
            ),
            Some(_) => switch(slf, State::ScriptDataEscaped { start }),
            None => eof_in_script_comment(slf, src, start),
        },

        State::ScriptDataEscapedDashDash { start } => match slf.consume(src) {
            Some(b'-') => switch(slf, State::ScriptDataEscapedDashDash { start }),
            Some(b'<') => switch(
                slf,
                State::ScriptDataEscapedLessThanSign {
                    start,
                    lt: slf.idx - 1,
                },
            ),
            Some(b'>') => switch(slf, State::ScriptData { start }),
            Some(b'\0') => emit(
                slf,
                State::ScriptDataEscaped { start },
                parse_error(Error::UnexpectedNullCharacter, here(slf)),
            ),
            Some(_) => switch(slf, State::ScriptDataEscaped { start }),
            None => eof_in_script_comment(slf, src, start),
        },

        State::ScriptDataEscapedLessThanSign { start, lt } => match slf.consume(src) {
            Some(b'/') => switch(slf, State::ScriptDataEscapedEndTagOpen { start, lt }),
            Some(c) if c.is_ascii_alphabetic() => {
                slf.reconsume();
                switch(
                    slf,
                    State::ScriptDataDoubleEscapeStart {
                        start,
                        name: slf.idx,
                    },
                )
            }
            Some(_) => {
                slf.reconsume();
                switch(slf, State::ScriptDataEscaped { start })
            }
            None => switch(slf, State::ScriptDataEscaped { start }),
        },

        State::ScriptDataEscapedEndTagOpen { start, lt } => match slf.consume(src) {
            Some(c) if c.is_ascii_alphabetic() => {
                slf.reconsume();
                switch(
                    slf,
                    State::ScriptDataEscapedEndTagName {
                        start,
                        lt,
                        name: slf.idx,
                    },
                )
            }
            Some(_) => {
                slf.reconsume();
                switch(slf, State::ScriptDataEscaped { start })
            }
            None => switch(slf, State::ScriptDataEscaped { start }),
        },

        State::ScriptDataEscapedEndTagName { start, lt, name } => end_tag_name(
            slf,
            src,
            start,
            lt,
            name,
            State::ScriptDataEscaped { start },
            true,
        ),

        State::ScriptDataDoubleEscapeStart { start, name } => {
            eat_while(slf, src, |c| c.is_ascii_alphabetic());
            let name_span = Span::new(name, slf.idx);
            match slf.consume(src) {
                Some(b'\t' | b'\x0A' | b'\x0C' | b' ' | b'/' | b'>') => {
                    if name_span.slice(src).eq_ignore_ascii_case(b"script") {
                        switch(slf, State::ScriptDataDoubleEscaped { start })
                    } else {
                        switch(slf, State::ScriptDataEscaped { start })
                    }
                }
                Some(_) => {
                    slf.reconsume();
                    switch(slf, State::ScriptDataEscaped { start })
                }
                None => switch(slf, State::ScriptDataEscaped { start }),
            }
        }

        State::ScriptDataDoubleEscaped { start } => {
            skip_until3(slf, src, b'-', b'<', b'\0');
            match slf.consume(src) {
                Some(b'-') => switch(slf, State::ScriptDataDoubleEscapedDash { start }),
                Some(b'<') => switch(slf, State::ScriptDataDoubleEscapedLessThanSign { start }),
                Some(_) => emit(
                    slf,
                    State::ScriptDataDoubleEscaped { start },
                    parse_error(Error::UnexpectedNullCharacter, here(slf)),
                ),
                None => eof_in_script_comment(slf, src, start),
            }
        }

        State::ScriptDataDoubleEscapedDash { start } => match slf.consume(src) {
            Some(b'-') => switch(slf, State::ScriptDataDoubleEscapedDashDash { start }),
            Some(b'<') => switch(slf, State::ScriptDataDoubleEscapedLessThanSign { start }),
            Some(b'\0') => emit(
                slf,
                State::ScriptDataDoubleEscaped { start },
                parse_error(Error::UnexpectedNullCharacter, here(slf)),
            ),
            Some(_) => switch(slf, State::ScriptDataDoubleEscaped { start }),
            None => eof_in_script_comment(slf, src, start),
        },

        State::ScriptDataDoubleEscapedDashDash { start } => match slf.consume(src) {
            Some(b'-') => switch(slf, State::ScriptDataDoubleEscapedDashDash { start }),
            Some(b'<') => switch(slf, State::ScriptDataDoubleEscapedLessThanSign { start }),
            Some(b'>') => switch(slf, State::ScriptData { start }),
            Some(b'\0') => emit(
                slf,
                State::ScriptDataDoubleEscaped { start },
                parse_error(Error::UnexpectedNullCharacter, here(slf)),
            ),
            Some(_) => switch(slf, State::ScriptDataDoubleEscaped { start }),
            None => eof_in_script_comment(slf, src, start),
        },

        State::ScriptDataDoubleEscapedLessThanSign { start } => match slf.consume(src) {
            Some(b'/') => switch(
                slf,
                State::ScriptDataDoubleEscapeEnd {
                    start,
                    name: slf.idx,
                },
            ),
            Some(_) => {
                slf.reconsume();
                switch(slf, State::ScriptDataDoubleEscaped { start })
            }
            None => switch(slf, State::ScriptDataDoubleEscaped { start }),
        },

        State::ScriptDataDoubleEscapeEnd { start, name } => {
            eat_while(slf, src, |c| c.is_ascii_alphabetic());
            let name_span = Span::new(name, slf.idx);
            match slf.consume(src) {
                Some(b'\t' | b'\x0A' | b'\x0C' | b' ' | b'/' | b'>') => {
                    if name_span.slice(src).eq_ignore_ascii_case(b"script") {
                        switch(slf, State::ScriptDataEscaped { start })
                    } else {
                        switch(slf, State::ScriptDataDoubleEscaped { start })
                    }
                }
                Some(_) => {
                    slf.reconsume();
                    switch(slf, State::ScriptDataDoubleEscaped { start })
                }
                None => switch(slf, State::ScriptDataDoubleEscaped { start }),
            }
        }

        State::PlainText { start } => {
            // PLAINTEXT never ends. The whole region is surfaced as one
            // error token once the input runs out.
            slf.idx = src.len();
            emit(
                slf,
                State::Eof,
                parse_error(Error::DeprecatedAndUnsupported, Span::new(start, src.len())),
            )
        }

        State::Eof => Step::Done,
    }
}

fn doctype_identifier(
    slf: &mut Tokenizer,
    src: &[u8],
    mut doctype: PendingDoctype,
    quote: u8,
    abrupt: Error,
    stay: impl FnOnce(PendingDoctype) -> State,
    done: impl FnOnce(PendingDoctype) -> State,
) -> Step {
    skip_until3(slf, src, quote, b'>', b'\0');
    match slf.consume(src) {
        Some(c) if c == quote => {
            grow_extra(&mut doctype, slf.idx);
            switch(slf, done(doctype))
        }
        Some(b'>') => {
            let error = parse_error(abrupt, here(slf));
            doctype.force_quirks = true;
            grow_extra(&mut doctype, slf.idx - 1);
            emit2(slf, State::Data, error, doctype_token(doctype, slf.idx))
        }
        Some(_) => emit(
            slf,
            stay(doctype),
            parse_error(Error::UnexpectedNullCharacter, here(slf)),
        ),
        None => {
            grow_extra(&mut doctype, src.len());
            eof_in_doctype(slf, doctype, src.len())
        }
    }
}
