use log::trace;

use crate::machine::{self, Step};
use crate::state::State;
use crate::Token;

/// A streaming HTML5 tokenizer. See crate-level docs for basic usage.
///
/// The tokenizer does not own the input. The caller keeps the byte buffer
/// and passes the same slice to every [`Tokenizer::next`] call; all emitted
/// spans refer into that buffer. The buffer must not be mutated while
/// tokenization is in progress.
#[derive(Debug)]
pub struct Tokenizer {
    pub(crate) idx: usize,
    pub(crate) state: State,
    deferred: Option<Token>,
    pub(crate) return_attrs: bool,
    last_start_tag: Vec<u8>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer {
            idx: 0,
            state: State::Data,
            deferred: None,
            return_attrs: false,
            last_start_tag: Vec::new(),
        }
    }
}

impl Tokenizer {
    /// Create a tokenizer positioned at the start of the input, in the data
    /// state.
    #[must_use]
    pub fn new() -> Self {
        Tokenizer::default()
    }

    /// Switch between tag-granularity and attribute-granularity emission.
    ///
    /// With attribute granularity on, a tag is emitted piecewise: one
    /// [`Token::TagName`] as soon as the name is complete, then one
    /// [`Token::Attr`] per attribute as each is finalized. The terminal
    /// [`Token::Tag`] is not emitted in this mode; the caller reconstructs
    /// the tag shape from the sequence.
    ///
    /// The default is off.
    pub fn emit_attributes(&mut self, yes: bool) {
        self.return_attrs = yes;
    }

    /// Advance the machine and return the next token, or `None` once the
    /// input is exhausted.
    ///
    /// `src` must be the same buffer on every call.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self, src: &[u8]) -> Option<Token> {
        if let Some(token) = self.deferred.take() {
            return Some(token);
        }
        loop {
            match machine::step(self, src) {
                Step::Continue => (),
                Step::Emit(token) => {
                    trace!("emit {:?}", token);
                    return Some(token);
                }
                Step::Done => return None,
            }
        }
    }

    /// Iterate over the remaining tokens of `src`.
    pub fn tokens<'a>(&'a mut self, src: &'a [u8]) -> Tokens<'a> {
        Tokens {
            tokenizer: self,
            src,
        }
    }

    /// Switch to the [script data
    /// state](https://html.spec.whatwg.org/#script-data-state).
    ///
    /// Hosts call this immediately after consuming a `<script>` start tag.
    /// The appropriate end tag is recorded as `script`.
    pub fn enter_script_data(&mut self) {
        trace!("enter script data");
        self.set_last_start_tag(b"script");
        self.state = State::ScriptData { start: self.idx };
    }

    /// Switch to the [RCDATA
    /// state](https://html.spec.whatwg.org/#rcdata-state).
    ///
    /// Hosts call this immediately after consuming a `<title>` or
    /// `<textarea>` start tag, passing that tag's name so the matching end
    /// tag can be recognized.
    pub fn enter_rcdata(&mut self, name: &[u8]) {
        trace!("enter rcdata");
        self.set_last_start_tag(name);
        self.state = State::RcData { start: self.idx };
    }

    /// Switch to the [RAWTEXT
    /// state](https://html.spec.whatwg.org/#rawtext-state).
    ///
    /// Hosts call this immediately after consuming a `<style>`, `<xmp>`,
    /// `<iframe>`, `<noembed>` or `<noframes>` start tag, passing that tag's
    /// name.
    pub fn enter_rawtext(&mut self, name: &[u8]) {
        trace!("enter rawtext");
        self.set_last_start_tag(name);
        self.state = State::RawText { start: self.idx };
    }

    /// Switch to the [PLAINTEXT
    /// state](https://html.spec.whatwg.org/#plaintext-state).
    ///
    /// PLAINTEXT never ends; the rest of the input is consumed and surfaced
    /// as a single `deprecated-and-unsupported` error token spanning the
    /// whole region.
    pub fn enter_plaintext(&mut self) {
        trace!("enter plaintext");
        self.state = State::PlainText { start: self.idx };
    }

    fn set_last_start_tag(&mut self, name: &[u8]) {
        self.last_start_tag.clear();
        self.last_start_tag.extend_from_slice(name);
    }

    /// Whether `name` is the [appropriate end tag
    /// name](https://html.spec.whatwg.org/#appropriate-end-tag-token) for
    /// the current text content mode. An empty recorded name never matches.
    pub(crate) fn is_appropriate_end_tag(&self, name: &[u8]) -> bool {
        !self.last_start_tag.is_empty() && self.last_start_tag.eq_ignore_ascii_case(name)
    }

    /// Read the byte under the cursor and advance. `None` means end of
    /// input; the cursor stays at `src.len()`.
    pub(crate) fn consume(&mut self, src: &[u8]) -> Option<u8> {
        let c = src.get(self.idx).copied();
        if c.is_some() {
            self.idx += 1;
        }
        c
    }

    /// Step the cursor back one byte so the next [`Tokenizer::consume`]
    /// re-reads it under a freshly selected state.
    pub(crate) fn reconsume(&mut self) {
        self.idx -= 1;
    }

    /// Stash a token to be returned by the next [`Tokenizer::next`] call,
    /// before any new machine work.
    pub(crate) fn defer(&mut self, token: Token) {
        debug_assert!(self.deferred.is_none());
        self.deferred = Some(token);
    }
}

/// Borrowing iterator over the remaining tokens of a buffer, returned by
/// [`Tokenizer::tokens`].
#[derive(Debug)]
pub struct Tokens<'a> {
    tokenizer: &'a mut Tokenizer,
    src: &'a [u8],
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.tokenizer.next(self.src)
    }
}
