#![deny(missing_docs)]
// This is an HTML tokenizer. HTML can be untrusted input from the internet.
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod error;
mod machine;
mod span;
mod state;
mod token;
mod tokenizer;

pub use error::Error;
pub use span::Span;
pub use token::{Attr, AttrValue, Doctype, Quote, Tag, TagKind, Token};
pub use tokenizer::{Tokenizer, Tokens};
