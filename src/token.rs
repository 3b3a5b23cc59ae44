use crate::{Error, Span};

/// The shape of an emitted [`Tag`].
///
/// Attribute presence and the self-closing slash are folded into the kind so
/// that consumers get the whole tag shape from a single field.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TagKind {
    /// A start tag without attributes, such as `<p>`.
    Start,
    /// A start tag with at least one attribute, such as `<p class=a>`.
    StartAttrs,
    /// A self-closing start tag without attributes, such as `<br/>`.
    StartSelf,
    /// A self-closing start tag with attributes, such as `<img src=a/>`.
    StartAttrsSelf,
    /// An end tag, such as `</p>`.
    End,
}

impl TagKind {
    /// Whether this is any kind of start tag.
    #[must_use]
    pub fn is_start(&self) -> bool {
        !matches!(self, TagKind::End)
    }

    /// Whether the tag carried a trailing solidus (`<br/>`).
    #[must_use]
    pub fn is_self_closing(&self) -> bool {
        matches!(self, TagKind::StartSelf | TagKind::StartAttrsSelf)
    }

    /// Whether at least one attribute was seen inside the tag.
    #[must_use]
    pub fn has_attrs(&self) -> bool {
        matches!(self, TagKind::StartAttrs | TagKind::StartAttrsSelf)
    }

    pub(crate) fn with_attrs(self) -> TagKind {
        match self {
            TagKind::Start => TagKind::StartAttrs,
            TagKind::StartSelf => TagKind::StartAttrsSelf,
            other => other,
        }
    }

    pub(crate) fn with_self_closing(self) -> TagKind {
        match self {
            TagKind::Start => TagKind::StartSelf,
            TagKind::StartAttrs => TagKind::StartAttrsSelf,
            other => other,
        }
    }
}

/// Tag names whose elements never have content, as per the [WHATWG void
/// elements](https://html.spec.whatwg.org/#void-elements) list.
const VOID_NAMES: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
    b"source", b"track", b"wbr",
];

/// A start or end tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Tag {
    /// The whole tag, from `<` through `>` (or the end of input).
    pub span: Span,
    /// The tag name, exactly as written. Not lowercased.
    pub name: Span,
    /// Start/end, attribute presence and the self-closing flag.
    pub kind: TagKind,
}

impl Tag {
    /// Whether the tag name is one of the fixed void element names
    /// (`area`, `base`, `br`, ...), compared case-insensitively.
    ///
    /// Purely informational. Void status never changes how the input is
    /// tokenized.
    #[must_use]
    pub fn is_void(&self, src: &[u8]) -> bool {
        let name = self.name.slice(src);
        VOID_NAMES.iter().any(|v| name.eq_ignore_ascii_case(v))
    }

    /// Compare the tag name against `name` case-insensitively.
    #[must_use]
    pub fn name_eq_ignore_case(&self, src: &[u8], name: &[u8]) -> bool {
        self.name.slice(src).eq_ignore_ascii_case(name)
    }
}

/// The quoting discipline of an attribute value.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Quote {
    /// Unquoted, as in `a=b`.
    None,
    /// Single-quoted, as in `a='b'`.
    Single,
    /// Double-quoted, as in `a="b"`.
    Double,
}

/// An attribute value together with how it was quoted.
///
/// The span covers the value bytes only, never the quotes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct AttrValue {
    /// How the value was quoted in the source.
    pub quote: Quote,
    /// The value bytes.
    pub span: Span,
}

/// A single attribute, emitted in attribute-granularity mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Attr {
    /// The attribute name, exactly as written.
    pub name: Span,
    /// The value, or `None` for a bare attribute like `disabled`.
    pub value: Option<AttrValue>,
}

/// A `<!DOCTYPE ...>` declaration.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Doctype {
    /// The whole declaration, from `<` through `>` (or the end of input).
    pub span: Span,
    /// The doctype name, usually `html`. `None` when the name is missing.
    pub name: Option<Span>,
    /// The public/system identifier region, starting at the `PUBLIC` or
    /// `SYSTEM` keyword. Empty when the declaration has no identifiers.
    pub extra: Span,
    /// The [force-quirks](https://html.spec.whatwg.org/#force-quirks-flag)
    /// flag for the downstream tree builder.
    pub force_quirks: bool,
}

/// A single token. All payloads are spans into the caller's buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Token {
    /// A run of text between markup, trimmed of ASCII whitespace on both
    /// ends. Whitespace-only runs are not emitted at all.
    Text(Span),
    /// A start or end tag.
    Tag(Tag),
    /// A tag name on its own. Replaces [`Token::Tag`] in
    /// attribute-granularity mode; see [`crate::Tokenizer::emit_attributes`].
    TagName(Span),
    /// One attribute. Only emitted in attribute-granularity mode.
    Attr(Attr),
    /// A doctype declaration.
    Doctype(Doctype),
    /// A comment, spanning `<!-- ... -->` including the delimiters. CDATA
    /// sections and bogus comments are surfaced as comments too.
    Comment(Span),
    /// A recoverable parse error. The stream continues afterwards.
    Error {
        /// Which violation occurred.
        error: Error,
        /// The offending bytes. For `eof-in-*` errors this covers the whole
        /// unterminated construct.
        span: Span,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_names_are_case_insensitive() {
        let src = b"<BR>";
        let tag = Tag {
            span: Span::new(0, 4),
            name: Span::new(1, 3),
            kind: TagKind::Start,
        };
        assert!(tag.is_void(src));
        assert!(tag.name_eq_ignore_case(src, b"br"));
    }

    #[test]
    fn paragraph_is_not_void() {
        let src = b"<p>";
        let tag = Tag {
            span: Span::new(0, 3),
            name: Span::new(1, 2),
            kind: TagKind::Start,
        };
        assert!(!tag.is_void(src));
    }
}
