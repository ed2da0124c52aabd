//! Token classes.
//!
//! A class is a flat tag attached to a span of text, only used to pick a CSS class when rendering.
//! The short names (`kwd`, `str`...) are the ones written in rule tables and emitted in the HTML.

use std::borrow::Cow;
use std::fmt;

/// Identifier of a language handler in the registry, eg `js` or `in.tag`.
/// Can be empty when an embedding rule wants the handler to be picked from the embedded text.
pub type LanguageId = Cow<'static, str>;

/// Prefix used in rule tables for the classes delegating to another language
pub const EMBEDDED_PREFIX: &str = "lang-";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Keyword,
    Str,
    Comment,
    Type,
    Literal,
    Punctuation,
    Plain,
    Tag,
    Declaration,
    Source,
    AttrName,
    AttrValue,
    NoCode,
    /// A class that only some languages use, eg `opn`/`clo` for lisp parens
    Custom(Cow<'static, str>),
    /// The text captured by the rule is handed over to another language handler.
    /// Never ends up in a decoration list.
    Embedded(LanguageId),
}

impl TokenClass {
    /// Parses a class as written in rule tables.
    /// Names that are not one of the standard ones become [`TokenClass::Custom`].
    pub fn from_name(name: &str) -> TokenClass {
        match name {
            "kwd" => TokenClass::Keyword,
            "str" => TokenClass::Str,
            "com" => TokenClass::Comment,
            "typ" => TokenClass::Type,
            "lit" => TokenClass::Literal,
            "pun" => TokenClass::Punctuation,
            "pln" => TokenClass::Plain,
            "tag" => TokenClass::Tag,
            "dec" => TokenClass::Declaration,
            "src" => TokenClass::Source,
            "atn" => TokenClass::AttrName,
            "atv" => TokenClass::AttrValue,
            "nocode" => TokenClass::NoCode,
            _ => match name.strip_prefix(EMBEDDED_PREFIX) {
                Some(lang) => TokenClass::Embedded(Cow::Owned(lang.to_owned())),
                None => TokenClass::Custom(Cow::Owned(name.to_owned())),
            },
        }
    }

    /// Shorthand for an embedded class with a static language id
    pub const fn embedded(lang: &'static str) -> TokenClass {
        TokenClass::Embedded(Cow::Borrowed(lang))
    }

    /// The CSS class used in the rendered HTML.
    pub fn css_class(&self) -> &str {
        match self {
            TokenClass::Keyword => "kwd",
            TokenClass::Str => "str",
            TokenClass::Comment => "com",
            TokenClass::Type => "typ",
            TokenClass::Literal => "lit",
            TokenClass::Punctuation => "pun",
            TokenClass::Plain => "pln",
            TokenClass::Tag => "tag",
            TokenClass::Declaration => "dec",
            TokenClass::Source => "src",
            TokenClass::AttrName => "atn",
            TokenClass::AttrValue => "atv",
            TokenClass::NoCode => "nocode",
            TokenClass::Custom(name) => name,
            // Embedded classes get resolved before rendering, if one slips through
            // it is rendered like any unresolved source
            TokenClass::Embedded(_) => "src",
        }
    }

    pub fn embedded_language(&self) -> Option<&str> {
        match self {
            TokenClass::Embedded(lang) => Some(lang),
            _ => None,
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenClass::Embedded(lang) => write!(f, "{EMBEDDED_PREFIX}{lang}"),
            _ => f.write_str(self.css_class()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_parse_standard_names() {
        for name in [
            "kwd", "str", "com", "typ", "lit", "pun", "pln", "tag", "dec", "src", "atn", "atv",
            "nocode",
        ] {
            let class = TokenClass::from_name(name);
            assert!(!matches!(class, TokenClass::Custom(_)), "{name}");
            assert_eq!(class.css_class(), name);
        }
    }

    #[test]
    fn can_parse_embedded_and_custom() {
        assert_eq!(TokenClass::from_name("lang-js"), TokenClass::embedded("js"));
        assert_eq!(TokenClass::from_name("lang-in.tag"), TokenClass::embedded("in.tag"));
        assert_eq!(TokenClass::from_name("lang-"), TokenClass::embedded(""));
        assert_eq!(TokenClass::from_name("lang-js").to_string(), "lang-js");
        assert_eq!(TokenClass::from_name("opn").css_class(), "opn");
    }
}
