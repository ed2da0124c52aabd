//! Rule patterns and the handful of rewrites needed to run them on Oniguruma.
//!
//! Rule tables are written in the ECMAScript regex dialect: `^` is the start of the input,
//! `$` the end of the input and `.` excludes every line terminator. Oniguruma's default
//! syntax treats `^`, `$` and `.` as line based so we translate those when emitting.

use std::borrow::Cow;
use std::fmt;

use crate::error::{Error, LustroResult};

/// What `.` means in the rule dialect
const DOT: &str = r"[^\n\r\u2028\u2029]";

/// The source of a rule regex with its flags.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    source: Cow<'static, str>,
    pub(crate) ignore_case: bool,
    pub(crate) global: bool,
    pub(crate) multiline: bool,
}

impl Pattern {
    pub fn new(source: impl Into<Cow<'static, str>>) -> Self {
        Self {
            source: source.into(),
            ignore_case: false,
            global: false,
            multiline: false,
        }
    }

    /// A case-insensitive pattern, the equivalent of the `i` flag.
    pub fn nocase(source: impl Into<Cow<'static, str>>) -> Self {
        Self {
            ignore_case: true,
            ..Self::new(source)
        }
    }

    /// Creates a pattern from a source and a flag string like `"i"`.
    /// `g` and `m` are accepted here but rejected when the pattern is used in a lexer.
    pub fn with_flags(source: impl Into<Cow<'static, str>>, flags: &str) -> LustroResult<Self> {
        let mut pattern = Self::new(source);
        for flag in flags.chars() {
            match flag {
                'i' => pattern.ignore_case = true,
                'g' => pattern.global = true,
                'm' => pattern.multiline = true,
                _ => return Err(Error::UnknownFlag(flag)),
            }
        }
        Ok(pattern)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.ignore_case
    }

    /// Whether the pattern contains a letter that is not part of an escape sequence,
    /// ie something that would match differently if we ignored case.
    ///
    /// This is a heuristic: `\x41` is an `A` but will not be seen as one.
    pub(crate) fn has_case_sensitive_letters(&self) -> bool {
        let bytes = self.source.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'\\' && i + 1 < bytes.len() {
                let next = bytes[i + 1];
                let hex_len = match next {
                    b'u' | b'U' => 4,
                    b'x' | b'X' => 2,
                    _ => 0,
                };
                if hex_len == 0 {
                    // `\` followed by any char is an escape, multi-byte chars are not letters
                    // so skipping a single byte is enough
                    i += 2;
                    continue;
                }
                let end = i + 2 + hex_len;
                if end <= bytes.len() && bytes[i + 2..end].iter().all(u8::is_ascii_hexdigit) {
                    i = end;
                    continue;
                }
                // Lone `\u` or `\x`: the backslash is skipped and the letter counted
                i += 1;
                continue;
            }
            if bytes[i].is_ascii_alphabetic() {
                return true;
            }
            i += 1;
        }
        false
    }

    pub(crate) fn flags_string(&self) -> String {
        let mut out = String::new();
        if self.global {
            out.push('g');
        }
        if self.ignore_case {
            out.push('i');
        }
        if self.multiline {
            out.push('m');
        }
        out
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags_string())
    }
}

/// A top-level piece of a regex source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Part<'a> {
    /// A whole character class, brackets included
    Class(&'a str),
    /// Any escape that is not a back-reference: `\uXXXX`, `\xXX`, `\w`, `\.`...
    Escape(&'a str),
    /// `\N`, either a back-reference or an octal escape depending on context
    BackRef(usize, &'a str),
    /// A capturing `(`
    GroupOpen,
    /// `(?:`, `(?=`, `(?!`, `(?<=`, `(?<!`
    SpecialGroupOpen(&'a str),
    GroupClose,
    Caret,
    /// A run of anything else
    Literal(&'a str),
}

/// Splits a regex source into top-level parts.
/// An unterminated class becomes a literal and will fail when compiled.
pub(crate) fn split_source(source: &str) -> Vec<Part<'_>> {
    let bytes = source.as_bytes();
    let mut parts = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'[' => {
                let mut j = i + 1;
                let mut end = None;
                while j < bytes.len() {
                    match bytes[j] {
                        b'\\' => j += 1 + char_len_at(source, j + 1),
                        b']' => {
                            end = Some(j + 1);
                            break;
                        }
                        _ => j += 1,
                    }
                }
                match end {
                    Some(end) => {
                        parts.push(Part::Class(&source[i..end]));
                        i = end;
                    }
                    None => {
                        parts.push(Part::Literal(&source[i..]));
                        i = bytes.len();
                    }
                }
            }
            b'\\' => {
                if i + 1 >= bytes.len() {
                    parts.push(Part::Literal(&source[i..]));
                    break;
                }
                let next = bytes[i + 1];
                let hex_len = match next {
                    b'u' => 4,
                    b'x' => 2,
                    _ => 0,
                };
                if hex_len > 0
                    && i + 2 + hex_len <= bytes.len()
                    && bytes[i + 2..i + 2 + hex_len]
                        .iter()
                        .all(u8::is_ascii_hexdigit)
                {
                    parts.push(Part::Escape(&source[i..i + 2 + hex_len]));
                    i += 2 + hex_len;
                } else if next.is_ascii_digit() {
                    let mut j = i + 1;
                    while j < bytes.len() && bytes[j].is_ascii_digit() {
                        j += 1;
                    }
                    let text = &source[i..j];
                    // Digits only, can't overflow in practice but a giant number is no backref
                    let number = text[1..].parse().unwrap_or(0);
                    parts.push(Part::BackRef(number, text));
                    i = j;
                } else {
                    let end = i + 1 + char_len_at(source, i + 1);
                    parts.push(Part::Escape(&source[i..end]));
                    i = end;
                }
            }
            b'(' => {
                let rest = &source[i..];
                let special = ["(?:", "(?=", "(?!", "(?<=", "(?<!"]
                    .into_iter()
                    .find(|prefix| rest.starts_with(prefix));
                match special {
                    Some(prefix) => {
                        parts.push(Part::SpecialGroupOpen(&source[i..i + prefix.len()]));
                        i += prefix.len();
                    }
                    None => {
                        parts.push(Part::GroupOpen);
                        i += 1;
                    }
                }
            }
            b')' => {
                parts.push(Part::GroupClose);
                i += 1;
            }
            b'^' => {
                parts.push(Part::Caret);
                i += 1;
            }
            _ => {
                let start = i;
                while i < bytes.len() && !matches!(bytes[i], b'[' | b'\\' | b'(' | b')' | b'^') {
                    i += 1;
                }
                parts.push(Part::Literal(&source[start..i]));
            }
        }
    }

    parts
}

fn char_len_at(s: &str, idx: usize) -> usize {
    s.get(idx..)
        .and_then(|rest| rest.chars().next())
        .map(char::len_utf8)
        .unwrap_or(1)
}

/// Emits a literal run, translating `$` and `.` and optionally turning every ASCII letter into
/// a class matching both cases.
pub(crate) fn push_literal(out: &mut String, literal: &str, fold_case: bool) {
    for c in literal.chars() {
        match c {
            '$' => out.push_str(r"\z"),
            '.' => out.push_str(DOT),
            c if fold_case && c.is_ascii_alphabetic() => {
                out.push('[');
                out.push(c.to_ascii_uppercase());
                out.push(c.to_ascii_lowercase());
                out.push(']');
            }
            c => out.push(c),
        }
    }
}

/// `\xHH` is a byte in Oniguruma, a code point in rule tables.
fn push_hex_escape(out: &mut String, escape: &str) {
    match escape.strip_prefix(r"\x") {
        Some(hex) if hex.len() == 2 && hex.as_bytes()[0] >= b'8' => {
            out.push_str(r"\u00");
            out.push_str(hex);
        }
        _ => out.push_str(escape),
    }
}

/// `\<`, `\>`, `` \` `` and `\'` are anchors in some Oniguruma syntaxes but plain chars in rule
/// tables.
pub(crate) fn push_escape(out: &mut String, escape: &str) {
    match escape {
        r"\<" | r"\>" | r"\'" | r"\`" | r#"\""# => out.push_str(&escape[1..]),
        _ => push_hex_escape(out, escape),
    }
}

/// Escapes what Oniguruma would read as a nested class or an intersection inside a class body.
pub(crate) fn push_class(out: &mut String, class: &str) {
    let inner = &class[1..class.len() - 1];
    out.push('[');
    let mut chars = inner.chars().peekable();
    if chars.peek() == Some(&'^') {
        out.push('^');
        chars.next();
    }
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('x') => {
                    let hex: String = chars.by_ref().take(2).collect();
                    push_hex_escape(out, &format!(r"\x{hex}"));
                }
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            '[' | '&' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(']');
}

/// Translates a single rule pattern, keeping its own groups and anchors.
/// Used to match a rule against a token on its own.
pub(crate) fn translate_rule(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 8);
    for part in split_source(source) {
        match part {
            Part::Class(c) => push_class(&mut out, c),
            Part::Escape(e) => push_escape(&mut out, e),
            Part::BackRef(_, text) => out.push_str(text),
            Part::GroupOpen => out.push('('),
            Part::SpecialGroupOpen(g) => out.push_str(g),
            Part::GroupClose => out.push(')'),
            Part::Caret => out.push_str(r"\A"),
            Part::Literal(l) => push_literal(&mut out, l, false),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_split_source() {
        let parts = split_source(r"^(?:\x41|[^\]a-z]+)(b)\1 .$");
        assert_eq!(
            parts,
            vec![
                Part::Caret,
                Part::SpecialGroupOpen("(?:"),
                Part::Escape(r"\x41"),
                Part::Literal("|"),
                Part::Class(r"[^\]a-z]"),
                Part::Literal("+"),
                Part::GroupClose,
                Part::GroupOpen,
                Part::Literal("b"),
                Part::GroupClose,
                Part::BackRef(1, r"\1"),
                Part::Literal(" .$"),
            ]
        );
    }

    #[test]
    fn unterminated_class_is_kept() {
        assert_eq!(split_source("a[bc"), vec![Part::Literal("a"), Part::Literal("[bc")]);
    }

    #[test]
    fn can_translate_anchors_and_dot() {
        assert_eq!(translate_rule(r"^a.b$"), r"\Aa[^\n\r\u2028\u2029]b\z");
        assert_eq!(translate_rule(r"^[^\\\[&]+"), r"\A[^\\\[\&]+");
        assert_eq!(translate_rule(r"^<!--|--\>"), r"\A<!--|-->");
    }

    #[test]
    fn keeps_quotes_and_high_bytes_as_chars() {
        assert_eq!(translate_rule(r#"^\'\"\`"#), r#"\A'"`"#);
        assert_eq!(translate_rule(r"\xA0[\t\xa0]\x0B"), r"\u00A0[\t\u00a0]\x0B");
    }

    #[test]
    fn can_detect_case_sensitive_letters() {
        assert!(Pattern::new(r"^(?:int|char)\b").has_case_sensitive_letters());
        assert!(!Pattern::new(r"^\s+").has_case_sensitive_letters());
        assert!(!Pattern::new(r"^\x41 [\d]").has_case_sensitive_letters());
        // `\u` without hex digits leaves the `u` visible
        assert!(Pattern::new(r"\u").has_case_sensitive_letters());
    }

    #[test]
    fn can_parse_flags() {
        let p = Pattern::with_flags("a", "i").unwrap();
        assert!(p.is_case_insensitive());
        assert!(Pattern::with_flags("a", "gm").unwrap().global);
        assert!(matches!(Pattern::with_flags("a", "y"), Err(Error::UnknownFlag('y'))));
        assert_eq!(format!("{:?}", Pattern::nocase("^a")), "/^a/i");
    }
}
