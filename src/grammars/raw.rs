use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::class::TokenClass;
use crate::error::{Error, LustroResult};
use crate::grammars::combine::Rule;
use crate::grammars::compiled::SimpleLexer;
use crate::grammars::regex::Pattern;

/// A rule as written in a JSON lexer definition: `[class, pattern, flags?, dispatch?]`
///
/// # Examples
/// ```json
/// ["kwd", "^(?:if|else)\\b"]
/// ["lit", "^0x[a-f0-9]+", "i"]
/// ["pln", "^\\s+", null, " \t\r\n"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRule {
    Full(String, String, Option<String>, Option<String>),
    WithFlags(String, String, Option<String>),
    Short(String, String),
}

impl RawRule {
    fn into_rule(self) -> LustroResult<Rule> {
        let (class, source, flags, dispatch) = match self {
            RawRule::Full(class, source, flags, dispatch) => (class, source, flags, dispatch),
            RawRule::WithFlags(class, source, flags) => (class, source, flags, None),
            RawRule::Short(class, source) => (class, source, None, None),
        };

        let is_valid_class = !class.is_empty()
            && class
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'));
        if !is_valid_class {
            return Err(Error::UnknownClass(class));
        }

        let pattern = Pattern::with_flags(source, flags.as_deref().unwrap_or_default())?;
        let rule = Rule::new(TokenClass::from_name(&class), pattern);
        Ok(match dispatch {
            Some(chars) if !chars.is_empty() => rule.dispatch(chars),
            _ => rule,
        })
    }
}

/// A lexer definition that can be loaded from JSON.
///
/// # Examples
/// ```json
/// {
///   "shortcut": [["pln", "^\\s+", null, " \t\r\n"]],
///   "fallthrough": [["kwd", "^(?:if|else)\\b"], ["pln", "^\\w+"]]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLexer {
    pub shortcut: Vec<RawRule>,
    pub fallthrough: Vec<RawRule>,
}

impl RawLexer {
    pub fn load_from_str(json: &str) -> LustroResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LustroResult<Self> {
        let file = File::open(&path)?;
        Ok(serde_json::from_reader(&file)?)
    }

    pub fn compile(self) -> LustroResult<SimpleLexer> {
        let shortcut = self
            .shortcut
            .into_iter()
            .map(RawRule::into_rule)
            .collect::<LustroResult<Vec<_>>>()?;
        let fallthrough = self
            .fallthrough
            .into_iter()
            .map(RawRule::into_rule)
            .collect::<LustroResult<Vec<_>>>()?;
        SimpleLexer::new(shortcut, fallthrough)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_load_lexer_definition() {
        let raw = RawLexer::load_from_str(
            r#"{
              "shortcut": [["pln", "^\\s+", null, " \t"], ["str", "^'[^']*'?", "", "'"]],
              "fallthrough": [["kwd", "^(?:if|else)\\b"], ["lit", "^0x[a-f0-9]+", "i"]]
            }"#,
        )
        .unwrap();
        assert_eq!(raw.shortcut.len(), 2);
        assert_eq!(
            raw.fallthrough[1],
            RawRule::WithFlags("lit".into(), "^0x[a-f0-9]+".into(), Some("i".into()))
        );

        let lexer = raw.compile().unwrap();
        assert_eq!(lexer.pattern().len(), 4);
        assert_eq!(lexer.pattern().dispatch_rule('\''), Some(1));
        assert!(lexer.pattern().rule(3).pattern.is_case_insensitive());
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let raw = RawLexer::load_from_str(r#"{"fallthrough": [["pln", "^\\w+"]]}"#).unwrap();
        assert!(raw.shortcut.is_empty());
        assert!(raw.compile().is_ok());
    }

    #[test]
    fn rejects_bad_definitions() {
        let raw = RawLexer::load_from_str(r#"{"fallthrough": [["", "^a"]]}"#).unwrap();
        assert!(matches!(raw.compile(), Err(Error::UnknownClass(_))));

        let raw = RawLexer::load_from_str(r#"{"fallthrough": [["pln", "^a", "x"]]}"#).unwrap();
        assert!(matches!(raw.compile(), Err(Error::UnknownFlag('x'))));

        let raw = RawLexer::load_from_str(r#"{"fallthrough": [["pln", "^a*"]]}"#).unwrap();
        assert!(matches!(raw.compile(), Err(Error::EmptyMatch(_))));

        assert!(matches!(
            RawLexer::load_from_str(r#"{"fallthrough": [["pln"]]}"#),
            Err(Error::Json(_))
        ));
    }
}
