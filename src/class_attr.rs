use crate::renderers::Options;

/// What the `class` attribute of a code element asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedClass<'c> {
    /// Whether the element is marked with `prettyprint` at all
    pub prettyprint: bool,
    /// From `lang-xx` or `language-xx`, the last one wins
    pub lang: Option<&'c str>,
    /// From `linenums` (starting at 1) or `linenums:N`
    pub line_numbers: Option<usize>,
}

impl ParsedClass<'_> {
    pub fn options(&self, tab_width: usize) -> Options {
        Options::default()
            .tab_width(tab_width)
            .line_numbers(self.line_numbers)
    }
}

fn is_lang_id(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.'))
}

/// Parses a whitespace separated list of classes like `prettyprint lang-js linenums:4`.
pub fn parse_class_attr(class: &str) -> ParsedClass<'_> {
    let mut parsed = ParsedClass::default();

    for token in class.split_whitespace() {
        if token == "prettyprint" {
            parsed.prettyprint = true;
            continue;
        }

        if let Some(lang) = token
            .strip_prefix("language-")
            .or_else(|| token.strip_prefix("lang-"))
        {
            if is_lang_id(lang) {
                parsed.lang = Some(lang);
            }
            continue;
        }

        match token.split_once(':') {
            Some(("linenums", start)) => {
                if let Ok(start) = start.parse() {
                    parsed.line_numbers = Some(start);
                }
            }
            None if token == "linenums" => parsed.line_numbers = Some(1),
            _ => {}
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string() {
        let result = parse_class_attr("");
        assert_eq!(result, ParsedClass::default());
    }

    #[test]
    fn test_all_options() {
        let result = parse_class_attr("prettyprint lang-js linenums:4");
        assert!(result.prettyprint);
        assert_eq!(result.lang, Some("js"));
        assert_eq!(result.line_numbers, Some(4));
        assert_eq!(
            result.options(2),
            Options::default().tab_width(2).line_numbers(Some(4))
        );
    }

    #[test]
    fn test_line_numbers_default_to_one() {
        let result = parse_class_attr("linenums prettyprint");
        assert_eq!(result.line_numbers, Some(1));
        assert_eq!(result.lang, None);
    }

    #[test]
    fn test_invalid_line_numbers() {
        assert_eq!(parse_class_attr("linenums:x").line_numbers, None);
        assert_eq!(parse_class_attr("linenumsx").line_numbers, None);
    }

    #[test]
    fn test_language_prefix() {
        assert_eq!(parse_class_attr("language-in.tag").lang, Some("in.tag"));
        assert_eq!(parse_class_attr("lang-a lang-b").lang, Some("b"));
        assert_eq!(parse_class_attr("lang- lang-c++").lang, None);
    }

    #[test]
    fn test_whole_words_only() {
        let result = parse_class_attr("notprettyprint prettyprinted");
        assert!(!result.prettyprint);
    }
}
