use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Range;

use onig::{Regex, RegexOptions, Region, SearchOptions, Syntax};

use crate::class::TokenClass;
use crate::error::{Error, LustroResult};
use crate::grammars::case_fold::case_fold_charset;
use crate::grammars::regex::{
    Part, Pattern, push_class, push_escape, push_literal, split_source, translate_rule,
};

/// Whitespace tried on top of printable ASCII when looking for zero length matches.
const EMPTY_MATCH_SPACES: &[char] = &['\t', '\n', '\r', '\u{b}', '\u{c}', '\u{a0}'];

/// Always matches a single char, appended to every combined pattern so it can't fail.
const CATCH_ALL: &str = r"[\s\S]";

/// A single token rule as found in a language table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub class: TokenClass,
    pub pattern: Pattern,
    /// Chars a token must start with for this rule to be picked directly.
    pub dispatch: Option<Cow<'static, str>>,
}

impl Rule {
    pub fn new(class: TokenClass, pattern: Pattern) -> Self {
        Self {
            class,
            pattern,
            dispatch: None,
        }
    }

    /// Tokens starting with any of those chars are classified by this rule without trying
    /// the other ones.
    pub fn dispatch(mut self, chars: impl Into<Cow<'static, str>>) -> Self {
        self.dispatch = Some(chars.into());
        self
    }
}

/// A rule along with the regex used to match it against a single token.
pub(crate) struct CompiledRule {
    pub(crate) rule: Rule,
    regex: Regex,
}

impl CompiledRule {
    fn new(rule: Rule) -> LustroResult<Self> {
        let regex = compile(
            &translate_rule(rule.pattern.source()),
            rule.pattern.ignore_case,
            rule.pattern.source(),
        )?;
        Ok(Self { rule, regex })
    }

    /// Searches the rule in the token text alone, returning the capture positions if found.
    pub(crate) fn captures(&self, token: &str) -> Option<Region> {
        let mut region = Region::new();
        self.regex
            .search_with_options(
                token,
                0,
                token.len(),
                SearchOptions::SEARCH_OPTION_NONE,
                Some(&mut region),
            )
            .map(|_| region)
    }

    /// Whether the rule matches nothing at the start of the empty string, of any single
    /// printable ASCII or whitespace char, or of any char written in the rule itself.
    /// Such a rule would stop the tokenizer from advancing.
    fn matches_empty(&self) -> bool {
        let matches_empty_at = |probe: &str| {
            self.regex
                .match_with_options(probe, 0, SearchOptions::SEARCH_OPTION_NONE, None)
                == Some(0)
        };
        if matches_empty_at("") {
            return true;
        }
        let mut buf = [0; 4];
        (' '..='~')
            .chain(EMPTY_MATCH_SPACES.iter().copied())
            .chain(self.rule.pattern.source().chars())
            .any(|c| matches_empty_at(c.encode_utf8(&mut buf)))
    }
}

impl fmt::Debug for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.rule.class, self.rule.pattern)
    }
}

/// The result of matching a combined pattern at some position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedMatch {
    /// Index of the winning rule, `None` when only the catch-all matched
    pub rule: Option<usize>,
    pub range: Range<usize>,
}

/// Many rules merged into a single regex.
///
/// Matching the merged regex at a position gives the same winner and the same length as trying
/// every rule in order and keeping the first one matching.
pub struct CombinedPattern {
    source: String,
    regex: Regex,
    rules: Vec<CompiledRule>,
    /// (wrapper group index, rule index) for every alternative of the merged regex
    alternatives: Vec<(usize, usize)>,
    /// leading char -> rule index
    dispatch: HashMap<char, usize>,
}

impl CombinedPattern {
    /// Matches the combined pattern anchored at `pos`.
    /// Only returns `None` if `pos` is at the end of the text.
    pub fn find_at(&self, text: &str, pos: usize) -> Option<CombinedMatch> {
        if pos >= text.len() {
            return None;
        }
        let mut region = Region::new();
        let len = self.regex.match_with_options(
            text,
            pos,
            SearchOptions::SEARCH_OPTION_NONE,
            Some(&mut region),
        )?;
        let rule = self
            .alternatives
            .iter()
            .find(|(group, _)| region.pos(*group).is_some())
            .map(|(_, rule)| *rule);

        Some(CombinedMatch {
            rule,
            range: pos..pos + len,
        })
    }

    /// The rule picked for tokens starting with `c`, if any.
    pub fn dispatch_rule(&self, c: char) -> Option<usize> {
        self.dispatch.get(&c).copied()
    }

    pub fn rule(&self, index: usize) -> &Rule {
        &self.rules[index].rule
    }

    pub(crate) fn compiled_rule(&self, index: usize) -> &CompiledRule {
        &self.rules[index]
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The merged regex, in Oniguruma syntax
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for CombinedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CombinedPattern({} rules)", self.rules.len())
    }
}

fn compile(onig_source: &str, ignore_case: bool, original: &str) -> LustroResult<Regex> {
    let options = if ignore_case {
        RegexOptions::REGEX_OPTION_IGNORECASE
    } else {
        RegexOptions::REGEX_OPTION_NONE
    };
    Regex::with_options(onig_source, options, Syntax::default()).map_err(|e| {
        Error::InvalidRegex {
            pattern: original.to_owned(),
            message: e.description().to_owned(),
        }
    })
}

/// Rewrites one rule so it can live next to others in a single regex.
///
/// Only groups that are the target of a back-reference stay capturing, and the back-references
/// are renumbered to the group index in the merged regex. `next_group` is the last group index
/// used so far in the merged regex.
fn rewrite_for_merge(source: &str, next_group: &mut usize, fold_case: bool) -> String {
    let parts = split_source(source);

    // 1. Which groups are referenced
    let mut referenced: HashMap<usize, usize> = HashMap::new();
    let mut opened = 0;
    for part in &parts {
        match part {
            Part::GroupOpen => opened += 1,
            Part::BackRef(n, _) if *n >= 1 && *n <= opened => {
                referenced.insert(*n, 0);
            }
            _ => {}
        }
    }
    let mut targets: Vec<usize> = referenced.keys().copied().collect();
    targets.sort_unstable();
    for target in targets {
        *next_group += 1;
        referenced.insert(target, *next_group);
    }

    // 2. Emit
    let mut out = String::with_capacity(source.len() + 16);
    let mut opened = 0;
    for (i, part) in parts.iter().enumerate() {
        match part {
            Part::GroupOpen => {
                opened += 1;
                if referenced.contains_key(&opened) {
                    out.push('(');
                } else {
                    out.push_str("(?:");
                }
            }
            Part::BackRef(n, text) => match referenced.get(n) {
                Some(new_index) if *n <= opened => {
                    out.push('\\');
                    out.push_str(&new_index.to_string());
                }
                _ => out.push_str(text),
            },
            // Every match is anchored at the scan position so a single `^` is redundant.
            // `^^` is kept as an anchor to the start of the whole text.
            Part::Caret => {
                if parts.get(i + 1) == Some(&Part::Caret) {
                    out.push_str(r"\A");
                }
            }
            Part::Class(c) => {
                if fold_case {
                    out.push_str(&case_fold_charset(c));
                } else {
                    push_class(&mut out, c);
                }
            }
            Part::Escape(e) => push_escape(&mut out, e),
            Part::SpecialGroupOpen(g) => out.push_str(g),
            Part::GroupClose => out.push(')'),
            Part::Literal(l) => push_literal(&mut out, l, fold_case),
        }
    }

    out
}

/// Merges the rules into a single pattern, keeping their priority order.
///
/// Fails if a rule uses the `g`/`m` flags, can match the empty string or does not compile.
pub fn combine(rules: &[Rule]) -> LustroResult<CombinedPattern> {
    for rule in rules {
        if rule.pattern.global || rule.pattern.multiline {
            return Err(Error::MultiMatchFlags(format!("{:?}", rule.pattern)));
        }
    }

    // If every rule with letters is case-insensitive we can just use the regex flag, otherwise
    // the case-insensitive rules have to be rewritten
    let mut ignore_case = false;
    let mut fold_case = false;
    for rule in rules {
        if rule.pattern.ignore_case {
            ignore_case = true;
        } else if rule.pattern.has_case_sensitive_letters() {
            fold_case = true;
            ignore_case = false;
            break;
        }
    }

    let mut compiled = Vec::with_capacity(rules.len());
    for rule in rules {
        let rule = CompiledRule::new(rule.clone())?;
        if rule.matches_empty() {
            return Err(Error::EmptyMatch(format!("{:?}", rule.rule.pattern)));
        }
        compiled.push(rule);
    }

    let mut seen = HashSet::new();
    let mut alternatives = Vec::with_capacity(rules.len());
    let mut merged = Vec::with_capacity(rules.len() + 1);
    let mut next_group = 0;
    for (index, rule) in rules.iter().enumerate() {
        if !seen.insert(&rule.pattern) {
            continue;
        }
        next_group += 1;
        alternatives.push((next_group, index));
        let rewritten = rewrite_for_merge(
            rule.pattern.source(),
            &mut next_group,
            fold_case && rule.pattern.ignore_case,
        );
        merged.push(format!("({rewritten})"));
    }
    merged.push(CATCH_ALL.to_owned());

    let source = merged.join("|");
    let regex = compile(&source, ignore_case, &source)?;

    let mut dispatch = HashMap::new();
    for (index, rule) in rules.iter().enumerate() {
        if let Some(chars) = &rule.dispatch {
            for c in chars.chars() {
                dispatch.entry(c).or_insert(index);
            }
        }
    }

    #[cfg(feature = "debug")]
    log::debug!("[combine] {} rules merged into {source}", rules.len());

    Ok(CombinedPattern {
        source,
        regex,
        rules: compiled,
        alternatives,
        dispatch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(class: &str, source: &'static str) -> Rule {
        Rule::new(TokenClass::from_name(class), Pattern::new(source))
    }

    /// Tries every rule anchored at `pos` in priority order
    fn first_individual_match(rules: &[Rule], text: &str, pos: usize) -> Option<(usize, usize)> {
        for (index, rule) in rules.iter().enumerate() {
            let source = rewrite_for_merge(rule.pattern.source(), &mut 0, false);
            let regex = compile(&source, rule.pattern.ignore_case, &source).unwrap();
            if let Some(len) =
                regex.match_with_options(text, pos, SearchOptions::SEARCH_OPTION_NONE, None)
            {
                return Some((index, len));
            }
        }
        None
    }

    #[test]
    fn merged_pattern_picks_same_winner_as_rules_in_order() {
        let rules = vec![
            rule("str", r#"^(?:"(?:[^\\"]|\\.)*(?:"|$)|'(?:[^\\']|\\.)*(?:'|$))"#),
            rule("com", r"^\/\/[^\r\n]*"),
            rule("kwd", r"^(?:int|in|return)\b"),
            rule("lit", r"^\d+(?:\.\d*)?"),
            rule("pln", r"^[a-z_]\w*"),
            rule("pln", r"^\s+"),
            rule("pun", r"^[^\w\s]+"),
        ];
        let combined = combine(&rules).unwrap();
        let text = "int inner = 12.5; // in \"str\\\"ing\" 'c'\nreturn x;";

        for pos in 0..text.len() {
            let found = combined.find_at(text, pos).unwrap();
            let expected = first_individual_match(&rules, text, pos);
            match expected {
                Some((index, len)) => {
                    assert_eq!(found.rule, Some(index), "at {pos}");
                    assert_eq!(found.range, pos..pos + len, "at {pos}");
                }
                None => {
                    assert_eq!(found.rule, None, "at {pos}");
                    assert_eq!(found.range.len(), 1);
                }
            }
        }
    }

    #[test]
    fn keeps_only_backreferenced_groups() {
        let mut next = 3;
        let out = rewrite_for_merge(
            r"^--(?:\[(=*)\[[\s\S]*?(?:\]\1\]|$)|([^\r\n]*))",
            &mut next,
            false,
        );
        assert_eq!(out, r"--(?:\[(=*)\[[\s\S]*?(?:\]\4\]|\z)|(?:[^\r\n]*))");
        assert_eq!(next, 4);
    }

    #[test]
    fn backreferences_still_work_after_merging() {
        let rules = vec![
            rule("str", r"^(')[^']*\1"),
            rule("com", r#"^--\[(=*)\[[\s\S]*?\]\1\]"#),
        ];
        let combined = combine(&rules).unwrap();
        let text = "--[==[ a ]] b ]==] 'q'";
        let m = combined.find_at(text, 0).unwrap();
        assert_eq!(m.rule, Some(1));
        assert_eq!(&text[m.range], "--[==[ a ]] b ]==]");
        let m = combined.find_at(text, 19).unwrap();
        assert_eq!(m.rule, Some(0));
        assert_eq!(&text[m.range], "'q'");
    }

    #[test]
    fn double_caret_anchors_to_text_start() {
        let rules = vec![rule("tag", r"^^<\/?[a-z]+"), rule("pln", r"^[a-z<]+")];
        let combined = combine(&rules).unwrap();
        assert_eq!(combined.find_at("<ab <cd", 0).unwrap().rule, Some(0));
        assert_eq!(combined.find_at("<ab <cd", 4).unwrap().rule, Some(1));
    }

    #[test]
    fn uses_regex_flag_when_all_rules_are_case_insensitive() {
        let rules = vec![
            Rule::new(TokenClass::Keyword, Pattern::nocase(r"^(?:select|from)\b")),
            rule("pln", r"^\s+"),
        ];
        let combined = combine(&rules).unwrap();
        assert!(combined.source().contains("select"));
        assert_eq!(combined.find_at("SELECT x", 0).unwrap().rule, Some(0));
    }

    #[test]
    fn folds_case_insensitive_rules_next_to_case_sensitive_ones() {
        let rules = vec![
            Rule::new(TokenClass::Keyword, Pattern::nocase(r"^(?:if|[x-z]q)\b")),
            rule("pln", r"^[a-z]+"),
            rule("pln", r"^\s+"),
        ];
        let combined = combine(&rules).unwrap();
        assert!(combined.source().starts_with(r"((?:[Ii][Ff]|[X-Zx-z][Qq])\b)|"));
        assert_eq!(combined.find_at("IF", 0).unwrap().rule, Some(0));
        assert_eq!(combined.find_at("Zq", 0).unwrap().rule, Some(0));
        // The case-sensitive rule stays case-sensitive
        assert_eq!(combined.find_at("ABC", 0).unwrap().rule, None);
    }

    #[test]
    fn falls_back_to_catch_all() {
        let combined = combine(&[rule("kwd", r"^foo\b")]).unwrap();
        let m = combined.find_at("\u{e9}foo", 0).unwrap();
        assert_eq!(m.rule, None);
        assert_eq!(m.range, 0..'\u{e9}'.len_utf8());
        assert!(combined.find_at("foo", 3).is_none());
    }

    #[test]
    fn duplicate_patterns_resolve_to_first_rule() {
        let rules = vec![rule("str", r"^'[^']*'"), rule("lit", r"^'[^']*'")];
        let combined = combine(&rules).unwrap();
        assert_eq!(combined.find_at("'a'", 0).unwrap().rule, Some(0));
        assert_eq!(combined.len(), 2);
    }

    #[test]
    fn builds_dispatch_table_first_rule_wins() {
        let rules = vec![
            rule("str", r"^'[^']*'").dispatch("'\""),
            rule("lit", r"^\d+").dispatch("0123456789'"),
        ];
        let combined = combine(&rules).unwrap();
        assert_eq!(combined.dispatch_rule('\''), Some(0));
        assert_eq!(combined.dispatch_rule('7'), Some(1));
        assert_eq!(combined.dispatch_rule('x'), None);
    }

    #[test]
    fn rejects_zero_length_rules() {
        let err = combine(&[rule("pln", r"^\s*"), rule("kwd", "^if")]).unwrap_err();
        assert!(matches!(err, Error::EmptyMatch(_)));
        let err = combine(&[rule("pln", r"^(?:foo)?")]).unwrap_err();
        assert!(matches!(err, Error::EmptyMatch(_)));
        // only matches empty in front of a `k`
        let err = combine(&[rule("kwd", r"^(?=k)"), rule("pln", r"^\w+")]).unwrap_err();
        assert!(matches!(err, Error::EmptyMatch(_)));
        // `\u{3bb}` is only found in the rule source
        let err = combine(&[rule("kwd", "^(?=\u{3bb})"), rule("pln", r"^\w+")]).unwrap_err();
        assert!(matches!(err, Error::EmptyMatch(_)));
    }

    #[test]
    fn rejects_multi_match_flags() {
        let pattern = Pattern::with_flags(r"^a", "g").unwrap();
        let err = combine(&[Rule::new(TokenClass::Plain, pattern)]).unwrap_err();
        assert!(matches!(err, Error::MultiMatchFlags(_)));
    }

    #[test]
    fn rejects_invalid_regex() {
        let err = combine(&[rule("pln", r"^(a")]).unwrap_err();
        assert!(matches!(err, Error::InvalidRegex { .. }));
    }
}
