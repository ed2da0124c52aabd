use crate::class::TokenClass;
use crate::error::LustroResult;
use crate::grammars::combine::{CombinedPattern, Rule, combine};
use crate::registry::{LanguageHandler, Registry};
use crate::tokenizer::{Job, Tokenizer};

/// A lexer made of two ordered rule lists.
///
/// Both lists decide where tokens start and end. Shortcut rules usually come with dispatch
/// chars so that a token is classified by looking at its first char only, fallthrough rules are
/// tried in order on tokens that don't start with any dispatch char.
#[derive(Debug)]
pub struct SimpleLexer {
    pattern: CombinedPattern,
    /// Indices of the rules tried in order to classify a token
    trial_order: Vec<usize>,
}

impl SimpleLexer {
    pub fn new(shortcut: Vec<Rule>, fallthrough: Vec<Rule>) -> LustroResult<Self> {
        let num_shortcut = shortcut.len();
        // Shortcut rules without dispatch chars would otherwise only ever split tokens
        let mut trial_order: Vec<usize> = shortcut
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.dispatch.is_none())
            .map(|(i, _)| i)
            .collect();
        trial_order.extend(num_shortcut..num_shortcut + fallthrough.len());

        let mut rules = shortcut;
        rules.extend(fallthrough);
        let pattern = combine(&rules)?;

        Ok(Self {
            pattern,
            trial_order,
        })
    }

    pub fn pattern(&self) -> &CombinedPattern {
        &self.pattern
    }

    pub(crate) fn trial_order(&self) -> &[usize] {
        &self.trial_order
    }
}

impl LanguageHandler for SimpleLexer {
    fn decorate(&self, job: &mut Job<'_>, registry: &Registry) -> LustroResult<()> {
        Tokenizer::new(self, registry).classify(job)
    }
}

/// Marks everything as plain text.
/// Used when nothing better is registered, even the default handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHandler;

impl LanguageHandler for PlainHandler {
    fn decorate(&self, job: &mut Job<'_>, _registry: &Registry) -> LustroResult<()> {
        if !job.source.is_empty() {
            job.decorations.push(job.base_pos, TokenClass::Plain);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammars::Pattern;

    #[test]
    fn shortcut_rules_without_dispatch_are_tried() {
        let lexer = SimpleLexer::new(
            vec![
                Rule::new(TokenClass::Plain, Pattern::new(r"^\s+")).dispatch(" "),
                Rule::new(TokenClass::Comment, Pattern::new(r"^#.*")),
            ],
            vec![Rule::new(TokenClass::Keyword, Pattern::new(r"^\w+"))],
        )
        .unwrap();
        assert_eq!(lexer.trial_order(), &[1, 2]);

        let registry = Registry::new();
        let mut job = Job::new("# hi");
        lexer.decorate(&mut job, &registry).unwrap();
        assert_eq!(job.decorations.as_slice()[0].class, TokenClass::Comment);
    }

    #[test]
    fn plain_handler_marks_everything_plain() {
        let registry = Registry::new();
        let mut job = Job::nested("anything <at> all", 7);
        PlainHandler.decorate(&mut job, &registry).unwrap();
        assert_eq!(job.decorations.spans(job.end()), vec![(7..24, &TokenClass::Plain)]);

        let mut job = Job::new("");
        PlainHandler.decorate(&mut job, &registry).unwrap();
        assert!(job.decorations.is_empty());
    }
}
