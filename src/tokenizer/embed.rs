use std::ops::Range;

use crate::class::{LanguageId, TokenClass};
use crate::error::LustroResult;
use crate::registry::{LanguageHandler, Registry};
use crate::tokenizer::Job;

/// A token whose capture group 1 is source code in another language.
///
/// The three ranges are relative to the token and put back together give the whole token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedMatch {
    /// Before the embedded text, eg `<script>`
    pub prefix: Range<usize>,
    /// The span of capture group 1
    pub embedded: Range<usize>,
    /// After the embedded text, eg `</script>`
    pub suffix: Range<usize>,
    /// Empty when the handler should be guessed from the embedded text
    pub language: LanguageId,
}

impl EmbeddedMatch {
    pub fn new(token_len: usize, embedded: Range<usize>, language: LanguageId) -> Self {
        debug_assert!(embedded.end <= token_len);
        Self {
            prefix: 0..embedded.start,
            suffix: embedded.end..token_len,
            embedded,
            language,
        }
    }

    /// Decorates the three parts of `token`, which starts at `token_start` in `job` coordinates.
    /// The prefix and suffix are decorated by `parent`, the embedded text by whatever handler
    /// the registry has for the language.
    pub(crate) fn decorate(
        &self,
        token: &str,
        token_start: usize,
        parent: &dyn LanguageHandler,
        job: &mut Job<'_>,
        registry: &Registry,
    ) -> LustroResult<()> {
        self.decorate_outer(job, token, &self.prefix, token_start, parent, registry)?;

        let embedded_text = &token[self.embedded.clone()];
        if !embedded_text.is_empty() {
            let handler = registry.lookup(Some(&self.language), embedded_text);
            append_decorations(
                job,
                token,
                &self.embedded,
                token_start,
                handler.as_ref(),
                registry,
            )?;
        }

        self.decorate_outer(job, token, &self.suffix, token_start, parent, registry)
    }

    /// The prefix or suffix is decorated by the parent lexer unless it is the whole token,
    /// which the parent would only split the same way again.
    fn decorate_outer(
        &self,
        job: &mut Job<'_>,
        token: &str,
        part: &Range<usize>,
        token_start: usize,
        parent: &dyn LanguageHandler,
        registry: &Registry,
    ) -> LustroResult<()> {
        if *part == (0..token.len()) && !part.is_empty() {
            job.decorations.push(token_start, TokenClass::Source);
            return Ok(());
        }
        append_decorations(job, token, part, token_start, parent, registry)
    }
}

fn append_decorations(
    job: &mut Job<'_>,
    token: &str,
    part: &Range<usize>,
    token_start: usize,
    handler: &dyn LanguageHandler,
    registry: &Registry,
) -> LustroResult<()> {
    if part.is_empty() {
        return Ok(());
    }
    let mut nested = Job::nested(&token[part.clone()], token_start + part.start);
    handler.decorate(&mut nested, registry)?;
    job.decorations.extend(nested.decorations);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammars::PlainHandler;

    #[test]
    fn ranges_cover_the_token() {
        let m = EmbeddedMatch::new(20, 8..11, LanguageId::Borrowed("js"));
        assert_eq!(m.prefix, 0..8);
        assert_eq!(m.suffix, 11..20);

        let m = EmbeddedMatch::new(5, 0..5, LanguageId::Borrowed(""));
        assert!(m.prefix.is_empty());
        assert!(m.suffix.is_empty());
    }

    #[test]
    fn whole_token_is_not_given_back_to_parent() {
        let registry = Registry::new();
        let mut job = Job::nested("ab", 10);
        let m = EmbeddedMatch::new(2, 2..2, LanguageId::Borrowed("js"));
        m.decorate("ab", 10, &PlainHandler, &mut job, &registry).unwrap();
        let classes: Vec<_> = job
            .decorations
            .iter()
            .map(|d| (d.offset, d.class.clone()))
            .collect();
        assert_eq!(classes, vec![(10, TokenClass::Source)]);
    }
}
