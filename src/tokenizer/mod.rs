use std::collections::HashMap;
use std::ops::Range;

use crate::class::TokenClass;
use crate::error::{Error, LustroResult};
use crate::extract::ExtractedTag;
use crate::grammars::SimpleLexer;
use crate::registry::Registry;

mod embed;

pub use embed::EmbeddedMatch;

/// Marks the start of a span of text of a given class.
/// The span runs until the next decoration or the end of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// Byte offset in the job text
    pub offset: usize,
    pub class: TokenClass,
}

/// Ordered decorations where offsets are strictly increasing and two consecutive
/// decorations never have the same class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decorations {
    inner: Vec<Decoration>,
}

impl Decorations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a decoration.
    /// A decoration at the same offset as the last one replaces it, and one with the same class
    /// as the last one is dropped since the previous span already covers it.
    pub fn push(&mut self, offset: usize, class: TokenClass) {
        if let Some(last) = self.inner.last() {
            debug_assert!(offset >= last.offset, "decorations must be pushed in order");
            if last.offset == offset {
                self.inner.pop();
            }
        }
        if self.inner.last().is_some_and(|last| last.class == class) {
            return;
        }
        self.inner.push(Decoration { offset, class });
    }

    pub fn extend(&mut self, other: Decorations) {
        for decoration in other.inner {
            self.push(decoration.offset, decoration.class);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.inner.iter()
    }

    pub fn as_slice(&self) -> &[Decoration] {
        &self.inner
    }

    /// The span covered by every decoration, the last one running until `end`.
    pub fn spans(&self, end: usize) -> Vec<(Range<usize>, &TokenClass)> {
        self.inner
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let span_end = self.inner.get(i + 1).map_or(end, |next| next.offset);
                (d.offset..span_end, &d.class)
            })
            .collect()
    }
}

/// Everything needed to decorate one piece of text.
#[derive(Debug)]
pub struct Job<'a> {
    /// The text to decorate, without any markup
    pub source: &'a str,
    /// Where `source` starts in the text of the outermost job.
    /// Decorations are always reported in those outer coordinates.
    pub base_pos: usize,
    /// Markup removed from the text, only set on the outermost job
    pub extracted_tags: Vec<ExtractedTag>,
    pub decorations: Decorations,
}

impl<'a> Job<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_tags(source, Vec::new())
    }

    pub fn with_tags(source: &'a str, extracted_tags: Vec<ExtractedTag>) -> Self {
        Self {
            source,
            base_pos: 0,
            extracted_tags,
            decorations: Decorations::new(),
        }
    }

    /// A job for part of another job text
    pub(crate) fn nested(source: &'a str, base_pos: usize) -> Self {
        Self {
            source,
            base_pos,
            extracted_tags: Vec::new(),
            decorations: Decorations::new(),
        }
    }

    /// Offset right after the job text, in outer coordinates
    pub fn end(&self) -> usize {
        self.base_pos + self.source.len()
    }
}

/// How a single token gets decorated
#[derive(Debug)]
enum Decision {
    Class(TokenClass),
    Embed(EmbeddedMatch),
}

/// Splits a job text into tokens with the lexer combined pattern and classifies each of them.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    lexer: &'a SimpleLexer,
    registry: &'a Registry,
}

impl<'a> Tokenizer<'a> {
    pub fn new(lexer: &'a SimpleLexer, registry: &'a Registry) -> Self {
        Self { lexer, registry }
    }

    /// Picks the class of a token: the rule registered for its first char if any, otherwise
    /// the first rule of the trial list matching it, otherwise plain.
    fn decide(&self, token: &str) -> Decision {
        let pattern = self.lexer.pattern();
        let dispatched = token.chars().next().and_then(|c| pattern.dispatch_rule(c));

        let (class, captures) = match dispatched {
            Some(index) => {
                let rule = pattern.compiled_rule(index);
                (rule.rule.class.clone(), rule.captures(token))
            }
            None => self
                .lexer
                .trial_order()
                .iter()
                .find_map(|&index| {
                    let rule = pattern.compiled_rule(index);
                    rule.captures(token)
                        .map(|region| (rule.rule.class.clone(), Some(region)))
                })
                .unwrap_or((TokenClass::Plain, None)),
        };

        let language = match class.embedded_language() {
            Some(language) => language.to_owned(),
            None => return Decision::Class(class),
        };
        // An empty embedded part at either end would hand the whole token back to this lexer
        match captures.as_ref().and_then(|region| region.pos(1)) {
            Some((start, end)) if start < end || (start > 0 && start < token.len()) => {
                Decision::Embed(EmbeddedMatch::new(token.len(), start..end, language.into()))
            }
            _ => Decision::Class(TokenClass::Source),
        }
    }

    /// Decorates the whole job text.
    pub fn classify(&self, job: &mut Job<'_>) -> LustroResult<()> {
        let source = job.source;
        let pattern = self.lexer.pattern();
        // Most tokens (keywords, punctuation, identifiers) repeat a lot
        let mut memo: HashMap<&str, TokenClass> = HashMap::new();
        let mut pos = 0;

        while pos < source.len() {
            let token_start = job.base_pos + pos;
            let range = match pattern.find_at(source, pos) {
                Some(m) if !m.range.is_empty() => m.range,
                _ => return Err(Error::EmptyToken { offset: token_start }),
            };
            let token = &source[range.clone()];

            if let Some(class) = memo.get(token) {
                job.decorations.push(token_start, class.clone());
                pos = range.end;
                continue;
            }

            match self.decide(token) {
                Decision::Class(class) => {
                    #[cfg(feature = "debug")]
                    log::trace!(
                        "[classify] {token_start}..{} {class} {token:?}",
                        token_start + token.len()
                    );
                    memo.insert(token, class.clone());
                    job.decorations.push(token_start, class);
                }
                Decision::Embed(embedded) => {
                    #[cfg(feature = "debug")]
                    log::trace!(
                        "[classify] {token_start}..{} embeds `{}` at {:?}",
                        token_start + token.len(),
                        embedded.language,
                        embedded.embedded
                    );
                    embedded.decorate(token, token_start, self.lexer, job, self.registry)?;
                }
            }
            pos = range.end;
        }

        Ok(())
    }
}
