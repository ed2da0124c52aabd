use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use crate::error::LustroResult;
use crate::extract::{SourceExtraction, extract_source};
use crate::grammars::{PlainHandler, RawLexer};
use crate::languages;
use crate::renderers::Options;
use crate::renderers::html::HtmlRenderer;
use crate::tokenizer::Job;

/// Used for unknown languages when the text looks like markup
pub const DEFAULT_MARKUP: &str = "default-markup";
/// Used for unknown languages otherwise
pub const DEFAULT_CODE: &str = "default-code";

/// Something that can decorate the text of a job.
///
/// The registry is passed along so handlers can delegate part of the text to other languages.
pub trait LanguageHandler: Send + Sync {
    fn decorate(&self, job: &mut Job<'_>, registry: &Registry) -> LustroResult<()>;
}

static PLAIN: LazyLock<Arc<dyn LanguageHandler>> = LazyLock::new(|| Arc::new(PlainHandler));

static GLOBAL: LazyLock<Registry> = LazyLock::new(|| {
    Registry::with_builtin_languages().unwrap_or_else(|e| {
        log::error!("failed to load the builtin languages: {e}");
        Registry::new()
    })
});

/// The main struct in lustro.
///
/// Maps language ids to the handler decorating text in that language. Handlers can only be
/// added: the first one registered for an id stays for the lifetime of the registry.
/// Lookups and registrations never lock so a registry can be shared between threads.
#[derive(Default)]
pub struct Registry {
    handlers: papaya::HashMap<String, Arc<dyn LanguageHandler>>,
}

impl Registry {
    /// An empty registry, every lookup will mark the text as plain.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with all the languages lustro knows about.
    pub fn with_builtin_languages() -> LustroResult<Self> {
        let registry = Self::new();
        languages::register_all(&registry)?;
        Ok(registry)
    }

    /// A process wide registry with the builtin languages, created on first use.
    ///
    /// If the builtin languages fail to load, this is logged and an empty registry is used
    /// instead.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Registers the handler for all the given ids.
    ///
    /// Ids that already have a handler keep it. Those are returned.
    pub fn register(&self, handler: Arc<dyn LanguageHandler>, ids: &[&str]) -> Vec<String> {
        let handlers = self.handlers.pin();
        let mut duplicates = Vec::new();
        for id in ids {
            if handlers.try_insert((*id).to_owned(), handler.clone()).is_err() {
                log::warn!("cannot override language handler {id}");
                duplicates.push((*id).to_owned());
            }
        }
        duplicates
    }

    /// Compiles a JSON lexer definition and registers it for the given ids.
    /// See [`RawLexer`] for the format.
    pub fn register_from_json(&self, json: &str, ids: &[&str]) -> LustroResult<Vec<String>> {
        let lexer = RawLexer::load_from_str(json)?.compile()?;
        Ok(self.register(Arc::new(lexer), ids))
    }

    /// Reads a JSON lexer definition from a file and registers it for the given ids.
    pub fn register_from_path(
        &self,
        path: impl AsRef<Path>,
        ids: &[&str],
    ) -> LustroResult<Vec<String>> {
        let lexer = RawLexer::load_from_file(path)?.compile()?;
        Ok(self.register(Arc::new(lexer), ids))
    }

    /// Checks whether the given language id has a handler
    pub fn contains(&self, id: &str) -> bool {
        self.handlers.pin().contains_key(id)
    }

    /// All the registered language ids, sorted
    pub fn language_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.handlers.pin().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Finds the handler for the given language id.
    ///
    /// This never fails: unknown ids get the default markup handler if `source` starts with a
    /// tag and the default code handler otherwise. If those are not registered either,
    /// everything is plain.
    pub fn lookup(&self, id: Option<&str>, source: &str) -> Arc<dyn LanguageHandler> {
        let handlers = self.handlers.pin();
        if let Some(handler) = id.and_then(|id| handlers.get(id)) {
            return handler.clone();
        }

        let fallback = if source.trim_start().starts_with('<') {
            DEFAULT_MARKUP
        } else {
            DEFAULT_CODE
        };
        handlers
            .get(fallback)
            .cloned()
            .unwrap_or_else(|| PLAIN.clone())
    }

    /// Turns a code snippet, which can contain HTML tags and entities, into HTML with every
    /// token wrapped in a `<span>` with its class.
    pub fn prettify(
        &self,
        html: &str,
        lang: Option<&str>,
        options: &Options,
    ) -> LustroResult<String> {
        let SourceExtraction { source, tags } = extract_source(html);
        let mut job = Job::with_tags(&source, tags);
        self.lookup(lang, &source).decorate(&mut job, self)?;
        Ok(HtmlRenderer::new(options.clone()).render(&job))
    }

    /// Same as [`Registry::prettify`] but returns the input unchanged if anything goes wrong.
    pub fn prettify_or_original(
        &self,
        html: &str,
        lang: Option<&str>,
        options: &Options,
    ) -> String {
        match self.prettify(html, lang, options) {
            Ok(out) => out,
            Err(e) => {
                log::error!("failed to prettify `{}`: {e}", lang.unwrap_or_default());
                html.to_owned()
            }
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("languages", &self.language_ids())
            .finish()
    }
}
