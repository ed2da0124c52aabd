mod class;
mod error;
mod grammars;
mod registry;
mod tokenizer;

mod class_attr;
mod extract;
mod languages;
mod renderers;
mod scan;

pub use class::{EMBEDDED_PREFIX, LanguageId, TokenClass};
pub use class_attr::{ParsedClass, parse_class_attr};
pub use error::Error;
pub use extract::{ExtractedTag, SourceExtraction, decode_entities, extract_source};
pub use grammars::{
    CombinedMatch, CombinedPattern, Pattern, PlainHandler, RawLexer, RawRule, Rule, SimpleLexer,
    combine,
};
pub use languages::{SourceDecoratorOptions, source_decorator};
pub use registry::{DEFAULT_CODE, DEFAULT_MARKUP, LanguageHandler, Registry};
pub use renderers::{DEFAULT_TAB_WIDTH, Options, html::HtmlRenderer};
pub use scan::{
    CodeElement, DEFAULT_SLICE_BUDGET, ScanOptions, ScanState, ScanTask, Scanner, prettify_all,
};
pub use tokenizer::{Decoration, Decorations, EmbeddedMatch, Job, Tokenizer};

/// Highlights a snippet of HTML with the builtin languages and the default options.
///
/// `lang` is a language id like `js`, if it's missing or unknown the language is guessed
/// from the text. This never fails: if something goes wrong, the input is returned unchanged.
pub fn tokenize_to_html(source_code_html: &str, lang: Option<&str>) -> String {
    Registry::global().prettify_or_original(source_code_html, lang, &Options::default())
}

/// A stylesheet for the classes lustro outputs, with alternate backgrounds for numbered lines.
pub const LUSTRO_CSS: &str = r#".pln {
  color: #000;
}
@media screen {
  .str { color: #080; }
  .kwd { color: #008; }
  .com { color: #800; }
  .typ { color: #606; }
  .lit { color: #066; }
  .pun, .opn, .clo { color: #660; }
  .tag { color: #008; }
  .atn { color: #606; }
  .atv { color: #080; }
  .dec { color: #606; }
}
@media print {
  .str { color: #060; }
  .kwd { color: #006; font-weight: bold; }
  .com { color: #600; font-style: italic; }
  .typ { color: #404; font-weight: bold; }
  .lit { color: #044; }
  .pun, .opn, .clo { color: #440; }
  .tag { color: #006; font-weight: bold; }
  .atn { color: #404; }
  .atv { color: #060; }
}
pre.prettyprint {
  padding: 2px;
  border: 1px solid #888;
}
ol.linenums {
  margin-top: 0;
  margin-bottom: 0;
}
li.L0, li.L1, li.L2, li.L3, li.L5, li.L6, li.L7, li.L8 {
  list-style-type: none;
}
li.L1, li.L3, li.L5, li.L7, li.L9 {
  background: #eee;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_tokenize_to_html() {
        let html = tokenize_to_html("return &quot;a&quot;;", Some("js"));
        insta::assert_snapshot!(html, @r#"<span class="kwd">return</span><span class="pln"> </span><span class="str">"a"</span><span class="pun">;</span>"#);
    }

    #[test]
    fn guesses_the_language() {
        let html = tokenize_to_html("&lt;br/&gt;", None);
        insta::assert_snapshot!(html, @r#"<span class="tag">&lt;br/&gt;</span>"#);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(tokenize_to_html("", Some("c")), "");
        assert_eq!(tokenize_to_html("", None), "");
    }
}
