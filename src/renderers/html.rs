use std::fmt;

use crate::renderers::{Options, TabExpander};
use crate::tokenizer::Job;

/// Put in place of every space that would otherwise be collapsed by the browser
const PROTECTED_SPACE: &str = "&#160;";
const LINE_BREAK: &str = "<br />";

#[derive(Debug, PartialEq, Clone, Default)]
/// A renderer that will output prettify-compatible HTML
pub struct HtmlRenderer {
    pub options: Options,
}

/// Everything that changes while rendering a job
struct RenderState<'a> {
    out: String,
    /// How far the source text has been rendered
    rendered: usize,
    /// The class of the span currently open in the output
    open_class: Option<&'a str>,
    /// The class of the text about to be rendered
    current_class: Option<&'a str>,
    last_was_space: bool,
    tabs: TabExpander,
    /// Index of the current line when numbering lines
    line: Option<usize>,
}

impl<'a> RenderState<'a> {
    fn close_span(&mut self) {
        if self.open_class.take().is_some() {
            self.out.push_str("</span>");
        }
    }

    fn push_line_break(&mut self) {
        let Some(line) = self.line.as_mut() else {
            self.out.push_str(LINE_BREAK);
            return;
        };
        *line += 1;
        let item = format!(r#"{LINE_BREAK}</li><li class="L{}">"#, *line % 10);
        match self.open_class {
            Some(class) => self.out.push_str(&format!(
                r#"</span>{item}<span class="{class}">"#
            )),
            None => self.out.push_str(&item),
        }
    }

    /// Renders the source text up to `end` with the current class.
    fn render_text(&mut self, source: &str, end: usize) {
        if end <= self.rendered {
            return;
        }
        if self.open_class.is_some() && self.open_class != self.current_class {
            self.close_span();
        }
        if self.open_class.is_none()
            && let Some(class) = self.current_class
        {
            self.open_class = Some(class);
            self.out.push_str(&format!(r#"<span class="{class}">"#));
        }

        let expanded = self.tabs.expand(&source[self.rendered..end]);
        let escaped = HtmlEscaped(&expanded).to_string();
        let protected = protect_spaces(&escaped, self.last_was_space);
        self.last_was_space = protected.ends_with([' ', '\r', '\n']);

        let mut chars = protected.char_indices().peekable();
        let mut last = 0;
        while let Some((i, c)) = chars.next() {
            if c != '\r' && c != '\n' {
                continue;
            }
            self.out.push_str(&protected[last..i]);
            last = i + 1;
            if c == '\r' && chars.peek().is_some_and(|(_, next)| *next == '\n') {
                chars.next();
                last += 1;
            }
            self.push_line_break();
        }
        self.out.push_str(&protected[last..]);

        self.rendered = end;
    }
}

/// Makes sure runs of spaces and spaces starting a line survive HTML whitespace collapsing.
///
/// If the previous text ended with a space, spaces at the start of a line are protected too.
fn protect_spaces(text: &str, after_space: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next_is_space = chars.get(i + 1) == Some(&' ');
        if after_space {
            let at_line_start =
                i == 0 || matches!(chars[i - 1], '\n' | '\r' | '\u{2028}' | '\u{2029}');
            if c == ' ' && at_line_start {
                out.push_str(PROTECTED_SPACE);
                i += 1;
                continue;
            }
            if c == ' ' && next_is_space {
                out.push(' ');
                out.push_str(PROTECTED_SPACE);
                i += 2;
                continue;
            }
        } else if matches!(c, ' ' | '\r' | '\n') && next_is_space {
            out.push(c);
            out.push_str(PROTECTED_SPACE);
            i += 2;
            continue;
        }
        out.push(c);
        i += 1;
    }

    out
}

impl HtmlRenderer {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Renders the decorated job, putting back the markup extracted from the original HTML.
    ///
    /// Every decorated span of text is wrapped in a `<span>` with the class css name and
    /// markup is never put inside of a span.
    pub fn render(&self, job: &Job<'_>) -> String {
        let source = job.source;
        let tags = &job.extracted_tags;
        let decorations = job.decorations.as_slice();

        let mut state = RenderState {
            out: String::with_capacity(source.len() * 2),
            rendered: 0,
            open_class: None,
            current_class: None,
            last_was_space: true,
            tabs: TabExpander::new(self.options.tab_width),
            line: self.options.line_numbers.map(|start| start.saturating_sub(1)),
        };

        if let Some(line) = state.line {
            state.out.push_str(&format!(r#"<ol class="linenums"><li class="L{}""#, line % 10));
            if line != 0 {
                state.out.push_str(&format!(r#" value="{}""#, line + 1));
            }
            state.out.push('>');
        }

        let mut tag_idx = 0;
        let mut decoration_idx = 0;
        loop {
            let tag_is_next = match (tags.get(tag_idx), decorations.get(decoration_idx)) {
                (Some(tag), Some(decoration)) => tag.offset <= decoration.offset - job.base_pos,
                (Some(_), None) => true,
                (None, _) => false,
            };

            if tag_is_next {
                let tag = &tags[tag_idx];
                state.render_text(source, tag.offset);
                state.close_span();
                state.out.push_str(&tag.text);
                tag_idx += 1;
            } else if let Some(decoration) = decorations.get(decoration_idx) {
                state.render_text(source, decoration.offset - job.base_pos);
                state.current_class = Some(decoration.class.css_class());
                decoration_idx += 1;
            } else {
                break;
            }
        }

        state.render_text(source, source.len());
        state.close_span();
        if state.line.is_some() {
            state.out.push_str("</li></ol>");
        }
        state.out
    }
}

// From syntect, only escaping what prettify escapes
pub(crate) struct HtmlEscaped<'a>(pub &'a str);
impl fmt::Display for HtmlEscaped<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(s) = *self;
        let mut last = 0;
        for (i, ch) in s.bytes().enumerate() {
            let escaped = match ch {
                b'>' => "&gt;",
                b'<' => "&lt;",
                b'&' => "&amp;",
                _ => continue,
            };
            fmt.write_str(&s[last..i])?;
            fmt.write_str(escaped)?;
            last = i + 1;
        }

        if last < s.len() {
            fmt.write_str(&s[last..])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::TokenClass;
    use crate::extract::{ExtractedTag, extract_source};

    fn job_with<'a>(source: &'a str, decorations: &[(usize, &str)]) -> Job<'a> {
        let mut job = Job::new(source);
        for (offset, class) in decorations {
            job.decorations.push(*offset, TokenClass::from_name(class));
        }
        job
    }

    #[test]
    fn escapes_only_markup_chars() {
        assert_eq!(
            HtmlEscaped(r#"a < b && c > "d" 'e'"#).to_string(),
            r#"a &lt; b &amp;&amp; c &gt; "d" 'e'"#
        );
    }

    #[test]
    fn plain_text_round_trips() {
        let job = job_with("a<b & c", &[(0, "pln")]);
        let html = HtmlRenderer::default().render(&job);
        insta::assert_snapshot!(html, @r#"<span class="pln">a&lt;b &amp; c</span>"#);
    }

    #[test]
    fn empty_job_renders_nothing() {
        let job = Job::new("");
        assert_eq!(HtmlRenderer::default().render(&job), "");
        let html = HtmlRenderer::new(Options::default().line_numbers(Some(1))).render(&job);
        assert_eq!(html, r#"<ol class="linenums"><li class="L0"></li></ol>"#);
    }

    #[test]
    fn same_class_spans_are_collapsed() {
        let job = job_with("int x", &[(0, "kwd"), (3, "kwd"), (4, "pln")]);
        let html = HtmlRenderer::default().render(&job);
        insta::assert_snapshot!(html, @r#"<span class="kwd">int </span><span class="pln">x</span>"#);
    }

    #[test]
    fn protects_spaces() {
        let job = job_with(" a  b\n  c   d", &[(0, "pln")]);
        let html = HtmlRenderer::default().render(&job);
        insta::assert_snapshot!(html, @r#"<span class="pln">&#160;a &#160;b<br />&#160; c &#160; d</span>"#);
    }

    #[test]
    fn protects_spaces_across_spans() {
        let job = job_with("a  b", &[(0, "pln"), (2, "kwd")]);
        let html = HtmlRenderer::default().render(&job);
        insta::assert_snapshot!(html, @r#"<span class="pln">a </span><span class="kwd">&#160;b</span>"#);
    }

    #[test]
    fn expands_tabs() {
        let job = job_with("\tif\r\n\tx", &[(0, "pln"), (1, "kwd"), (3, "pln")]);
        let html = HtmlRenderer::new(Options::default().tab_width(4)).render(&job);
        insta::assert_snapshot!(html, @r#"<span class="pln">&#160; &#160; </span><span class="kwd">if</span><span class="pln"><br />&#160; &#160; x</span>"#);
    }

    #[test]
    fn puts_tags_back_outside_spans() {
        let extraction = extract_source("<b>int</b> x");
        let mut job = Job::with_tags(&extraction.source, extraction.tags);
        job.decorations.push(0, TokenClass::Keyword);
        job.decorations.push(3, TokenClass::Plain);
        let html = HtmlRenderer::default().render(&job);
        insta::assert_snapshot!(html, @r#"<b><span class="kwd">int</span></b><span class="pln"> x</span>"#);
    }

    #[test]
    fn tag_inside_a_token_splits_the_span() {
        let mut job = Job::with_tags(
            "abcd",
            vec![ExtractedTag {
                offset: 2,
                text: "<i>".to_owned(),
            }],
        );
        job.decorations.push(0, TokenClass::Str);
        let html = HtmlRenderer::default().render(&job);
        insta::assert_snapshot!(html, @r#"<span class="str">ab</span><i><span class="str">cd</span>"#);
    }

    #[test]
    fn numbers_lines() {
        let job = job_with("/* a\nb */\nc", &[(0, "com"), (10, "pln")]);
        let html = HtmlRenderer::new(Options::default().line_numbers(Some(9))).render(&job);
        insta::assert_snapshot!(html, @r#"<ol class="linenums"><li class="L8" value="9"><span class="com">/* a</span><br /></li><li class="L9"><span class="com">b */</span><br /></li><li class="L0"><span class="com"></span><span class="pln">c</span></li></ol>"#);
    }
}
