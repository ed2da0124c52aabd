//! Splits a snippet of HTML into the source text to highlight and the markup to put back
//! unchanged when rendering.

use std::sync::LazyLock;

use onig::{Captures, Regex};

/// Splits HTML into text runs, comments, CDATA sections, tags and stray `<`.
static HTML_PIECES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"[^<]+|<!--[\s\S]*?-->|<!\[CDATA\[[\s\S]*?\]\]>|</?[a-zA-Z](?:[^>"']|'[^']*'|"[^"]*")*>|<"#,
    )
    .expect("Failed to compile HTML_PIECES regex")
});

/// Attributes in all the quoting styles
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s(\w+)\s*=\s*(?:"([^"]*)"|'([^']*)'|(\S+))"#)
        .expect("Failed to compile ATTRIBUTE regex")
});

static NOCODE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[cC][lL][aA][sS][sS]="[^"]*\bnocode\b"#)
        .expect("Failed to compile NOCODE_CLASS regex")
});

/// A piece of markup removed from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTag {
    /// Byte offset in the extracted source text where the markup was
    pub offset: usize,
    /// The markup, verbatim
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceExtraction {
    /// The text to highlight, with entities decoded
    pub source: String,
    /// Markup in the order it was found, offsets are never decreasing
    pub tags: Vec<ExtractedTag>,
}

/// Returns the name of a tag and whether it is a closing tag.
fn tag_name(piece: &str) -> Option<(bool, &str)> {
    let rest = piece.strip_prefix('<')?;
    let (closing, rest) = match rest.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    Some((closing, &rest[..end]))
}

fn is_line_break(piece: &str) -> bool {
    match tag_name(piece) {
        Some((false, name)) => name.eq_ignore_ascii_case("br"),
        _ => false,
    }
}

/// Whether the tag has `nocode` in its class attribute, whatever the quoting style.
fn is_nocode(tag: &str) -> bool {
    if !tag.contains("nocode") {
        return false;
    }
    let normalized = ATTRIBUTE.replace_all(tag, |caps: &Captures| {
        format!(
            " {}=\"{}{}{}\"",
            caps.at(1).unwrap_or_default(),
            caps.at(2).unwrap_or_default(),
            caps.at(3).unwrap_or_default(),
            caps.at(4).unwrap_or_default()
        )
    });
    NOCODE_CLASS.find(&normalized).is_some()
}

/// Index of the piece closing the element opened by `pieces[start]`, counting nested
/// elements with the same name.
fn find_closing(pieces: &[&str], start: usize, name: &str) -> Option<usize> {
    let mut depth = 1;
    for (i, piece) in pieces.iter().enumerate().skip(start + 1) {
        match tag_name(piece) {
            Some((true, other)) if other == name => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            Some((false, other)) if other == name => depth += 1,
            _ => {}
        }
    }
    None
}

/// Decodes `&#NN;`/`&#xHH;` first, then the named entities with `&amp;` last.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("&#") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let decoded = after.find(';').and_then(|end| {
            let digits = &after[..end];
            let code = match digits.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => digits.parse().ok(),
            }?;
            char::from_u32(code).map(|c| (c, end))
        });
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &after[end + 1..];
            }
            None => {
                out.push_str("&#");
                rest = after;
            }
        }
    }
    out.push_str(rest);

    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&apos;", "'")
        .replace("&quot;", "\"")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Separates the text from the markup in a snippet of HTML.
///
/// `<br>` tags become newlines, CDATA sections are kept as text and elements with a `nocode`
/// class are kept as a single piece of markup, content included.
pub fn extract_source(html: &str) -> SourceExtraction {
    let pieces: Vec<&str> = HTML_PIECES
        .find_iter(html)
        .map(|(start, end)| &html[start..end])
        .collect();
    let mut extraction = SourceExtraction::default();

    let mut i = 0;
    while i < pieces.len() {
        let piece = pieces[i];
        if piece.len() > 1 && piece.starts_with('<') {
            if let Some(inner) = piece
                .strip_prefix("<![CDATA[")
                .and_then(|p| p.strip_suffix("]]>"))
            {
                extraction.source.push_str(inner);
            } else if is_line_break(piece) {
                extraction.source.push('\n');
            } else {
                let mut text = piece.to_owned();
                if let Some((false, name)) = tag_name(piece)
                    && is_nocode(piece)
                    && let Some(end) = find_closing(&pieces, i, name)
                {
                    text = pieces[i..=end].concat();
                    i = end;
                }
                extraction.tags.push(ExtractedTag {
                    offset: extraction.source.len(),
                    text,
                });
            }
        } else {
            extraction.source.push_str(&decode_entities(piece));
        }
        i += 1;
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(offset: usize, text: &str) -> ExtractedTag {
        ExtractedTag {
            offset,
            text: text.to_owned(),
        }
    }

    #[test]
    fn can_decode_entities() {
        assert_eq!(decode_entities("a &lt;b&gt; &amp;&amp; c"), "a <b> && c");
        assert_eq!(decode_entities("&#65;&#x42;&#x;&apos;&quot;&nbsp;"), "AB&#x;'\" ");
        // `&amp;` is decoded last so it can't create other entities
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("no entity"), "no entity");
    }

    #[test]
    fn can_extract_tags() {
        let out = extract_source(r##"<b>int</b> x = a &lt; <a href="#">b</a>;"##);
        assert_eq!(out.source, "int x = a < b;");
        assert_eq!(
            out.tags,
            vec![
                tag(0, "<b>"),
                tag(3, "</b>"),
                tag(12, r##"<a href="#">"##),
                tag(13, "</a>"),
            ]
        );
    }

    #[test]
    fn converts_line_breaks_and_cdata() {
        let out = extract_source("a<br>b<BR />c<![CDATA[<x> & y]]>");
        assert_eq!(out.source, "a\nb\nc<x> & y");
        assert!(out.tags.is_empty());
    }

    #[test]
    fn keeps_comments_and_stray_brackets() {
        let out = extract_source("a <!-- <b> --> < 3");
        assert_eq!(out.source, "a  < 3");
        assert_eq!(out.tags, vec![tag(2, "<!-- <b> -->")]);
    }

    #[test]
    fn keeps_nocode_elements_whole() {
        let out = extract_source(
            "x<span class='nocode'>1<span>2</span>3</span>y<i class=nocode>z<b>w</b></i>",
        );
        assert_eq!(out.source, "xy");
        assert_eq!(
            out.tags,
            vec![
                tag(1, "<span class='nocode'>1<span>2</span>3</span>"),
                tag(2, "<i class=nocode>z<b>w</b></i>"),
            ]
        );
    }

    #[test]
    fn unclosed_nocode_only_extracts_the_tag() {
        let out = extract_source(r#"a<p class="x nocode">b"#);
        assert_eq!(out.source, "ab");
        assert_eq!(out.tags, vec![tag(1, r#"<p class="x nocode">"#)]);
    }

    #[test]
    fn nocode_must_be_a_class() {
        let out = extract_source(r#"<p title="nocode">a</p>"#);
        assert_eq!(out.source, "a");
        assert_eq!(out.tags.len(), 2);
    }
}
