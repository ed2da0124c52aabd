use std::borrow::Cow;

/// Replaces tabs with spaces, keeping track of the column across calls so text can be fed
/// in several pieces.
#[derive(Debug, Clone)]
pub(crate) struct TabExpander {
    tab_width: usize,
    /// Chars since the last newline
    column: usize,
}

impl TabExpander {
    pub(crate) fn new(tab_width: usize) -> Self {
        Self {
            tab_width,
            column: 0,
        }
    }

    pub(crate) fn expand<'a>(&mut self, text: &'a str) -> Cow<'a, str> {
        if self.tab_width == 0 {
            return Cow::Borrowed(text);
        }

        let mut out: Option<String> = None;
        let mut last = 0;
        for (i, c) in text.char_indices() {
            match c {
                '\t' => {
                    let out = out.get_or_insert_with(|| String::with_capacity(text.len() + 8));
                    out.push_str(&text[last..i]);
                    let width = self.tab_width - self.column % self.tab_width;
                    self.column += width;
                    out.extend(std::iter::repeat_n(' ', width));
                    last = i + 1;
                }
                '\n' => self.column = 0,
                _ => self.column += 1,
            }
        }

        match out {
            Some(mut out) => {
                out.push_str(&text[last..]);
                Cow::Owned(out)
            }
            None => Cow::Borrowed(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_to_next_tab_stop() {
        let mut tabs = TabExpander::new(4);
        assert_eq!(tabs.expand("\ta\tbc\t|"), "    a   bc  |");
    }

    #[test]
    fn keeps_column_across_calls() {
        let mut tabs = TabExpander::new(8);
        assert_eq!(tabs.expand("abc"), "abc");
        assert_eq!(tabs.expand("\tx"), "     x");
        assert_eq!(tabs.expand("\n\t"), "\n        ");
    }

    #[test]
    fn zero_width_keeps_tabs() {
        let mut tabs = TabExpander::new(0);
        assert_eq!(tabs.expand("\ta"), "\ta");
    }

    #[test]
    fn borrows_when_nothing_to_expand() {
        let mut tabs = TabExpander::new(8);
        assert!(matches!(tabs.expand("no tabs\n"), Cow::Borrowed(_)));
    }
}
