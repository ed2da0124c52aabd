pub mod html;
mod tabs;

pub(crate) use tabs::TabExpander;

/// How many columns a tab takes when no width is given
pub const DEFAULT_TAB_WIDTH: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub(crate) tab_width: usize,
    pub(crate) line_numbers: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            line_numbers: None,
        }
    }
}

impl Options {
    /// Tabs are replaced by spaces up to the next multiple of that width.
    /// A width of 0 keeps tabs as they are.
    pub fn tab_width(mut self, value: usize) -> Self {
        self.tab_width = value;
        self
    }

    /// Wraps every line in a list item, numbered from `start`.
    pub fn line_numbers(mut self, start: Option<usize>) -> Self {
        self.line_numbers = start;
        self
    }
}
