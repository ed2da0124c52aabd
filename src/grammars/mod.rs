mod case_fold;
mod combine;
mod compiled;
mod raw;
mod regex;

pub use combine::{CombinedMatch, CombinedPattern, Rule, combine};
pub use compiled::{PlainHandler, SimpleLexer};
pub use raw::{RawLexer, RawRule};
pub use regex::Pattern;
