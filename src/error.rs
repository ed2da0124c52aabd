use std::fmt;
use std::io;

pub(crate) type LustroResult<T> = Result<T, Error>;

/// Errors that can occur during lustro usage
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred when reading a lexer definition file
    Io(io::Error),

    /// JSON parsing failed when loading a lexer definition.
    Json(serde_json::Error),

    /// A rule pattern failed to compile.
    /// This is a bug in the rule table, never something caused by the highlighted text.
    #[allow(missing_docs)]
    InvalidRegex { pattern: String, message: String },

    /// A rule pattern was declared with the `g` or `m` flag.
    /// Rules always match once, at the current position.
    MultiMatchFlags(String),

    /// A rule pattern was declared with a flag we don't know about.
    UnknownFlag(char),

    /// A rule pattern can match the empty string, which would never advance the tokenizer.
    EmptyMatch(String),

    /// A class name in a lexer definition could not be understood.
    UnknownClass(String),

    /// The combined pattern matched nothing at the given offset while tokenizing.
    /// Only happens if a rule escaped the checks done when building the lexer.
    EmptyToken { offset: usize },

    /// Any other failure happening while tokenizing or rendering.
    Tokenize(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Json(err) => write!(f, "JSON parsing error: {}", err),
            Error::InvalidRegex { pattern, message } => {
                write!(f, "invalid regex '{}': {}", pattern, message)
            }
            Error::MultiMatchFlags(pattern) => {
                write!(f, "rule '{}' uses the global or multiline flag", pattern)
            }
            Error::UnknownFlag(flag) => write!(f, "unknown regex flag '{}'", flag),
            Error::EmptyMatch(pattern) => {
                write!(f, "rule '{}' can match the empty string", pattern)
            }
            Error::UnknownClass(name) => write!(f, "unknown token class '{}'", name),
            Error::EmptyToken { offset } => {
                write!(f, "tokenizer did not advance at offset {}", offset)
            }
            Error::Tokenize(message) => write!(f, "tokenize error: {}", message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::InvalidRegex { .. }
            | Error::MultiMatchFlags(_)
            | Error::UnknownFlag(_)
            | Error::EmptyMatch(_)
            | Error::UnknownClass(_)
            | Error::EmptyToken { .. }
            | Error::Tokenize(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
