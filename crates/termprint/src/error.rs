//! Error type shared by every renderer operation.

use std::fmt;
use std::io;

/// Result alias used throughout termprint.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while resolving styles or writing output.
#[derive(Debug)]
pub enum RenderError {
    /// Writing to the output sink failed.
    Io(io::Error),
    /// A scheme name matched none of the built-in schemes (strict policy only).
    UnknownScheme(String),
    /// A style token could not be interpreted.
    InvalidStyle {
        /// The full token as given.
        token: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Inline markup was malformed.
    Markup {
        /// The markup text.
        markup: String,
        /// What was wrong with it.
        reason: String,
    },
    /// A table row did not have one cell per column.
    RowWidth {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of columns in the table.
        expected: usize,
        /// Number of cells in the row.
        found: usize,
    },
    /// Configuration could not be loaded or parsed.
    Config(String),
    /// Input data had the wrong shape for the requested view.
    Input(String),
}

impl RenderError {
    /// Shorthand for an [`RenderError::InvalidStyle`].
    pub fn invalid_style(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStyle {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`RenderError::Markup`].
    pub fn markup(markup: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Markup {
            markup: markup.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Io(e) => write!(f, "output error: {e}"),
            RenderError::UnknownScheme(name) => write!(
                f,
                "unknown color scheme '{name}' (expected one of: truecolor, 256colors, basic, mono)"
            ),
            RenderError::InvalidStyle { token, reason } => {
                write!(f, "invalid style '{token}': {reason}")
            }
            RenderError::Markup { markup, reason } => {
                write!(f, "invalid markup {markup:?}: {reason}")
            }
            RenderError::RowWidth {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {row} has {found} cells but the table has {expected} columns"
            ),
            RenderError::Config(msg) => write!(f, "configuration error: {msg}"),
            RenderError::Input(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        RenderError::Io(err)
    }
}
