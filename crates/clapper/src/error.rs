use thiserror::Error;

/// Failure classes produced by [`Registry::parse`](crate::Registry::parse).
///
/// Each variant carries what a host needs to build its own message; the
/// `Display` text is a plain default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The selected command name is not registered.
    #[error("unknown command {name} found in the arguments")]
    UnknownCommand { name: String },

    /// A flag-shaped token did not resolve through long, short or inverted lookup.
    #[error("unknown flag {token} found in the arguments")]
    UnknownFlag { token: String },

    /// A token's dash structure is malformed (`---x`, `-xy`, `--`).
    #[error("unsupported flag {token} found in the arguments")]
    UnsupportedFlag { token: String },

    /// A flag or argument value is outside its declared valid-value set.
    #[error("unsupported value {name}={value} found in the arguments")]
    UnsupportedValue { name: String, value: String },
}

impl Error {
    pub(crate) fn unknown_command(name: impl Into<String>) -> Self {
        Self::UnknownCommand { name: name.into() }
    }

    pub(crate) fn unknown_flag(token: impl Into<String>) -> Self {
        Self::UnknownFlag {
            token: token.into(),
        }
    }

    pub(crate) fn unsupported_flag(token: impl Into<String>) -> Self {
        Self::UnsupportedFlag {
            token: token.into(),
        }
    }

    pub(crate) fn unsupported_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnsupportedValue {
            name: name.into(),
            value: value.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
