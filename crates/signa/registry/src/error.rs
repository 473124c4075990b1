use signa_types::SymbolError;
use thiserror::Error;

/// Configuration errors detected while loading a pattern registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("pattern registry is empty")]
    Empty,

    #[error("duplicate pattern name: {0}")]
    DuplicateName(String),

    #[error("pattern '{0}' has no symbols")]
    EmptyPattern(String),

    #[error("pattern '{name}' is invalid: {source}")]
    UnknownSymbol {
        name: String,
        #[source]
        source: SymbolError,
    },

    #[error("registry parse error: {0}")]
    Parse(String),

    #[error("registry IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for RegistryError {
    fn from(e: toml::de::Error) -> Self {
        RegistryError::Parse(e.to_string())
    }
}

/// Convenience type alias for registry results.
pub type RegistryResult<T> = Result<T, RegistryError>;
