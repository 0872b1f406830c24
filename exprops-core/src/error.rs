use crate::types::TargetType;

/// Boxed error produced by user resolvers, converters, processors or decryptors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the resolution pipeline.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No resolver produced a value and no default or optional fallback applies.
    #[error(
        "Failed to resolve property '{name}' for proxy method ({method}). \
         Please make sure the property is resolvable by one of the configured resolvers."
    )]
    UnresolvedProperty { name: String, method: String },

    /// Every converter skipped the target type.
    #[error("Conversion to target type not supported: {target}. Value: {value}")]
    NoConverter { target: TargetType, value: String },

    /// A converter claimed the target type but failed.
    #[error("Failed to convert value to target type: {target}. Value: {value}")]
    Conversion {
        target: TargetType,
        value: String,
        #[source]
        source: BoxError,
    },

    /// A converted value does not match the Rust type it was requested as.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: TargetType, found: String },

    /// A processor failed; processing stopped at this stage.
    #[error("Processor '{stage}' failed to process value")]
    Processing {
        stage: String,
        #[source]
        source: BoxError,
    },

    /// A `${...}` placeholder could not be resolved.
    #[error("Failed to expand \"{placeholder}\" variable in \"{template}\". Variable cannot be resolved.")]
    VariableExpansion { placeholder: String, template: String },

    /// Invalid facade argument supplied at call time.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Programmer error detected while building or initializing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A resource document could not be read.
    #[error("Failed to read resource '{resource}'")]
    Resource {
        resource: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Other(#[from] BoxError),
}

impl Error {
    /// Conversion failure caused by `source`.
    pub fn conversion(
        target: &TargetType,
        value: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Error::Conversion {
            target: target.clone(),
            value: value.into(),
            source: source.into(),
        }
    }

    pub fn processing(stage: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Processing {
            stage: stage.into(),
            source: source.into(),
        }
    }

    /// Wrap any error raised by user code.
    pub fn other(source: impl Into<BoxError>) -> Self {
        Error::Other(source.into())
    }

    /// True for [`Error::NoConverter`] and [`Error::Conversion`].
    pub fn is_conversion(&self) -> bool {
        matches!(self, Error::NoConverter { .. } | Error::Conversion { .. })
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Error::UnresolvedProperty { .. })
    }
}
