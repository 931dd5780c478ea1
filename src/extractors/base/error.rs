// Extraction error taxonomy
//
// Domain errors stay local to the entity that raised them. `FatalError` is the
// only kind that unwinds past an entity boundary and aborts the unit.

use thiserror::Error;

use super::types::{Handle, Role};

/// Failure answering a semantic query.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolutionError {
    #[error("cannot resolve the type of `{0}`")]
    UnresolvedType(String),

    #[error("unknown symbol `{0}`")]
    UnknownSymbol(String),

    /// The oracle itself is gone; fatal for the unit.
    #[error("semantic oracle unavailable: {0}")]
    Unavailable(String),
}

/// Resource-level failure that ends extraction of the whole unit.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("fact sink unwritable: {0}")]
    Sink(#[from] std::io::Error),

    #[error("semantic oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("entity {0} populated more than once")]
    IdentityViolation(Handle),
}

/// Failure raised while constructing or populating one entity.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Resolution(ResolutionError),

    #[error("missing required `{0}` slot")]
    MissingSlot(Role),

    #[error("malformed syntax: {0}")]
    Malformed(String),

    #[error(transparent)]
    Fatal(#[from] FatalError),
}

impl ExtractionError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExtractionError::Fatal(_))
    }
}

impl From<ResolutionError> for ExtractionError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::Unavailable(reason) => {
                ExtractionError::Fatal(FatalError::OracleUnavailable(reason))
            }
            other => ExtractionError::Resolution(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_oracle_is_fatal() {
        let err: ExtractionError = ResolutionError::Unavailable("gone".into()).into();
        assert!(err.is_fatal());

        let err: ExtractionError = ResolutionError::UnresolvedType("Foo()".into()).into();
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "cannot resolve the type of `Foo()`");
    }
}
