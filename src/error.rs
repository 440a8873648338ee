use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `EntityError` and maps other errors to
/// convert to an `EntityError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum EntityError {
    /// An argument had the wrong shape, e.g. a non-object handed to `set_attributes`.
    InvalidArgument(String),
    /// The named value type cannot produce a duplicate of itself for snapshotting.
    NotDuplicable(&'static str),
    IoError(io::Error),
    JsonError(serde_json::Error),
    EntityError(String),
}

impl From<io::Error> for EntityError {
    fn from(error: io::Error) -> Self {
        EntityError::IoError(error)
    }
}

impl From<serde_json::Error> for EntityError {
    fn from(error: serde_json::Error) -> Self {
        EntityError::JsonError(error)
    }
}

impl From<String> for EntityError {
    fn from(error: String) -> Self {
        EntityError::EntityError(error)
    }
}

impl From<&str> for EntityError {
    fn from(error: &str) -> Self {
        EntityError::EntityError(error.to_string())
    }
}

impl std::error::Error for EntityError {}

impl Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {self:?}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_from_strings() {
        let error: EntityError = "bad".into();
        assert!(matches!(error, EntityError::EntityError(ref msg) if msg == "bad"));

        let error: EntityError = String::from("worse").into();
        assert!(matches!(error, EntityError::EntityError(ref msg) if msg == "worse"));
    }

    #[test]
    fn converts_from_json_errors() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: EntityError = json_error.into();
        assert!(matches!(error, EntityError::JsonError(_)));
    }

    #[test]
    fn display_includes_variant() {
        let error = EntityError::InvalidArgument("expected an object".to_string());
        assert_eq!(
            error.to_string(),
            "Error: InvalidArgument(\"expected an object\")"
        );
    }
}
