//! Error types for `tripbandit`.

use thiserror::Error;

/// Errors raised by bandit construction, updates, and replay.
///
/// Every error is raised at the offending call and leaves the bandit state
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An update or query named an arm that is not in the roster.
    #[error("arm {0:?} not found")]
    ArmNotFound(String),

    /// A continuous observation was neither numeric nor an `hh:mm:ss` duration.
    #[error("invalid observation {0:?}: expected a finite number or an hh:mm:ss duration")]
    InvalidObservation(String),

    /// A binary reward was not exactly 0 or 1.
    #[error("invalid reward {0}: reward must be 0 or 1")]
    InvalidReward(f64),

    /// The same arm name was given twice at construction.
    #[error("duplicate arm {0:?}")]
    DuplicateArm(String),

    /// A configuration value is out of its domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        assert_eq!(
            Error::ArmNotFound("B".into()).to_string(),
            "arm \"B\" not found"
        );
        assert!(Error::InvalidReward(2.0).to_string().contains("must be 0 or 1"));
        assert!(Error::InvalidObservation("invalid_time".into())
            .to_string()
            .contains("invalid_time"));
    }
}
