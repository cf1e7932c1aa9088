pub type ScrublineResult<T> = Result<T, ScrublineError>;

#[derive(thiserror::Error, Debug)]
pub enum ScrublineError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid mode: {0}")]
    Mode(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrublineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn mode(msg: impl Into<String>) -> Self {
        Self::Mode(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<crate::command::CommandError> for ScrublineError {
    fn from(err: crate::command::CommandError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ScrublineError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            ScrublineError::mode("x")
                .to_string()
                .contains("invalid mode:")
        );
        assert!(
            ScrublineError::evaluation("x")
                .to_string()
                .contains("evaluation error:")
        );
        assert!(
            ScrublineError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ScrublineError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn command_errors_become_validation_errors() {
        let cmd_err = crate::command::CommandError::Unknown {
            index: 2,
            name: "warp".to_string(),
        };
        let err: ScrublineError = cmd_err.into();
        assert!(matches!(err, ScrublineError::Validation(_)));
        assert!(err.to_string().contains("warp"));
    }
}
