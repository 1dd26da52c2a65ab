use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidScheduleTime { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidScheduleTime { input } => {
                write!(f, "invalid schedule time: {input}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "msg" };
        assert_eq!(err.to_string(), "msg must not be empty");

        let err = ValidationError::InvalidScheduleTime {
            input: "not a time".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid schedule time: not a time");
    }
}
