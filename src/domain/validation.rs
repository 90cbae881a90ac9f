use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidSender { input: String },
    InvalidDestination { input: String },
    InvalidReplyAddress { input: String },
    TooLong { field: &'static str, max: usize, actual: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidSender { input } => write!(f, "invalid sender: {input}"),
            Self::InvalidDestination { input } => write!(f, "invalid destination: {input}"),
            Self::InvalidReplyAddress { input } => {
                write!(f, "invalid reply address: {input}")
            }
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} too long: {actual} (max {max})")
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
        let err = ValidationError::Empty { field: "UserName" };
        assert_eq!(err.to_string(), "UserName must not be empty");

        let err = ValidationError::InvalidSender {
            input: "bad sender!".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid sender: bad sender!");

        let err = ValidationError::InvalidDestination {
            input: "abc".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid destination: abc");

        let err = ValidationError::InvalidReplyAddress {
            input: "not-an-email".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid reply address: not-an-email");

        let err = ValidationError::TooLong {
            field: "UserField",
            max: 50,
            actual: 51,
        };
        assert_eq!(err.to_string(), "UserField too long: 51 (max 50)");
    }
}
