//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod sms;
mod validation;
mod value;

pub use request::Destinations;
pub use sms::Sms;
pub use validation::ValidationError;
pub use value::{
    Destination, ErrorCode, KnownErrorCode, MessageId, Password, ReplyAddress, SenderId, UserField,
    Username,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rejects_empty() {
        assert!(matches!(
            Username::new("   "),
            Err(ValidationError::Empty {
                field: Username::FIELD
            })
        ));
    }

    #[test]
    fn password_rejects_empty() {
        assert!(matches!(
            Password::new(""),
            Err(ValidationError::Empty {
                field: Password::FIELD
            })
        ));
    }

    #[test]
    fn username_trims_whitespace_but_password_does_not() {
        let username = Username::new(" alice ").unwrap();
        assert_eq!(username.as_str(), "alice");

        let password = Password::new(" hunter2 ").unwrap();
        assert_eq!(password.as_str(), " hunter2 ");
    }

    #[test]
    fn destinations_normalize_applies_destination_rules() {
        let destinations = Destinations::from(vec!["+1 (555) 123-4567", "5552222"]);
        let normalized = destinations.normalize().unwrap();
        assert_eq!(normalized[0].as_str(), "+15551234567");
        assert_eq!(normalized[1].as_str(), "5552222");
    }

    #[test]
    fn sms_segments_cross_the_concat_boundary() {
        let sms = Sms::new("a".repeat(161));
        assert_eq!(sms.segment_count(), 2);
    }

    #[test]
    fn error_code_known_mapping() {
        let code = ErrorCode::new(1);
        assert_eq!(code.known(), Some(KnownErrorCode::AuthFailure));

        let unknown = ErrorCode::new(999_999);
        assert_eq!(unknown.known(), None);
    }

    #[test]
    fn error_code_helpers_cover_known_kinds() {
        let auth = ErrorCode::new(1);
        assert!(auth.is_auth_failure());
        assert!(!auth.is_insufficient_credit());

        let credit = ErrorCode::new(4);
        assert!(credit.is_insufficient_credit());
        assert!(!credit.is_auth_failure());
    }

    #[test]
    fn message_id_orders_numerically() {
        assert!(MessageId::new(2) > MessageId::new(1));
        assert_eq!(MessageId::new(7).to_string(), "7");
    }
}
