use std::fmt;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Gateway account username.
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    /// SOAP parameter name used by the gateway (`UserName`).
    pub const FIELD: &'static str = "UserName";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Gateway account password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    /// SOAP parameter name used by the gateway (`Password`).
    pub const FIELD: &'static str = "Password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Display sender shown on the recipient's handset (`MessageFrom`).
///
/// Invariant: either 1–11 alphanumeric characters or 1–12 digits. The value
/// is matched as-is; surrounding whitespace is not trimmed and fails
/// validation.
pub struct SenderId(String);

impl SenderId {
    /// SOAP parameter name used by the gateway (`MessageFrom`).
    pub const FIELD: &'static str = "MessageFrom";

    /// Create a validated [`SenderId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !is_valid_sender(&value) {
            return Err(ValidationError::InvalidSender { input: value });
        }
        Ok(Self(value))
    }

    /// Borrow the validated sender.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_sender(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let alphanumeric = bytes.len() <= 11 && bytes.iter().all(|b| b.is_ascii_alphanumeric());
    let digits = bytes.len() <= 12 && bytes.iter().all(|b| b.is_ascii_digit());
    alphanumeric || digits
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Normalized destination phone number (`Mobiles`).
///
/// [`Destination::new`] strips every character except ASCII digits and `+`
/// and requires at least one digit to remain. The error carries the input
/// exactly as it was given, before stripping.
pub struct Destination(String);

impl Destination {
    /// SOAP parameter name used by the gateway (`Mobiles`).
    pub const FIELD: &'static str = "Mobiles";

    /// Normalize and validate a destination number.
    pub fn new(input: impl Into<String>) -> Result<Self, ValidationError> {
        let input = input.into();
        let stripped: String = input
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        if !stripped.bytes().any(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidDestination { input });
        }
        Ok(Self(stripped))
    }

    /// Borrow the normalized number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Email address for replies (`EmailAddressToSendReplies`).
///
/// Invariant: syntactically valid email (single `@`, dotted domain). A
/// message without a reply address omits the value instead of holding an
/// empty one.
pub struct ReplyAddress(String);

impl ReplyAddress {
    /// SOAP parameter name used by the gateway (`EmailAddressToSendReplies`).
    pub const FIELD: &'static str = "EmailAddressToSendReplies";

    /// Create a validated [`ReplyAddress`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !is_valid_email(&value) {
            return Err(ValidationError::InvalidReplyAddress { input: value });
        }
        Ok(Self(value))
    }

    /// Borrow the validated address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const ATEXT_SYMBOLS: &[u8] = b"!#$%&'*+/=?^_`{|}~-";

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    valid_email_local(local) && valid_email_domain(domain)
}

fn valid_email_local(local: &str) -> bool {
    if local.is_empty() || local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    local
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || ATEXT_SYMBOLS.contains(&b))
}

fn valid_email_domain(domain: &str) -> bool {
    if !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Free-form tag echoed back in delivery reports (`UserField`).
///
/// Invariant: non-empty and at most [`UserField::MAX_LEN`] bytes. A message
/// without a user field omits the value instead of holding an empty one.
pub struct UserField(String);

impl UserField {
    /// SOAP parameter name used by the gateway (`UserField`).
    pub const FIELD: &'static str = "UserField";

    /// Maximum accepted length in bytes.
    pub const MAX_LEN: usize = 50;

    /// Create a validated [`UserField`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if value.len() > Self::MAX_LEN {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_LEN,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }

    /// Borrow the field value as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Numeric message id returned by the send operations.
pub struct MessageId(u64);

impl MessageId {
    /// Wrap a message id (no validation is performed).
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the underlying id.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Gateway error code.
///
/// This value is preserved as-is even when the code is unknown to this crate.
pub struct ErrorCode(u32);

impl ErrorCode {
    /// Construct an error code from its integer representation.
    pub fn new(code: u32) -> Self {
        Self(code)
    }

    /// Get the integer code as reported by the gateway.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Map this code to a known error variant, if one exists.
    pub fn known(self) -> Option<KnownErrorCode> {
        KnownErrorCode::from_code(self.0)
    }

    /// Canonical description for this code.
    ///
    /// Unknown codes yield `"Unknown error <code>"`.
    pub fn description(self) -> String {
        match self.known() {
            Some(kind) => kind.description().to_owned(),
            None => format!("Unknown error {}", self.0),
        }
    }

    /// Returns `true` if this code reports rejected credentials.
    pub fn is_auth_failure(self) -> bool {
        matches!(self.known(), Some(KnownErrorCode::AuthFailure))
    }

    /// Returns `true` if this code reports an exhausted credit balance.
    pub fn is_insufficient_credit(self) -> bool {
        matches!(self.known(), Some(KnownErrorCode::InsufficientCredit))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known gateway error codes supported by this crate.
///
/// Unknown codes are preserved as [`ErrorCode`] and return `None` from
/// [`KnownErrorCode::from_code`].
pub enum KnownErrorCode {
    AuthFailure,
    InvalidSender,
    InvalidMessage,
    InsufficientCredit,
    InvalidDate,
    DuplicatePhonebookName,
    EmptyPhonebook,
    NonExistentPhonebook,
    DateFromBadFormat,
    DateToBadFormat,
}

impl KnownErrorCode {
    /// Convert a raw gateway integer code into a known variant.
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            1 => Self::AuthFailure,
            2 => Self::InvalidSender,
            3 => Self::InvalidMessage,
            4 => Self::InsufficientCredit,
            5 => Self::InvalidDate,
            7 => Self::DuplicatePhonebookName,
            8 => Self::EmptyPhonebook,
            9 => Self::NonExistentPhonebook,
            10 => Self::DateFromBadFormat,
            11 => Self::DateToBadFormat,
            _ => return None,
        })
    }

    /// Canonical description used by the gateway documentation.
    pub fn description(self) -> &'static str {
        match self {
            Self::AuthFailure => "Authentication details are invalid",
            Self::InvalidSender => "Invalid sender specified",
            Self::InvalidMessage => "No message specified",
            Self::InsufficientCredit => {
                "Insufficient credit on account to send the requested number of messages"
            }
            Self::InvalidDate => "Date to send greater than 1 year in advance",
            Self::DuplicatePhonebookName => "The specified phonebook name already exists",
            Self::EmptyPhonebook => "The specified phonebook is empty",
            Self::NonExistentPhonebook => "The specified phonebook does not exist",
            Self::DateFromBadFormat => "Start date is not correctly formatted",
            Self::DateToBadFormat => "End date is not correctly formatted",
        }
    }
}
