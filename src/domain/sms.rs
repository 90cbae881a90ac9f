use std::fmt;

use chrono::NaiveDateTime;

use crate::domain::value::{ReplyAddress, UserField};

#[derive(Debug, Clone, PartialEq, Eq)]
/// An SMS message: text plus optional delivery metadata.
///
/// Only the text is required. The sender is stored as given and validated at
/// send time against the gateway's sender rules; the reply address and user
/// field can only hold validated values ([`ReplyAddress`], [`UserField`]).
/// A `None` schedule means "send now", resolved when the message is
/// submitted.
pub struct Sms {
    text: String,
    sender: Option<String>,
    scheduled_at: Option<NaiveDateTime>,
    reply_address: Option<ReplyAddress>,
    user_field: Option<UserField>,
}

impl Sms {
    /// Maximum byte length that fits a single segment.
    pub const SINGLE_SEGMENT_LEN: usize = 160;

    /// Byte capacity of each segment once a message is concatenated.
    pub const CONCAT_SEGMENT_LEN: usize = 153;

    /// Create a message carrying only text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: None,
            scheduled_at: None,
            reply_address: None,
            user_field: None,
        }
    }

    /// Set the display sender. An empty value clears it.
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = normalize_sender(sender.into());
        self
    }

    /// Schedule delivery for a specific local date/time.
    pub fn with_scheduled_at(mut self, at: NaiveDateTime) -> Self {
        self.scheduled_at = Some(at);
        self
    }

    /// Set the reply address.
    pub fn with_reply_address(mut self, address: ReplyAddress) -> Self {
        self.reply_address = Some(address);
        self
    }

    /// Set the user field echoed back in delivery reports.
    pub fn with_user_field(mut self, field: UserField) -> Self {
        self.user_field = Some(field);
        self
    }

    /// The message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The display sender, if set.
    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    /// The scheduled delivery time, if set.
    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        self.scheduled_at
    }

    /// The reply address, if set.
    pub fn reply_address(&self) -> Option<&ReplyAddress> {
        self.reply_address.as_ref()
    }

    /// The user field, if set.
    pub fn user_field(&self) -> Option<&UserField> {
        self.user_field.as_ref()
    }

    /// Replace the message text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Replace the display sender. An empty value clears it.
    pub fn set_sender(&mut self, sender: impl Into<String>) {
        self.sender = normalize_sender(sender.into());
    }

    /// Replace or clear the scheduled delivery time.
    pub fn set_scheduled_at(&mut self, at: Option<NaiveDateTime>) {
        self.scheduled_at = at;
    }

    /// Replace or clear the reply address.
    pub fn set_reply_address(&mut self, address: Option<ReplyAddress>) {
        self.reply_address = address;
    }

    /// Replace or clear the user field.
    pub fn set_user_field(&mut self, field: Option<UserField>) {
        self.user_field = field;
    }

    /// Returns `true` when no optional delivery field is set.
    ///
    /// Text-only messages are submitted through the simple send operation.
    pub fn is_text_only(&self) -> bool {
        self.sender.is_none()
            && self.scheduled_at.is_none()
            && self.reply_address.is_none()
            && self.user_field.is_none()
    }

    /// Number of segments the gateway will bill for this text.
    ///
    /// One segment up to 160 bytes; longer texts are split into 153-byte
    /// segments, rounded up. Counts use the byte length of the text.
    pub fn segment_count(&self) -> u32 {
        let len = self.text.len();
        if len <= Self::SINGLE_SEGMENT_LEN {
            1
        } else {
            len.div_ceil(Self::CONCAT_SEGMENT_LEN) as u32
        }
    }
}

impl fmt::Display for Sms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn normalize_sender(sender: String) -> Option<String> {
    if sender.is_empty() { None } else { Some(sender) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_count_is_one_up_to_160_bytes() {
        assert_eq!(Sms::new("").segment_count(), 1);
        assert_eq!(Sms::new("hello").segment_count(), 1);
        assert_eq!(Sms::new("x".repeat(160)).segment_count(), 1);
    }

    #[test]
    fn segment_count_splits_long_texts_into_153_byte_segments() {
        assert_eq!(Sms::new("x".repeat(161)).segment_count(), 2);
        assert_eq!(Sms::new("x".repeat(306)).segment_count(), 2);
        assert_eq!(Sms::new("x".repeat(307)).segment_count(), 3);
        assert_eq!(Sms::new("x".repeat(320)).segment_count(), 3);
        assert_eq!(Sms::new("x".repeat(459)).segment_count(), 3);
        assert_eq!(Sms::new("x".repeat(460)).segment_count(), 4);
    }

    #[test]
    fn segment_count_uses_byte_length_not_chars() {
        // "é" is two bytes in UTF-8: 80 of them fit one segment, 81 do not.
        assert_eq!(Sms::new("é".repeat(80)).segment_count(), 1);
        assert_eq!(Sms::new("é".repeat(81)).segment_count(), 2);
    }

    #[test]
    fn builder_style_constructors_set_fields() {
        let at = chrono::NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let sms = Sms::new("Appointment tomorrow")
            .with_sender("clinic")
            .with_scheduled_at(at)
            .with_reply_address(ReplyAddress::new("replies@example.com").unwrap())
            .with_user_field(UserField::new("order-1191").unwrap());

        assert_eq!(sms.text(), "Appointment tomorrow");
        assert_eq!(sms.sender(), Some("clinic"));
        assert_eq!(sms.scheduled_at(), Some(at));
        assert_eq!(sms.reply_address().map(ReplyAddress::as_str), Some("replies@example.com"));
        assert_eq!(sms.user_field().map(UserField::as_str), Some("order-1191"));
        assert!(!sms.is_text_only());
    }

    #[test]
    fn empty_sender_counts_as_unset() {
        let sms = Sms::new("hi").with_sender("");
        assert_eq!(sms.sender(), None);
        assert!(sms.is_text_only());

        let mut sms = Sms::new("hi").with_sender("shop");
        sms.set_sender("");
        assert_eq!(sms.sender(), None);
    }

    #[test]
    fn mutators_replace_and_clear_fields() {
        let mut sms = Sms::new("short")
            .with_reply_address(ReplyAddress::new("replies@example.com").unwrap());

        sms.set_text("x".repeat(161));
        assert_eq!(sms.segment_count(), 2);

        sms.set_reply_address(None);
        assert_eq!(sms.reply_address(), None);
        assert!(sms.is_text_only());
    }

    #[test]
    fn display_renders_the_text() {
        assert_eq!(Sms::new("hello there").to_string(), "hello there");
    }
}
