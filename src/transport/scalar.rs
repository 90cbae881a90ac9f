//! Parsers for the scalar result strings the gateway returns.
//!
//! Every operation result is a single text value. Failures arrive in-band as
//! `<code> - <message>` strings, successes as plain integers or flags.

/// An error reported inside an operation result string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    pub code: u32,
    pub message: String,
}

/// Parses the gateway's in-band error pattern: a digit run, whitespace, `-`,
/// whitespace, then a non-empty single-line message. Leading zeros in the
/// code are ignored. Anything else is not an error string.
pub fn parse_server_error(raw: &str) -> Option<ServerError> {
    let digits = raw.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let (code_text, rest) = raw.split_at(digits);
    let rest = strip_required_whitespace(rest)?;
    let rest = rest.strip_prefix('-')?;
    let message = strip_required_whitespace(rest)?;
    if message.is_empty() || message.contains('\n') {
        return None;
    }
    let code = parse_code(code_text)?;
    Some(ServerError {
        code,
        message: message.to_owned(),
    })
}

/// Parses a result expected to be a plain unsigned integer.
pub fn parse_server_int(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Reads a result string as a loosely cast integer: leading whitespace
/// skipped, an optional sign, then the longest digit prefix. Anything else
/// yields zero.
pub fn parse_loose_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let run = digits.bytes().take_while(|b| b.is_ascii_digit()).count();
    if run == 0 {
        return 0;
    }
    let value: i64 = match digits[..run].parse() {
        Ok(value) => value,
        Err(_) => i64::MAX,
    };
    if negative { -value } else { value }
}

fn strip_required_whitespace(s: &str) -> Option<&str> {
    let trimmed = s.trim_start_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.len() == s.len() {
        return None;
    }
    Some(trimmed)
}

fn parse_code(text: &str) -> Option<u32> {
    let trimmed = text.trim_start_matches('0');
    if trimmed.is_empty() {
        return Some(0);
    }
    trimmed.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_server_error_splits_code_and_message() {
        let err = parse_server_error("0012 - Invalid account").unwrap();
        assert_eq!(err.code, 12);
        assert_eq!(err.message, "Invalid account");
    }

    #[test]
    fn parse_server_error_keeps_a_zero_code() {
        let err = parse_server_error("000 - something odd").unwrap();
        assert_eq!(err.code, 0);
        assert_eq!(err.message, "something odd");
    }

    #[test]
    fn parse_server_error_requires_the_full_pattern() {
        assert_eq!(parse_server_error("12- no space"), None);
        assert_eq!(parse_server_error("12 -no space"), None);
        assert_eq!(parse_server_error("12 - "), None);
        assert_eq!(parse_server_error("- message"), None);
        assert_eq!(parse_server_error("abc - message"), None);
        assert_eq!(parse_server_error("17"), None);
        assert_eq!(parse_server_error("12 - foo\nbar"), None);
    }

    #[test]
    fn parse_server_int_accepts_digit_strings_only() {
        assert_eq!(parse_server_int("42"), Some(42));
        assert_eq!(parse_server_int("0"), Some(0));
        assert_eq!(parse_server_int(" 42"), None);
        assert_eq!(parse_server_int("42 credits"), None);
        assert_eq!(parse_server_int(""), None);
    }

    #[test]
    fn parse_loose_int_takes_the_leading_digit_run() {
        assert_eq!(parse_loose_int("1"), 1);
        assert_eq!(parse_loose_int("0"), 0);
        assert_eq!(parse_loose_int("true"), 0);
        assert_eq!(parse_loose_int(" 7 messages"), 7);
        assert_eq!(parse_loose_int("-2"), -2);
        assert_eq!(parse_loose_int("+3"), 3);
        assert_eq!(parse_loose_int(""), 0);
    }
}
