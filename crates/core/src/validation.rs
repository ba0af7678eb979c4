//! Field validation rules.
//!
//! Every rule the input types compose lives here, as a plain function usable
//! from `#[validate(custom(function = ...))]`.

use std::borrow::Cow;
use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;
use sea_orm::ActiveEnum;
use tasknote_common::{AppError, AppResult};
use tasknote_db::entities::{address, note_analysis, user_interaction};
use validator::ValidationError;

/// Letters, digits and `@.+-_`, 1 to 150 characters.
#[allow(clippy::expect_used)]
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]{1,150}$").expect("username pattern"));

const PHONE_MIN_DIGITS: usize = 10;
const PHONE_MAX_DIGITS: usize = 15;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Postal code (CEP): eight digits once `-` is removed.
pub fn validate_postal_code(value: &str) -> Result<(), ValidationError> {
    let digits = value.replace('-', "");
    if digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(error(
            "postal_code",
            "Postal code must have 8 digits in the format 00000-000.",
        ))
    }
}

/// Phone number: 10 to 15 digits, any other characters ignored.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) {
        Ok(())
    } else {
        Err(error("phone", "Phone must have between 10 and 15 digits."))
    }
}

/// Like [`validate_phone`], but a blank value is accepted.
pub fn validate_optional_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    validate_phone(value)
}

/// Text that is not empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "This field may not be blank."))
    } else {
        Ok(())
    }
}

pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(value) {
        Ok(())
    } else {
        Err(error(
            "username",
            "Enter a valid username: up to 150 letters, digits and @/./+/-/_ characters.",
        ))
    }
}

/// IPv4 or IPv6 address.
pub fn validate_ip_address(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| error("ip_address", "Enter a valid IPv4 or IPv6 address."))
}

/// Keywords are a JSON array of strings.
pub fn validate_keywords(value: &serde_json::Value) -> Result<(), ValidationError> {
    match value.as_array() {
        Some(items) if items.iter().all(serde_json::Value::is_string) => Ok(()),
        _ => Err(error("keywords", "Keywords must be a list of strings.")),
    }
}

pub fn validate_state(value: &str) -> Result<(), ValidationError> {
    vocabulary::<address::State>(value, "state", "Not a valid Brazilian state code.")
}

pub fn validate_sentiment(value: &str) -> Result<(), ValidationError> {
    vocabulary::<note_analysis::Sentiment>(
        value,
        "sentiment",
        "Sentiment must be positive, negative or neutral.",
    )
}

pub fn validate_interaction_type(value: &str) -> Result<(), ValidationError> {
    vocabulary::<user_interaction::InteractionType>(
        value,
        "interaction_type",
        "Interaction type must be one of view, edit, share, rate.",
    )
}

fn vocabulary<T>(
    value: &str,
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError>
where
    T: ActiveEnum<Value = String>,
{
    T::try_from_value(&value.to_string())
        .map(|_| ())
        .map_err(|_| error(code, message))
}

/// Convert an already validated vocabulary value into its enum.
pub fn parse_choice<T>(field: &str, value: &str) -> AppResult<T>
where
    T: ActiveEnum<Value = String>,
{
    T::try_from_value(&value.to_string())
        .map_err(|_| AppError::field(field, format!("\"{value}\" is not a valid choice.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_postal_code() {
        assert!(validate_postal_code("01000100").is_ok());
        assert!(validate_postal_code("01000-100").is_ok());
        assert!(validate_postal_code("0100010").is_err());
        assert!(validate_postal_code("0100a-100").is_err());
        assert!(validate_postal_code("").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("11987654321").is_ok());
        assert!(validate_phone("(11) 98765-4321").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_optional_phone_allows_blank() {
        assert!(validate_optional_phone("").is_ok());
        assert!(validate_optional_phone("   ").is_ok());
        assert!(validate_optional_phone("123").is_err());
        assert!(validate_optional_phone("1133334444").is_ok());
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Groceries").is_ok());
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a.b+c-d_e@f").is_ok());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("").is_err());
        assert!(validate_username(&"a".repeat(151)).is_err());
    }

    #[test]
    fn test_ip_address() {
        assert!(validate_ip_address("192.168.0.1").is_ok());
        assert!(validate_ip_address("::1").is_ok());
        assert!(validate_ip_address("localhost").is_err());
    }

    #[test]
    fn test_keywords() {
        assert!(validate_keywords(&json!(["a", "b"])).is_ok());
        assert!(validate_keywords(&json!([])).is_ok());
        assert!(validate_keywords(&json!([1, 2])).is_err());
        assert!(validate_keywords(&json!("a,b")).is_err());
    }

    #[test]
    fn test_vocabularies() {
        assert!(validate_state("SP").is_ok());
        assert!(validate_state("XX").is_err());
        assert!(validate_sentiment("neutral").is_ok());
        assert!(validate_sentiment("angry").is_err());
        assert!(validate_interaction_type("rate").is_ok());
        assert!(validate_interaction_type("like").is_err());
    }

    #[test]
    fn test_parse_choice() {
        let state: address::State = parse_choice("state", "RJ").unwrap();
        assert_eq!(state, address::State::Rj);

        let err = parse_choice::<address::State>("state", "XX").unwrap_err();
        assert!(matches!(err, AppError::Validation(fields) if fields.contains("state")));
    }
}
