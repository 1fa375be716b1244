//! Input validation functions
//!
//! Checks applied to sign-up credentials and onboarding answers before they
//! reach storage. Each failure names the offending field so the client can
//! highlight it.

use std::collections::BTreeSet;
use std::fmt;

use crate::i18n::{Locale, Message};

/// Minimum password length accepted at sign-up
pub const MIN_PASSWORD_LEN: usize = 6;

/// Why a field was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    Required,
    InvalidEmail,
    TooLong { max: usize },
    PasswordTooShort,
    PasswordMismatch,
    NotANumber,
    OutOfRange { min: f64, max: f64 },
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}: {}", .display_label, .rule)]
pub struct ValidationError {
    pub field: String,
    pub rule: Rule,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, rule: Rule) -> Self {
        Self {
            field: field.to_string(),
            rule,
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Message in the requested locale
    pub fn localized(&self, locale: Locale) -> String {
        match (self.rule, locale) {
            (Rule::PasswordTooShort, _) => locale.text(Message::PasswordTooShort).to_string(),
            (Rule::PasswordMismatch, _) => locale.text(Message::PasswordMismatch).to_string(),
            (Rule::Required, Locale::Th) => format!("กรุณากรอก{}", thai_label(&self.field)),
            (Rule::InvalidEmail, Locale::Th) => "รูปแบบอีเมลไม่ถูกต้อง".to_string(),
            (Rule::TooLong { max }, Locale::Th) => {
                format!("{}ยาวเกิน {} ตัวอักษร", thai_label(&self.field), max)
            }
            (Rule::NotANumber, Locale::Th) => format!("{}ต้องเป็นตัวเลข", thai_label(&self.field)),
            (Rule::OutOfRange { min, max }, Locale::Th) => {
                format!("{}ต้องอยู่ระหว่าง {} ถึง {}", thai_label(&self.field), min, max)
            }
            (_, Locale::En) => self.user_message(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.rule)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => f.write_str("is required"),
            Rule::InvalidEmail => f.write_str("invalid email format"),
            Rule::TooLong { max } => write!(f, "must be at most {} characters", max),
            Rule::PasswordTooShort => {
                write!(f, "must be at least {} characters", MIN_PASSWORD_LEN)
            }
            Rule::PasswordMismatch => f.write_str("passwords do not match"),
            Rule::NotANumber => f.write_str("must be a valid number"),
            Rule::OutOfRange { min, max } => write!(f, "must be between {} and {}", min, max),
        }
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::new("email", Rule::Required));
    }
    if email.len() > 255 {
        return Err(ValidationError::new("email", Rule::TooLong { max: 255 }));
    }
    let email_regex = regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map_err(|_| ValidationError::new("email", Rule::InvalidEmail))?;
    if !email_regex.is_match(email) {
        return Err(ValidationError::new("email", Rule::InvalidEmail));
    }
    Ok(())
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new("password", Rule::PasswordTooShort));
    }
    if password.len() > 128 {
        return Err(ValidationError::new("password", Rule::TooLong { max: 128 }));
    }
    Ok(())
}

/// Sign-up checks: confirmation first, then length
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password != confirmation {
        return Err(ValidationError::new("confirm_password", Rule::PasswordMismatch));
    }
    validate_password(password)
}

// ============================================================================
// Profile Validation
// ============================================================================

fn validate_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if value.is_nan() || value.is_infinite() {
        return Err(ValidationError::new(field, Rule::NotANumber));
    }
    if value < min || value > max {
        return Err(ValidationError::new(field, Rule::OutOfRange { min, max }));
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), ValidationError> {
    validate_range("weight_kg", weight_kg, 20.0, 500.0)
}

/// Valid range: 50-300 cm
pub fn validate_height_cm(height_cm: f64) -> Result<(), ValidationError> {
    validate_range("height_cm", height_cm, 50.0, 300.0)
}

pub fn validate_age(age_years: u32) -> Result<(), ValidationError> {
    validate_range("age", age_years as f64, 1.0, 120.0)
}

/// Free-text answers (name, custom activity, custom goal)
pub fn validate_text(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, Rule::Required));
    }
    if value.chars().count() > max {
        return Err(ValidationError::new(field, Rule::TooLong { max }));
    }
    Ok(())
}

/// Trim, drop blanks and de-duplicate dietary restrictions
pub fn normalize_restrictions<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "email" => "Email",
        "password" => "Password",
        "confirm_password" => "Confirm Password",
        "name" => "Name",
        "age" => "Age",
        "gender" => "Gender",
        "weight_kg" => "Weight",
        "height_cm" => "Height",
        "activity" | "activity_level" => "Activity Level",
        "custom_activity" => "Activity Description",
        "goal" => "Goal",
        "custom_goal" => "Goal Description",
        "dietary_restrictions" => "Dietary Restrictions",
        _ => field_name,
    }
}

fn thai_label(field_name: &str) -> &str {
    match field_name {
        "email" => "อีเมล",
        "password" => "รหัสผ่าน",
        "name" => "ชื่อ",
        "age" => "อายุ",
        "gender" => "เพศ",
        "weight_kg" => "น้ำหนัก",
        "height_cm" => "ส่วนสูง",
        "activity" | "activity_level" | "custom_activity" => "กิจกรรม",
        "goal" | "custom_goal" => "เป้าหมาย",
        _ => field_name,
    }
}

/// Convert a list of technical field names to user-friendly labels
pub fn get_missing_fields_labels(fields: &[&str]) -> Vec<String> {
    fields
        .iter()
        .map(|f| get_field_display_label(f).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.co.th").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@dot").is_err());
        assert!(validate_email("spaces in@email.com").is_err());
    }

    #[test]
    fn test_generated_addresses_accepted() {
        use fake::faker::internet::en::SafeEmail;
        use fake::Fake;

        for _ in 0..50 {
            let email: String = SafeEmail().fake();
            assert!(validate_email(&email).is_ok(), "{}", email);
        }
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("รหัสผ่าน").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_mismatch_checked_before_length() {
        let err = validate_new_password("abc", "abd").unwrap_err();
        assert_eq!(err.rule, Rule::PasswordMismatch);
        assert_eq!(err.field, "confirm_password");
        assert_eq!(err.localized(Locale::Th), "รหัสผ่านไม่ตรงกัน");

        let err = validate_new_password("abc", "abc").unwrap_err();
        assert_eq!(err.rule, Rule::PasswordTooShort);
        assert_eq!(err.localized(Locale::Th), "รหัสผ่านต้องมีอย่างน้อย 6 ตัวอักษร");
    }

    #[test]
    fn test_validate_body_measurements() {
        assert!(validate_weight(70.0).is_ok());
        assert!(validate_weight(10.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
        assert!(validate_height_cm(170.0).is_ok());
        assert!(validate_height_cm(49.9).is_err());
        assert!(validate_age(30).is_ok());
        assert!(validate_age(0).is_err());
        assert!(validate_age(121).is_err());
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("name", "Somchai", 100).is_ok());
        assert_eq!(validate_text("name", "   ", 100).unwrap_err().rule, Rule::Required);
        assert!(validate_text("custom_goal", &"x".repeat(201), 200).is_err());
    }

    #[test]
    fn test_normalize_restrictions() {
        let set = normalize_restrictions(["Vegan", " vegan", "Vegan ", "", "No pork"]);
        let items: Vec<&str> = set.iter().map(String::as_str).collect();
        assert_eq!(items, vec!["No pork", "Vegan", "vegan"]);
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::new("height_cm", Rule::OutOfRange { min: 50.0, max: 300.0 });
        assert_eq!(err.display_label, "Height");
        assert_eq!(err.user_message(), "Height: must be between 50 and 300");
        assert_eq!(err.localized(Locale::Th), "ส่วนสูงต้องอยู่ระหว่าง 50 ถึง 300");
    }

    #[test]
    fn test_field_display_labels() {
        assert_eq!(get_field_display_label("custom_activity"), "Activity Description");
        assert_eq!(get_field_display_label("unknown_field"), "unknown_field");
        assert_eq!(get_missing_fields_labels(&["age", "weight_kg"]), vec!["Age", "Weight"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_weight_range(weight in 20.0f64..=500.0) {
            prop_assert!(validate_weight(weight).is_ok());
        }

        #[test]
        fn prop_invalid_height_below_min(height in 0.0f64..50.0) {
            prop_assert!(validate_height_cm(height).is_err());
        }

        #[test]
        fn prop_password_length_valid(len in 6usize..=128) {
            let password: String = (0..len).map(|_| 'a').collect();
            prop_assert!(validate_new_password(&password, &password).is_ok());
        }

        #[test]
        fn prop_restrictions_never_blank(items in proptest::collection::vec("[ a-z]{0,6}", 0..10)) {
            let set = normalize_restrictions(&items);
            prop_assert!(set.iter().all(|s| !s.is_empty() && s.trim() == s));
        }
    }
}
