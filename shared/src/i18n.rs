//! User-facing message catalogue
//!
//! Thai is the product default; English exists for operators and tests.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Th,
    En,
}

/// Messages surfaced to end users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    PlanGenerationFailed,
    PlanSaveFailed,
    PlanAlreadyConfirmed,
    NothingToConfirm,
    SuggestionFailed,
    ImageAnalysisFailed,
    ChatUnavailable,
    ChatEmptyReply,
    InvalidCredentials,
    EmailAlreadyRegistered,
    RateLimited,
    PasswordTooShort,
    PasswordMismatch,
    ProfileRequired,
    ProfileUnavailable,
}

impl Locale {
    pub fn text(&self, message: Message) -> &'static str {
        match self {
            Locale::Th => thai(message),
            Locale::En => english(message),
        }
    }
}

fn thai(message: Message) -> &'static str {
    match message {
        Message::PlanGenerationFailed => "ไม่สามารถสร้างแผนอาหารได้ กรุณาลองใหม่อีกครั้ง",
        Message::PlanSaveFailed => "บันทึกแผนอาหารไม่สำเร็จ กรุณาลองใหม่",
        Message::PlanAlreadyConfirmed => "แผนอาหารวันนี้ถูกยืนยันแล้ว",
        Message::NothingToConfirm => "ยังไม่มีแผนอาหารให้ยืนยัน",
        Message::SuggestionFailed => "ไม่สามารถแนะนำเมนูได้ กรุณาลองใหม่",
        Message::ImageAnalysisFailed => "ไม่สามารถวิเคราะห์รูปภาพได้ กรุณาลองใหม่",
        Message::ChatUnavailable => "ขออภัยครับ ระบบมีปัญหาชั่วคราว",
        Message::ChatEmptyReply => "ขออภัยครับ เกิดข้อผิดพลาด",
        Message::InvalidCredentials => "อีเมลหรือรหัสผ่านไม่ถูกต้อง",
        Message::EmailAlreadyRegistered => "อีเมลนี้ถูกลงทะเบียนแล้ว",
        Message::RateLimited => "ทำรายการเร็วเกินไป กรุณารอสักครู่",
        Message::PasswordTooShort => "รหัสผ่านต้องมีอย่างน้อย 6 ตัวอักษร",
        Message::PasswordMismatch => "รหัสผ่านไม่ตรงกัน",
        Message::ProfileRequired => "กรุณากรอกข้อมูลส่วนตัวให้ครบก่อน",
        Message::ProfileUnavailable => "ไม่สามารถโหลดข้อมูลผู้ใช้ได้ กรุณาลองใหม่",
    }
}

fn english(message: Message) -> &'static str {
    match message {
        Message::PlanGenerationFailed => "Could not create a meal plan. Please try again.",
        Message::PlanSaveFailed => "Could not save the meal plan. Please try again.",
        Message::PlanAlreadyConfirmed => "Today's plan is already confirmed.",
        Message::NothingToConfirm => "There is no plan to confirm yet.",
        Message::SuggestionFailed => "Could not suggest a meal. Please try again.",
        Message::ImageAnalysisFailed => "Could not analyze the image. Please try again.",
        Message::ChatUnavailable => "Sorry, the assistant is temporarily unavailable.",
        Message::ChatEmptyReply => "Sorry, something went wrong.",
        Message::InvalidCredentials => "Incorrect email or password.",
        Message::EmailAlreadyRegistered => "This email is already registered.",
        Message::RateLimited => "Too many attempts. Please wait a moment.",
        Message::PasswordTooShort => "Password must be at least 6 characters.",
        Message::PasswordMismatch => "Passwords do not match.",
        Message::ProfileRequired => "Please complete your profile first.",
        Message::ProfileUnavailable => "Could not load your profile. Please try again.",
    }
}

/// Map a raw authentication failure to a friendly message.
///
/// Returns `None` when nothing matches; callers show the raw text then.
pub fn translate_auth_error(raw: &str) -> Option<Message> {
    let lowered = raw.to_lowercase();
    if lowered.contains("invalid login credentials") {
        Some(Message::InvalidCredentials)
    } else if lowered.contains("user already registered")
        || lowered.contains("unique constraint")
        || lowered.contains("already registered")
    {
        Some(Message::EmailAlreadyRegistered)
    } else if lowered.contains("rate limit") || lowered.contains("too many requests") {
        Some(Message::RateLimited)
    } else if lowered.contains("password should be at least") {
        Some(Message::PasswordTooShort)
    } else {
        None
    }
}

/// Translate or pass the raw message through
pub fn auth_error_text(raw: &str, locale: Locale) -> String {
    translate_auth_error(raw)
        .map(|message| locale.text(message).to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Invalid login credentials", Message::InvalidCredentials)]
    #[case("User already registered", Message::EmailAlreadyRegistered)]
    #[case("duplicate key value violates unique constraint \"users_email_key\"", Message::EmailAlreadyRegistered)]
    #[case("Email rate limit exceeded", Message::RateLimited)]
    #[case("429 Too Many Requests", Message::RateLimited)]
    #[case("Password should be at least 6 characters", Message::PasswordTooShort)]
    fn test_translate_auth_error(#[case] raw: &str, #[case] expected: Message) {
        assert_eq!(translate_auth_error(raw), Some(expected));
    }

    #[test]
    fn test_unknown_auth_error_passes_through() {
        assert_eq!(translate_auth_error("network unreachable"), None);
        assert_eq!(auth_error_text("network unreachable", Locale::Th), "network unreachable");
    }

    #[test]
    fn test_thai_is_default() {
        assert_eq!(Locale::default(), Locale::Th);
        assert_eq!(
            auth_error_text("Invalid login credentials", Locale::default()),
            "อีเมลหรือรหัสผ่านไม่ถูกต้อง"
        );
    }
}
