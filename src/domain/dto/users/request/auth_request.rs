//! 인증 요청관련 DTO
//!
//! 모든 필드는 `Option`으로 받아, 누락된 필드를 역직렬화 에러가 아닌
//! 명확한 400 메시지로 돌려줄 수 있게 합니다.
use serde::Deserialize;
use validator::{Validate, ValidationError};
use super::validators::{validate_email_format, validate_name, validate_password_policy};

/// 회원가입 요청 구조체
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_passwords_match"))]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_email_format"))]
    pub email: Option<String>,

    #[validate(custom(function = "validate_password_policy"))]
    pub password: Option<String>,

    pub confirm_password: Option<String>,
}

/// 비밀번호 일치 여부를 검증
fn validate_passwords_match(req: &RegisterRequest) -> Result<(), ValidationError> {
    if req.password != req.confirm_password {
        return Err(ValidationError::new("passwords_mismatch")
            .with_message("Password and confirm password do not match".into()));
    }
    Ok(())
}

impl RegisterRequest {
    /// 이름 앞뒤 공백을 제거하고 이메일을 소문자로 정규화합니다.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self.email = self.email.map(|e| normalize_email(&e));
        self
    }
}

/// 로컬 로그인 요청 구조체
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_email_format"))]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// 비밀번호 변경 요청 구조체
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_new_password: Option<String>,
}

/// 비밀번호 재설정 메일 요청
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// 재설정 토큰으로 새 비밀번호 설정
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub new_password: Option<String>,
    pub confirm_new_password: Option<String>,
}

/// `GET /auth/verify-email?token=...`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: Option<String>,
}

/// 저장 형식에 맞게 이메일을 정규화합니다.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dto::users::request::validators::first_message;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            confirm_password: Some(password.to_string()),
        }
    }

    #[test]
    fn test_register_deserializes_camel_case() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"name":"Alice","email":"a@b.co","password":"x","confirmPassword":"y"}"#,
        ).unwrap();

        assert_eq!(req.confirm_password.as_deref(), Some("y"));
    }

    #[test]
    fn test_register_normalization() {
        let req = register("  Alice  ", " Alice@Example.COM ", "Secret123!").normalized();

        assert_eq!(req.name.as_deref(), Some("Alice"));
        assert_eq!(req.email.as_deref(), Some("alice@example.com"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_validation_messages() {
        let err = register("A", "alice@example.com", "Secret123!").validate().unwrap_err();
        assert_eq!(first_message(&err), "Name must be at least 2 characters long");

        let err = register("Alice", "not-an-email", "Secret123!").validate().unwrap_err();
        assert_eq!(first_message(&err), "Invalid email format.");

        let err = register("Alice", "alice@example.com", "short").validate().unwrap_err();
        assert_eq!(first_message(&err), "Password must be at least 8 characters long.");

        let err = register("Alice", "alice@example.com", "alllowercase1!").validate().unwrap_err();
        assert!(first_message(&err).starts_with("Password must contain"));
    }

    #[test]
    fn test_register_password_mismatch() {
        let mut req = register("Alice", "alice@example.com", "Secret123!");
        req.confirm_password = Some("Secret123?".into());

        let err = req.validate().unwrap_err();
        assert_eq!(first_message(&err), "Password and confirm password do not match");
    }

    #[test]
    fn test_change_password_field_names() {
        let req: ChangePasswordRequest = serde_json::from_str(
            r#"{"oldPassword":"a","newPassword":"b","confirmNewPassword":"c"}"#,
        ).unwrap();

        assert_eq!(req.old_password.as_deref(), Some("a"));
        assert_eq!(req.confirm_new_password.as_deref(), Some("c"));
    }
}
