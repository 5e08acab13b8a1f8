//! 요청 DTO 공용 검증 함수
//!
//! `validator` 커스텀 검증 함수와, 검증 실패를 단일 에러 메시지로
//! 바꾸는 헬퍼를 제공합니다.

use validator::{ValidationError, ValidationErrors};

/// 비밀번호에 허용되는 특수문자
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// 비밀번호 정책 위반 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordIssue {
    TooShort,
    WeakComposition,
}

impl PasswordIssue {
    /// `subject`는 "Password" 또는 "New password"
    pub fn message(&self, subject: &str) -> String {
        match self {
            PasswordIssue::TooShort => format!("{} must be at least 8 characters long.", subject),
            PasswordIssue::WeakComposition => format!(
                "{} must contain at least one lowercase letter, one uppercase letter, one number, and one special character (@$!%*?&).",
                subject
            ),
        }
    }
}

/// `^[^\s@]+@[^\s@]+\.[^\s@]+$` 형식의 이메일인지 확인합니다.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }

    // 도메인 안의 어떤 '.'이든 양쪽이 비어 있지 않으면 충분
    domain
        .char_indices()
        .filter(|&(_, c)| c == '.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

/// 새 비밀번호 정책 검사
///
/// 8자 이상이며 소문자, 대문자, 숫자, `@$!%*?&` 중 하나를 각각 포함하고
/// 그 외 문자는 사용하지 않아야 합니다.
pub fn check_password_policy(password: &str) -> Result<(), PasswordIssue> {
    if password.chars().count() < 8 {
        return Err(PasswordIssue::TooShort);
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    let only_allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));

    if has_lower && has_upper && has_digit && has_special && only_allowed {
        Ok(())
    } else {
        Err(PasswordIssue::WeakComposition)
    }
}

pub fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::new("invalid_email")
            .with_message("Invalid email format.".into()));
    }
    Ok(())
}

pub fn validate_password_policy(password: &str) -> Result<(), ValidationError> {
    check_password_policy(password).map_err(|issue| {
        ValidationError::new("weak_password").with_message(issue.message("Password").into())
    })
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len < 2 {
        return Err(ValidationError::new("name_too_short")
            .with_message("Name must be at least 2 characters long".into()));
    }
    if len > 50 {
        return Err(ValidationError::new("name_too_long")
            .with_message("Name cannot exceed 50 characters".into()));
    }
    Ok(())
}

/// 검증 에러 중 첫 번째 메시지를 반환합니다.
///
/// 필드 이름 순으로 정렬하여 같은 입력에는 항상 같은 메시지를 돌려줍니다.
pub fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|err| match &err.message {
                Some(msg) => msg.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .unwrap_or_else(|| "Invalid request".to_string())
}

/// 필수 문자열 필드가 있고 공백이 아닌지 확인합니다.
pub fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}
