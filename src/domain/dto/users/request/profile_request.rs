//! 프로필 수정 요청 DTO

use serde::Deserialize;
use validator::Validate;
use super::auth_request::normalize_email;
use super::validators::{validate_email_format, validate_name};

/// 프로필 부분 수정 요청
///
/// 비어 있거나 누락된 필드는 변경하지 않습니다.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_email_format"))]
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    pub fn normalized(self) -> Self {
        let name = self.name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let email = self.email
            .map(|e| normalize_email(&e))
            .filter(|e| !e.is_empty());

        Self { name, email }
    }
}
