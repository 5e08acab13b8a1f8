//! 사용자 역할

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// 라우트 접근을 제어하는 권한 등급
///
/// 직렬화 형식은 소문자 문자열(`"user"`, `"superadmin"` 등)이며,
/// 게이트웨이 허용 목록에서 쓰이던 `"super_admin"` 표기도 같은 역할로 읽습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    #[serde(alias = "super_admin")]
    SuperAdmin,
    Support,
    Moderator,
    Manager,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::User,
        Role::Admin,
        Role::SuperAdmin,
        Role::Support,
        Role::Moderator,
        Role::Manager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
            Role::Support => "support",
            Role::Moderator => "moderator",
            Role::Manager => "manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "superadmin" | "super_admin" => Ok(Role::SuperAdmin),
            "support" => Ok(Role::Support),
            "moderator" => Ok(Role::Moderator),
            "manager" => Ok(Role::Manager),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}
