//! Refresh token 문서

use chrono::Duration;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `refreshtokens` 컬렉션에 저장되는 세션 토큰
///
/// 토큰 값은 서명되지 않은 불투명 문자열입니다. 행이 존재하고
/// `expires_at`이 지나지 않았을 때만 유효합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshToken {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub token: String,
    pub user_id: ObjectId,
    pub expires_at: DateTime,
    pub created_at: DateTime,
}

impl RefreshToken {
    /// 새 토큰 생성 (256비트 무작위 값)
    pub fn issue(user_id: ObjectId, ttl: Duration) -> Self {
        let now = DateTime::now();
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());

        Self {
            id: ObjectId::new(),
            token,
            user_id,
            expires_at: DateTime::from_millis(now.timestamp_millis() + ttl.num_milliseconds()),
            created_at: now,
        }
    }

    pub fn is_expired_at(&self, now: DateTime) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(DateTime::now())
    }

    /// 쿠키 `Max-Age`에 사용할 남은 수명
    pub fn remaining(&self) -> Duration {
        let millis = self.expires_at.timestamp_millis() - DateTime::now().timestamp_millis();
        Duration::milliseconds(millis.max(0))
    }
}
