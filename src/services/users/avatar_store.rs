//! 아바타 이미지 저장소
//!
//! 프로필 수정 시 업로드된 이미지를 외부 저장소에 올리고 공개 URL을 받습니다.
//! 운영 구현은 Cloudinary 서명 업로드 API를 사용합니다.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use crate::config::AvatarStorageConfig;
use crate::errors::{AppError, AppResult};

/// 업로드할 이미지 파일
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// 이미지를 저장하고 공개 URL을 반환합니다.
    ///
    /// 같은 사용자의 이전 아바타는 덮어씁니다.
    async fn upload(&self, user_id: &str, file: AvatarUpload) -> AppResult<String>;
}

#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
}

pub struct CloudinaryAvatarStore {
    client: reqwest::Client,
    config: AvatarStorageConfig,
}

impl CloudinaryAvatarStore {
    pub fn new(config: AvatarStorageConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// 서명 대상 파라미터 (키 알파벳순)
    fn signed_params(&self, user_id: &str, timestamp: i64) -> Vec<(&'static str, String)> {
        vec![
            ("folder", self.config.folder.clone()),
            ("overwrite", "true".to_string()),
            ("public_id", format!("avatar-{}", user_id)),
            ("timestamp", timestamp.to_string()),
        ]
    }

    /// `k1=v1&k2=v2...` + api_secret 의 SHA-256 hex
    fn sign(params: &[(&'static str, String)], api_secret: &str) -> String {
        let joined = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        format!("{:x}", Sha256::digest(format!("{}{}", joined, api_secret).as_bytes()))
    }
}

#[async_trait]
impl AvatarStore for CloudinaryAvatarStore {
    async fn upload(&self, user_id: &str, file: AvatarUpload) -> AppResult<String> {
        if !self.config.is_configured() {
            return Err(AppError::ExternalServiceError(
                "아바타 저장소가 설정되지 않았습니다 (CLOUDINARY_*)".to_string(),
            ));
        }

        let params = self.signed_params(user_id, Utc::now().timestamp());
        let signature = Self::sign(&params, &self.config.api_secret);

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| AppError::ValidationError(format!("Invalid file type: {}", e)))?;

        let mut form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        let response = self.client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("아바타 업로드 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "아바타 업로드 실패 ({}): {}", status, error_text
            )));
        }

        let body: CloudinaryUploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("아바타 업로드 응답 파싱 실패: {}", e)))?;

        log::info!("🖼️ 아바타 업로드 완료: user={}", user_id);
        Ok(body.secure_url)
    }
}
