// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Note image uploads.
//!
//! Images go to Cloudinary through an unsigned upload preset, filed under a
//! per-user folder and tag. Without a configured cloud name the image is
//! embedded in the note as a `data:` URL instead.

use crate::config::Config;
use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;

const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5_000_000;

const ANONYMOUS_OWNER: &str = "anonymous";

/// Image formats recognised from their leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x89, b'P', b'N', b'G', ..] => Some(Self::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [b'G', b'I', b'F', b'8', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

#[derive(Clone)]
struct Cloudinary {
    http: reqwest::Client,
    cloud_name: String,
    upload_preset: String,
}

/// Uploads note images and returns the URL to store on the note.
#[derive(Clone)]
pub struct ImageUploader {
    cloudinary: Option<Cloudinary>,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Deserialize)]
struct CloudinaryError {
    error: CloudinaryErrorDetail,
}

#[derive(Deserialize)]
struct CloudinaryErrorDetail {
    message: String,
}

impl ImageUploader {
    pub fn from_config(config: &Config) -> Self {
        let cloudinary = config
            .cloudinary_cloud_name
            .as_ref()
            .filter(|_| !config.offline)
            .map(|cloud_name| Cloudinary {
                http: reqwest::Client::new(),
                cloud_name: cloud_name.clone(),
                upload_preset: config.cloudinary_upload_preset.clone(),
            });

        if cloudinary.is_none() {
            tracing::info!("Cloudinary not configured, images will be stored inline");
        }

        Self { cloudinary }
    }

    /// Uploader that always embeds images inline.
    pub fn inline_only() -> Self {
        Self { cloudinary: None }
    }

    /// Check size and format, then upload. Returns the image URL.
    pub async fn upload(
        &self,
        owner: Option<&str>,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AppError> {
        if bytes.is_empty() {
            return Err(AppError::BadRequest("No image provided".to_string()));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::BadRequest(
                "Image must be 5MB or smaller".to_string(),
            ));
        }
        let format = ImageFormat::sniff(&bytes)
            .ok_or_else(|| AppError::BadRequest("Only image files are allowed".to_string()))?;

        match &self.cloudinary {
            Some(cloudinary) => cloudinary.upload(owner, file_name, format, bytes).await,
            None => Ok(data_url(format, &bytes)),
        }
    }
}

impl Cloudinary {
    async fn upload(
        &self,
        owner: Option<&str>,
        file_name: &str,
        format: ImageFormat,
        bytes: Vec<u8>,
    ) -> Result<String, AppError> {
        let owner = owner.filter(|o| !o.is_empty()).unwrap_or(ANONYMOUS_OWNER);
        let size = bytes.len();

        let file = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(format.mime())
            .map_err(|e| AppError::Upload(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", format!("images/{}", owner))
            .text("tags", format!("user_{}", owner));

        let url = format!(
            "{}/{}/image/upload",
            CLOUDINARY_API_BASE,
            urlencoding::encode(&self.cloud_name)
        );

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<CloudinaryError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            return Err(AppError::Upload(message));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upload(format!("JSON parse error: {}", e)))?;

        tracing::info!(owner, size, "Image uploaded");
        Ok(uploaded.secure_url)
    }
}

fn data_url(format: ImageFormat, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime(), BASE64.encode(bytes))
}
