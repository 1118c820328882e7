use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::model::{AgedImageDescriptor, MissingPersonRecord};
use crate::settings::AgedImageSettings;

pub const FUNDING_MESSAGE: &str = "The aged progression service has run out of credits. \
Image generation will resume once the project secures more funding.";

const QUOTA_MARKERS: &[&str] = &[
    "quota",
    "billing",
    "rate limit",
    "rate_limit",
    "insufficient funds",
    "insufficient_quota",
    "credits",
];

#[derive(Debug, Error)]
pub enum AgedImageError {
    #[error("aged image service endpoint is not configured")]
    NotConfigured,
    #[error("aged image quota exhausted: {0}")]
    QuotaExhausted(String),
    #[error("Failed to generate image ({status}): {message}")]
    Service { status: StatusCode, message: String },
    #[error("aged image request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected aged image response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AgedImageError {
    /// What to tell the person looking at the profile.
    pub fn user_message(&self) -> String {
        match self {
            AgedImageError::QuotaExhausted(_) => FUNDING_MESSAGE.to_string(),
            other => format!("Could not generate the aged progression image: {other}"),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AgedImageRequest<'a> {
    person_data: &'a MissingPersonRecord,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Ask the aged-image service for an age-progressed photo of `record`.
pub async fn generate(
    client: &Client,
    settings: &AgedImageSettings,
    record: &MissingPersonRecord,
) -> Result<AgedImageDescriptor, AgedImageError> {
    let endpoint = settings
        .endpoint
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .ok_or(AgedImageError::NotConfigured)?;

    info!("Requesting aged image for {} from {}", record.full_name(), endpoint);
    let mut request = client
        .post(endpoint)
        .json(&AgedImageRequest { person_data: record });
    if let Some(key) = settings.api_key.as_deref() {
        request = request.bearer_auth(key);
    }

    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        let descriptor: AgedImageDescriptor = serde_json::from_str(&body)?;
        info!("Aged image ready: {}", descriptor.image_url);
        return Ok(descriptor);
    }

    let err = classify_failure(status, &body);
    warn!("Aged image request failed: {}", err);
    Err(err)
}

/// Quota exhaustion is told apart from every other failure.
pub fn classify_failure(status: StatusCode, body: &str) -> AgedImageError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .unwrap_or_default()
        .error
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Failed to generate image")
                .to_string()
        });

    let lower = message.to_lowercase();
    let quota = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::PAYMENT_REQUIRED
    ) || QUOTA_MARKERS.iter().any(|m| lower.contains(m));

    if quota {
        AgedImageError::QuotaExhausted(message)
    } else {
        AgedImageError::Service { status, message }
    }
}
