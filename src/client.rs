//! HTTP client for a running profile stub.

use std::sync::LazyLock;

use thiserror::Error;

use crate::server::{LanguageSettings, ProfileRecord};

static REQWEST_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (compatible; aqualog/0.1; +https://github.com/angeloanan/aqualog)")
        .build()
        .expect("Unable to create reqwest client!")
});

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to the profile stub failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("the profile stub rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

pub async fn fetch_profile(base_url: &str) -> Result<ProfileRecord, ClientError> {
    let response = REQWEST_CLIENT
        .get(format!("{base_url}/profile"))
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(rejected(response).await);
    }
    Ok(response.json().await?)
}

pub async fn push_profile(base_url: &str, profile: &ProfileRecord) -> Result<(), ClientError> {
    let response = REQWEST_CLIENT
        .post(format!("{base_url}/profile"))
        .json(profile)
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(rejected(response).await);
    }
    Ok(())
}

pub async fn fetch_settings(base_url: &str) -> Result<LanguageSettings, ClientError> {
    let response = REQWEST_CLIENT
        .get(format!("{base_url}/settings"))
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(rejected(response).await);
    }
    Ok(response.json().await?)
}

pub async fn push_settings(
    base_url: &str,
    settings: &LanguageSettings,
) -> Result<(), ClientError> {
    let response = REQWEST_CLIENT
        .post(format!("{base_url}/settings"))
        .json(settings)
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(rejected(response).await);
    }
    Ok(())
}

async fn rejected(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    ClientError::Rejected { status, message }
}
