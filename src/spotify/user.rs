use reqwest::Client;

use super::pagination::status_error;
use crate::{error::FetchError, types::UserProfile};

/// Fetches the profile of the user the token belongs to (`GET /me`).
pub async fn get_current_user(
    client: &Client,
    api_url: &str,
    token: &str,
) -> Result<UserProfile, FetchError> {
    let url = format!("{api_url}/me");
    let response = client
        .get(&url)
        .bearer_auth(token)
        .send()
        .await
        .map_err(|source| FetchError::Request {
            url: url.clone(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(status_error(response).await);
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| FetchError::Request {
            url: url.clone(),
            source,
        })?;
    serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })
}
