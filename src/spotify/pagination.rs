use std::time::Duration;

use reqwest::{
    Client, Response, StatusCode,
    header::{HeaderMap, RETRY_AFTER},
};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{error::FetchError, types::Page, warning};

/// Wait assumed when a 429 response has no usable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// `Retry-After` values above this get an extra notice. They are still honoured.
const ABNORMAL_RETRY_AFTER_SECS: u64 = 120;

/// Reads the `Retry-After` header as whole seconds.
///
/// Falls back to [`DEFAULT_RETRY_AFTER_SECS`] when the header is absent or is
/// not a plain integer (HTTP dates are not supported).
pub fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Drains a cursor-paginated collection, starting at `start_url`.
///
/// Each page is requested with the bearer token. Its `items` are appended in
/// arrival order and its `next` URL becomes the following request, until a
/// page has no `next`.
///
/// # Rate Limiting
///
/// A 429 response sleeps for `Retry-After + 1` seconds and re-requests the
/// same URL. There is no retry ceiling: the loop keeps waiting for as long as
/// the server keeps throttling.
///
/// # Errors
///
/// Any other non-success status fails immediately with
/// [`FetchError::Status`] holding the status and body. Items gathered before
/// a failure are discarded.
pub async fn fetch_all<T>(client: &Client, start_url: &str, token: &str) -> Result<Vec<T>, FetchError>
where
    T: DeserializeOwned,
{
    let mut items: Vec<T> = Vec::new();
    let mut cursor = Some(start_url.to_string());

    while let Some(url) = cursor {
        let response = client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_secs(response.headers());
            if retry_after > ABNORMAL_RETRY_AFTER_SECS {
                warning!(
                    "Retry-After has reached an abnormal high of {} seconds, waiting anyway.",
                    retry_after
                );
            } else {
                warning!("Rate limited, retrying in {} seconds", retry_after + 1);
            }

            sleep(Duration::from_secs(retry_after + 1)).await;
            cursor = Some(url);
            continue;
        }

        if !status.is_success() {
            return Err(status_error(response).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;
        let page: Page<T> =
            serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })?;

        items.extend(page.items);
        cursor = page.next;
    }

    Ok(items)
}

/// Builds a [`FetchError::Status`] from a non-success response. A body that
/// cannot be read is reported in place of the body text.
pub(crate) async fn status_error(response: Response) -> FetchError {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => format!("<failed to read response body: {e}>"),
    };
    FetchError::Status { status, body }
}
