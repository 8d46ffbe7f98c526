use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, http::StatusCode, response::Html};
use tokio::sync::{Mutex, oneshot};

const CONFIRMATION_PAGE: &str =
    "<h2>Authentication successful.</h2><p>You can close this browser tab now.</p>";
const MISSING_CODE_PAGE: &str = "<h4>Login failed: the callback carried no authorization code.</h4>";

/// Hands the outcome of the first callback request to the waiting handshake.
///
/// `Some(code)` when the request carried a `code`, `None` otherwise. Only the
/// first request is delivered.
#[derive(Clone)]
pub struct CallbackSlot {
    sender: Arc<Mutex<Option<oneshot::Sender<Option<String>>>>>,
}

impl CallbackSlot {
    pub fn new(sender: oneshot::Sender<Option<String>>) -> Self {
        Self {
            sender: Arc::new(Mutex::new(Some(sender))),
        }
    }

    async fn resolve(&self, code: Option<String>) {
        if let Some(sender) = self.sender.lock().await.take() {
            let _ = sender.send(code);
        }
    }
}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(slot): Extension<CallbackSlot>,
) -> (StatusCode, Html<&'static str>) {
    let code = params.get("code").cloned();
    let has_code = code.is_some();

    slot.resolve(code).await;

    if has_code {
        (StatusCode::OK, Html(CONFIRMATION_PAGE))
    } else {
        (StatusCode::BAD_REQUEST, Html(MISSING_CODE_PAGE))
    }
}
