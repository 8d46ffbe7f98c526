use reqwest::{Client, Url};

use crate::{
    browser::BrowserLauncher,
    config::AuthSettings,
    error::AuthError,
    server::CallbackReceiver,
    types::Token,
    utils, warning,
};

/// Builds the URL the user visits to grant access.
///
/// Only the S256 challenge is embedded; the verifier never leaves the process
/// until the token exchange.
pub fn build_authorize_url(settings: &AuthSettings, code_challenge: &str) -> Url {
    let mut url = settings.authorize_url.clone();

    url.query_pairs_mut()
        .append_pair("client_id", &settings.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", settings.redirect_uri_str())
        .append_pair("code_challenge_method", "S256")
        .append_pair("code_challenge", code_challenge)
        .append_pair("scope", &settings.scopes.join(" "));

    url
}

/// Runs one authorization-code-with-PKCE handshake.
///
/// 1. Generates a fresh PKCE pair
/// 2. Asks the launcher to open the authorization URL (failure only warns, the
///    user can open it by hand)
/// 3. Waits on `receiver` for the redirect to the configured path; there is
///    no timeout, an abandoned browser tab keeps this waiting
/// 4. Exchanges the code together with the verifier for a token
///
/// The receiver is consumed, so its listener is gone once this returns. Only
/// one handshake per redirect address can run at a time; a second concurrent
/// call fails when its receiver cannot bind.
pub async fn authorize<R, B>(
    client: &Client,
    settings: &AuthSettings,
    receiver: R,
    browser: &B,
) -> Result<Token, AuthError>
where
    R: CallbackReceiver,
    B: BrowserLauncher + ?Sized,
{
    let pkce = utils::generate_pkce_pair();
    let auth_url = build_authorize_url(settings, &pkce.challenge);

    if let Err(e) = browser.open(auth_url.as_str()) {
        warning!(
            "Failed to open browser ({}). Please navigate to the following URL manually:\n{}",
            e,
            auth_url
        );
    }

    let code = receiver
        .receive(settings.redirect_uri.path())
        .await
        .map_err(AuthError::Callback)?
        .ok_or(AuthError::MissingCode)?;

    exchange_code_pkce(client, settings, &code, &pkce.verifier).await
}

/// Exchanges an authorization code for tokens using the `authorization_code` grant.
///
/// A non-success status fails with [`AuthError::TokenExchange`] carrying the
/// status and body. The refresh token is optional in the response.
pub async fn exchange_code_pkce(
    client: &Client,
    settings: &AuthSettings,
    code: &str,
    verifier: &str,
) -> Result<Token, AuthError> {
    let res = client
        .post(&settings.token_url)
        .form(&[
            ("client_id", settings.client_id.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", settings.redirect_uri_str()),
            ("code_verifier", verifier),
        ])
        .send()
        .await?;

    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        return Err(AuthError::TokenExchange {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|source| AuthError::TokenPayload { source })
}
