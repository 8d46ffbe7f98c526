use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;

use crate::{
    browser::SystemBrowser,
    config::{self, AuthSettings},
    error,
    error::ExportError,
    info,
    server::CallbackServer,
    spotify, success,
    types::{Token, UserProfile},
};

/// Runs the PKCE handshake against the configured redirect address and
/// resolves the signed-in user.
pub(crate) async fn sign_in(client: &Client) -> Result<(Token, UserProfile), ExportError> {
    let settings = AuthSettings::from_env()?;

    let server = CallbackServer::bind(&settings.redirect_uri)
        .await
        .map_err(|source| ExportError::Bind {
            addr: settings.redirect_uri.authority().to_string(),
            source,
        })?;

    info!("Opening the Spotify authorization page in your browser...");

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!(
        "Waiting for the redirect to {}",
        settings.redirect_uri_str()
    ));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let token = spotify::auth::authorize(client, &settings, server, &SystemBrowser).await;
    pb.finish_and_clear();
    let token = token?;

    let user =
        spotify::user::get_current_user(client, &config::spotify_apiurl(), &token.access_token)
            .await?;

    Ok((token, user))
}

pub async fn auth() {
    let client = Client::new();
    match sign_in(&client).await {
        Ok((_, user)) => success!(
            "Authentication successful! Signed in as {} ({})",
            user.label(),
            user.id
        ),
        Err(e) => error!("Authentication failed: {}", e),
    }
}
