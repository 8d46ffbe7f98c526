use reqwest::Client;

use crate::{
    error::FetchError,
    spotify::pagination::fetch_all,
    types::{Playlist, PlaylistItem},
};

/// Page size for `/me/playlists`; the API caps it at 50.
const PLAYLIST_PAGE_LIMIT: u32 = 50;
/// Page size for playlist tracks; the API caps it at 100.
const TRACK_PAGE_LIMIT: u32 = 100;

/// Every playlist the user owns or follows, in the order the API lists them.
pub async fn get_playlists(
    client: &Client,
    api_url: &str,
    token: &str,
) -> Result<Vec<Playlist>, FetchError> {
    let url = format!("{api_url}/me/playlists?limit={PLAYLIST_PAGE_LIMIT}");
    fetch_all(client, &url, token).await
}

/// Every item of one playlist, relinked to the user's market.
pub async fn get_playlist_items(
    client: &Client,
    api_url: &str,
    playlist_id: &str,
    token: &str,
) -> Result<Vec<PlaylistItem>, FetchError> {
    let url = format!(
        "{api_url}/playlists/{playlist_id}/tracks?limit={TRACK_PAGE_LIMIT}&market=from_token"
    );
    fetch_all(client, &url, token).await
}
