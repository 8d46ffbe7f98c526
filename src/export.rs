//! Shapes fetched playlists into export files and writes them to disk.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use reqwest::Client;
use serde::Serialize;

use crate::{
    error::ExportError,
    spotify::playlists,
    types::{ExportedTrack, IndexEntry, Playlist, PlaylistExport, PlaylistItem, PlaylistSummary},
    utils,
};

pub const INDEX_FILE: &str = "index.json";

/// Outcome for one written playlist.
#[derive(Debug, Clone)]
pub struct ExportedPlaylist {
    pub entry: IndexEntry,
    pub tracks: usize,
}

impl ExportedTrack {
    /// `None` for items whose track is gone (removed or unavailable content).
    pub fn from_item(item: PlaylistItem) -> Option<Self> {
        let track = item.track?;
        Some(ExportedTrack {
            added_at: item.added_at,
            id: track.id,
            name: track.name,
            duration_ms: track.duration_ms,
            explicit: track.explicit,
            isrc: track.external_ids.and_then(|ids| ids.isrc),
            album: track.album.unwrap_or_default(),
            artists: track.artists,
            spotify_uri: track.uri,
            spotify_url: track.external_urls.and_then(|urls| urls.spotify),
        })
    }
}

pub fn shape_playlist(playlist: &Playlist, items: Vec<PlaylistItem>) -> PlaylistExport {
    PlaylistExport {
        playlist: PlaylistSummary {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            total: playlist.tracks.total,
        },
        tracks: items.into_iter().filter_map(ExportedTrack::from_item).collect(),
    }
}

/// Hands out one file name per playlist for a single run.
///
/// Names come from [`utils::sanitize_name`]. An empty result falls back to
/// the playlist id and a name already taken gets `_<id>` appended.
#[derive(Debug, Default)]
pub struct FileNamer {
    used: HashSet<String>,
}

impl FileNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_name(&mut self, playlist: &Playlist) -> String {
        let mut stem = utils::sanitize_name(&playlist.name);
        if stem.is_empty() {
            stem = utils::sanitize_name(&playlist.id);
        }
        if self.used.contains(&stem) {
            stem = format!("{}_{}", stem, utils::sanitize_name(&playlist.id));
        }

        self.used.insert(stem.clone());
        format!("{stem}.json")
    }
}

async fn write_json<S: Serialize>(path: &Path, value: &S) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(value)?;
    utils::write_file(path, json.as_bytes())
        .await
        .map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Fetches every playlist and its items and writes one file per playlist plus
/// an `index.json` into `output`.
///
/// `on_playlist` is called before each playlist's items are fetched. Any
/// failure aborts the run; files already written stay on disk.
pub async fn export_library<F>(
    client: &Client,
    api_url: &str,
    token: &str,
    output: &Path,
    mut on_playlist: F,
) -> Result<Vec<ExportedPlaylist>, ExportError>
where
    F: FnMut(usize, usize, &Playlist),
{
    let library = playlists::get_playlists(client, api_url, token).await?;

    async_fs::create_dir_all(output)
        .await
        .map_err(|source| ExportError::Io {
            path: output.to_path_buf(),
            source,
        })?;

    let mut namer = FileNamer::new();
    let mut exported = Vec::with_capacity(library.len());

    for (position, playlist) in library.iter().enumerate() {
        on_playlist(position, library.len(), playlist);

        let items = playlists::get_playlist_items(client, api_url, &playlist.id, token).await?;
        let shaped = shape_playlist(playlist, items);

        let path: PathBuf = output.join(namer.file_name(playlist));
        write_json(&path, &shaped).await?;

        exported.push(ExportedPlaylist {
            entry: IndexEntry {
                id: playlist.id.clone(),
                name: playlist.name.clone(),
                file: path.display().to_string(),
            },
            tracks: shaped.tracks.len(),
        });
    }

    let index: Vec<&IndexEntry> = exported.iter().map(|e| &e.entry).collect();
    write_json(&output.join(INDEX_FILE), &index).await?;

    Ok(exported)
}
