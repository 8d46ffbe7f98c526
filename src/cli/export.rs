use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tabled::Table;

use crate::{
    cli::auth::sign_in, config, error, export, info, success, types::ExportTableRow,
};

pub async fn export(output: PathBuf) {
    let client = Client::new();

    let (token, user) = match sign_in(&client).await {
        Ok(signed_in) => signed_in,
        Err(e) => error!("Authentication failed: {}", e),
    };
    info!("Signed in as {} ({})", user.label(), user.id);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{bar:40.blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let result = export::export_library(
        &client,
        &config::spotify_apiurl(),
        &token.access_token,
        &output,
        |position, total, playlist| {
            pb.set_length(total as u64);
            pb.set_position(position as u64);
            pb.set_message(format!("{} ({} tracks)", playlist.name, playlist.tracks.total));
        },
    )
    .await;
    pb.finish_and_clear();

    let exported = match result {
        Ok(exported) => exported,
        Err(e) => error!("Export failed: {}", e),
    };

    let rows: Vec<ExportTableRow> = exported
        .iter()
        .map(|e| ExportTableRow {
            name: e.entry.name.clone(),
            tracks: e.tracks,
            file: e.entry.file.clone(),
        })
        .collect();

    if !rows.is_empty() {
        println!("{}", Table::new(rows));
    }

    success!(
        "Done. {} playlists exported to {}",
        exported.len(),
        output.display()
    );
}
