use tabled::Table;

use crate::{
    info,
    spotify::library,
    types::{PlaylistTableRow, Track, TrackTableRow},
};

/// Lists the user's playlists, or the tracks of `playlist_id` when given.
pub async fn playlists(playlist_id: Option<String>) {
    let (api, token) = super::session().await;

    if let Some(id) = playlist_id {
        let pb = super::spinner("Fetching playlist...");
        let detail = library::playlist(&api, token.as_deref(), &id).await;
        pb.finish_and_clear();

        let Some(detail) = super::or_empty(detail.map(Some), "playlist") else {
            info!("Playlist not available.");
            return;
        };

        let tracks: Vec<Track> = detail
            .tracks
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .collect();
        if tracks.is_empty() {
            info!("This playlist is empty.");
            return;
        }

        info!("{} ({} tracks)", detail.name, tracks.len());
        println!("{}", Table::new(track_rows(&tracks)));
        return;
    }

    let pb = super::spinner("Fetching playlists...");
    let result = library::playlists(&api, token.as_deref()).await;
    pb.finish_and_clear();

    let playlists = super::or_empty(result, "playlists");
    if playlists.is_empty() {
        info!("No playlists found.");
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            id: p.id,
            name: p.name,
            tracks: p.tracks.map(|t| t.total).unwrap_or(0),
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub(super) fn track_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            position: i + 1,
            name: t.name.clone(),
            artist: t.first_artist().to_string(),
            preview: if t.preview_url.is_some() { "yes" } else { "-" }.to_string(),
        })
        .collect()
}
