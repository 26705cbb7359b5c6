use tabled::Table;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    error, info,
    player::{PreviewPlayer, ProcessBackend},
    spotify::{library, stats},
    types::{TimeRange, Track},
    warning,
};

/// Interactive preview player over a playlist or the user's top tracks.
///
/// Entering a track number plays its preview (entering it again stops it),
/// `s` stops playback and `q` quits. Only one preview plays at a time.
pub async fn preview(playlist_id: Option<String>, range: TimeRange) {
    let (api, token) = super::session().await;

    let pb = super::spinner("Fetching tracks...");
    let tracks: Vec<Track> = match playlist_id {
        Some(id) => super::or_empty(
            library::playlist(&api, token.as_deref(), &id)
                .await
                .map(|p| p.tracks.items.into_iter().filter_map(|i| i.track).collect()),
            "playlist",
        ),
        None => super::or_empty(
            stats::top_tracks(&api, token.as_deref(), range, stats::TOP_ITEMS_LIMIT).await,
            "top tracks",
        ),
    };
    pb.finish_and_clear();

    let playable: Vec<Track> = tracks
        .into_iter()
        .filter(|t| t.preview_url.is_some())
        .collect();
    if playable.is_empty() {
        info!("No previews available.");
        return;
    }

    let backend = match ProcessBackend::from_env() {
        Ok(b) => b,
        Err(e) => error!("{}", e),
    };
    let mut player = PreviewPlayer::new(backend);

    println!("{}", Table::new(super::playlists::track_rows(&playable)));
    info!("Enter a track number to play or pause, s to stop, q to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match line.trim() {
            "q" => break,
            "s" => {
                if let Err(e) = player.stop() {
                    warning!("{}", e);
                }
            }
            input => {
                let Some(track) = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| playable.get(i))
                else {
                    warning!("Unknown input: {}", input);
                    continue;
                };
                let Some(url) = track.preview_url.as_deref() else {
                    continue;
                };

                match player.toggle(url) {
                    Ok(true) => info!("Playing {} - {}", track.name, track.first_artist()),
                    Ok(false) => info!("Stopped {}", track.name),
                    Err(e) => warning!("{}", e),
                }
            }
        }
    }

    if let Err(e) = player.stop() {
        warning!("{}", e);
    }
}
