use tabled::Table;

use crate::{info, spotify::library, types::RecentTableRow, utils};

/// Shows every recently played track the API returns, newest first.
pub async fn recent() {
    let (api, token) = super::session().await;

    let pb = super::spinner("Fetching recently played tracks...");
    let result = library::recently_played(&api, token.as_deref()).await;
    pb.finish_and_clear();

    let history = super::or_empty(result, "recently played tracks");
    if history.is_empty() {
        info!("No recent songs found.");
        return;
    }

    let rows: Vec<RecentTableRow> = history
        .iter()
        .map(|h| RecentTableRow {
            played: utils::format_played_at(h.played_at.as_deref()),
            name: h.track.name.clone(),
            artist: h.track.first_artist().to_string(),
            album: h
                .track
                .album
                .as_ref()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            uri: h.track.uri.clone(),
        })
        .collect();

    info!("{} recently played tracks", rows.len());
    println!("{}", Table::new(rows));
}
