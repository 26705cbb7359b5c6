use tabled::Table;

use crate::{
    info,
    spotify::stats::{self, Statistics},
    types::{AlbumTableRow, ArtistTableRow, GenreTableRow, TimeRange},
    utils,
};

/// Prints top tracks, artists, albums and genres for `range`.
pub async fn stats(range: TimeRange) {
    let (api, token) = super::session().await;

    let pb = super::spinner("Fetching listening statistics...");
    let result = stats::fetch_statistics(&api, token.as_deref(), range).await;
    pb.finish_and_clear();

    match super::or_empty(result.map(Some), "statistics") {
        Some(statistics) => print_statistics(statistics),
        None => info!("No statistics available."),
    }
}

fn print_statistics(statistics: Statistics) {
    info!("Statistics for the {}", statistics.time_range.label());

    info!("Top tracks");
    if statistics.top_tracks.is_empty() {
        info!("No top tracks yet.");
    } else {
        println!("{}", Table::new(super::playlists::track_rows(&statistics.top_tracks)));
    }

    info!("Top artists");
    if statistics.top_artists.is_empty() {
        info!("No top artists yet.");
    } else {
        let rows: Vec<ArtistTableRow> = statistics
            .top_artists
            .iter()
            .enumerate()
            .map(|(i, a)| ArtistTableRow {
                position: i + 1,
                name: a.name.clone(),
                genres: utils::join_genres(&a.genres, 3),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    info!("Top albums");
    if !statistics.top_albums.is_empty() {
        let rows: Vec<AlbumTableRow> = statistics
            .top_albums
            .iter()
            .map(|r| AlbumTableRow {
                name: r.item.name.clone(),
                artist: r
                    .item
                    .artists
                    .first()
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
                tracks: r.count,
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    info!("Top genres");
    if !statistics.top_genres.is_empty() {
        let rows: Vec<GenreTableRow> = statistics
            .top_genres
            .iter()
            .map(|r| GenreTableRow {
                genre: r.item.clone(),
                artists: r.count,
            })
            .collect();
        println!("{}", Table::new(rows));
    }
}
