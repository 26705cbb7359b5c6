use std::{collections::HashMap, hash::Hash};

use chrono::{DateTime, Local};

use crate::types::{Album, Artist, Ranked, Track};

pub const TOP_GENRES_LIMIT: usize = 5;
pub const TOP_ALBUMS_LIMIT: usize = 10;

/// Groups `items` by `key`, counts each group and ranks the groups.
///
/// Each group carries the first item seen for its key. Groups are ordered by
/// count descending; groups with equal counts keep the order in which their
/// key was first encountered. At most `limit` groups are returned.
pub fn rank_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key: F, limit: usize) -> Vec<Ranked<T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut ranked: Vec<Ranked<T>> = Vec::new();

    for item in items {
        let k = key(&item);
        match positions.get(&k) {
            Some(&pos) => ranked[pos].count += 1,
            None => {
                positions.insert(k, ranked.len());
                ranked.push(Ranked { item, count: 1 });
            }
        }
    }

    // sort_by is stable, ties stay in encounter order
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

/// Counts genres over all artists and returns the five most frequent.
///
/// Genres are not deduplicated per artist.
pub fn top_genres(artists: &[Artist]) -> Vec<Ranked<String>> {
    rank_by_key(
        artists.iter().flat_map(|a| a.genres.iter().cloned()),
        |genre| genre.clone(),
        TOP_GENRES_LIMIT,
    )
}

/// Groups tracks by parent album and returns the ten albums with most tracks.
///
/// Tracks without album information, and albums of local files (no id), are skipped.
pub fn top_albums(tracks: &[Track]) -> Vec<Ranked<Album>> {
    rank_by_key(
        tracks
            .iter()
            .filter_map(|t| t.album.clone())
            .filter(|album| !album.id.is_empty()),
        |album| album.id.clone(),
        TOP_ALBUMS_LIMIT,
    )
}

/// Renders an RFC 3339 `played_at` timestamp in local time.
///
/// Unparseable values are returned unchanged, missing ones as an empty string.
pub fn format_played_at(played_at: Option<&str>) -> String {
    match played_at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None => String::new(),
    }
}

/// Joins at most `take` genres with a comma.
pub fn join_genres(genres: &[String], take: usize) -> String {
    genres.iter().take(take).cloned().collect::<Vec<_>>().join(",")
}
