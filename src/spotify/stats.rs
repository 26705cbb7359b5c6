use crate::{
    Res,
    spotify::client::ApiClient,
    types::{Album, Artist, Paging, Ranked, TimeRange, Track},
    utils,
};

pub const TOP_ITEMS_LIMIT: u32 = 10;

/// Listening statistics for one time range.
#[derive(Debug, Clone)]
pub struct Statistics {
    pub time_range: TimeRange,
    pub top_tracks: Vec<Track>,
    pub top_artists: Vec<Artist>,
    pub top_genres: Vec<Ranked<String>>,
    pub top_albums: Vec<Ranked<Album>>,
}

pub async fn top_tracks(api: &ApiClient, token: Option<&str>, range: TimeRange, limit: u32) -> Res<Vec<Track>> {
    let page: Paging<Track> = api
        .get(
            &format!("/me/top/tracks?limit={}&time_range={}", limit, range),
            token,
        )
        .await?;
    Ok(page.items)
}

pub async fn top_artists(api: &ApiClient, token: Option<&str>, range: TimeRange, limit: u32) -> Res<Vec<Artist>> {
    let page: Paging<Artist> = api
        .get(
            &format!("/me/top/artists?limit={}&time_range={}", limit, range),
            token,
        )
        .await?;
    Ok(page.items)
}

/// Fetches top tracks and top artists and derives top genres and albums.
///
/// Both listings are requested concurrently; aggregation starts once both
/// have arrived. Genres are ranked from the artists, albums from the tracks.
pub async fn fetch_statistics(api: &ApiClient, token: Option<&str>, range: TimeRange) -> Res<Statistics> {
    let (tracks, artists) = tokio::join!(
        top_tracks(api, token, range, TOP_ITEMS_LIMIT),
        top_artists(api, token, range, TOP_ITEMS_LIMIT),
    );
    let top_tracks = tracks?;
    let top_artists = artists?;

    Ok(Statistics {
        time_range: range,
        top_genres: utils::top_genres(&top_artists),
        top_albums: utils::top_albums(&top_tracks),
        top_tracks,
        top_artists,
    })
}
