use reqwest::Method;

use crate::{
    Res, SpotiviewError,
    spotify::client::ApiClient,
    types::{
        AddTracksRequest, Paging, PlayHistory, PlaylistDetail, PlaylistSummary, SnapshotResponse,
    },
};

pub const RECENTLY_PLAYED_PATH: &str = "/me/player/recently-played?limit=50";

/// Retrieves the first page (up to 50) of the user's playlists.
pub async fn playlists(api: &ApiClient, token: Option<&str>) -> Res<Vec<PlaylistSummary>> {
    let page: Paging<PlaylistSummary> = api.get("/me/playlists?limit=50", token).await?;
    Ok(page.items)
}

/// Retrieves a playlist together with its first page of tracks.
pub async fn playlist(api: &ApiClient, token: Option<&str>, playlist_id: &str) -> Res<PlaylistDetail> {
    api.get(
        &format!("/playlists/{}", urlencoding::encode(playlist_id)),
        token,
    )
    .await
}

/// Retrieves the complete listening history the API exposes.
///
/// Follows the `next` chain of `/me/player/recently-played` page by page.
pub async fn recently_played(api: &ApiClient, token: Option<&str>) -> Res<Vec<PlayHistory>> {
    api.drain(RECENTLY_PLAYED_PATH, token).await
}

/// Appends a single track to a playlist and returns the new snapshot id.
pub async fn add_track(
    api: &ApiClient,
    token: Option<&str>,
    playlist_id: &str,
    track_uri: &str,
) -> Res<String> {
    let body = serde_json::to_value(AddTracksRequest {
        uris: vec![track_uri.to_string()],
    })
    .map_err(|e| SpotiviewError::MalformedResponse(e.to_string()))?;

    let value = api
        .call(
            &format!("/playlists/{}/tracks", urlencoding::encode(playlist_id)),
            token,
            Method::POST,
            Some(&body),
        )
        .await?;

    let snapshot: SnapshotResponse =
        serde_json::from_value(value).map_err(|e| SpotiviewError::MalformedResponse(e.to_string()))?;
    Ok(snapshot.snapshot_id)
}
