use crate::{error, spotify::library, success, warning};

pub async fn add(playlist_id: String, track_uri: String) {
    let (api, token) = super::session().await;

    match library::add_track(&api, token.as_deref(), &playlist_id, &track_uri).await {
        Ok(_) => success!("Track added to playlist!"),
        Err(e) if e.requires_login() => error!("{}", e),
        Err(e) => warning!("Could not add track to playlist. Err: {}", e),
    }
}
