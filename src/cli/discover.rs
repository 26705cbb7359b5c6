use tabled::Table;

use crate::{
    info,
    spotify::discovery::{self, Mood},
};

/// Shows recommendations matching `mood`.
pub async fn discover(mood: Mood) {
    let (api, token) = super::session().await;

    let pb = super::spinner("Fetching recommendations...");
    let result = discovery::recommendations(&api, token.as_deref(), mood).await;
    pb.finish_and_clear();

    let tracks = super::or_empty(result, "recommendations");
    if tracks.is_empty() {
        info!("No recommendations found.");
        return;
    }

    println!("{}", Table::new(super::playlists::track_rows(&tracks)));
}
