mod common;

use std::collections::HashMap;

use axum::{Json, Router, extract::Query, routing::get};
use serde_json::json;

use common::Hits;
use spotiview::spotify::{
    client::ApiClient,
    discovery::{self, Mood},
};

#[test]
fn test_recommendation_path_only_includes_defined_targets() {
    let seeds = vec!["a".to_string(), "b".to_string()];

    assert_eq!(
        discovery::recommendation_path(&seeds, Mood::Happy),
        "/recommendations?seed_tracks=a,b&target_valence=0.8&target_energy=0.8&target_danceability=0.8"
    );
    assert_eq!(
        discovery::recommendation_path(&seeds, Mood::Energetic),
        "/recommendations?seed_tracks=a,b&target_valence=0.7&target_energy=1&target_tempo=140"
    );
    assert_eq!(
        discovery::recommendation_path(&seeds, Mood::Sad),
        "/recommendations?seed_tracks=a,b&target_valence=0.2&target_energy=0.2&target_acousticness=0.7"
    );
}

#[test]
fn test_every_mood_targets_valence_and_energy() {
    for mood in [Mood::Happy, Mood::Sad, Mood::Energetic, Mood::Relaxed, Mood::Romantic] {
        let targets = mood.targets();
        assert!(targets.valence.is_some(), "{:?}", mood);
        assert!(targets.energy.is_some(), "{:?}", mood);
    }
}

#[tokio::test]
async fn test_recommendations_seeded_with_medium_term_top_tracks() {
    let app = Router::new()
        .route(
            "/v1/me/top/tracks",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("time_range").map(String::as_str), Some("medium_term"));
                assert_eq!(q.get("limit").map(String::as_str), Some("5"));
                Json(json!({ "items": [
                    { "id": "s1", "name": "Seed 1" },
                    { "id": "s2", "name": "Seed 2" },
                ]}))
            }),
        )
        .route(
            "/v1/recommendations",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("seed_tracks").map(String::as_str), Some("s1,s2"));
                assert_eq!(q.get("target_acousticness").map(String::as_str), Some("0.8"));
                Json(json!({ "tracks": [{ "id": "r1", "name": "Calm" }] }))
            }),
        );
    let base = common::spawn(app).await;
    let api = ApiClient::new(format!("{}/v1", base));

    let tracks = discovery::recommendations(&api, Some("ABC"), Mood::Relaxed)
        .await
        .unwrap();

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].name, "Calm");
}

#[tokio::test]
async fn test_recommendations_without_seeds_skips_request() {
    let hits = Hits::default();
    let counter = hits.clone();
    let app = Router::new()
        .route("/v1/me/top/tracks", get(|| async { Json(json!({ "items": [] })) }))
        .route(
            "/v1/recommendations",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.hit();
                    Json(json!({ "tracks": [] }))
                }
            }),
        );
    let base = common::spawn(app).await;
    let api = ApiClient::new(format!("{}/v1", base));

    let tracks = discovery::recommendations(&api, Some("ABC"), Mood::Happy)
        .await
        .unwrap();

    assert!(tracks.is_empty());
    assert_eq!(hits.count(), 0);
}
