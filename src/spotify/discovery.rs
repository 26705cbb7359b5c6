use clap::ValueEnum;

use crate::{
    Res,
    spotify::{client::ApiClient, stats},
    types::{RecommendationsResponse, TimeRange, Track},
};

pub const SEED_TRACKS_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mood {
    #[default]
    Happy,
    Sad,
    Energetic,
    Relaxed,
    Romantic,
}

/// Audio feature targets passed to the recommendation endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoodTargets {
    pub valence: Option<f32>,
    pub energy: Option<f32>,
    pub danceability: Option<f32>,
    pub tempo: Option<f32>,
    pub acousticness: Option<f32>,
}

impl Mood {
    pub fn targets(&self) -> MoodTargets {
        match self {
            Mood::Happy => MoodTargets {
                valence: Some(0.8),
                energy: Some(0.8),
                danceability: Some(0.8),
                ..Default::default()
            },
            Mood::Sad => MoodTargets {
                valence: Some(0.2),
                energy: Some(0.2),
                acousticness: Some(0.7),
                ..Default::default()
            },
            Mood::Energetic => MoodTargets {
                valence: Some(0.7),
                energy: Some(1.0),
                tempo: Some(140.0),
                ..Default::default()
            },
            Mood::Relaxed => MoodTargets {
                valence: Some(0.5),
                energy: Some(0.3),
                acousticness: Some(0.8),
                ..Default::default()
            },
            Mood::Romantic => MoodTargets {
                valence: Some(0.7),
                energy: Some(0.4),
                danceability: Some(0.6),
                acousticness: Some(0.6),
                ..Default::default()
            },
        }
    }
}

/// Builds the `/recommendations` path for the given seeds and mood.
///
/// Only the targets the mood defines are added to the query.
pub fn recommendation_path(seed_track_ids: &[String], mood: Mood) -> String {
    let targets = mood.targets();
    let mut path = format!("/recommendations?seed_tracks={}", seed_track_ids.join(","));

    let params = [
        ("target_valence", targets.valence),
        ("target_energy", targets.energy),
        ("target_danceability", targets.danceability),
        ("target_tempo", targets.tempo),
        ("target_acousticness", targets.acousticness),
    ];
    for (name, value) in params {
        if let Some(v) = value {
            path.push_str(&format!("&{}={}", name, v));
        }
    }
    path
}

/// Recommends tracks for `mood`, seeded with the user's top tracks of the
/// last six months (the API's default window).
///
/// Without any top track there is nothing to seed with and no
/// recommendation request is made.
pub async fn recommendations(api: &ApiClient, token: Option<&str>, mood: Mood) -> Res<Vec<Track>> {
    let seeds: Vec<String> = stats::top_tracks(api, token, TimeRange::MediumTerm, SEED_TRACKS_LIMIT)
        .await?
        .into_iter()
        .map(|t| t.id)
        .filter(|id| !id.is_empty())
        .collect();

    if seeds.is_empty() {
        return Ok(Vec::new());
    }

    let response: RecommendationsResponse = api.get(&recommendation_path(&seeds, mood), token).await?;
    Ok(response.tracks)
}
