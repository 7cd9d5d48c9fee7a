use reqwest::Client;

use crate::{
    config::Config,
    error::Result,
    spotify::{endpoint, read_json},
    types::{RecommendationsResponse, Track},
};

/// Requests recommendations seeded by one batch of track ids.
///
/// The batch holds at most five ids (Spotify's seed limit) and `limit` is set
/// to the batch size, so every seed contributes one recommendation at most.
/// An empty batch is not sent and yields no tracks.
pub async fn get_recommendations(
    config: &Config,
    token: &str,
    seed_track_ids: &[String],
) -> Result<Vec<Track>> {
    if seed_track_ids.is_empty() {
        return Ok(Vec::new());
    }

    let client = Client::new();
    let res = client
        .get(endpoint(config, &["recommendations"])?)
        .query(&[
            ("seed_tracks", seed_track_ids.join(",")),
            ("limit", seed_track_ids.len().to_string()),
        ])
        .bearer_auth(token)
        .send()
        .await?;

    let json = read_json::<RecommendationsResponse>(res).await?;
    Ok(json.tracks)
}
