use reqwest::Client;

use crate::{
    config::Config,
    error::Result,
    spotify::{endpoint, read_json},
    types::User,
};

/// Fetches the profile of the user the token belongs to.
pub async fn current_user(config: &Config, token: &str) -> Result<User> {
    let client = Client::new();
    let res = client
        .get(endpoint(config, &["me"])?)
        .bearer_auth(token)
        .send()
        .await?;

    read_json::<User>(res).await
}
