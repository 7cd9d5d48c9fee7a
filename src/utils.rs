use rand::{Rng, distr::Alphanumeric};

use crate::error::{Error, Result};

/// Most seed tracks the recommendations endpoint accepts per request.
pub const MAX_SEED_TRACKS: usize = 5;

/// Largest `limit` the top-tracks endpoint accepts.
pub const MAX_SONGS: u32 = 50;

pub const PLAYLIST_URL_BASE: &str = "https://open.spotify.com/playlist";

/// Random alphanumeric string of `len` characters.
pub fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_session_id() -> String {
    random_token(48)
}

/// Value for the OAuth `state` parameter.
pub fn generate_oauth_state() -> String {
    random_token(32)
}

/// Splits seed track ids into consecutive batches of at most [`MAX_SEED_TRACKS`].
///
/// Batches keep the original order, never overlap and together cover every
/// id, so `n` ids produce `ceil(n / 5)` batches. An empty slice yields no
/// batches at all.
///
/// # Example
///
/// ```
/// let ids: Vec<String> = (0..12).map(|i| i.to_string()).collect();
/// let sizes: Vec<usize> = seed_batches(&ids).iter().map(|b| b.len()).collect();
/// assert_eq!(sizes, vec![5, 5, 2]);
/// ```
pub fn seed_batches(seed_track_ids: &[String]) -> Vec<&[String]> {
    seed_track_ids.chunks(MAX_SEED_TRACKS).collect()
}

/// Browsable link for a created playlist.
pub fn playlist_url(playlist_id: &str) -> String {
    format!("{}/{}", PLAYLIST_URL_BASE, playlist_id)
}

/// Coerces the submitted song count and checks it against the provider limit.
pub fn parse_num_songs(raw: &str) -> Result<u32> {
    let num_songs = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::Validation(format!("'{}' is not a whole number", raw.trim())))?;

    if !(1..=MAX_SONGS).contains(&num_songs) {
        return Err(Error::Validation(format!(
            "number of songs must be between 1 and {}, got {}",
            MAX_SONGS, num_songs
        )));
    }

    Ok(num_songs)
}

/// Finds a cookie value in a raw `Cookie` header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
