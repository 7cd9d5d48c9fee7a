//! Build script for hostmix.
//!
//! Places the `.env.example` template next to the location where
//! `config::load_env` looks for the real `.env`, so a fresh install has a
//! starting point for the Spotify client credentials.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root into the local data directory.
///
/// Destination:
/// - Linux: `~/.local/share/hostmix/.env.example`
/// - macOS: `~/Library/Application Support/hostmix/.env.example`
/// - Windows: `%LOCALAPPDATA%/hostmix/.env.example`
///
/// A missing template only produces a cargo warning. Failing to create the
/// directory or write the file fails the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("hostmix");
    fs::create_dir_all(&out_dir)?;

    if !template.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
        return Ok(());
    }

    let contents = fs::read_to_string(&template)?;
    fs::write(out_dir.join(".env.example"), contents)?;
    Ok(())
}
