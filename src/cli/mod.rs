//! # CLI Module
//!
//! Command implementations behind the `hostmix` binary.
//!
//! - [`serve`] - Loads the configuration, binds the web server and optionally
//!   opens the landing page in the default browser
//!
//! ## Usage Patterns
//!
//! ```bash
//! hostmix serve                      # listen on SERVER_ADDRESS
//! hostmix serve --addr 127.0.0.1:8888 --open
//! hostmix completions zsh > _hostmix
//! ```

mod serve;

pub use serve::landing_url;
pub use serve::serve;
