//! # CLI Module
//!
//! User-facing commands. Each command owns its console feedback (status
//! lines, spinners, tables) and turns any error into a red `[!]` line with
//! exit status 1; the library modules underneath only return errors.
//!
//! - [`auth`] - Runs the PKCE handshake and reports the signed-in user
//! - [`export`] - Signs in, then writes every playlist and an index to disk
//!
//! ```bash
//! sporlexport auth
//! sporlexport export --output ~/spotify-backup
//! ```

mod auth;
mod export;

pub use auth::auth;
pub use export::export;
