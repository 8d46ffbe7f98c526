//! # Spotify Integration Module
//!
//! Thin client for the parts of the Spotify accounts service and Web API the
//! exporter needs. All HTTP goes through a caller-owned [`reqwest::Client`] so
//! connections are reused across the many page requests of an export.
//!
//! ## Modules
//!
//! - [`auth`] - OAuth 2.0 authorization code flow with PKCE: builds the
//!   authorization URL, waits for the redirect through a
//!   [`crate::server::CallbackReceiver`] and exchanges the code for a token.
//! - [`pagination`] - Generic cursor follower that drains `{ items, next }`
//!   collections and sits out 429 responses according to `Retry-After`.
//! - [`playlists`] - The user's playlists and the items of each playlist.
//! - [`user`] - The profile behind the access token.
//!
//! ## Error Types
//!
//! - [`crate::error::AuthError`] for anything in the handshake
//! - [`crate::error::FetchError`] for Web API reads; it carries the HTTP
//!   status and body of the failing response

pub mod auth;
pub mod pagination;
pub mod playlists;
pub mod user;
