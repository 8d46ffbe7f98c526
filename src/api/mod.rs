//! # API Module
//!
//! HTTP handlers for the transient local server that catches the OAuth
//! redirect. The only route is the redirect path itself; see
//! [`crate::server::CallbackServer`] for how it is mounted and torn down.
//!
//! - [`callback`] - Reads the `code` query parameter, hands it to the waiting
//!   handshake through a [`CallbackSlot`] and answers the browser with a
//!   confirmation page (200) or a failure page (400) when no code is present.

mod callback;

pub use callback::CallbackSlot;
pub use callback::callback;
