//! User-facing text.
//!
//! Every line the CLI prints is a [`Message`] variant, rendered through its
//! `Display` impl and emitted with the macros in [`macros`].

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
