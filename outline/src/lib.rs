//! Outline generation: one chat-completion request plus a recovery
//! pipeline that always yields an outline of the requested length, no
//! matter what the model (or the network) does.

pub mod client;
pub mod error;
pub mod fallback;
pub mod prompt;
pub mod recover;

pub use client::OutlineClient;
pub use error::OutlineError;
pub use fallback::fallback_outline;
pub use recover::recover_outline;
