//! Shared plumbing for the Assisted Installer client
//!
//! `Secret` keeps credential strings out of logs; `Transport` is the pooled,
//! retrying HTTP layer every operation goes through.

mod secret;
mod transport;

pub use secret::Secret;
pub use transport::{Transport, TransportError};
