//! Parley Core Library
//!
//! Session-key lifecycle for relay-mediated encrypted chat:
//! - Durable per-conversation session key store (private key + derived secret)
//! - Key-exchange orchestration over the `parley-crypto` DH engine
//! - Common error types
//!
//! Transport, authentication, chat lifecycle, and message history are
//! external collaborators; this crate only consumes peer public values they
//! deliver and hands ciphertext back.

pub mod error;
pub mod keystore;
pub mod orchestrator;
pub mod tracing_init;

pub use error::{Error, Result};
pub use keystore::{SessionKeyStore, SessionRecord};
pub use orchestrator::{ExchangeOrchestrator, ExchangeState};
