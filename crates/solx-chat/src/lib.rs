//! Conversational layer for Solx.
//!
//! Resolves free-text questions against the knowledge store, formats the
//! "search online" fallback, and keeps a per-session turn log.

pub mod error;
pub mod log;
pub mod resolver;
pub mod session;

pub use error::ChatError;
pub use log::ConversationLog;
pub use resolver::{FallbackPolicy, Resolution, ResponseResolver};
pub use session::{AudioAnswer, ChatSession};
