//! Rule-based chatbot for EcoBot.
//!
//! Provides the static topic catalog, the match resolver, response
//! formatting, and the conversation session that drives them.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod resolver;
pub mod session;
pub mod types;

pub use catalog::{TopicContent, TopicOption};
pub use engine::ResponseEngine;
pub use error::ChatError;
pub use formatter::contains_links;
pub use resolver::resolve;
pub use session::{ChatSession, SessionSettings};
pub use types::{BotReply, MenuEntry, Resolution, TopicKey};
