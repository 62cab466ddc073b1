//! Conversation session.
//!
//! Owns the transcript for one conversation, validates submissions, and runs
//! the cosmetic typing delay before asking the engine for a reply.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use ecobot_core::config::ChatConfig;
use ecobot_core::types::ConversationTurn;

use crate::engine::ResponseEngine;
use crate::error::ChatError;

/// Submission limits and timing for a [`ChatSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub enabled: bool,
    pub typing_delay: Duration,
    pub max_message_chars: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&ChatConfig::default())
    }
}

impl From<&ChatConfig> for SessionSettings {
    fn from(config: &ChatConfig) -> Self {
        Self {
            enabled: config.enabled,
            typing_delay: Duration::from_millis(config.typing_delay_ms),
            max_message_chars: config.max_message_chars,
        }
    }
}

/// Clears the typing indicator however `submit` exits.
struct TypingGuard<'a>(&'a AtomicBool);

impl Drop for TypingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One conversation: an append-only turn log plus a typing indicator.
pub struct ChatSession {
    id: Uuid,
    engine: ResponseEngine,
    settings: SessionSettings,
    turns: Mutex<Vec<ConversationTurn>>,
    typing: AtomicBool,
}

impl ChatSession {
    /// Open a session whose transcript starts with the welcome message.
    pub fn start(engine: ResponseEngine, settings: SessionSettings) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            engine,
            settings,
            turns: Mutex::new(Vec::new()),
            typing: AtomicBool::new(false),
        };
        let welcome = session.engine.welcome_text();
        if let Ok(mut turns) = session.turns.lock() {
            push_turn(&mut turns, welcome, false, false);
        }
        info!(session_id = %session.id, "Chat session started");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether a reply is currently being "typed".
    pub fn is_typing(&self) -> bool {
        self.typing.load(Ordering::Acquire)
    }

    /// Snapshot of the transcript.
    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.lock_turns().map(|t| t.clone()).unwrap_or_default()
    }

    /// Transcript as pretty JSON.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.turns())
    }

    /// Submit user text and wait for the bot's reply turn.
    ///
    /// Dropping the returned future before it resolves leaves the user turn
    /// in place, records no bot turn, and clears the typing indicator.
    pub async fn submit(&self, text: &str) -> Result<ConversationTurn, ChatError> {
        if !self.settings.enabled {
            return Err(ChatError::Disabled);
        }
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if text.chars().count() > self.settings.max_message_chars {
            return Err(ChatError::MessageTooLong(self.settings.max_message_chars));
        }
        if self
            .typing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(session_id = %self.id, "Submission rejected while typing");
            return Err(ChatError::Busy);
        }
        let _guard = TypingGuard(&self.typing);

        self.append(text.to_string(), true, false)?;

        if !self.settings.typing_delay.is_zero() {
            tokio::time::sleep(self.settings.typing_delay).await;
        }

        let reply = self.engine.resolve_and_respond(text);
        let turn = self.append(reply.text, false, reply.has_links)?;
        debug!(
            session_id = %self.id,
            sequence = turn.sequence,
            has_links = turn.has_links,
            "Bot turn appended"
        );
        Ok(turn)
    }

    fn append(
        &self,
        content: String,
        is_user: bool,
        has_links: bool,
    ) -> Result<ConversationTurn, ChatError> {
        match self.lock_turns() {
            Some(mut turns) => Ok(push_turn(&mut turns, content, is_user, has_links)),
            None => {
                warn!(session_id = %self.id, "Transcript lock poisoned; turn not recorded");
                Err(ChatError::Transcript)
            }
        }
    }

    fn lock_turns(&self) -> Option<MutexGuard<'_, Vec<ConversationTurn>>> {
        self.turns.lock().ok()
    }
}

fn new_turn(sequence: u64, content: String, is_user: bool, has_links: bool) -> ConversationTurn {
    ConversationTurn {
        id: Uuid::new_v4(),
        sequence,
        content,
        is_user,
        timestamp: Utc::now(),
        has_links,
    }
}

fn push_turn(
    turns: &mut Vec<ConversationTurn>,
    content: String,
    is_user: bool,
    has_links: bool,
) -> ConversationTurn {
    let turn = new_turn(turns.len() as u64, content, is_user, has_links);
    turns.push(turn.clone());
    turn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter;

    fn session() -> ChatSession {
        ChatSession::start(ResponseEngine::new(), SessionSettings::default())
    }

    #[test]
    fn test_start_seeds_welcome_turn() {
        let s = session();
        let turns = s.turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].sequence, 0);
        assert!(!turns[0].is_user);
        assert!(!turns[0].has_links);
        assert_eq!(turns[0].content, formatter::welcome_text());
        assert!(!s.is_typing());
    }

    #[test]
    fn test_settings_from_config() {
        let config = ChatConfig {
            typing_delay_ms: 250,
            max_message_chars: 10,
            ..ChatConfig::default()
        };
        let settings = SessionSettings::from(&config);
        assert_eq!(settings.typing_delay, Duration::from_millis(250));
        assert_eq!(settings.max_message_chars, 10);
        assert!(settings.enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_appends_user_and_bot_turns() {
        let s = session();
        let started = tokio::time::Instant::now();
        let reply = s.submit("1").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1000));

        assert_eq!(reply.sequence, 2);
        assert!(reply.content.contains("QUALIDADE DO AR"));

        let turns = s.turns();
        assert_eq!(turns.len(), 3);
        assert!(turns[1].is_user);
        assert_eq!(turns[1].content, "1");
        assert!(!s.is_typing());
    }

    #[tokio::test]
    async fn test_empty_and_whitespace_rejected() {
        let s = session();
        assert_eq!(s.submit("").await, Err(ChatError::EmptyMessage));
        assert_eq!(s.submit("   \t").await, Err(ChatError::EmptyMessage));
        assert_eq!(s.turns().len(), 1);
    }

    #[tokio::test]
    async fn test_too_long_rejected() {
        let settings = SessionSettings {
            max_message_chars: 5,
            typing_delay: Duration::ZERO,
            ..SessionSettings::default()
        };
        let s = ChatSession::start(ResponseEngine::new(), settings);
        assert_eq!(s.submit("ajuda!").await, Err(ChatError::MessageTooLong(5)));
        // Counted in characters, not bytes.
        assert!(s.submit("água").await.is_ok());
    }

    #[tokio::test]
    async fn test_disabled_session() {
        let settings = SessionSettings {
            enabled: false,
            ..SessionSettings::default()
        };
        let s = ChatSession::start(ResponseEngine::new(), settings);
        assert_eq!(s.submit("1").await, Err(ChatError::Disabled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_while_typing_is_busy() {
        let s = session();
        let (first, second) = tokio::join!(s.submit("1"), s.submit("2"));
        assert!(first.is_ok());
        assert_eq!(second, Err(ChatError::Busy));
        assert_eq!(s.turns().len(), 3);
        assert!(!s.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_submit_clears_indicator() {
        let s = session();
        let result = tokio::time::timeout(Duration::from_millis(10), s.submit("6")).await;
        assert!(result.is_err());
        assert!(!s.is_typing());

        let turns = s.turns();
        assert_eq!(turns.len(), 2);
        assert!(turns[1].is_user);

        let reply = s.submit("6").await.unwrap();
        assert!(reply.has_links);
        assert_eq!(reply.sequence, 3);
    }

    #[tokio::test]
    async fn test_poisoned_transcript_is_an_error() {
        let settings = SessionSettings {
            typing_delay: Duration::ZERO,
            ..SessionSettings::default()
        };
        let s = ChatSession::start(ResponseEngine::new(), settings);
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _held = s.turns.lock().unwrap();
            panic!("poison transcript lock");
        }));

        assert_eq!(s.submit("1").await, Err(ChatError::Transcript));
        assert!(!s.is_typing());
        assert!(s.turns().is_empty());
    }

    #[tokio::test]
    async fn test_export_json() {
        let settings = SessionSettings {
            typing_delay: Duration::ZERO,
            ..SessionSettings::default()
        };
        let s = ChatSession::start(ResponseEngine::new(), settings);
        s.submit("menu").await.unwrap();
        let json = s.export_json().unwrap();
        let parsed: Vec<ConversationTurn> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[2].content, parsed[0].content);
    }
}
