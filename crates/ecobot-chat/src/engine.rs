//! Response engine: resolver and formatter behind one synchronous call.

use tracing::debug;

use crate::catalog;
use crate::formatter;
use crate::resolver;
use crate::types::{BotReply, MenuEntry, Resolution};

/// Stateless rule-based responder. Cheap to clone and safe to share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseEngine {
    echo_unmatched: bool,
}

impl ResponseEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quote unmatched text back in the fallback reply.
    pub fn with_echo_unmatched(mut self, echo: bool) -> Self {
        self.echo_unmatched = echo;
        self
    }

    /// Resolve `text` and render the reply.
    pub fn resolve_and_respond(&self, text: &str) -> BotReply {
        let resolution = resolver::resolve(text);
        let reply = self.respond_to(resolution);
        debug!(
            resolution = ?reply.resolution,
            has_links = reply.has_links,
            chars = reply.text.chars().count(),
            "Reply rendered"
        );
        reply
    }

    /// Render an already-resolved topic, menu or fallback.
    pub fn respond_to(&self, resolution: Resolution) -> BotReply {
        let text = formatter::render(&resolution, self.echo_unmatched);
        BotReply {
            has_links: formatter::contains_links(&text),
            text,
            resolution,
        }
    }

    pub fn welcome_text(&self) -> String {
        formatter::welcome_text()
    }

    /// Quick-access entries, in menu order.
    pub fn menu_catalog(&self) -> Vec<MenuEntry> {
        catalog::menu_entries()
    }
}
