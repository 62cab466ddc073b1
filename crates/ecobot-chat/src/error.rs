//! Error types for the chat session.

/// Errors from submitting a message to a [`ChatSession`](crate::ChatSession).
///
/// The response engine itself never fails; these all come from validating
/// the caller's submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("chat is disabled")]
    Disabled,
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("a reply is already being typed")]
    Busy,
    #[error("conversation transcript is unavailable")]
    Transcript,
}
