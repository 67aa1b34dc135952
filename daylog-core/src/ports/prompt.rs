//! Prompt port - modal input from the user

use async_trait::async_trait;

use crate::domain::result::Result;

/// What to show the user. The answer is expected to be a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub message: String,
    pub title: String,
    pub default_value: String,
    pub cancelable: bool,
}

impl PromptRequest {
    /// A cancelable numeric prompt
    pub fn number(
        message: impl Into<String>,
        title: impl Into<String>,
        default_value: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            title: title.into(),
            default_value: default_value.into(),
            cancelable: true,
        }
    }
}

/// Asks the user for a value
///
/// Resolves with the raw input, or `None` when the user cancels. Parsing the
/// input is up to the caller.
#[async_trait]
pub trait Prompt: Send + Sync {
    async fn prompt(&self, request: &PromptRequest) -> Result<Option<String>>;
}
