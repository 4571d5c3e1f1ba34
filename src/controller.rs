// src/controller.rs

use tracing::{debug, error};

use crate::client::Provider;
use crate::content;
use crate::types::Message;

/// First message of every fresh session.
pub const WELCOME_TEXT: &str = "Hello! I'm your AI Math Solver. \n\nUpload a photo of any math problem or type it in, and I'll provide a complete, step-by-step solution instantly.";

/// Shown when the provider call fails, whatever the cause.
pub const CONNECT_ERROR_TEXT: &str =
    "I'm having trouble connecting to my reasoning center. Please try again.";

/// Per-session chat state. Messages are append-only; `is_loading` is true
/// exactly while one request is outstanding.
#[derive(Clone, Debug)]
pub struct ChatState {
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::model(WELCOME_TEXT)],
            is_loading: false,
            error: None,
        }
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

/// Sole mutator of [`ChatState`]. The rendering layer reads state through
/// [`ChatController::state`] and never writes it.
pub struct ChatController<P> {
    state: ChatState,
    provider: P,
}

impl<P: Provider> ChatController<P> {
    pub fn new(provider: P) -> Self {
        Self {
            state: ChatState::new(),
            provider,
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    /// Run one send end to end. Blank input and double submissions are
    /// dropped, not queued.
    pub async fn send(&mut self, text: &str, image: Option<String>) {
        if text.trim().is_empty() && image.is_none() {
            return;
        }
        if self.state.is_loading {
            debug!("send ignored, a request is already in flight");
            return;
        }

        // The payload covers the transcript so far plus the pending turn.
        let contents = content::build_contents(&self.state.messages, text, image.as_deref());

        // Optimistic update: the user turn lands before any network activity.
        self.state.messages.push(Message::user(text, image));
        self.state.is_loading = true;
        self.state.error = None;

        match self.provider.generate(contents).await {
            Ok(reply) => {
                self.state.messages.push(Message::model(reply));
                self.state.is_loading = false;
            }
            Err(e) => {
                error!("inference call failed: {e}");
                self.state.is_loading = false;
                self.state.error = Some(CONNECT_ERROR_TEXT.to_string());
                // The user turn stays put; the next send resends it with the
                // rest of the history.
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::client::ApiError;
    use crate::types::{Content, Role};

    /// Scripted provider: pops one canned result per call and records the
    /// payload it was handed.
    struct StubProvider {
        replies: Mutex<Vec<Result<String, ApiError>>>,
        seen: Mutex<Vec<Vec<Content>>>,
    }

    impl StubProvider {
        fn with(replies: Vec<Result<String, ApiError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failure() -> ApiError {
            ApiError::Api {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".to_string(),
            }
        }
    }

    #[async_trait]
    impl Provider for StubProvider {
        async fn generate(&self, contents: Vec<Content>) -> Result<String, ApiError> {
            self.seen.lock().unwrap().push(contents);
            self.replies.lock().unwrap().remove(0)
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    #[test]
    fn fresh_state_seeds_the_welcome_message() {
        let state = ChatState::new();
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].role, Role::Model);
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn success_appends_user_and_model_turns() {
        let mut controller = ChatController::new(StubProvider::with(vec![Ok("$4$".to_string())]));
        controller.send("2+2=?", None).await;

        let state = controller.state();
        assert_eq!(state.messages.len(), 3); // welcome + user + model
        assert_eq!(state.messages[1].role, Role::User);
        assert_eq!(state.messages[1].text, "2+2=?");
        assert_eq!(state.messages[2].role, Role::Model);
        assert_eq!(state.messages[2].text, "$4$");
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn request_payload_covers_history_plus_pending_turn() {
        let mut controller = ChatController::new(StubProvider::with(vec![Ok("4".to_string())]));
        controller.send("2+2=?", None).await;

        let seen = controller.provider.seen.lock().unwrap();
        assert_eq!(seen[0].len(), 2); // welcome turn + pending user turn
        assert_eq!(seen[0][0].role, "model");
        assert_eq!(seen[0][1].role, "user");
    }

    #[tokio::test]
    async fn failure_keeps_user_turn_and_sets_error() {
        let mut controller = ChatController::new(StubProvider::with(vec![
            Err(StubProvider::failure()),
            Ok("$4$".to_string()),
        ]));
        controller.send("2+2=?", None).await;

        {
            let state = controller.state();
            assert_eq!(state.messages.len(), 2); // welcome + user, no rollback
            assert_eq!(state.messages[1].role, Role::User);
            assert!(!state.is_loading);
            assert_eq!(state.error.as_deref(), Some(CONNECT_ERROR_TEXT));
        }

        // Manual retry resends the failed turn as part of the history.
        controller.send("try again", None).await;

        assert!(controller.state().error.is_none());
        let seen = controller.provider.seen.lock().unwrap();
        assert_eq!(seen[1].len(), 3); // welcome + failed turn + new turn
    }

    #[tokio::test]
    async fn blank_send_is_a_no_op() {
        let mut controller = ChatController::new(StubProvider::with(vec![]));
        controller.send("   ", None).await;

        assert_eq!(controller.state().messages.len(), 1);
        assert!(!controller.state().is_loading);
        assert!(controller.provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_while_loading_is_dropped() {
        let mut controller = ChatController::new(StubProvider::with(vec![]));
        controller.state.is_loading = true;

        controller.send("2+2=?", None).await;

        assert_eq!(controller.state().messages.len(), 1);
        assert!(controller.provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn image_only_send_is_accepted() {
        let mut controller = ChatController::new(StubProvider::with(vec![Ok("ok".to_string())]));
        controller
            .send("", Some("data:image/png;base64,iVBORw0KGgo=".to_string()))
            .await;

        let state = controller.state();
        assert_eq!(state.messages.len(), 3);
        assert!(state.messages[1].image.is_some());

        let seen = controller.provider.seen.lock().unwrap();
        let pending = seen[0].last().unwrap();
        assert_eq!(pending.parts.len(), 1); // image part only, no empty text
    }
}
