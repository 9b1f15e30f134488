//! Core chat controller.
//!
//! This module provides the `ChatClient` struct which owns the client state
//! and drives the two-request exchange with the conversation backend.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::chat::state::{ChatState, Sender, Theme, Transcript, TranscriptEntry};
use crate::client::Backend;
use crate::error::{Error, Result};
use crate::observability::{
    CHAT_RESETS, CHAT_SESSIONS_CREATED, CHAT_SUBMISSIONS, CHAT_SUBMIT_ERRORS,
};
use crate::render::Renderer;
use crate::types::{ConversationCreateParams, ConversationId, MessageCreateParams};

/// What a call to [`ChatClient::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The input was empty after trimming; nothing happened.
    Ignored,
    /// The message was sent and the answer appended.
    Answered,
}

/// Snapshot of a chat client for display.
#[derive(Debug, Clone)]
pub struct ChatStats {
    /// The active session identifier, if any.
    pub conversation_id: Option<ConversationId>,
    /// The current theme.
    pub theme: Theme,
    /// Entries in the transcript.
    pub entries: usize,
    /// User entries in the transcript.
    pub user_entries: usize,
    /// Bot entries in the transcript.
    pub bot_entries: usize,
    /// Notice entries in the transcript.
    pub notices: usize,
    /// Messages the backend last reported as remaining.
    pub remaining_messages: Option<i64>,
    /// Requests issued since start-up, failed ones included.
    pub total_requests: u64,
    /// Conversations established since start-up.
    pub sessions_created: u64,
}

/// A chat client that owns conversation state and talks to the backend.
///
/// A session is created lazily by the first submission and reused by every
/// submission after it until [`ChatClient::reset`].
pub struct ChatClient<B: Backend> {
    backend: B,
    state: ChatState,
    cancel: CancellationToken,
    request_count: u64,
    sessions_created: u64,
}

impl<B: Backend> ChatClient<B> {
    /// Creates a client with no session, an empty transcript and the given theme.
    pub fn new(backend: B, theme: Theme) -> Self {
        Self::with_state(backend, ChatState::new(theme))
    }

    /// Creates a client around existing state.
    pub fn with_state(backend: B, state: ChatState) -> Self {
        Self {
            backend,
            state,
            cancel: CancellationToken::new(),
            request_count: 0,
            sessions_created: 0,
        }
    }

    /// Submits one line of user input.
    ///
    /// This method:
    /// 1. Trims the input; empty input returns [`SubmitOutcome::Ignored`]
    /// 2. Appends and renders the user entry
    /// 3. Creates a conversation if none is held
    /// 4. Sends the message with the conversation's identifier
    /// 5. Appends and renders the bot's answer
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionCreationFailed`] or [`Error::MessageSendFailed`]
    /// wrapping the cause. The error text is also appended to the transcript
    /// as a notice. A failed creation leaves the client without a session.
    pub async fn submit(
        &mut self,
        input: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<SubmitOutcome> {
        let message = input.trim();
        if message.is_empty() {
            return Ok(SubmitOutcome::Ignored);
        }
        CHAT_SUBMISSIONS.click();
        self.refresh_cancellation();

        let theme = self.state.theme();
        renderer.print_entry(theme, self.state.append(TranscriptEntry::user(message)));

        let cancel = self.cancel.clone();
        let result = self.exchange(message, &cancel).await;
        self.refresh_cancellation();

        match result {
            Ok(answer) => {
                renderer.print_entry(theme, self.state.append(TranscriptEntry::bot(answer)));
                Ok(SubmitOutcome::Answered)
            }
            Err(err) => {
                CHAT_SUBMIT_ERRORS.click();
                tracing::warn!(error = %err, "submission failed");
                renderer.print_entry(
                    theme,
                    self.state.append(TranscriptEntry::notice(err.to_string())),
                );
                Err(err)
            }
        }
    }

    async fn exchange(&mut self, message: &str, cancel: &CancellationToken) -> Result<String> {
        let existing = self.state.conversation_id().cloned();
        let conversation_id = match existing {
            Some(id) => id,
            None => self
                .create_conversation(message, cancel)
                .await
                .map_err(Error::session_creation_failed)?,
        };

        self.request_count += 1;
        let params = MessageCreateParams::new(conversation_id, message);
        let reply = cancellable(cancel, self.backend.send_message(params))
            .await
            .map_err(Error::message_send_failed)?;
        self.state.record_remaining(reply.remaining_messages);
        reply.into_answer().map_err(Error::message_send_failed)
    }

    async fn create_conversation(
        &mut self,
        message: &str,
        cancel: &CancellationToken,
    ) -> Result<ConversationId> {
        self.request_count += 1;
        let params = ConversationCreateParams::new(message);
        let conversation = cancellable(cancel, self.backend.create_conversation(params)).await?;

        let id = conversation.conversation_id;
        if id.as_str().is_empty() {
            return Err(Error::serialization(
                "backend returned an empty conversation_id",
                None,
            ));
        }
        self.state.establish(id.clone());
        self.state.record_remaining(conversation.remaining_messages);
        self.sessions_created += 1;
        CHAT_SESSIONS_CREATED.click();
        tracing::info!(conversation_id = %id, "conversation established");
        Ok(id)
    }

    /// Forgets the session and empties the transcript.
    ///
    /// Any request still tied to the previous cancellation token is aborted.
    /// The backend is not notified. The theme is kept.
    pub fn reset(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.state.reset();
        CHAT_RESETS.click();
        tracing::info!("conversation reset");
    }

    /// Flips between the light and dark theme and returns the new one.
    pub fn toggle_theme(&mut self) -> Theme {
        self.state.toggle_theme()
    }

    /// Sets the theme explicitly.
    pub fn set_theme(&mut self, theme: Theme) {
        self.state.set_theme(theme);
    }

    /// Returns the current theme.
    pub fn theme(&self) -> Theme {
        self.state.theme()
    }

    /// Returns the active session identifier, if any.
    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.state.conversation_id()
    }

    /// Returns the transcript.
    pub fn transcript(&self) -> &Transcript {
        self.state.transcript()
    }

    /// Returns the messages the backend last reported as remaining.
    pub fn remaining_messages(&self) -> Option<i64> {
        self.state.remaining_messages()
    }

    /// Returns a handle that aborts the submission in flight.
    ///
    /// A token that already fired is replaced first, so an interrupt that
    /// arrives after a submission finished never aborts a later one. The
    /// handle stays valid until it fires or the client is reset.
    pub fn cancellation(&mut self) -> CancellationToken {
        self.refresh_cancellation();
        self.cancel.clone()
    }

    fn refresh_cancellation(&mut self) {
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the current statistics snapshot.
    pub fn stats(&self) -> ChatStats {
        let transcript = self.state.transcript();
        ChatStats {
            conversation_id: self.state.conversation_id().cloned(),
            theme: self.state.theme(),
            entries: transcript.len(),
            user_entries: transcript.count(Sender::User),
            bot_entries: transcript.count(Sender::Bot),
            notices: transcript.count(Sender::Notice),
            remaining_messages: self.state.remaining_messages(),
            total_requests: self.request_count,
            sessions_created: self.sessions_created,
        }
    }
}

async fn cancellable<T, F>(cancel: &CancellationToken, request: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::aborted("request cancelled")),
        result = request => result,
    }
}
