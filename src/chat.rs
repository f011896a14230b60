//! Security-advisor chat widget state
//!
//! The model call itself is an opaque [`PromptSender`]; this module only
//! keeps the message log, the credential gate and the fallback replies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by the hosted model service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Connectivity lost; the user may resubmit
    #[error("connection to the model service was lost")]
    Network,
    /// Missing or invalid credential; blocks input until one is supplied
    #[error("model service credential is missing or invalid")]
    Auth,
}

impl ChatError {
    /// Fixed text shown in place of a reply
    pub fn fallback_text(self) -> &'static str {
        match self {
            ChatError::Network => NETWORK_FALLBACK,
            ChatError::Auth => AUTH_FALLBACK,
        }
    }
}

pub const WELCOME_TEXT: &str = "VECTOR_SEC_OS ONLINE. WAITING FOR INPUT.";
pub const NETWORK_FALLBACK: &str = "ERR: CONNECTION LOST";
pub const AUTH_FALLBACK: &str = "ACCESS DENIED. ENCRYPTION KEY (API KEY) REQUIRED.";
pub const EMPTY_REPLY_FALLBACK: &str = "NEURAL NODE CONNECTION ERROR.";

/// Sends a prompt to the hosted model and returns its reply
pub trait PromptSender {
    fn send_prompt(&self, text: &str) -> Result<String, ChatError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    /// Unix timestamp (ms)
    pub timestamp_ms: f64,
}

/// What happened to a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submit {
    /// Blank input, or a reply is still pending
    Ignored,
    /// No credential; the caller should offer to request one
    CredentialRequired,
    /// Recorded; send this prompt and pass the result to [`ChatLog::complete`]
    Pending(String),
}

#[derive(Debug, Clone)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    next_id: u64,
    pending: bool,
    credential_available: bool,
}

impl ChatLog {
    pub fn new(credential_available: bool) -> Self {
        let mut log = Self {
            messages: Vec::new(),
            next_id: 0,
            pending: false,
            credential_available,
        };
        log.push(Sender::Ai, WELCOME_TEXT.to_string());
        log
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Input is blocked behind the credential overlay
    pub fn is_locked(&self) -> bool {
        !self.credential_available
    }

    /// Reported by whoever manages the credential
    pub fn set_credential_available(&mut self, available: bool) {
        self.credential_available = available;
    }

    pub fn submit(&mut self, input: &str) -> Submit {
        let prompt = input.trim();
        if prompt.is_empty() || self.pending {
            return Submit::Ignored;
        }
        if self.is_locked() {
            return Submit::CredentialRequired;
        }

        self.push(Sender::User, prompt.to_string());
        self.pending = true;
        Submit::Pending(prompt.to_string())
    }

    /// Record the outcome of the pending prompt
    pub fn complete(&mut self, result: Result<String, ChatError>) {
        if !self.pending {
            log::debug!("chat reply with nothing pending, dropped");
            return;
        }
        self.pending = false;

        let text = match result {
            Ok(reply) if reply.trim().is_empty() => EMPTY_REPLY_FALLBACK.to_string(),
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("chat request failed: {e}");
                if e == ChatError::Auth {
                    self.credential_available = false;
                }
                e.fallback_text().to_string()
            }
        };
        self.push(Sender::Ai, text);
    }

    /// Submit, send and complete in one go
    pub fn ask<S: PromptSender + ?Sized>(&mut self, sender: &S, input: &str) -> Submit {
        let submit = self.submit(input);
        if let Submit::Pending(prompt) = &submit {
            let result = sender.send_prompt(prompt);
            self.complete(result);
        }
        submit
    }

    fn push(&mut self, sender: Sender, text: String) {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_id,
            sender,
            text,
            timestamp_ms: crate::platform::now_ms(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted(Result<&'static str, ChatError>);

    impl PromptSender for Scripted {
        fn send_prompt(&self, _text: &str) -> Result<String, ChatError> {
            self.0.map(str::to_string)
        }
    }

    fn last_text(log: &ChatLog) -> &str {
        &log.messages().last().unwrap().text
    }

    #[test]
    fn test_starts_with_welcome() {
        let log = ChatLog::new(true);
        assert_eq!(log.messages().len(), 1);
        assert_eq!(log.messages()[0].sender, Sender::Ai);
        assert_eq!(last_text(&log), WELCOME_TEXT);
    }

    #[test]
    fn test_reply_is_recorded() {
        let mut log = ChatLog::new(true);
        let submit = log.ask(&Scripted(Ok("Rotate your keys.")), "  how do I stay safe?  ");
        assert_eq!(submit, Submit::Pending("how do I stay safe?".to_string()));
        assert_eq!(log.messages().len(), 3);
        assert_eq!(log.messages()[1].sender, Sender::User);
        assert_eq!(last_text(&log), "Rotate your keys.");
        assert!(!log.is_pending());
    }

    #[test]
    fn test_fallbacks_per_error_kind() {
        let mut log = ChatLog::new(true);
        log.ask(&Scripted(Err(ChatError::Network)), "ping");
        assert_eq!(last_text(&log), NETWORK_FALLBACK);
        assert!(!log.is_locked());

        log.ask(&Scripted(Ok("   ")), "ping");
        assert_eq!(last_text(&log), EMPTY_REPLY_FALLBACK);

        log.ask(&Scripted(Err(ChatError::Auth)), "ping");
        assert_eq!(last_text(&log), AUTH_FALLBACK);
        assert!(log.is_locked());
    }

    #[test]
    fn test_locked_widget_requests_credential() {
        let mut log = ChatLog::new(false);
        assert_eq!(log.submit("hello"), Submit::CredentialRequired);
        assert_eq!(log.messages().len(), 1);

        log.set_credential_available(true);
        assert!(matches!(log.submit("hello"), Submit::Pending(_)));
    }

    #[test]
    fn test_blank_and_concurrent_submissions_ignored() {
        let mut log = ChatLog::new(true);
        assert_eq!(log.submit("   "), Submit::Ignored);
        assert!(matches!(log.submit("first"), Submit::Pending(_)));
        assert_eq!(log.submit("second"), Submit::Ignored);

        log.complete(Ok("done".to_string()));
        log.complete(Ok("late duplicate".to_string()));
        assert_eq!(last_text(&log), "done");
    }

    #[test]
    fn test_message_ids_increase() {
        let mut log = ChatLog::new(true);
        log.ask(&Scripted(Ok("a")), "q1");
        log.ask(&Scripted(Ok("b")), "q2");
        let ids: Vec<u64> = log.messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
