//! Conversational assistant collaborator.
//!
//! The chat widget is independent of the content document — it consumes a
//! static system prompt and its own conversation history, and by
//! construction has no handle through which it could mutate site content.
//! The actual text-generation call lives behind the [`ChatBackend`] trait;
//! this module owns only the transcript and the send/reply protocol around
//! it.
//!
//! Error handling mirrors the widget's behavior: a backend failure appends
//! a fixed connection-error reply so the conversation stays coherent, and
//! an empty backend reply is substituted with an apology rather than shown
//! as a blank bubble.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// System instruction handed to the backend on every call.
pub const SYSTEM_PROMPT: &str = "Você é o assistente virtual da 'O Poderoso Technologies'. \
     Seja profissional, futurista, conciso e amigável. Use termos como 'infraestrutura \
     digital', 'escaneabilidade' e 'futuro'. Reforce sempre a marca 'O Poderoso'.";

/// Greeting seeded into a fresh transcript.
pub const DEFAULT_GREETING: &str =
    "Olá! Sou o assistente O Poderoso. Como posso ajudar você hoje?";

/// Reply appended when the backend call fails.
pub const CONNECTION_ERROR_REPLY: &str = "Erro na conexão. Verifique sua chave de API.";

/// Reply substituted when the backend returns empty text.
pub const EMPTY_REPLY_FALLBACK: &str = "Desculpe, tive um erro ao processar sua solicitação.";

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("chat backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

/// The external text-generation endpoint.
///
/// Implementations receive the full transcript (ending with the user's
/// latest message) and return the model's reply.
pub trait ChatBackend {
    fn generate(&self, system_prompt: &str, transcript: &Transcript) -> Result<String, ChatError>;
}

/// Ordered conversation history, seeded with a greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self::with_greeting(DEFAULT_GREETING)
    }

    pub fn with_greeting(greeting: &str) -> Self {
        Transcript {
            messages: vec![Message {
                role: Role::Model,
                text: greeting.to_string(),
            }],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn push(&mut self, role: Role, text: impl Into<String>) {
        self.messages.push(Message {
            role,
            text: text.into(),
        });
    }

    /// Send a user message through the backend and append the reply.
    ///
    /// Whitespace-only input is rejected before touching the transcript.
    /// On backend failure the transcript gains a fixed connection-error
    /// reply and the error is returned for the caller to report.
    pub fn send(
        &mut self,
        backend: &dyn ChatBackend,
        input: &str,
    ) -> Result<String, ChatError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        self.push(Role::User, input);
        match backend.generate(SYSTEM_PROMPT, self) {
            Ok(reply) => {
                let reply = if reply.trim().is_empty() {
                    EMPTY_REPLY_FALLBACK.to_string()
                } else {
                    reply
                };
                self.push(Role::Model, reply.clone());
                Ok(reply)
            }
            Err(err) => {
                self.push(Role::Model, CONNECTION_ERROR_REPLY);
                Err(err)
            }
        }
    }
}
