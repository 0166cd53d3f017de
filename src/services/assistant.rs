// src/services/assistant.rs
//
// Best-effort pass-through to an opaque text-completion backend. The
// assistant is auxiliary: any backend failure degrades to a fixed
// fallback sentence instead of an error surfaced to the end user.
use crate::models::ServiceError;
use log::warn;

pub const FALLBACK_REPLY: &str =
    "I'm picking up some interference right now. Please try again in a moment.";

const SYSTEM_INSTRUCTION: &str = "You are the brain of Zentic Teams, a senior-level \
team assistant. Analyze the workspace context and offer proactive, practical answers.";

pub trait CompletionBackend: Send + Sync {
    fn complete(&self, prompt: &str, context: &str) -> Result<String, ServiceError>;
}

// Stands in when no provider is configured; every call fails and the
// caller falls back to the canned reply.
pub struct UnconfiguredBackend;

impl CompletionBackend for UnconfiguredBackend {
    fn complete(&self, _prompt: &str, _context: &str) -> Result<String, ServiceError> {
        Err(ServiceError::AssistantUnavailable)
    }
}

pub fn build_prompt(prompt: &str, context: &str) -> String {
    format!("{}\n\nWorkspace context: {}\n\n{}", SYSTEM_INSTRUCTION, context, prompt)
}

pub fn reply(backend: &dyn CompletionBackend, prompt: &str, context: &str) -> String {
    match backend.complete(&build_prompt(prompt, context), context) {
        Ok(text) => text,
        Err(e) => {
            warn!("Assistant backend failed, serving fallback: {}", e);
            FALLBACK_REPLY.to_string()
        }
    }
}
