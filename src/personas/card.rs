//! Persona card data structures.
//!
//! This module defines the core types for persona metadata:
//! - `PersonaCard`: Complete persona configuration including role, provider, and prompts
//! - `Provider`: LLM provider enum covering every backend a persona can be served by
//! - `ContextField`: Which part of the discussion context a persona's task prompt consumes
//!
//! Personas are plain configuration records. Adding or editing one is a data
//! change, not a new type, and the provider adapters in [`crate::agents`]
//! dispatch on the `provider` field alone.

use serde::{Deserialize, Serialize};

/// LLM provider backing a persona.
///
/// Each provider maps to exactly one credential environment variable.
/// Every variable is required at startup even when no persona currently
/// routes to that provider, so swapping a persona's backend never changes
/// the deployment checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI chat completions (GPT-4 family)
    OpenAI,
    /// Anthropic messages API (Claude family)
    Anthropic,
    /// Mistral AI chat completions
    Mistral,
    /// Groq-hosted open models (OpenAI-compatible API)
    Groq,
    /// Google Gemini generateContent API
    Gemini,
    /// Cohere generate API
    Cohere,
    /// Emergence (simulated locally, no live endpoint)
    Emergence,
}

impl Provider {
    /// All providers, in the order their credentials are reported.
    pub fn all() -> [Provider; 7] {
        [
            Provider::OpenAI,
            Provider::Anthropic,
            Provider::Mistral,
            Provider::Groq,
            Provider::Gemini,
            Provider::Cohere,
            Provider::Emergence,
        ]
    }

    /// Environment variable holding this provider's API key.
    pub fn credential_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Mistral => "MISTRAL_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::Cohere => "COHERE_API_KEY",
            Provider::Emergence => "EMERGENCE_API_KEY",
        }
    }

    /// Get provider display name
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Mistral => "Mistral",
            Provider::Groq => "Groq",
            Provider::Gemini => "Gemini",
            Provider::Cohere => "Cohere",
            Provider::Emergence => "Emergence",
        }
    }
}

/// Which discussion-context field a persona's task prompt is rendered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextField {
    /// The session topic string.
    Topic,
    /// Ideas collected so far.
    Ideas,
    /// Conflicting perspectives to reconcile.
    Perspectives,
}

/// Persona configuration card
///
/// Contains everything needed to render a persona's prompt and route it
/// to the right provider. The `key` doubles as the persona's node label
/// in the interaction graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaCard {
    /// Short stable key (e.g., "creative"). Also the graph node label.
    pub key: String,

    /// Human-readable role (e.g., "Creative Thinker")
    pub role: String,

    /// Provider serving this persona
    pub provider: Provider,

    /// Model identifier passed to the provider
    pub model: String,

    /// System prompt, when the provider call carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Task prompt stem; the context field's value is appended after ": "
    pub task_prompt: String,

    /// Context field the task prompt consumes
    pub context_field: ContextField,
}

impl PersonaCard {
    /// Create a new persona card without a system prompt
    pub fn new(
        key: impl Into<String>,
        role: impl Into<String>,
        provider: Provider,
        model: impl Into<String>,
        task_prompt: impl Into<String>,
        context_field: ContextField,
    ) -> Self {
        Self {
            key: key.into(),
            role: role.into(),
            provider,
            model: model.into(),
            system_prompt: None,
            task_prompt: task_prompt.into(),
            context_field,
        }
    }

    /// Builder: set the system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}
