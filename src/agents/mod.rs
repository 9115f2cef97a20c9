//! Agent collaborators: one-shot provider calls per persona.
//!
//! Each persona maps to a single outbound call against its provider's
//! hosted-model endpoint. Calls are independent, timeout-bounded, and
//! never retried: one persona failing produces an isolated
//! [`CsiError::Provider`] and leaves every other call (and the running
//! session) untouched.
//!
//! The simulation flow never invokes agents; the graph only links to
//! them. This module is exercised through the explicit `ask` surface.

use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AgentConfig;
use crate::error::{CsiError, Result};
use crate::personas::{ContextField, PersonaCard, PersonaRegistry, Provider};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const MISTRAL_CHAT_URL: &str = "https://api.mistral.ai/v1/chat/completions";
const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const COHERE_GENERATE_URL: &str = "https://api.cohere.ai/v1/generate";

const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 1024;
const COHERE_MAX_TOKENS: u32 = 500;

/// Discussion context a persona's prompt is rendered against.
#[derive(Debug, Clone, Default)]
pub struct AgentContext {
    /// The session topic
    pub topic: String,
    /// Ideas collected so far
    pub ideas: Vec<String>,
    /// Conflicting perspectives to reconcile
    pub perspectives: Vec<String>,
}

impl AgentContext {
    /// Context carrying only a topic
    pub fn for_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    fn field_value(&self, field: ContextField) -> String {
        match field {
            ContextField::Topic => self.topic.clone(),
            ContextField::Ideas => format!("{:?}", self.ideas),
            ContextField::Perspectives => format!("{:?}", self.perspectives),
        }
    }
}

/// Render a persona's full task prompt for the given context.
pub fn render_prompt(card: &PersonaCard, context: &AgentContext) -> String {
    format!(
        "{}: {}",
        card.task_prompt,
        context.field_value(card.context_field)
    )
}

/// The Emergence provider has no live endpoint; replies are synthesized.
fn simulated_reply(prompt: &str) -> String {
    format!("Innovative perspective on: {prompt}")
}

/// One persona's reply.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReply {
    /// Persona key
    pub persona: String,
    /// Persona role
    pub role: String,
    /// Provider that served the call
    pub provider: Provider,
    /// Reply text
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Serialize)]
struct CohereRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CohereResponse {
    generations: Vec<CohereGeneration>,
}

#[derive(Debug, Deserialize)]
struct CohereGeneration {
    text: String,
}

/// Issues provider calls on behalf of personas.
pub struct AgentRegistry {
    personas: PersonaRegistry,
    client: Client,
}

impl AgentRegistry {
    /// Create a registry with the embedded roster and a bounded HTTP client
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CsiError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            personas: PersonaRegistry::new(),
            client,
        })
    }

    /// The persona roster in use
    pub fn personas(&self) -> &PersonaRegistry {
        &self.personas
    }

    /// Ask one persona to respond to the given context.
    pub async fn respond(&self, key: &str, context: &AgentContext) -> Result<AgentReply> {
        let card = self
            .personas
            .get(key)
            .ok_or_else(|| CsiError::Validation(format!("unknown persona '{key}'")))?;

        let prompt = render_prompt(card, context);
        debug!(persona = %card.key, provider = card.provider.name(), "dispatching provider call");
        let text = self.dispatch(card, &prompt).await?;

        Ok(AgentReply {
            persona: card.key.clone(),
            role: card.role.clone(),
            provider: card.provider,
            text,
        })
    }

    /// Ask every persona in roster order, isolating failures per persona.
    pub async fn respond_all(&self, context: &AgentContext) -> Vec<(String, Result<AgentReply>)> {
        let calls = self.personas.iter().map(|card| async move {
            (card.key.clone(), self.respond(&card.key, context).await)
        });
        join_all(calls).await
    }

    fn credential(&self, card: &PersonaCard) -> Result<String> {
        let var = card.provider.credential_var();
        match std::env::var(var) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(CsiError::provider(
                &card.key,
                format!("credential {var} is not set"),
            )),
        }
    }

    async fn dispatch(&self, card: &PersonaCard, prompt: &str) -> Result<String> {
        match card.provider {
            Provider::OpenAI => self.openai_chat(card, prompt, OPENAI_CHAT_URL).await,
            Provider::Groq => self.openai_chat(card, prompt, GROQ_CHAT_URL).await,
            Provider::Mistral => self.openai_chat(card, prompt, MISTRAL_CHAT_URL).await,
            Provider::Anthropic => self.anthropic_messages(card, prompt).await,
            Provider::Gemini => self.gemini_generate(card, prompt).await,
            Provider::Cohere => self.cohere_generate(card, prompt).await,
            Provider::Emergence => {
                self.credential(card)?;
                Ok(simulated_reply(prompt))
            },
        }
    }

    /// OpenAI-compatible chat completions (OpenAI, Groq, Mistral).
    async fn openai_chat(&self, card: &PersonaCard, prompt: &str, url: &str) -> Result<String> {
        let api_key = self.credential(card)?;

        let mut messages = Vec::new();
        if let Some(system) = &card.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let request = ChatRequest {
            model: card.model.clone(),
            messages,
            max_tokens: None,
        };

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&request)
            .send()
            .await
            .map_err(|e| CsiError::provider(&card.key, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CsiError::provider(&card.key, format!("HTTP {status}: {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CsiError::provider(&card.key, e))?;
        parsed
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| CsiError::provider(&card.key, "response contained no choices"))
    }

    async fn anthropic_messages(&self, card: &PersonaCard, prompt: &str) -> Result<String> {
        let api_key = self.credential(card)?;

        let request = AnthropicRequest {
            model: card.model.clone(),
            max_tokens: ANTHROPIC_MAX_TOKENS,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            system: card.system_prompt.clone(),
        };

        let response = self
            .client
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| CsiError::provider(&card.key, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CsiError::provider(&card.key, format!("HTTP {status}: {body}")));
        }

        let parsed: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| CsiError::provider(&card.key, e))?;
        parsed
            .content
            .first()
            .map(|block| block.text.clone())
            .ok_or_else(|| CsiError::provider(&card.key, "response contained no content"))
    }

    async fn gemini_generate(&self, card: &PersonaCard, prompt: &str) -> Result<String> {
        let api_key = self.credential(card)?;

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let url = format!("{GEMINI_BASE_URL}/{}:generateContent", card.model);
        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| CsiError::provider(&card.key, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CsiError::provider(&card.key, format!("HTTP {status}: {body}")));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| CsiError::provider(&card.key, e))?;
        parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| CsiError::provider(&card.key, "response contained no candidates"))
    }

    async fn cohere_generate(&self, card: &PersonaCard, prompt: &str) -> Result<String> {
        let api_key = self.credential(card)?;

        let request = CohereRequest {
            model: card.model.clone(),
            prompt: prompt.to_string(),
            max_tokens: COHERE_MAX_TOKENS,
        };

        let response = self
            .client
            .post(COHERE_GENERATE_URL)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&request)
            .send()
            .await
            .map_err(|e| CsiError::provider(&card.key, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CsiError::provider(&card.key, format!("HTTP {status}: {body}")));
        }

        let parsed: CohereResponse = response
            .json()
            .await
            .map_err(|e| CsiError::provider(&card.key, e))?;
        parsed
            .generations
            .first()
            .map(|generation| generation.text.clone())
            .ok_or_else(|| CsiError::provider(&card.key, "response contained no generations"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt_topic() {
        let registry = PersonaRegistry::new();
        let context = AgentContext::for_topic("How can we make cities more sustainable?");

        let prompt = render_prompt(registry.get("creative").unwrap(), &context);
        assert_eq!(
            prompt,
            "As a creative thinker, generate innovative ideas for: How can we make cities more sustainable?"
        );

        let prompt = render_prompt(registry.get("facilitator").unwrap(), &context);
        assert_eq!(
            prompt,
            "As a facilitator, guide the discussion and ensure smooth communication between participants discussing: How can we make cities more sustainable?"
        );
    }

    #[test]
    fn test_render_prompt_ideas_and_perspectives() {
        let registry = PersonaRegistry::new();
        let context = AgentContext {
            topic: "ignored".to_string(),
            ideas: vec!["solar roofs".to_string(), "car-free zones".to_string()],
            perspectives: vec!["optimist".to_string(), "skeptic".to_string()],
        };

        let prompt = render_prompt(registry.get("analyst").unwrap(), &context);
        assert_eq!(
            prompt,
            r#"As a data analyst, analyze the following ideas and provide data-driven insights: ["solar roofs", "car-free zones"]"#
        );

        let prompt = render_prompt(registry.get("mediator").unwrap(), &context);
        assert_eq!(
            prompt,
            r#"As a mediator, help find common ground between these perspectives: ["optimist", "skeptic"]"#
        );
    }

    #[test]
    fn test_simulated_reply_wraps_the_prompt() {
        let registry = PersonaRegistry::new();
        let context = AgentContext::for_topic("urban farming");
        let prompt = render_prompt(registry.get("innovator").unwrap(), &context);
        assert_eq!(
            simulated_reply(&prompt),
            "Innovative perspective on: As an innovator, explore cutting-edge solutions for: urban farming"
        );
    }

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest {
            model: "gpt-4-turbo-preview".to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "sys".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: "hi".to_string(),
                },
            ],
            max_tokens: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4-turbo-preview");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_anthropic_request_shape() {
        let request = AnthropicRequest {
            model: "claude-3-opus".to_string(),
            max_tokens: ANTHROPIC_MAX_TOKENS,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            system: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["max_tokens"], 1024);
        assert!(json.get("system").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let chat: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"an idea"}}]}"#,
        )
        .unwrap();
        assert_eq!(chat.choices[0].message.content, "an idea");

        let anthropic: AnthropicResponse =
            serde_json::from_str(r#"{"content":[{"type":"text","text":"insight"}]}"#).unwrap();
        assert_eq!(anthropic.content[0].text, "insight");

        let gemini: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"a plan"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(gemini.candidates[0].content.parts[0].text, "a plan");

        let cohere: CohereResponse =
            serde_json::from_str(r#"{"generations":[{"text":"guidance"}]}"#).unwrap();
        assert_eq!(cohere.generations[0].text, "guidance");
    }

    #[tokio::test]
    async fn test_unknown_persona_is_rejected() {
        let registry = AgentRegistry::new(&AgentConfig::default()).unwrap();
        let err = registry
            .respond("philosopher", &AgentContext::for_topic("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, CsiError::Validation(_)));
    }
}
