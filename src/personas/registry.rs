//! Persona registry: the fixed roster of agent collaborators.
//!
//! The registry holds the embedded persona cards in a stable order. That
//! order is load-bearing: interaction-graph node indices and dashboard
//! listings both follow it, so `creative` is always first and `innovator`
//! always last.

use crate::personas::card::{ContextField, PersonaCard, Provider};

/// The embedded persona roster.
fn embedded_personas() -> Vec<PersonaCard> {
    vec![
        PersonaCard::new(
            "creative",
            "Creative Thinker",
            Provider::OpenAI,
            "gpt-4-turbo-preview",
            "As a creative thinker, generate innovative ideas for",
            ContextField::Topic,
        )
        .system_prompt(
            "You are a creative thinker focused on generating innovative and out-of-the-box ideas.",
        ),
        PersonaCard::new(
            "analyst",
            "Data Analyst",
            Provider::Anthropic,
            "claude-3-opus",
            "As a data analyst, analyze the following ideas and provide data-driven insights",
            ContextField::Ideas,
        )
        .system_prompt(
            "You are a data analyst focused on providing data-driven insights and analysis.",
        ),
        PersonaCard::new(
            "risk",
            "Risk Assessor",
            Provider::OpenAI,
            "gpt-4-turbo-preview",
            "As a risk assessor, identify potential challenges and risks in these ideas",
            ContextField::Ideas,
        )
        .system_prompt(
            "You are a risk assessor focused on identifying potential challenges and flaws.",
        ),
        PersonaCard::new(
            "mediator",
            "Mediator",
            Provider::Groq,
            "mixtral-8x7b-32768",
            "As a mediator, help find common ground between these perspectives",
            ContextField::Perspectives,
        )
        .system_prompt(
            "You are a mediator focused on balancing conflicting opinions and finding common ground.",
        ),
        PersonaCard::new(
            "strategist",
            "Strategist",
            Provider::Gemini,
            "gemini-pro",
            "As a strategist, develop an action plan based on these ideas",
            ContextField::Ideas,
        ),
        PersonaCard::new(
            "facilitator",
            "Facilitator",
            Provider::Cohere,
            "command",
            "As a facilitator, guide the discussion and ensure smooth communication between participants discussing",
            ContextField::Topic,
        ),
        PersonaCard::new(
            "innovator",
            "Innovator",
            Provider::Emergence,
            "simulated",
            "As an innovator, explore cutting-edge solutions for",
            ContextField::Topic,
        ),
    ]
}

/// Persona registry with the embedded roster
///
/// # Example
/// ```
/// use csi::personas::PersonaRegistry;
///
/// let registry = PersonaRegistry::new();
/// assert_eq!(registry.len(), 7);
///
/// let card = registry.get("mediator").unwrap();
/// assert_eq!(card.role, "Mediator");
/// ```
pub struct PersonaRegistry {
    cards: Vec<PersonaCard>,
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonaRegistry {
    /// Create a new registry with the embedded personas loaded
    pub fn new() -> Self {
        Self {
            cards: embedded_personas(),
        }
    }

    /// Create a registry from custom cards, in the given order
    pub fn from_cards(cards: Vec<PersonaCard>) -> Self {
        Self { cards }
    }

    /// Get a persona by key
    pub fn get(&self, key: &str) -> Option<&PersonaCard> {
        self.cards.iter().find(|card| card.key == key)
    }

    /// Check if a persona exists in the registry
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of personas in the roster
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the roster is empty
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over the cards in roster order
    pub fn iter(&self) -> impl Iterator<Item = &PersonaCard> {
        self.cards.iter()
    }

    /// Persona keys in roster order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|card| card.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_size_and_order() {
        let registry = PersonaRegistry::new();
        assert_eq!(registry.len(), 7);

        let keys: Vec<_> = registry.keys().collect();
        assert_eq!(
            keys,
            [
                "creative",
                "analyst",
                "risk",
                "mediator",
                "strategist",
                "facilitator",
                "innovator"
            ]
        );
    }

    #[test]
    fn test_get_by_key() {
        let registry = PersonaRegistry::new();

        let card = registry.get("analyst").unwrap();
        assert_eq!(card.role, "Data Analyst");
        assert_eq!(card.provider, Provider::Anthropic);
        assert_eq!(card.model, "claude-3-opus");

        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_provider_coverage() {
        let registry = PersonaRegistry::new();
        let used: std::collections::HashSet<_> =
            registry.iter().map(|card| card.provider).collect();

        // Mistral is credential-only; no persona routes to it today.
        assert!(!used.contains(&Provider::Mistral));
        assert_eq!(used.len(), 6);
    }

    #[test]
    fn test_system_prompts_where_the_provider_takes_one() {
        let registry = PersonaRegistry::new();

        for key in ["creative", "analyst", "risk", "mediator"] {
            assert!(registry.get(key).unwrap().system_prompt.is_some(), "{key}");
        }
        for key in ["strategist", "facilitator", "innovator"] {
            assert!(registry.get(key).unwrap().system_prompt.is_none(), "{key}");
        }
    }
}
