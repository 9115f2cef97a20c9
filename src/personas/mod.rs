//! Persona registry and metadata.
//!
//! Seven fixed personas collaborate with the human subgroups. Each one is a
//! configuration record carrying:
//! - A stable key that doubles as its interaction-graph node label
//! - The LLM provider and model serving it
//! - Its system prompt (when the provider call takes one) and task prompt
//!
//! # Example
//!
//! ```
//! use csi::personas::{PersonaRegistry, Provider};
//!
//! let registry = PersonaRegistry::new();
//! assert_eq!(registry.len(), 7);
//!
//! let card = registry.get("creative").unwrap();
//! assert_eq!(card.provider, Provider::OpenAI);
//! assert_eq!(card.role, "Creative Thinker");
//! ```

mod card;
mod registry;

pub use card::{ContextField, PersonaCard, Provider};
pub use registry::PersonaRegistry;
