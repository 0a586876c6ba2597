//! AI provider backends that turn free-form text into structured slides.
//!
//! Three vendors (OpenAI, Anthropic, Gemini) sit behind one
//! [`CompletionProvider`] trait, selected by [`ProviderKind`].

pub mod generator;
pub mod prompt;
pub mod provider;
pub mod response;

pub use generator::{GenerationRequest, SlideGenerator};
pub use prompt::{build_prompt, SlideCount};
pub use provider::{create_provider, CompletionProvider, ProviderConfig, ProviderKind};
pub use response::parse_slides_response;
