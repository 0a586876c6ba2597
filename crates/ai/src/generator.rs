//! Slide generation workflow: prompt, provider call, response parsing.

use crate::prompt::{build_prompt, SlideCount};
use crate::provider::CompletionProvider;
use crate::response::parse_slides_response;
use deck_core::{Error, Result, Slide};

/// What to generate slides from.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// Free-form source text.
    pub content: String,

    /// Optional extra instructions.
    pub guidance: Option<String>,

    pub slide_count: SlideCount,
}

impl GenerationRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = Some(guidance.into());
        self
    }

    pub fn with_slide_count(mut self, slide_count: SlideCount) -> Self {
        self.slide_count = slide_count;
        self
    }
}

/// Turns text into slides through a configured provider.
pub struct SlideGenerator {
    provider: Box<dyn CompletionProvider>,
}

impl SlideGenerator {
    pub fn new(provider: Box<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// The provider in use.
    pub fn provider(&self) -> &dyn CompletionProvider {
        self.provider.as_ref()
    }

    /// Generate slides for the request.
    ///
    /// Provider failures propagate unchanged; an unusable answer becomes
    /// [`Error::InvalidResponse`].
    pub fn generate_slides(&self, request: &GenerationRequest) -> Result<Vec<Slide>> {
        if request.content.trim().is_empty() {
            return Err(Error::InvalidInput("content is empty".to_string()));
        }

        let prompt = build_prompt(
            &request.content,
            request.guidance.as_deref(),
            request.slide_count,
        );
        let answer = self.provider.complete_json(&prompt)?;
        let slides = parse_slides_response(&answer)?;

        if let SlideCount::Exact(expected) = request.slide_count {
            if slides.len() != expected {
                log::warn!(
                    "Asked {} for {} slides, got {}",
                    self.provider.kind(),
                    expected,
                    slides.len()
                );
            }
        }

        Ok(slides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderKind;
    use std::sync::{Arc, Mutex};

    /// Provider returning a canned answer and remembering the prompt.
    struct FakeProvider {
        answer: Result<String>,
        last_prompt: Arc<Mutex<Option<String>>>,
    }

    impl FakeProvider {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                last_prompt: Arc::default(),
            }
        }
    }

    impl CompletionProvider for FakeProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::OpenAi
        }

        fn model(&self) -> &str {
            "fake"
        }

        fn complete_json(&self, prompt: &str) -> Result<String> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(Error::Provider(e.to_string())),
            }
        }
    }

    #[test]
    fn test_generate_slides() {
        let generator = SlideGenerator::new(Box::new(FakeProvider::answering(
            r#"{"slides": [{"title": "A", "content": "a"}, {"title": "B", "content": "b"}]}"#,
        )));
        let request = GenerationRequest::new("Some notes")
            .with_guidance("Formal tone")
            .with_slide_count(SlideCount::Exact(2));

        let slides = generator.generate_slides(&request).unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[1].title, "B");
    }

    #[test]
    fn test_prompt_reaches_provider() {
        let provider = FakeProvider::answering(r#"[{"title": "A", "content": "a"}]"#);
        let seen = Arc::clone(&provider.last_prompt);
        let generator = SlideGenerator::new(Box::new(provider));

        let request = GenerationRequest::new("Photosynthesis").with_slide_count(SlideCount::Exact(3));
        generator.generate_slides(&request).unwrap();

        let expected = build_prompt("Photosynthesis", None, SlideCount::Exact(3));
        assert_eq!(seen.lock().unwrap().as_deref(), Some(expected.as_str()));
        assert_eq!(generator.provider().model(), "fake");
    }

    #[test]
    fn test_unparseable_answer() {
        let generator = SlideGenerator::new(Box::new(FakeProvider::answering("not json")));
        let err = generator
            .generate_slides(&GenerationRequest::new("text"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn test_provider_error_propagates() {
        let provider = FakeProvider {
            answer: Err(Error::Provider("rate limited".to_string())),
            last_prompt: Arc::default(),
        };
        let generator = SlideGenerator::new(Box::new(provider));
        let err = generator
            .generate_slides(&GenerationRequest::new("text"))
            .unwrap_err();
        assert!(matches!(err, Error::Provider(msg) if msg.contains("rate limited")));
    }

    #[test]
    fn test_empty_content_rejected() {
        let generator = SlideGenerator::new(Box::new(FakeProvider::answering("[]")));
        let err = generator
            .generate_slides(&GenerationRequest::new("   "))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
