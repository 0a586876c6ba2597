//! Prompt construction for slide generation.

use deck_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Largest slide count a caller may request.
pub const MAX_SLIDES: usize = 50;

/// System instructions shared by every provider.
pub const SYSTEM_PROMPT: &str = "You are an expert presentation designer. \
You turn source material into clear, well-structured slide decks and you \
always answer with valid JSON only, without commentary.";

/// How many slides the model should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideCount {
    /// Let the model pick a count that fits the content.
    #[default]
    Auto,
    /// Exactly this many slides.
    Exact(usize),
}

impl FromStr for SlideCount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }

        match s.parse::<usize>() {
            Ok(n) if (1..=MAX_SLIDES).contains(&n) => Ok(Self::Exact(n)),
            _ => Err(Error::InvalidInput(format!(
                "slide count must be 'auto' or a number from 1 to {}, got '{}'",
                MAX_SLIDES, s
            ))),
        }
    }
}

impl fmt::Display for SlideCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Exact(n) => write!(f, "{}", n),
        }
    }
}

/// Build the user prompt asking for a JSON slide array.
pub fn build_prompt(content: &str, guidance: Option<&str>, count: SlideCount) -> String {
    let count_line = match count {
        SlideCount::Auto => {
            "Choose the number of slides that best fits the material (usually 5 to 12).".to_string()
        }
        SlideCount::Exact(1) => "Create exactly 1 slide.".to_string(),
        SlideCount::Exact(n) => format!("Create exactly {} slides.", n),
    };

    let guidance_section = guidance
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(|g| format!("\nAdditional guidance from the author:\n{}\n", g))
        .unwrap_or_default();

    format!(
        "Convert the following content into a slide presentation.\n\
         {count_line}\n\
         {guidance_section}\n\
         Respond with a JSON object of the form:\n\
         {{\"slides\": [{{\"title\": \"...\", \"content\": \"...\", \"layout\": \"...\", \"notes\": \"...\"}}]}}\n\
         \n\
         Rules:\n\
         - \"title\" is a short heading without a leading '#'.\n\
         - \"content\" is Markdown: bullet lists, short paragraphs, tables or code blocks.\n\
         - Never use a line containing only '---' inside \"content\".\n\
         - \"layout\" is one of \"title\", \"content\", \"two-column\", \"quote\" or \"section\".\n\
         - \"notes\" holds optional speaker notes.\n\
         \n\
         Content:\n\
         \"\"\"\n\
         {content}\n\
         \"\"\"",
        count_line = count_line,
        guidance_section = guidance_section,
        content = content.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_count_parse() {
        assert_eq!("auto".parse::<SlideCount>().unwrap(), SlideCount::Auto);
        assert_eq!("AUTO".parse::<SlideCount>().unwrap(), SlideCount::Auto);
        assert_eq!("".parse::<SlideCount>().unwrap(), SlideCount::Auto);
        assert_eq!(" 8 ".parse::<SlideCount>().unwrap(), SlideCount::Exact(8));
        assert!("0".parse::<SlideCount>().is_err());
        assert!("51".parse::<SlideCount>().is_err());
        assert!("many".parse::<SlideCount>().is_err());
    }

    #[test]
    fn test_slide_count_display() {
        assert_eq!(SlideCount::Auto.to_string(), "auto");
        assert_eq!(SlideCount::Exact(4).to_string(), "4");
    }

    #[test]
    fn test_prompt_exact_count() {
        let prompt = build_prompt("Rust ownership", None, SlideCount::Exact(6));
        assert!(prompt.contains("Create exactly 6 slides."));
        assert!(prompt.contains("\"\"\"\nRust ownership\n\"\"\""));
        assert!(!prompt.contains("Additional guidance"));
    }

    #[test]
    fn test_prompt_with_guidance() {
        let prompt = build_prompt("Topic", Some("  Keep it playful  "), SlideCount::Auto);
        assert!(prompt.contains("Additional guidance from the author:\nKeep it playful\n"));
        assert!(prompt.contains("best fits the material"));
    }

    #[test]
    fn test_prompt_blank_guidance_ignored() {
        let prompt = build_prompt("Topic", Some("   "), SlideCount::Exact(1));
        assert!(!prompt.contains("Additional guidance"));
        assert!(prompt.contains("Create exactly 1 slide."));
    }
}
