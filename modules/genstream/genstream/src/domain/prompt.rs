//! Request payloads the relay knows how to turn into a generation prompt.

use genstream_sdk::{
    AlphabetCardRequest, PortfolioRequest, ResumeAnalysisRequest, SpeakingPromptRequest,
    VoiceFeedbackRequest, WordCardRequest, routes,
};
use serde::de::DeserializeOwned;

use crate::domain::error::RelayError;

/// A relay request type: where it is served, what it requires, and the prompt it renders.
pub trait PromptTemplate: DeserializeOwned + Send + 'static {
    const ROUTE: &'static str;

    /// # Errors
    /// Returns [`RelayError::Validation`] naming the first missing field.
    fn validate(&self) -> Result<(), RelayError>;

    fn render(&self) -> String;
}

fn require(field: &str, value: &str) -> Result<(), RelayError> {
    if value.trim().is_empty() {
        return Err(RelayError::Validation {
            detail: format!("missing required field '{field}'"),
        });
    }
    Ok(())
}

impl PromptTemplate for WordCardRequest {
    const ROUTE: &'static str = routes::WORD_CARD;

    fn validate(&self) -> Result<(), RelayError> {
        require("word", &self.word)?;
        require("language", &self.language)
    }

    fn render(&self) -> String {
        let Self { word, language } = self;
        format!(
            r#"Create a flashcard in JSON format for the word "{word}" in {language}:
{{
  "word": "{word}",
  "translation": "...",
  "pronunciation": "...",
  "example": "...",
  "exampleTranslation": "...",
  "audioUrl": "https://...",
  "imageUrl": "https://..."
}}
Make it helpful for English learners. Respond with the JSON object only."#
        )
    }
}

impl PromptTemplate for SpeakingPromptRequest {
    const ROUTE: &'static str = routes::SPEAKING_PROMPT;

    fn validate(&self) -> Result<(), RelayError> {
        require("difficulty", &self.difficulty)?;
        require("topic", &self.topic)
    }

    fn render(&self) -> String {
        let Self { difficulty, topic } = self;
        format!(
            r#"Create a speaking practice sentence for a {difficulty} learner on "{topic}".
Return JSON only:
{{
  "text": "...",
  "translation": "...",
  "difficulty": "{difficulty}",
  "category": "{topic}"
}}"#
        )
    }
}

impl PromptTemplate for AlphabetCardRequest {
    const ROUTE: &'static str = routes::ALPHABET_CARD;

    fn validate(&self) -> Result<(), RelayError> {
        require("letter", &self.letter)
    }

    fn render(&self) -> String {
        let letter = &self.letter;
        format!(
            r#"Generate a flashcard for the Russian letter "{letter}" as JSON only:
{{
  "letter": "{letter}",
  "latinized": "...",
  "example": "...",
  "exampleTranslation": "...",
  "pronunciation": "...",
  "audioUrl": "https://..."
}}"#
        )
    }
}

impl PromptTemplate for VoiceFeedbackRequest {
    const ROUTE: &'static str = routes::VOICE_FEEDBACK;

    fn validate(&self) -> Result<(), RelayError> {
        require("text", &self.text)?;
        if self.audio_accuracy.is_none() {
            return Err(RelayError::Validation {
                detail: "missing required field 'audioAccuracy'".into(),
            });
        }
        Ok(())
    }

    fn render(&self) -> String {
        let text = &self.text;
        let accuracy = self.audio_accuracy.unwrap_or_default();
        format!(
            r#"A learner pronounced "{text}" with {accuracy}% accuracy.
Provide motivational feedback based on accuracy. Return JSON only:
{{
  "accuracy": {accuracy},
  "feedback": "..."
}}"#
        )
    }
}

impl PromptTemplate for ResumeAnalysisRequest {
    const ROUTE: &'static str = routes::ANALYZE;

    fn validate(&self) -> Result<(), RelayError> {
        require("jd", &self.jd)?;
        require("extractedText", &self.extracted_text)
    }

    fn render(&self) -> String {
        let Self { jd, extracted_text } = self;
        format!(
            r"You are an experienced applicant tracking system for technical roles.
Evaluate the resume against the job description and answer in exactly five sections:
- Job Description Match
- Missing Keywords
- Profile Summary
- Personalized suggestions for skills, keywords and achievements
- Application Success rate (1-100)

Identical inputs must always produce the same evaluation.

Resume: {extracted_text}
Description: {jd}"
        )
    }
}

impl PromptTemplate for PortfolioRequest {
    const ROUTE: &'static str = routes::PORTFOLIO;

    fn validate(&self) -> Result<(), RelayError> {
        require("portfolioContent", &self.portfolio_content)
    }

    fn render(&self) -> String {
        let content = &self.portfolio_content;
        format!(
            r"You build portfolios for software developers.
Generate one fully self-contained HTML file: CSS inside <style> tags, JavaScript inside
<script> tags, no external files. Use semantic HTML, a responsive Grid or Flexbox layout,
readable typography, a consistent colour scheme, hover effects, smooth scrolling and
buttons for contact and project links.

Base the page exactly on these details:
{content}

Output only the complete HTML file, with no explanations, comments or placeholders.
Identical details must always produce the same page."
        )
    }
}
