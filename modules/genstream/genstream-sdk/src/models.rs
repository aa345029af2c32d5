use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Requests accepted by the relay
// ---------------------------------------------------------------------------
//
// Fields default to empty so that a missing field reaches validation and is reported as a
// problem-details 400 rather than a deserialization rejection.

/// Flashcard for a single vocabulary word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordCardRequest {
    pub word: String,
    pub language: String,
}

/// Sentence to practise speaking at a given level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeakingPromptRequest {
    pub difficulty: String,
    pub topic: String,
}

/// Flashcard for one letter of the Cyrillic alphabet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphabetCardRequest {
    pub letter: String,
}

/// Feedback on a pronunciation attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoiceFeedbackRequest {
    pub text: String,
    /// Percentage in `0..=100`; `None` when the caller did not send it.
    pub audio_accuracy: Option<f64>,
}

/// Resume screening against a job description. Produces prose, not JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeAnalysisRequest {
    pub jd: String,
    pub extracted_text: String,
}

/// Portfolio page generation from free-form candidate details. Produces a single HTML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PortfolioRequest {
    pub portfolio_content: String,
}

// ---------------------------------------------------------------------------
// Documents reconstructed by consumers
// ---------------------------------------------------------------------------
//
// Generated documents are best-effort: every field tolerates being absent.

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WordCard {
    pub word: String,
    pub translation: String,
    pub pronunciation: String,
    pub example: String,
    pub example_translation: String,
    pub audio_url: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeakingPrompt {
    pub text: String,
    pub translation: String,
    pub difficulty: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlphabetCard {
    pub letter: String,
    pub latinized: String,
    pub example: String,
    pub example_translation: String,
    pub pronunciation: String,
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceFeedback {
    pub accuracy: f64,
    pub feedback: String,
}
