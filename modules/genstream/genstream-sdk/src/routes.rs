//! Relay HTTP routes.

pub const ROOT: &str = "/";
pub const HEALTHZ: &str = "/healthz";

pub const WORD_CARD: &str = "/api/generate/word-card";
pub const SPEAKING_PROMPT: &str = "/api/generate/speaking-prompt";
pub const ALPHABET_CARD: &str = "/api/generate/alphabet-card";
pub const VOICE_FEEDBACK: &str = "/api/generate/voice-feedback";
pub const ANALYZE: &str = "/api/analyze";
pub const PORTFOLIO: &str = "/api/portfolio";
