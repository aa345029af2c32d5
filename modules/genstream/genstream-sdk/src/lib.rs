//! Public contract shared by the genstream relay and its consumers.
//!
//! - [`wire`]: the downstream event framing (`data: ...\n\n`, `[DONE]` sentinel) and the
//!   upstream generation request body.
//! - [`routes`]: HTTP paths served by the relay.
//! - [`models`]: request payloads accepted by the relay and the documents they produce.

pub mod models;
pub mod routes;
pub mod wire;

pub use models::{
    AlphabetCard, AlphabetCardRequest, PortfolioRequest, ResumeAnalysisRequest, SpeakingPrompt,
    SpeakingPromptRequest, VoiceFeedback, VoiceFeedbackRequest, WordCard, WordCardRequest,
};
pub use wire::GenerationRequest;
