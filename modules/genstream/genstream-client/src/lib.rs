//! genstream client library
//!
//! Calls the genstream relay and rebuilds the generated document from its framed event stream.
//! Network chunking is irrelevant: frames and multi-byte characters may arrive split across
//! any number of reads.
//!
//! Outcomes are kept apart:
//!
//! - a rejection before streaming started is [`ClientError::Preflight`], carrying the status and
//!   whether the relay or the backend refused;
//! - a stream that ends or breaks before `data: [DONE]` is [`ClientError::TruncatedStream`], even
//!   when the text received so far happens to be valid JSON;
//! - a completed stream whose text does not parse is [`ClientError::MalformedDocument`].
//!
//! # Example
//!
//! ```no_run
//! use genstream_client::{GenStreamClient, GenStreamClientConfig};
//! use genstream_sdk::WordCardRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GenStreamClient::from_config(GenStreamClientConfig::from_env()?)?;
//! let card = client
//!     .word_card(&WordCardRequest {
//!         word: "hello".into(),
//!         language: "Russian".into(),
//!     })
//!     .await?;
//! println!("{} -> {}", card.word, card.translation);
//! # Ok(())
//! # }
//! ```

mod client;
mod decoder;
mod error;
mod response;

pub use client::{GenStreamClient, GenStreamClientConfig};
pub use decoder::StreamDecoder;
pub use error::{ClientError, ErrorSource};
pub use response::{BoxStream, Response};

pub use http::StatusCode;
