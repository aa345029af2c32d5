//! Request one word card from a running relay, printing frames as they arrive.
//!
//! Run with: `cargo run --example word_card -- <word> [language]`
//! (honours `GENSTREAM_BASE_URL` and `GENSTREAM_TIMEOUT_SECS`).

use futures::StreamExt;
use genstream_client::{GenStreamClient, GenStreamClientConfig, StreamDecoder};
use genstream_sdk::{WordCard, WordCardRequest, routes};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let word = args.next().unwrap_or_else(|| "hello".to_owned());
    let language = args.next().unwrap_or_else(|| "Russian".to_owned());

    let client = GenStreamClient::from_config(GenStreamClientConfig::from_env()?)?;
    let response = client
        .execute(routes::WORD_CARD, &WordCardRequest { word, language })
        .await?;
    println!("Status: {}", response.status());

    let mut decoder = StreamDecoder::new();
    let mut body = response.into_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        println!("<- {}", String::from_utf8_lossy(&chunk).trim_end());
        decoder.feed(&chunk)?;
        if decoder.is_complete() {
            break;
        }
    }

    let card: WordCard = decoder.finish()?;
    println!("{} ({}): {}", card.word, card.pronunciation, card.translation);
    println!("  {} / {}", card.example, card.example_translation);
    Ok(())
}
