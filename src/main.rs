// main.rs - sipdump: decode SIP messages from stdin and print them as JSON

use anyhow::{Context, Result};
use futures::StreamExt;
use serde_json::json;
use sip_message_parser::{codec::SipCodec, CallingPartyPolicy, ParserConfig};
use tokio_util::codec::FramedRead;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Read the JSON file named by `SIP_PARSER_CONFIG`, or use the defaults
fn load_config() -> Result<ParserConfig> {
    let Ok(path) = std::env::var("SIP_PARSER_CONFIG") else {
        return Ok(ParserConfig::default());
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading parser config {}", path))?;
    let config = ParserConfig::from_json(&text)
        .with_context(|| format!("parsing parser config {}", path))?;
    info!(%path, "loaded parser config");
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config()?;
    debug!(?config, "parser configuration");

    let policy = std::env::var("SIP_CALLING_PARTY")
        .map(|s| CallingPartyPolicy::from(s.as_str()))
        .unwrap_or_default();

    let mut frames = FramedRead::new(tokio::io::stdin(), SipCodec::with_config(config));
    let mut count = 0usize;

    while let Some(frame) = frames.next().await {
        let message = match frame {
            Ok(message) => message,
            Err(e) => {
                // FramedRead ends the stream after a decode error
                error!(error = %e, "failed to decode SIP message");
                break;
            }
        };

        for e in &message.errors {
            warn!(error = %e, "header error");
        }

        let calling_party = match message.calling_party(policy) {
            Ok(party) => Some(party),
            Err(e) => {
                debug!(error = %e, "no calling party");
                None
            }
        };

        let output = json!({
            "message": &message,
            "calling_party": calling_party,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("serialising message")?
        );
        count += 1;
    }

    info!(messages = count, "done");
    Ok(())
}
