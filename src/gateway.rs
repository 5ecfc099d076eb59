//! Speech synthesis gateway client.
//!
//! The gateway is a remote service: it takes cue-annotated text plus a voice
//! identifier and answers with a playable audio URL and, when the voice model
//! supports it, a word-timing alignment. The reader treats it as an opaque
//! collaborator with latency and failure modes; there is no retry here, a
//! failed request surfaces to the caller and a fresh attempt is always
//! user-initiated.

use crate::alignment::AlignmentWord;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisResponse {
    pub audio_url: String,
    #[serde(default)]
    pub alignment: Option<RawAlignment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAlignment {
    pub words: Vec<AlignmentWord>,
}

/// Seam for the remote synthesis service; the runtime talks to the real HTTP
/// gateway, tests substitute a canned one.
pub trait SynthesisGateway: Send + Sync {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResponse>;

    /// Fetch the audio resource the synthesis response points at.
    fn fetch_audio(&self, audio_url: &str) -> Result<Vec<u8>>;
}

pub struct HttpSynthesisGateway {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpSynthesisGateway {
    /// The timeout bounds the whole request so a hung call becomes an error
    /// instead of leaving playback stuck loading.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Building synthesis HTTP client")?;
        info!(url = %base_url, timeout_secs = timeout.as_secs(), "Configured synthesis gateway");
        Ok(Self { base_url, client })
    }
}

impl SynthesisGateway for HttpSynthesisGateway {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResponse> {
        debug!(
            voice = %request.voice_id,
            chars = request.text.len(),
            "Requesting speech synthesis"
        );
        let response = self
            .client
            .post(&self.base_url)
            .json(request)
            .send()
            .context("Sending synthesis request")?
            .error_for_status()
            .context("Synthesis service returned an error status")?;
        response
            .json::<SynthesisResponse>()
            .context("Decoding synthesis response")
    }

    fn fetch_audio(&self, audio_url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(audio_url)
            .send()
            .with_context(|| format!("Fetching audio from {audio_url}"))?
            .error_for_status()
            .context("Audio fetch returned an error status")?;
        let bytes = response.bytes().context("Reading audio body")?;
        debug!(bytes = bytes.len(), "Fetched synthesized audio");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_response_with_alignment() {
        let body = r#"{
            "audio_url": "https://voice.example.com/a.mp3",
            "alignment": {"words": [{"word": "hi", "start": 0.0, "end": 0.3}]}
        }"#;
        let response: SynthesisResponse = serde_json::from_str(body).unwrap();
        let alignment = response.alignment.unwrap();
        assert_eq!(alignment.words.len(), 1);
        assert_eq!(alignment.words[0].word, "hi");
    }

    #[test]
    fn tolerates_missing_alignment() {
        let body = r#"{"audio_url": "https://voice.example.com/a.mp3"}"#;
        let response: SynthesisResponse = serde_json::from_str(body).unwrap();
        assert!(response.alignment.is_none());
    }

    #[test]
    fn serializes_request_without_empty_context() {
        let request = SynthesisRequest {
            text: "[happy] hi".to_string(),
            voice_id: "narrator-1".to_string(),
            context_id: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("context_id"));
    }
}
