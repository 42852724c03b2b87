//! Speech synthesis through `/audio/speech`

use super::{Endpoint, EndpointConfig, HttpError};
use crate::providers::speech_input::{estimate_duration_secs, prepare_input, voice_id};
use async_trait::async_trait;
use roundtable_application::{SpeechSynthesizer, SynthesisError};
use roundtable_domain::AudioClip;
use serde::Serialize;

const SAMPLE_RATE: u32 = 32000;

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    sample_rate: u32,
    stream: bool,
    speed: f32,
    gain: f32,
}

/// [`SpeechSynthesizer`] backed by an OpenAI-compatible speech endpoint
pub struct HttpSpeechSynthesizer {
    endpoint: Endpoint,
    format: String,
    qualify_voice: bool,
}

impl HttpSpeechSynthesizer {
    pub fn new(
        config: EndpointConfig,
        format: impl Into<String>,
        qualify_voice: bool,
    ) -> Result<Self, HttpError> {
        Ok(Self {
            endpoint: Endpoint::new(config)?,
            format: format.into(),
            qualify_voice,
        })
    }
}

impl From<HttpError> for SynthesisError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Timeout => SynthesisError::Timeout,
            other => SynthesisError::RequestFailed(other.to_string()),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechSynthesizer {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<AudioClip, SynthesisError> {
        let input = prepare_input(text);
        if input.is_empty() {
            return Err(SynthesisError::EmptyText);
        }
        let voice = voice_id(&self.endpoint.model, voice, self.qualify_voice);
        let request = SpeechRequest {
            model: &self.endpoint.model,
            input: &input,
            voice: &voice,
            response_format: &self.format,
            sample_rate: SAMPLE_RATE,
            stream: false,
            speed: 1.0,
            gain: 0.0,
        };

        let bytes = self.endpoint.post_json("audio/speech", &request).await?;
        if bytes.is_empty() {
            return Err(SynthesisError::RequestFailed("empty audio".to_string()));
        }
        Ok(AudioClip::new(
            bytes,
            self.format.clone(),
            estimate_duration_secs(&input),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_text_is_rejected_before_request() {
        let synth = HttpSpeechSynthesizer::new(
            EndpointConfig::new("http://127.0.0.1:9", "tts", "key"),
            "mp3",
            true,
        )
        .unwrap();
        assert_eq!(
            synth.synthesize(" \n ", "alex").await,
            Err(SynthesisError::EmptyText)
        );
    }

    #[test]
    fn test_request_payload() {
        let request = SpeechRequest {
            model: "FunAudioLLM/CosyVoice2-0.5B",
            input: "hello",
            voice: "FunAudioLLM/CosyVoice2-0.5B:alex",
            response_format: "mp3",
            sample_rate: SAMPLE_RATE,
            stream: false,
            speed: 1.0,
            gain: 0.0,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["sample_rate"], 32000);
        assert_eq!(value["voice"], "FunAudioLLM/CosyVoice2-0.5B:alex");
        assert_eq!(value["response_format"], "mp3");
    }
}
