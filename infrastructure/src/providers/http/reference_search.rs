//! Reference search through a chat model

use super::{Endpoint, EndpointConfig, HttpError};
use crate::providers::references::{parse_references, search_prompt};
use crate::providers::wire::ChatMessage;
use async_trait::async_trait;
use roundtable_application::{RetrievalError, RetrievalProvider};
use roundtable_domain::{Reference, Role, Topic};
use tracing::debug;

const SEARCH_TEMPERATURE: f32 = 0.1;
const SEARCH_MAX_TOKENS: u32 = 4000;

/// [`RetrievalProvider`] that asks a chat model for publications
pub struct LlmReferenceSearcher {
    endpoint: Endpoint,
}

impl LlmReferenceSearcher {
    pub fn new(config: EndpointConfig) -> Result<Self, HttpError> {
        Ok(Self {
            endpoint: Endpoint::new(config)?,
        })
    }
}

impl From<HttpError> for RetrievalError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Timeout => RetrievalError::Timeout,
            HttpError::InvalidResponse(msg) => RetrievalError::InvalidResponse(msg),
            other => RetrievalError::RequestFailed(other.to_string()),
        }
    }
}

#[async_trait]
impl RetrievalProvider for LlmReferenceSearcher {
    async fn fetch(
        &self,
        role: &Role,
        topic: &Topic,
        max_results: usize,
    ) -> Result<Vec<Reference>, RetrievalError> {
        let (system, user) = search_prompt(role, topic, max_results);
        let answer = self
            .endpoint
            .chat(
                vec![ChatMessage::system(system), ChatMessage::user(user)],
                SEARCH_TEMPERATURE,
                SEARCH_MAX_TOKENS,
            )
            .await?
            .ok_or_else(|| RetrievalError::InvalidResponse("empty search answer".to_string()))?;

        let references =
            parse_references(&answer, max_results).map_err(RetrievalError::InvalidResponse)?;
        debug!(
            role = %role.id,
            found = references.len(),
            verified = references.iter().filter(|r| r.verified).count(),
            "Reference search finished"
        );
        Ok(references)
    }
}
