//! OpenAI-compatible chat completion payloads

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of `POST {base}/chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Text of the first choice, trimmed. `None` if missing or blank.
pub fn first_choice_text(body: &str) -> Result<Option<String>, serde_json::Error> {
    let response: ChatResponse = serde_json::from_str(body)?;
    Ok(response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_choice_text() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"  Hello  "}}]}"#;
        assert_eq!(first_choice_text(body).unwrap().as_deref(), Some("Hello"));
    }

    #[test]
    fn test_blank_or_missing_content_is_none() {
        assert_eq!(
            first_choice_text(r#"{"choices":[{"message":{"content":"   "}}]}"#).unwrap(),
            None
        );
        assert_eq!(
            first_choice_text(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap(),
            None
        );
        assert_eq!(first_choice_text(r#"{"choices":[]}"#).unwrap(), None);
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(first_choice_text("not json").is_err());
    }

    #[test]
    fn test_request_serializes_messages() {
        let request = ChatRequest {
            model: "deepseek-chat",
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: 0.7,
            max_tokens: 2000,
            stream: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "deepseek-chat");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["stream"], false);
    }
}
