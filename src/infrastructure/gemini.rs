//! Gemini `generateContent` client, the production [`GenerativeBackend`].

use crate::core::assistant::{ChatMessage, Role};
use crate::core::error::GenerationError;
use crate::core::limiter::RateLimiter;
use crate::core::traits::GenerativeBackend;
use async_trait::async_trait;
use di::{inject, injectable};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_REQUESTS_PER_MINUTE: u32 = 58;
const TEMPERATURE: f64 = 0.65;
const MAX_OUTPUT_TOKENS: i64 = 8192;

/// Marker the API puts in quota-exhaustion error bodies.
const QUOTA_MARKER: &str = "RESOURCE_EXHAUSTED";

// --- wire types for the generateContent REST API ---

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: i64,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiBackend {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    limiter: RateLimiter,
}

#[injectable(GenerativeBackend)]
impl GeminiBackend {
    #[inject]
    pub fn create() -> GeminiBackend {
        dotenvy::dotenv().ok();
        let api_key = env::var("GOOGLE_API_KEY").expect("GOOGLE_API_KEY must be set");
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        let requests_per_minute = env::var("GEMINI_REQUESTS_PER_MINUTE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUESTS_PER_MINUTE);

        GeminiBackend::new(api_key, model, RateLimiter::new(requests_per_minute))
    }
}

impl GeminiBackend {
    pub fn new(api_key: String, model: String, limiter: RateLimiter) -> GeminiBackend {
        GeminiBackend {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            model,
            base_url: "https://generativelanguage.googleapis.com".to_owned(),
            limiter,
        }
    }

    /// Overrides the API endpoint, for tests and proxies.
    pub fn with_base_url(mut self, base_url: String) -> GeminiBackend {
        self.base_url = base_url;
        self
    }

    fn build_request(
        instruction: &str,
        history: &[ChatMessage],
        user_text: &str,
    ) -> GenerateContentRequest {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|m| Content {
                role: Some(
                    match m.role {
                        Role::User => "user",
                        // Gemini calls the assistant side "model".
                        Role::Assistant => "model",
                    }
                    .to_owned(),
                ),
                parts: vec![Part {
                    text: m.content.clone(),
                }],
            })
            .collect();

        contents.push(Content {
            role: Some("user".to_owned()),
            parts: vec![Part {
                text: user_text.to_owned(),
            }],
        });

        GenerateContentRequest {
            contents,
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: instruction.to_owned(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(
        &self,
        instruction: &str,
        history: &[ChatMessage],
        user_text: &str,
    ) -> Result<String, GenerationError> {
        self.limiter.acquire().await;

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let request = Self::build_request(instruction, history, user_text);

        debug!(
            "calling {} with {} context messages",
            self.model,
            request.contents.len() - 1
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Failed(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 || error_text.contains(QUOTA_MARKER) {
                return Err(GenerationError::QuotaExhausted(format!(
                    "API error ({}): {error_text}",
                    status.as_u16()
                )));
            }
            return Err(GenerationError::Failed(format!(
                "API error ({}): {error_text}",
                status.as_u16()
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Failed(format!("Failed to parse response: {e}")))?;

        result
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts)
            .and_then(|p| p.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| GenerationError::Failed("No response from Gemini".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> GeminiBackend {
        GeminiBackend::new(
            "test-key".to_owned(),
            DEFAULT_MODEL.to_owned(),
            RateLimiter::new(600),
        )
    }

    #[test]
    fn test_history_roles_map_to_wire_roles() {
        let history = vec![
            ChatMessage {
                role: Role::User,
                content: "Hi".to_owned(),
            },
            ChatMessage {
                role: Role::Assistant,
                content: "Hello!".to_owned(),
            },
        ];

        let request = GeminiBackend::build_request("be nice", &history, "Bye");

        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[0].role.as_deref(), Some("user"));
        assert_eq!(request.contents[1].role.as_deref(), Some("model"));
        assert_eq!(request.contents[2].role.as_deref(), Some("user"));
        assert_eq!(request.contents[2].parts[0].text, "Bye");
    }

    #[test]
    fn test_instruction_becomes_system_instruction() {
        let request = GeminiBackend::build_request("be nice", &[], "Hello");
        assert_eq!(request.system_instruction.parts[0].text, "be nice");
        assert!(request.system_instruction.role.is_none());
        assert_eq!(request.contents.len(), 1);
    }

    #[test]
    fn test_base_url_override() {
        let backend = backend().with_base_url("http://localhost:9999".to_owned());
        assert_eq!(backend.base_url, "http://localhost:9999");
    }
}
