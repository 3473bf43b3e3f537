//! OpenAI-compatible generation client.
//!
//! Wraps `reqwest` to implement both generation collaborators: chat
//! completions for descriptions and image generation for photos.

use bazaar_common::error::GenerationError;
use bazaar_common::generation::{
    image_prompt, DescriptionGenerator, DescriptionRequest, ImageGenerator,
};
use bazaar_common::listing::Category;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::GenerationConfig;

pub struct OpenAiClient {
    http: reqwest::Client,
    config: GenerationConfig,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, GenerationError> {
        let url = format!("{}/{}", self.config.api_base, path);
        debug!(%url, "generation request");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Request(format!("HTTP {status}: {text}")));
        }

        resp.json::<T>()
            .await
            .map_err(|e| GenerationError::Unusable(format!("malformed response: {e}")))
    }
}

impl DescriptionGenerator for OpenAiClient {
    async fn describe(&self, request: &DescriptionRequest) -> Result<String, GenerationError> {
        let body = json!({
            "model": self.config.text_model,
            "messages": [{ "role": "user", "content": request.prompt() }],
        });
        let completion: ChatCompletion = self.post("chat/completions", body).await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| GenerationError::Unusable("no description in response".into()))
    }
}

impl ImageGenerator for OpenAiClient {
    async fn image_for(&self, category: Category) -> Result<String, GenerationError> {
        let body = json!({
            "model": self.config.image_model,
            "prompt": image_prompt(category),
            "size": self.config.image_size,
        });
        let images: ImageResponse = self.post("images/generations", body).await?;
        images
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| GenerationError::Unusable("no image URL in response".into()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use tokio::sync::Mutex;

    use super::*;

    /// Request bodies seen by the fake API, plus the canned replies.
    #[derive(Default)]
    struct FakeApi {
        seen: Mutex<Vec<serde_json::Value>>,
        chat_reply: serde_json::Value,
        image_reply: serde_json::Value,
        status: Option<StatusCode>,
    }

    async fn chat(
        State(api): State<Arc<FakeApi>>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        assert_eq!(headers["authorization"], "Bearer test-key");
        api.seen.lock().await.push(body);
        (api.status.unwrap_or(StatusCode::OK), Json(api.chat_reply.clone()))
    }

    async fn images(
        State(api): State<Arc<FakeApi>>,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        api.seen.lock().await.push(body);
        (api.status.unwrap_or(StatusCode::OK), Json(api.image_reply.clone()))
    }

    async fn spawn_fake(api: Arc<FakeApi>) -> OpenAiClient {
        let app = Router::new()
            .route("/v1/chat/completions", post(chat))
            .route("/v1/images/generations", post(images))
            .with_state(api);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let config =
            GenerationConfig::new("test-key".into(), &format!("http://{addr}/v1")).unwrap();
        OpenAiClient::new(config)
    }

    fn request() -> DescriptionRequest {
        DescriptionRequest {
            name: "Bamboo Basket".into(),
            category: Category::Handicraft,
            keywords: "woven, eco-friendly".into(),
        }
    }

    #[tokio::test]
    async fn describe_returns_trimmed_first_choice() {
        let api = Arc::new(FakeApi {
            chat_reply: json!({"choices": [{"message": {"content": "  Woven by hand.\n"}}]}),
            ..Default::default()
        });
        let client = spawn_fake(api.clone()).await;

        let text = client.describe(&request()).await.unwrap();
        assert_eq!(text, "Woven by hand.");

        let seen = api.seen.lock().await;
        assert_eq!(seen[0]["model"], "gpt-4o-mini");
        let prompt = seen[0]["messages"][0]["content"].as_str().unwrap();
        assert!(prompt.contains("'Bamboo Basket'"));
    }

    #[tokio::test]
    async fn describe_without_choices_is_unusable() {
        let api = Arc::new(FakeApi {
            chat_reply: json!({"choices": []}),
            ..Default::default()
        });
        let client = spawn_fake(api).await;
        let err = client.describe(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Unusable(_)));
    }

    #[tokio::test]
    async fn http_error_is_request_error() {
        let api = Arc::new(FakeApi {
            chat_reply: json!({"error": {"message": "bad key"}}),
            status: Some(StatusCode::UNAUTHORIZED),
            ..Default::default()
        });
        let client = spawn_fake(api).await;
        let err = client.describe(&request()).await.unwrap_err();
        match err {
            GenerationError::Request(msg) => assert!(msg.contains("401"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn image_for_returns_url_and_sends_size() {
        let api = Arc::new(FakeApi {
            image_reply: json!({"data": [{"url": "https://img.example/basket.png"}]}),
            ..Default::default()
        });
        let client = spawn_fake(api.clone()).await;

        let url = client.image_for(Category::Handicraft).await.unwrap();
        assert_eq!(url, "https://img.example/basket.png");

        let seen = api.seen.lock().await;
        assert_eq!(seen[0]["model"], "gpt-image-1");
        assert_eq!(seen[0]["size"], "512x512");
    }

    #[tokio::test]
    async fn unreachable_api_is_request_error() {
        let config = GenerationConfig::new("test-key".into(), "http://127.0.0.1:1/v1").unwrap();
        let client = OpenAiClient::new(config);
        let err = client.image_for(Category::Art).await.unwrap_err();
        assert!(matches!(err, GenerationError::Request(_)));
    }
}
