use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::decode::{decode_json, error_detail};
use crate::{
    ApiError, ApiFailureKind, ChatRequest, ChatResponse, EnrichRequest, EnrichResponse,
    HealthResponse, StatusResponse,
};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            // Answers go through retrieval plus an LLM call.
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Contract of the corpus-build and answering service.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// `POST /corpus/enrich`
    async fn submit_build(&self, subject: &str) -> Result<EnrichResponse, ApiError>;

    /// `GET /corpus/status`
    async fn fetch_status(&self) -> Result<StatusResponse, ApiError>;

    /// `POST /chat`
    async fn ask(&self, question: &str) -> Result<ChatResponse, ApiError>;

    /// `GET /`
    async fn health(&self) -> Result<HealthResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(settings.base_url.trim())
            .map_err(|err| ApiError::new(ApiFailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                ApiFailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }
        // Keep any path prefix when joining endpoint paths.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiFailureKind::Network, err.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::new(ApiFailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let request = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        self.execute(request).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let payload = serde_json::to_vec(body)
            .map_err(|err| ApiError::new(ApiFailureKind::Decode, err.to_string()))?;
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .body(payload);
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let message = error_detail(&body).unwrap_or_else(|| status.to_string());
            return Err(ApiError::new(
                ApiFailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        decode_json(&body)
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn submit_build(&self, subject: &str) -> Result<EnrichResponse, ApiError> {
        let body = EnrichRequest {
            subject: subject.to_string(),
        };
        self.post_json("corpus/enrich", &body).await
    }

    async fn fetch_status(&self) -> Result<StatusResponse, ApiError> {
        self.get_json("corpus/status").await
    }

    async fn ask(&self, question: &str) -> Result<ChatResponse, ApiError> {
        let body = ChatRequest {
            question: question.to_string(),
        };
        self.post_json("chat", &body).await
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get_json("").await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiFailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(ApiFailureKind::Decode, err.to_string());
    }
    ApiError::new(ApiFailureKind::Network, err.to_string())
}
