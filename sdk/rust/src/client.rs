use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i32,
}

/// Body for create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentInput {
    pub name: String,
    pub email: String,
    pub age: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub env: String,
    pub version: String,
}

/// The `{message, error}` body the service sends on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-success status.
    #[error("service returned {status}: {} ({})", .body.message, .body.error)]
    Api {
        status: StatusCode,
        body: ApiErrorBody,
    },

    /// Transport or decoding failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// Status code of an API failure, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
        }
    }
}

pub struct StudentsClient {
    client: Client,
    base_url: String,
}

impl StudentsClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Use a preconfigured `reqwest` client (timeouts, proxies, pooling).
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn create_student(&self, input: &StudentInput) -> Result<Created, ClientError> {
        let resp = self
            .client
            .post(format!("{}/api/students", self.base_url))
            .json(input)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn get_student(&self, id: i64) -> Result<Student, ClientError> {
        let resp = self
            .client
            .get(format!("{}/api/students/{}", self.base_url, id))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn list_students(&self) -> Result<Vec<Student>, ClientError> {
        let resp = self
            .client
            .get(format!("{}/api/students", self.base_url))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn update_student(&self, id: i64, input: &StudentInput) -> Result<Message, ClientError> {
        let resp = self
            .client
            .put(format!("{}/api/students/{}", self.base_url, id))
            .json(input)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn delete_student(&self, id: i64) -> Result<Message, ClientError> {
        let resp = self
            .client
            .delete(format!("{}/api/students/{}", self.base_url, id))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn health(&self) -> Result<Health, ClientError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }

    let text = resp.text().await?;
    let body = serde_json::from_str::<ApiErrorBody>(&text).unwrap_or(ApiErrorBody {
        message: text,
        error: String::new(),
    });
    Err(ClientError::Api { status, body })
}
