use super::TaskGateway;
use crate::error::ClientError;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tasklist_core::model::{Task, TaskCollection, TaskPatch};
use tasklist_core::task_api::Ack;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Talks to the task server's `/api/tasks` endpoints.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .build()
            .map_err(|err| ClientError::request(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/tasks{}", self.base_url, path)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request
            .send()
            .map_err(|err| ClientError::request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(ClientError::request(format!("{}: {}", status.as_u16(), message)));
        }

        response
            .json::<T>()
            .map_err(|err| ClientError::request(format!("unreadable response: {err}")))
    }
}

impl TaskGateway for HttpGateway {
    fn list(&self) -> Result<TaskCollection, ClientError> {
        self.send(self.client.get(self.url("")))
    }

    fn create(&self, text: &str) -> Result<Task, ClientError> {
        let body = serde_json::json!({ "text": text });
        self.send(self.client.post(self.url("")).json(&body))
    }

    fn update(&self, id: u64, patch: &TaskPatch) -> Result<Task, ClientError> {
        self.send(self.client.put(self.url(&format!("/{id}"))).json(patch))
    }

    fn delete(&self, id: u64) -> Result<Ack, ClientError> {
        self.send(self.client.delete(self.url(&format!("/{id}"))))
    }

    fn bulk_replace(&self, tasks: &[Task]) -> Result<Ack, ClientError> {
        let body = serde_json::json!({ "tasks": tasks });
        self.send(self.client.put(self.url("/bulk")).json(&body))
    }
}
