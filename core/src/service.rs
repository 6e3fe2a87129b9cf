//! The remote collaborator behind the controller.
//!
//! `TodoService` is the four-call surface the controller's tickets are
//! executed against. `HttpTodoService` is the stock implementation: the
//! stateless `TodoClient` builds and parses, ureq performs the round-trip.

use ureq::Agent;

use crate::client::TodoClient;
use crate::config::ControllerConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

pub trait TodoService {
    fn fetch_all(&self) -> Result<Vec<Todo>, ApiError>;
    fn create(&self, text: &str, completed: bool) -> Result<Todo, ApiError>;
    fn update(&self, id: &TodoId, text: &str) -> Result<Todo, ApiError>;
    fn delete(&self, id: &TodoId) -> Result<(), ApiError>;
}

/// Blocking HTTP implementation of `TodoService`.
pub struct HttpTodoService {
    client: TodoClient,
    agent: Agent,
}

impl HttpTodoService {
    pub fn new(client: TodoClient) -> Self {
        Self::build(client, None)
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::build(config.client(), config.timeout())
    }

    fn build(client: TodoClient, timeout: Option<std::time::Duration>) -> Self {
        // 4xx/5xx come back as data so TodoClient can interpret them.
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { client, agent }
    }

    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = req.method.as_str(), url = %req.url, "sending request");
        let result = match (req.method, req.body) {
            (HttpMethod::Get, _) => self.agent.get(&req.url).call(),
            (HttpMethod::Delete, _) => self.agent.delete(&req.url).call(),
            (HttpMethod::Post, Some(body)) => self
                .agent
                .post(&req.url)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => self.agent.post(&req.url).send_empty(),
            (HttpMethod::Put, Some(body)) => self
                .agent
                .put(&req.url)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Put, None) => self.agent.put(&req.url).send_empty(),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        tracing::debug!(status, "received response");
        Ok(HttpResponse { status, body })
    }
}

impl TodoService for HttpTodoService {
    fn fetch_all(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.execute(self.client.build_list_todos())?;
        self.client.parse_list_todos(response)
    }

    fn create(&self, text: &str, completed: bool) -> Result<Todo, ApiError> {
        let input = CreateTodo {
            text: text.to_string(),
            completed,
        };
        let response = self.execute(self.client.build_create_todo(&input)?)?;
        self.client.parse_create_todo(response)
    }

    fn update(&self, id: &TodoId, text: &str) -> Result<Todo, ApiError> {
        let input = UpdateTodo {
            text: Some(text.to_string()),
            completed: None,
        };
        let response = self.execute(self.client.build_update_todo(id, &input)?)?;
        self.client.parse_update_todo(response)
    }

    fn delete(&self, id: &TodoId) -> Result<(), ApiError> {
        let response = self.execute(self.client.build_delete_todo(id))?;
        self.client.parse_delete_todo(response)
    }
}
