//! Stateless HTTP request builder and response parser for the pet API.
//!
//! # Design
//! `PetClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. Each CRUD operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. `PetApi` joins the two around a `Transport`; tests can call
//! either half directly.

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Pet;

const JSON: &str = "application/json";

/// Which operation a response belongs to. Decides how a 404 is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Create,
    Fetch,
    Update,
    Delete,
}

/// Synchronous, stateless client for the pet API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct PetClient {
    config: ClientConfig,
}

impl PetClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_create_pet(&self, pet: &Pet) -> ApiResult<HttpRequest> {
        self.json_request(HttpMethod::Post, self.config.collection_url(), pet)
    }

    pub fn build_get_pet(&self, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.item_url(id),
            headers: vec![accept()],
            body: None,
        }
    }

    /// The full representation replaces the stored pet addressed by `pet.id`.
    pub fn build_update_pet(&self, pet: &Pet) -> ApiResult<HttpRequest> {
        self.json_request(HttpMethod::Post, self.config.collection_url(), pet)
    }

    /// `api_key` overrides the configured credential. With neither set the
    /// request carries no `api_key` header.
    pub fn build_delete_pet(&self, id: i64, api_key: Option<&str>) -> HttpRequest {
        let mut headers = vec![accept()];
        if let Some(key) = api_key.or(self.config.api_key()) {
            headers.push(("api_key".to_string(), key.to_string()));
        }
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.item_url(id),
            headers,
            body: None,
        }
    }

    pub fn parse_create_pet(&self, response: HttpResponse) -> ApiResult<Pet> {
        check_status(&response, Operation::Create)?;
        decode(&response.body)
    }

    pub fn parse_get_pet(&self, response: HttpResponse) -> ApiResult<Pet> {
        check_status(&response, Operation::Fetch)?;
        decode(&response.body)
    }

    pub fn parse_update_pet(&self, response: HttpResponse) -> ApiResult<Pet> {
        check_status(&response, Operation::Update)?;
        decode(&response.body)
    }

    /// Any 2xx is success; the body is not inspected.
    pub fn parse_delete_pet(&self, response: HttpResponse) -> ApiResult<()> {
        check_status(&response, Operation::Delete)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{id}", self.config.collection_url())
    }

    fn json_request(&self, method: HttpMethod, path: String, pet: &Pet) -> ApiResult<HttpRequest> {
        let body =
            serde_json::to_string(pet).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![
                ("content-type".to_string(), JSON.to_string()),
                accept(),
            ],
            body: Some(body),
        })
    }
}

fn accept() -> (String, String) {
    ("accept".to_string(), JSON.to_string())
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, operation: Operation) -> ApiResult<()> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 && operation == Operation::Fetch {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.text().into_owned(),
    })
}
