//! Typed pet operations over a `Transport`.
//!
//! `PetApi` pairs a stateless `PetClient` with a transport. Every operation
//! builds a request, executes it, and parses the response; failures of any
//! kind come back as `ApiError` values. Nothing is retried.

use tracing::{debug, instrument, warn};

use crate::client::PetClient;
use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::Pet;

/// Typed client for the pet resource.
///
/// Holds no mutable state, so one instance can serve several threads when the
/// transport is `Sync`.
#[derive(Debug, Clone)]
pub struct PetApi<T> {
    client: PetClient,
    transport: T,
}

impl PetApi<UreqTransport> {
    /// Client over a blocking `ureq` transport built from the same config.
    pub fn connect(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self::new(config, transport)
    }
}

impl<T: Transport> PetApi<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            client: PetClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &PetClient {
        &self.client
    }

    /// Submit a new pet. Returns the server's copy.
    #[instrument(skip_all, fields(pet_id = pet.id))]
    pub fn create(&self, pet: &Pet) -> ApiResult<Pet> {
        let request = self.client.build_create_pet(pet)?;
        let response = self.execute(request)?;
        log_outcome(self.client.parse_create_pet(response))
    }

    #[instrument(skip(self))]
    pub fn fetch_by_id(&self, pet_id: i64) -> ApiResult<Pet> {
        let request = self.client.build_get_pet(pet_id);
        let response = self.execute(request)?;
        log_outcome(self.client.parse_get_pet(response))
    }

    /// Replace the stored pet with `pet`. Returns the server's copy.
    #[instrument(skip_all, fields(pet_id = pet.id))]
    pub fn update(&self, pet: &Pet) -> ApiResult<Pet> {
        let request = self.client.build_update_pet(pet)?;
        let response = self.execute(request)?;
        log_outcome(self.client.parse_update_pet(response))
    }

    /// Delete a pet. `api_key` overrides the configured credential.
    #[instrument(skip(self, api_key))]
    pub fn delete(&self, pet_id: i64, api_key: Option<&str>) -> ApiResult<()> {
        let request = self.client.build_delete_pet(pet_id, api_key);
        let response = self.execute(request)?;
        log_outcome(self.client.parse_delete_pet(response))
    }

    fn execute(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        debug!(method = %request.method, path = %request.path, "sending request");
        match self.transport.execute(request) {
            Ok(response) => {
                debug!(
                    status = response.status,
                    content_type = response.header("content-type").unwrap_or_default(),
                    bytes = response.body.len(),
                    "received response"
                );
                Ok(response)
            }
            Err(err) => {
                warn!(error = %err, "transport failure");
                Err(err)
            }
        }
    }
}

fn log_outcome<V>(result: ApiResult<V>) -> ApiResult<V> {
    if let Err(err) = &result {
        warn!(kind = err.kind(), error = %err, "request failed");
    }
    result
}
