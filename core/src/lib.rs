//! Typed client core for the pet store API.
//!
//! # Overview
//! `PetClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. `PetApi` runs them through a `Transport`
//! (blocking `ureq` by default) and exposes typed create, fetch, update, and
//! delete operations. `LifecycleVerifier` chains those operations into a full
//! create → read → update → delete → confirm check.
//!
//! # Design
//! - Clients are stateless: all settings live in an immutable `ClientConfig`
//!   passed at construction, so differently configured clients can coexist.
//! - Every operation returns `ApiResult<T>`; expected failures (transport,
//!   status, decode) are values, never panics.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;
pub mod verifier;

pub use api::PetApi;
pub use client::PetClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Pet, PetStatus};
pub use verifier::{
    IdGenerator, LifecycleReport, LifecycleVerifier, RandomIds, SequentialIds, Step,
    VerificationError,
};
