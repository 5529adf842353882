//! End-to-end lifecycle check for the pet resource.
//!
//! # Design
//! `LifecycleVerifier` runs create, fetch, update, delete, and a confirming
//! fetch strictly in that order against one freshly generated identifier. Each
//! step must succeed before the next is issued; the final fetch must fail with
//! `ApiError::NotFound` specifically. A run stops at the first failing step and
//! issues no compensating delete.
//!
//! Identifiers come from an `IdGenerator`, so tests can pin them and parallel
//! runs can be kept apart.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use rand::Rng;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::PetApi;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Pet, PetStatus};

pub const DEFAULT_CREDENTIAL: &str = "special-key";

/// Source of pet identifiers for verification runs.
///
/// Uniqueness across runs and processes is the caller's concern.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> i64;
}

impl<F> IdGenerator for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn next_id(&self) -> i64 {
        self()
    }
}

/// Hands out `start`, `start + 1`, ... across all threads sharing it.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicI64,
}

impl SequentialIds {
    pub fn starting_at(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// Uniform identifiers in `[min, max]`. Collisions are possible.
#[derive(Debug, Clone, Copy)]
pub struct RandomIds {
    min: i64,
    max: i64,
}

impl RandomIds {
    pub fn new(min: i64, max: i64) -> Self {
        assert!(min <= max, "empty id range {min}..={max}");
        Self { min, max }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new(1_000_000, 9_000_000)
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&self) -> i64 {
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

/// One step of the lifecycle, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Create,
    Fetch,
    Update,
    Delete,
    ConfirmDeletion,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Create => "create",
            Step::Fetch => "fetch",
            Step::Update => "update",
            Step::Delete => "delete",
            Step::ConfirmDeletion => "confirm deletion",
        };
        f.write_str(name)
    }
}

/// Why a lifecycle run failed. Every variant names the step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("{step} on pet {pet_id}: expected success, got {source}")]
    StepFailed {
        step: Step,
        pet_id: i64,
        #[source]
        source: ApiError,
    },

    #[error("{step} on pet {pet_id}: expected NotFound, got success")]
    UnexpectedSuccess { step: Step, pet_id: i64 },

    #[error("{step} on pet {pet_id}: expected NotFound, got {} ({actual})", .actual.kind())]
    WrongFailure {
        step: Step,
        pet_id: i64,
        actual: ApiError,
    },

    #[error("{step}: expected pet {expected}, server returned pet {actual}")]
    IdMismatch {
        step: Step,
        expected: i64,
        actual: i64,
    },
}

impl VerificationError {
    pub fn step(&self) -> Step {
        match self {
            VerificationError::StepFailed { step, .. }
            | VerificationError::UnexpectedSuccess { step, .. }
            | VerificationError::WrongFailure { step, .. }
            | VerificationError::IdMismatch { step, .. } => *step,
        }
    }
}

/// What a successful run observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleReport {
    pub pet_id: i64,
    pub created: Pet,
    pub fetched: Pet,
    pub updated: Pet,
}

/// Drives one create → fetch → update → delete → confirm run per call to `run`.
pub struct LifecycleVerifier<'a, T, G> {
    api: &'a PetApi<T>,
    ids: G,
    credential: String,
    template: Pet,
    updated_name: String,
    updated_status: PetStatus,
}

impl<'a, T: Transport, G: IdGenerator> LifecycleVerifier<'a, T, G> {
    /// Verifier with the stock scenario: "KotlinTestPet", available, renamed
    /// to "UpdatedKotlinPet" and marked sold, deleted with "special-key".
    pub fn new(api: &'a PetApi<T>, ids: G) -> Self {
        Self {
            api,
            ids,
            credential: DEFAULT_CREDENTIAL.to_string(),
            template: Pet::new(0, "KotlinTestPet", PetStatus::Available)
                .with_photo_url("http://example.com/photo"),
            updated_name: "UpdatedKotlinPet".to_string(),
            updated_status: PetStatus::Sold,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = credential.into();
        self
    }

    /// Initial field values. The template's `id` is replaced on every run.
    pub fn with_template(mut self, template: Pet) -> Self {
        self.template = template;
        self
    }

    /// Name and status the update step switches to.
    pub fn with_update(mut self, name: impl Into<String>, status: PetStatus) -> Self {
        self.updated_name = name.into();
        self.updated_status = status;
        self
    }

    #[instrument(skip(self))]
    pub fn run(&self) -> Result<LifecycleReport, VerificationError> {
        let pet_id = self.ids.next_id();
        let pet = Pet {
            id: pet_id,
            ..self.template.clone()
        };
        info!(pet_id, "starting lifecycle verification");

        let created = self.api.create(&pet).map_err(failed(Step::Create, pet_id))?;
        info!(pet_id, step = %Step::Create, "ok");

        let fetched = self.api.fetch_by_id(pet_id).map_err(failed(Step::Fetch, pet_id))?;
        if fetched.id != pet_id {
            return Err(VerificationError::IdMismatch {
                step: Step::Fetch,
                expected: pet_id,
                actual: fetched.id,
            });
        }
        info!(pet_id, step = %Step::Fetch, "ok");

        let changed = pet
            .with_name(self.updated_name.as_str())
            .with_status(self.updated_status);
        let updated = self.api.update(&changed).map_err(failed(Step::Update, pet_id))?;
        info!(pet_id, step = %Step::Update, "ok");

        self.api
            .delete(pet_id, Some(self.credential.as_str()))
            .map_err(failed(Step::Delete, pet_id))?;
        info!(pet_id, step = %Step::Delete, "ok");

        match self.api.fetch_by_id(pet_id) {
            Err(ApiError::NotFound) => {}
            Ok(_) => {
                warn!(pet_id, "pet still present after delete");
                return Err(VerificationError::UnexpectedSuccess {
                    step: Step::ConfirmDeletion,
                    pet_id,
                });
            }
            Err(actual) => {
                return Err(VerificationError::WrongFailure {
                    step: Step::ConfirmDeletion,
                    pet_id,
                    actual,
                });
            }
        }
        info!(pet_id, step = %Step::ConfirmDeletion, "ok");

        Ok(LifecycleReport {
            pet_id,
            created,
            fetched,
            updated,
        })
    }
}

fn failed(step: Step, pet_id: i64) -> impl FnOnce(ApiError) -> VerificationError {
    move |source| {
        warn!(pet_id, %step, error = %source, "lifecycle step failed");
        VerificationError::StepFailed {
            step,
            pet_id,
            source,
        }
    }
}
