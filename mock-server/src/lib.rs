use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub status: String,
}

/// Body of non-pet responses, shaped like the public petstore's.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiMessage {
    pub code: u16,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl ApiMessage {
    fn not_found() -> (StatusCode, Json<ApiMessage>) {
        (
            StatusCode::NOT_FOUND,
            Json(ApiMessage {
                code: 1,
                kind: "error".to_string(),
                message: "Pet not found".to_string(),
            }),
        )
    }
}

pub type Db = Arc<RwLock<HashMap<i64, Pet>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    let pets = Router::new()
        .route("/pet", post(upsert_pet).put(replace_pet))
        .route("/pet/{pet_id}", get(get_pet).delete(delete_pet))
        .with_state(db);
    Router::new().nest("/v2", pets)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "pet store listening");
    }
    axum::serve(listener, app()).await
}

async fn upsert_pet(State(db): State<Db>, Json(pet): Json<Pet>) -> Json<Pet> {
    debug!(pet_id = pet.id, "upsert");
    db.write().await.insert(pet.id, pet.clone());
    Json(pet)
}

async fn replace_pet(
    State(db): State<Db>,
    Json(pet): Json<Pet>,
) -> Result<Json<Pet>, (StatusCode, Json<ApiMessage>)> {
    let mut pets = db.write().await;
    let stored = pets.get_mut(&pet.id).ok_or_else(ApiMessage::not_found)?;
    *stored = pet.clone();
    debug!(pet_id = pet.id, "replaced");
    Ok(Json(pet))
}

async fn get_pet(
    State(db): State<Db>,
    Path(pet_id): Path<i64>,
) -> Result<Json<Pet>, (StatusCode, Json<ApiMessage>)> {
    let pets = db.read().await;
    pets.get(&pet_id).cloned().map(Json).ok_or_else(ApiMessage::not_found)
}

async fn delete_pet(
    State(db): State<Db>,
    Path(pet_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ApiMessage>, (StatusCode, Json<ApiMessage>)> {
    let api_key = headers.get("api_key").and_then(|v| v.to_str().ok());
    debug!(pet_id, has_api_key = api_key.is_some(), "delete");
    let mut pets = db.write().await;
    pets.remove(&pet_id).ok_or_else(ApiMessage::not_found)?;
    Ok(Json(ApiMessage {
        code: 200,
        kind: "unknown".to_string(),
        message: pet_id.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pet_serializes_to_json() {
        let pet = Pet {
            id: 1,
            name: "Test".to_string(),
            photo_urls: vec!["http://example.com/photo".to_string()],
            tags: Vec::new(),
            status: "available".to_string(),
        };
        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Test");
        assert_eq!(json["photoUrls"][0], "http://example.com/photo");
        assert_eq!(json["tags"], serde_json::json!([]));
        assert_eq!(json["status"], "available");
    }

    #[test]
    fn pet_defaults_collections() {
        let pet: Pet = serde_json::from_str(r#"{"id":2,"name":"Bare","status":"sold"}"#).unwrap();
        assert!(pet.photo_urls.is_empty());
        assert!(pet.tags.is_empty());
    }

    #[test]
    fn pet_rejects_missing_name() {
        let result: Result<Pet, _> = serde_json::from_str(r#"{"id":2,"status":"sold"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn api_message_uses_type_key() {
        let json = serde_json::to_value(ApiMessage::not_found().1 .0).unwrap();
        assert_eq!(json["code"], 1);
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "Pet not found");
    }
}
