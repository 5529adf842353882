use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use pet_mock_server::{app, ApiMessage, Pet};
use tower::ServiceExt;

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

const REX: &str = r#"{"id":11,"name":"Rex","photoUrls":["http://example.com/rex"],"status":"available"}"#;

// --- create ---

#[tokio::test]
async fn post_pet_returns_stored_pet() {
    let resp = app()
        .oneshot(json_request("POST", "/v2/pet", REX))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let pet: Pet = body_json(resp).await;
    assert_eq!(pet.id, 11);
    assert_eq!(pet.name, "Rex");
    assert_eq!(pet.photo_urls, vec!["http://example.com/rex".to_string()]);
    assert!(pet.tags.is_empty());
}

#[tokio::test]
async fn post_pet_malformed_json_is_rejected() {
    let resp = app()
        .oneshot(json_request("POST", "/v2/pet", r#"{"name":"no id"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn routes_live_under_v2() {
    let resp = app()
        .oneshot(json_request("POST", "/pet", REX))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- get ---

#[tokio::test]
async fn get_pet_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", "/v2/pet/404404"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let message: ApiMessage = body_json(resp).await;
    assert_eq!(message.message, "Pet not found");
}

#[tokio::test]
async fn get_pet_bad_id_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/v2/pet/not-a-number"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn put_pet_not_found() {
    let resp = app()
        .oneshot(json_request("PUT", "/v2/pet", REX))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_pet_not_found() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/v2/pet/404404"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let message: ApiMessage = body_json(resp).await;
    assert_eq!(message.code, 1);
    assert_eq!(message.kind, "error");
    assert_eq!(message.message, "Pet not found");
}

// --- full lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/v2/pet", REX))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/v2/pet/11"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Pet = body_json(resp).await;
    assert_eq!(fetched.name, "Rex");

    // update via POST replaces every field
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/v2/pet",
            r#"{"id":11,"name":"Rex II","photoUrls":[],"status":"sold"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Pet = body_json(resp).await;
    assert_eq!(updated.name, "Rex II");
    assert_eq!(updated.status, "sold");
    assert!(updated.photo_urls.is_empty());

    // update via PUT on an existing pet
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            "/v2/pet",
            r#"{"id":11,"name":"Rex III","photoUrls":[],"status":"pending"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Pet = body_json(resp).await;
    assert_eq!(updated.name, "Rex III");

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/v2/pet/11")
                .header("api_key", "special-key")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let message: ApiMessage = body_json(resp).await;
    assert_eq!(message.message, "11");

    // get after delete — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/v2/pet/11"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // delete again — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", "/v2/pet/11"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
