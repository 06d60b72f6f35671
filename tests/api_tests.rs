//! HTTP API tests against a server bound to an ephemeral port

mod common;

use library_api::{api, config::AppConfig, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use common::dirty_coder;

/// Start a server over a fresh in-memory store and return its base URL
async fn spawn_app(config: AppConfig) -> String {
    let state = AppState::new(config, common::memory_store());
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    format!("http://{}", addr)
}

fn book_json() -> Value {
    json!({
        "isbn": "978-0-13-235088-4",
        "title": "The Dirty Coder",
        "author": "Nick Chapsas",
        "shortDescription": "All my tricks in one book",
        "pageCount": 420,
        "releaseDate": "2023-01-01"
    })
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_app(AppConfig::default()).await;

    let response = Client::new()
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_status_page_is_html() {
    let base = spawn_app(AppConfig::default()).await;

    let response = Client::new()
        .get(format!("{}/status", base))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
}

#[test]
fn test_book_wire_format() {
    let serialized = serde_json::to_value(dirty_coder()).expect("Failed to serialize book");
    assert_eq!(serialized, book_json());
}

#[tokio::test]
async fn test_create_book() {
    let base = spawn_app(AppConfig::default()).await;

    let response = Client::new()
        .post(format!("{}/books", base))
        .json(&book_json())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers()["location"],
        "/books/978-0-13-235088-4"
    );
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, book_json());
}

#[tokio::test]
async fn test_create_invalid_book() {
    let base = spawn_app(AppConfig::default()).await;
    let mut book = book_json();
    book["isbn"] = json!("INVALID");

    let response = Client::new()
        .post(format!("{}/books", base))
        .json(&book)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body,
        json!([{ "propertyName": "isbn", "errorMessage": "Value was not a valid ISBN-13" }])
    );
}

#[tokio::test]
async fn test_create_with_missing_fields() {
    let base = spawn_app(AppConfig::default()).await;

    let response = Client::new()
        .post(format!("{}/books", base))
        .json(&json!({ "isbn": "978-0-13-235088-4" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    let properties: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["propertyName"].as_str().unwrap())
        .collect();
    assert_eq!(properties, vec!["title", "author", "releaseDate"]);
}

#[tokio::test]
async fn test_create_duplicate_book() {
    let base = spawn_app(AppConfig::default()).await;
    let client = Client::new();

    let first = client
        .post(format!("{}/books", base))
        .json(&book_json())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(format!("{}/books", base))
        .json(&book_json())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: Value = second.json().await.expect("Failed to parse response");
    assert_eq!(
        body,
        json!([{ "propertyName": "isbn", "errorMessage": "A book with this ISBN-13 already exists!" }])
    );
}

#[tokio::test]
async fn test_create_with_wrongly_typed_fields() {
    let base = spawn_app(AppConfig::default()).await;
    let client = Client::new();

    for (property, value) in [("pageCount", json!("abc")), ("releaseDate", Value::Null)] {
        let mut book = book_json();
        book[property] = value;

        let response = client
            .post(format!("{}/books", base))
            .json(&book)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.expect("Failed to parse response");
        let failures = body.as_array().expect("Expected a failure list");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0]["propertyName"], property);
    }

    let books: Value = client
        .get(format!("{}/books", base))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(books, json!([]));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let base = spawn_app(AppConfig::default()).await;

    let response = Client::new()
        .put(format!("{}/books/978-0-13-235088-4", base))
        .header("content-type", "application/json")
        .body("{\"isbn\": ")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_get_book() {
    let base = spawn_app(AppConfig::default()).await;
    let client = Client::new();
    client
        .post(format!("{}/books", base))
        .json(&book_json())
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .get(format!("{}/books/978-0-13-235088-4", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, book_json());

    let missing = client
        .get(format!("{}/books/978-1-4028-9462-6", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_and_search_books() {
    let base = spawn_app(AppConfig::default()).await;
    let client = Client::new();

    let empty: Value = client
        .get(format!("{}/books", base))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(empty, json!([]));

    client
        .post(format!("{}/books", base))
        .json(&book_json())
        .send()
        .await
        .expect("Failed to send request");

    for query in ["", "?searchTerm=", "?searchTerm=%20%20", "?searchTerm=oder"] {
        let body: Value = client
            .get(format!("{}/books{}", base, query))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");
        assert_eq!(body, json!([book_json()]), "query {:?}", query);
    }

    let body: Value = client
        .get(format!("{}/books?searchTerm=gardening", base))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_update_book() {
    let base = spawn_app(AppConfig::default()).await;
    let client = Client::new();
    client
        .post(format!("{}/books", base))
        .json(&book_json())
        .send()
        .await
        .expect("Failed to send request");

    let mut changed = book_json();
    changed["pageCount"] = json!(69);
    let response = client
        .put(format!("{}/books/978-0-13-235088-4", base))
        .json(&changed)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, changed);

    let mut invalid = book_json();
    invalid["author"] = json!("");
    let response = client
        .put(format!("{}/books/978-0-13-235088-4", base))
        .json(&invalid)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_unknown_book() {
    let base = spawn_app(AppConfig::default()).await;

    let response = Client::new()
        .put(format!("{}/books/978-0-13-235088-4", base))
        .json(&book_json())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_book() {
    let base = spawn_app(AppConfig::default()).await;
    let client = Client::new();
    client
        .post(format!("{}/books", base))
        .json(&dirty_coder())
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .delete(format!("{}/books/978-0-13-235088-4", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let again = client
        .delete(format!("{}/books/978-0-13-235088-4", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_key_guards_writes() {
    let mut config = AppConfig::default();
    config.auth.api_key = Some("VerySecret".to_string());
    let base = spawn_app(config).await;
    let client = Client::new();

    let anonymous = client
        .post(format!("{}/books", base))
        .json(&book_json())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let wrong_key = client
        .post(format!("{}/books", base))
        .header("Authorization", "NotTheKey")
        .json(&book_json())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(wrong_key.status(), StatusCode::UNAUTHORIZED);

    let authorized = client
        .post(format!("{}/books", base))
        .header("Authorization", "VerySecret")
        .json(&book_json())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(authorized.status(), StatusCode::CREATED);

    // Reads stay anonymous
    let read = client
        .get(format!("{}/books/978-0-13-235088-4", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(read.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_openapi_document() {
    let base = spawn_app(AppConfig::default()).await;

    let response = Client::new()
        .get(format!("{}/api-docs/openapi.json", base))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["paths"]["/books"].is_object());
    assert!(body["paths"]["/books/{isbn}"].is_object());
}
