//! HTTP wrapper behavior: headers, envelopes, error mapping, retries.

#![allow(clippy::unwrap_used)]

use std::time::{Duration, Instant};

use oakline_client::{ApiClient, ApiError, RetryPolicy};
use oakline_core::{CategoryId, NewCategory, Pagination};
use oakline_integration_tests::{Method, MockApi, category_json};
use secrecy::SecretString;
use serde_json::json;

#[tokio::test]
async fn test_bearer_header_only_when_token_present() {
    let api = MockApi::start().await;
    api.respond(Method::GET, "/category/get-all", 200, json!([]));

    let anonymous = ApiClient::new(&api.config()).unwrap();
    anonymous.categories().list(Pagination::default()).await.unwrap();
    assert_eq!(
        api.last_request(Method::GET, "/category/get-all").authorization,
        None
    );

    let authed = ApiClient::with_token(&api.config(), SecretString::from("abc123")).unwrap();
    authed.categories().list(Pagination::default()).await.unwrap();
    assert_eq!(
        api.last_request(Method::GET, "/category/get-all")
            .authorization
            .as_deref(),
        Some("Bearer abc123")
    );
}

#[tokio::test]
async fn test_json_content_type_and_window_query() {
    let api = MockApi::start().await;
    api.respond(Method::GET, "/category/get-all", 200, json!([]));
    api.respond(Method::POST, "/category/create", 201, category_json(9, "Lamps"));

    let client = ApiClient::new(&api.config()).unwrap();
    client
        .categories()
        .list(Pagination::new(10, 30))
        .await
        .unwrap();
    let created = client
        .categories()
        .create(&NewCategory {
            name: "Lamps".to_string(),
            description: None,
        })
        .await
        .unwrap();

    let list = api.last_request(Method::GET, "/category/get-all");
    assert_eq!(list.content_type.as_deref(), Some("application/json"));
    assert_eq!(list.query.as_deref(), Some("limit=10&offset=30"));

    let create = api.last_request(Method::POST, "/category/create");
    assert_eq!(create.content_type.as_deref(), Some("application/json"));
    assert_eq!(create.json(), json!({"name": "Lamps"}));
    assert_eq!(created.id, CategoryId::new(9));
}

#[tokio::test]
async fn test_list_envelopes_normalize_to_pages() {
    let api = MockApi::start().await;
    api.respond(
        Method::GET,
        "/category/get-all",
        200,
        json!([category_json(1, "Sofas"), category_json(2, "Beds")]),
    );
    api.respond(
        Method::GET,
        "/order/get-all",
        200,
        json!({"data": [], "total": 0, "message": "ok"}),
    );
    api.respond(
        Method::GET,
        "/user/get-all",
        200,
        json!({"data": [{"id": 3, "guestUuid": "6f1c2c9e-3f4b-4bb1-9a53-2a4c1a9f0e11", "isRegistered": false}], "total": 12}),
    );

    let client = ApiClient::new(&api.config()).unwrap();

    let categories = client
        .categories()
        .list(Pagination::default())
        .await
        .unwrap();
    assert_eq!(categories.items.len(), 2);
    assert_eq!(categories.total, None);

    let orders = client.orders().list(Pagination::default()).await.unwrap();
    assert!(orders.items.is_empty());
    assert_eq!(orders.total, Some(0));
    assert!(!orders.has_more());

    let users = client.users().list(Pagination::new(1, 0)).await.unwrap();
    assert_eq!(users.total, Some(12));
    assert_eq!(users.total_pages(), Some(12));
    assert!(users.has_more());
}

#[tokio::test]
async fn test_item_envelope_wrapped_and_bare() {
    let api = MockApi::start().await;
    api.respond(Method::GET, "/category/get/1", 200, category_json(1, "Sofas"));
    api.respond(
        Method::GET,
        "/category/get/2",
        200,
        json!({"data": category_json(2, "Beds"), "message": "Category found"}),
    );

    let client = ApiClient::new(&api.config()).unwrap();
    let bare = client.categories().get(CategoryId::new(1)).await.unwrap();
    let wrapped = client.categories().get(CategoryId::new(2)).await.unwrap();

    assert_eq!(bare.name, "Sofas");
    assert_eq!(wrapped.name, "Beds");
}

#[tokio::test]
async fn test_error_statuses_map_to_variants() {
    let api = MockApi::start().await;
    api.respond(
        Method::GET,
        "/category/get/404",
        404,
        json!({"message": "Category not found"}),
    );
    api.respond(
        Method::POST,
        "/category/create",
        400,
        json!({"message": "Category name already exists"}),
    );
    api.respond(Method::DELETE, "/category/delete/1", 403, json!({"error": "Forbidden"}));

    let client = ApiClient::new(&api.config()).unwrap();

    let err = client
        .categories()
        .get(CategoryId::new(404))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref m) if m == "Category not found"));

    let err = client
        .categories()
        .create(&NewCategory {
            name: "Sofas".to_string(),
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.user_message("create category"),
        "Failed to create category: Category name already exists"
    );

    let err = client
        .categories()
        .delete(CategoryId::new(1))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_malformed_body_is_a_parse_error() {
    let api = MockApi::start().await;
    api.respond(Method::GET, "/category/get/1", 200, json!({"unexpected": true}));

    let client = ApiClient::new(&api.config()).unwrap();
    let err = client
        .categories()
        .get(CategoryId::new(1))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Parse(_)));
    assert_eq!(err.user_message("load category"), "Failed to load category");
}

#[tokio::test]
async fn test_empty_delete_response_is_success() {
    let api = MockApi::start().await;
    api.respond(Method::DELETE, "/category/delete/5", 204, serde_json::Value::Null);

    let client = ApiClient::new(&api.config()).unwrap();
    client.categories().delete(CategoryId::new(5)).await.unwrap();
    assert_eq!(api.hits(Method::DELETE, "/category/delete/5"), 1);
}

#[tokio::test]
async fn test_get_retries_transient_failures() {
    let api = MockApi::start().await;
    api.respond(Method::GET, "/category/get-all", 503, json!({"message": "busy"}));
    api.respond(Method::GET, "/category/get-all", 200, json!([category_json(1, "Sofas")]));

    let client = ApiClient::new(&api.config()).unwrap();
    let page = client
        .categories()
        .list(Pagination::default())
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(api.hits(Method::GET, "/category/get-all"), 2);
}

#[tokio::test]
async fn test_get_gives_up_after_max_retries() {
    let api = MockApi::start().await;
    api.respond(Method::GET, "/category/get-all", 502, json!({"message": "bad gateway"}));

    let client = ApiClient::new(&api.config()).unwrap();
    let err = client
        .categories()
        .list(Pagination::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert_eq!(api.hits(Method::GET, "/category/get-all"), 3);
}

#[tokio::test]
async fn test_client_errors_and_writes_are_not_retried() {
    let api = MockApi::start().await;
    api.respond(Method::GET, "/category/get/1", 400, json!({"message": "bad id"}));
    api.respond(Method::POST, "/category/create", 503, json!({"message": "busy"}));

    let client = ApiClient::new(&api.config()).unwrap();
    client.categories().get(CategoryId::new(1)).await.unwrap_err();
    client
        .categories()
        .create(&NewCategory {
            name: "Rugs".to_string(),
            description: None,
        })
        .await
        .unwrap_err();

    assert_eq!(api.hits(Method::GET, "/category/get/1"), 1);
    assert_eq!(api.hits(Method::POST, "/category/create"), 1);
}

#[tokio::test]
async fn test_zero_retries_sends_once() {
    let api = MockApi::start().await;
    api.respond(Method::GET, "/category/get-all", 503, json!({"message": "busy"}));

    let mut config = api.config();
    config.retry = RetryPolicy::none().with_delays(Duration::ZERO, Duration::ZERO);
    let client = ApiClient::new(&config).unwrap();
    client
        .categories()
        .list(Pagination::default())
        .await
        .unwrap_err();

    assert_eq!(api.hits(Method::GET, "/category/get-all"), 1);
}

#[tokio::test]
async fn test_get_waits_for_retry_after_on_429() {
    let api = MockApi::start().await;
    api.respond(Method::GET, "/category/get-all", 429, json!({"message": "slow down"}));
    api.respond(Method::GET, "/category/get-all", 200, json!([category_json(1, "Sofas")]));

    let client = ApiClient::new(&api.config()).unwrap();
    let started = Instant::now();
    let page = client
        .categories()
        .list(Pagination::default())
        .await
        .unwrap();

    // No header means the default one-second wait, well above the test backoff.
    assert!(started.elapsed() >= Duration::from_secs(1));
    assert_eq!(page.items.len(), 1);
    assert_eq!(api.hits(Method::GET, "/category/get-all"), 2);
}
