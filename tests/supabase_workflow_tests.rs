use beverage_inventory::language::Language;
use beverage_inventory::session::Notice;
use beverage_inventory::sync::{AddOutcome, OrderOutcome, DEFAULT_TABLE};
use beverage_inventory::{InventorySession, InventorySynchronizer, SessionHandle, SupabaseStore};
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Test fixtures

fn synchronizer(mock_uri: &str) -> InventorySynchronizer<SupabaseStore> {
    let store = SupabaseStore::new(mock_uri, "anon_key").unwrap();
    InventorySynchronizer::new(store, DEFAULT_TABLE).unwrap()
}

fn new_session() -> SessionHandle {
    SessionHandle::new(InventorySession::new(Language::English))
}

fn has_item(session: &SessionHandle, name: &str) -> bool {
    session.snapshot().iter().any(|item| item.product_name == name)
}

async fn mock_select_all(mock_server: &MockServer, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/inventory"))
        .and(query_param_is_missing("product_name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(mock_server)
        .await;
}

// Tests for the add/order workflow against a mocked PostgREST endpoint

#[tokio::test]
async fn test_order_accumulates_on_remote_row() {
    let mock_server = MockServer::start().await;
    mock_select_all(
        &mock_server,
        serde_json::json!([
            { "id": 1, "product_name": "Cola", "quantity": 12 },
            { "id": 3, "product_name": "Tonic", "quantity": 5 }
        ]),
    )
    .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/inventory"))
        .and(query_param("id", "eq.3"))
        .and(body_json(serde_json::json!({ "quantity": 9 })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sync = synchronizer(&mock_server.uri());
    let session = new_session();
    sync.fetch_inventory(&session).await;

    let outcome = sync.order_item(&session, "3", 4).await;

    assert!(matches!(
        outcome,
        OrderOutcome::Ordered {
            id: 3,
            new_quantity: 9,
            ..
        }
    ));
}

#[tokio::test]
async fn test_add_duplicate_never_inserts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/inventory"))
        .and(query_param("product_name", "eq.Cola"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 1, "product_name": "Cola", "quantity": 12 }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/inventory"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let sync = synchronizer(&mock_server.uri());
    let session = new_session();

    let outcome = sync.add_item(&session, "Cola").await;

    assert!(matches!(outcome, AddOutcome::Duplicate));
    assert_eq!(session.with(|s| s.notice), Some(Notice::ItemAlreadyExists));
}

#[tokio::test]
async fn test_add_new_item_then_refetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/inventory"))
        .and(query_param("product_name", "eq.Juice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/inventory"))
        .and(body_json(serde_json::json!({ "product_name": "Juice", "quantity": 0 })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    mock_select_all(
        &mock_server,
        serde_json::json!([
            { "id": 1, "product_name": "Cola", "quantity": 12 },
            { "id": 2, "product_name": "Juice", "quantity": 0 }
        ]),
    )
    .await;

    let sync = synchronizer(&mock_server.uri());
    let session = new_session();
    session.with(|s| s.form.new_item = "Juice".to_string());

    let outcome = sync.add_item(&session, "Juice").await;

    assert!(outcome.is_success());
    assert!(has_item(&session, "Juice"));
    assert_eq!(session.snapshot().len(), 2);
    assert!(session.with(|s| s.form.new_item.is_empty()));
}

#[tokio::test]
async fn test_fetch_failure_keeps_snapshot() {
    let mock_server = MockServer::start().await;
    let sync = synchronizer(&mock_server.uri());
    let session = new_session();

    Mock::given(method("GET"))
        .and(path("/rest/v1/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 1, "product_name": "Cola", "quantity": 12 }
        ])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    sync.fetch_inventory(&session).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/inventory"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    let outcome = sync.fetch_inventory(&session).await;

    assert!(!outcome.is_success());
    assert!(has_item(&session, "Cola"));
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_update_failure_is_reported_not_raised() {
    let mock_server = MockServer::start().await;
    mock_select_all(
        &mock_server,
        serde_json::json!([{ "id": 1, "product_name": "Cola", "quantity": 12 }]),
    )
    .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/inventory"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let sync = synchronizer(&mock_server.uri());
    let session = new_session();
    sync.fetch_inventory(&session).await;

    let outcome = sync.order_item(&session, "1", 2).await;

    assert!(matches!(outcome, OrderOutcome::UpdateFailed(_)));
    assert_eq!(session.snapshot().find_by_id(1).map(|i| i.quantity), Some(12));
}
