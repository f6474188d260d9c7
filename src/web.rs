//! Web server for the inventory page
//!
//! Serves the server-rendered page plus a small JSON API. Every visitor
//! has their own session, found through the session cookie. Page forms
//! post back and redirect to `/`.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Form, FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::error::Result;
use crate::language::Language;
use crate::models::InventorySnapshot;
use crate::page::render_page;
use crate::session::{SessionHandle, SessionRegistry};
use crate::store::RecordStore;
use crate::sync::{AddOutcome, FetchOutcome, InventorySynchronizer, OrderOutcome};

const SESSION_COOKIE: &str = "inventory_session";

/// Shared application state (synchronizer + visitor sessions)
struct AppState<S> {
    sync: Arc<InventorySynchronizer<S>>,
    sessions: Arc<SessionRegistry>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            sync: Arc::clone(&self.sync),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<S> AppState<S> {
    /// Session for the cookie in `headers`, or a fresh one.
    ///
    /// Unknown ids (expired or made up) never name a new session; the
    /// visitor gets a server-generated id instead.
    fn visitor(&self, headers: &HeaderMap) -> Visitor {
        if let Some(session) = session_cookie(headers).and_then(|id| self.sessions.get(&id)) {
            return Visitor {
                session,
                new_id: None,
            };
        }

        let (id, session) = self.sessions.create();
        log::debug!("Started session {}", id);
        Visitor {
            session,
            new_id: Some(id),
        }
    }
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(|cookie| cookie.ok())
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// The requesting visitor's session
struct Visitor {
    session: SessionHandle,
    /// Set when the session was created for this request
    new_id: Option<String>,
}

impl Visitor {
    /// Attach the session cookie if the visitor doesn't have it yet
    fn respond(self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();

        if let Some(id) = self.new_id {
            let cookie = Cookie::build((SESSION_COOKIE, id))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build();
            match HeaderValue::from_str(&cookie.to_string()) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => log::error!("Invalid session cookie: {}", e),
            }
        }

        response
    }
}

impl<S> FromRequestParts<AppState<S>> for Visitor
where
    S: RecordStore + 'static,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(state.visitor(&parts.headers))
    }
}

#[derive(Deserialize)]
struct AddItemForm {
    #[serde(default)]
    name: String,
}

/// Order form; the quantity input may be blank
#[derive(Deserialize)]
struct OrderForm {
    #[serde(default)]
    item_id: String,
    #[serde(default)]
    quantity: String,
}

#[derive(Deserialize)]
struct LanguageForm {
    lang: String,
}

#[derive(Deserialize)]
struct OrderRequest {
    item_id: String,
    quantity: i64,
}

/// API response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

/// Current state of the page as seen by API clients
#[derive(Serialize)]
struct InventoryView {
    items: InventorySnapshot,
    loading: bool,
    language: Language,
}

#[derive(Serialize)]
struct OutcomeView {
    status: &'static str,
}

fn parse_quantity(input: &str) -> i64 {
    input.trim().parse().unwrap_or(0)
}

fn fetch_status(outcome: &FetchOutcome) -> &'static str {
    match outcome {
        FetchOutcome::Refreshed(_) => "refreshed",
        FetchOutcome::Failed(_) => "fetch_failed",
    }
}

fn add_status(outcome: &AddOutcome) -> &'static str {
    match outcome {
        AddOutcome::EmptyName => "empty_name",
        AddOutcome::Duplicate => "duplicate",
        AddOutcome::CheckFailed(_) => "check_failed",
        AddOutcome::InsertFailed(_) => "insert_failed",
        AddOutcome::Added(_) => "added",
    }
}

fn order_status(outcome: &OrderOutcome) -> &'static str {
    match outcome {
        OrderOutcome::Rejected(_) => "rejected",
        OrderOutcome::UpdateFailed(_) => "update_failed",
        OrderOutcome::Ordered { .. } => "ordered",
    }
}

fn outcome_response(success: bool, status: &'static str) -> Json<ApiResponse<OutcomeView>> {
    Json(ApiResponse {
        success,
        data: OutcomeView { status },
    })
}

/// GET / - fetch (page mount) and render
async fn index_handler<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    visitor: Visitor,
) -> Response {
    // Fetch failures keep the previous snapshot on screen
    let _ = state.sync.fetch_inventory(&visitor.session).await;

    let markup = visitor.session.with(|session| {
        let notice = session.take_notice();
        render_page(session, notice)
    });
    visitor.respond(Html(markup.into_string()))
}

/// POST /items - add a product
async fn add_item_handler<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    visitor: Visitor,
    Form(form): Form<AddItemForm>,
) -> Response {
    visitor
        .session
        .with(|session| session.form.new_item = form.name.clone());
    let outcome = state.sync.add_item(&visitor.session, &form.name).await;
    log::debug!("Add '{}': {}", form.name, add_status(&outcome));
    visitor.respond(Redirect::to("/"))
}

/// POST /orders - increase a product's quantity
async fn order_handler<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    visitor: Visitor,
    Form(form): Form<OrderForm>,
) -> Response {
    let quantity = parse_quantity(&form.quantity);
    visitor.session.with(|session| {
        session.form.order_item_id = form.item_id.clone();
        session.form.order_quantity = quantity;
    });
    let outcome = state
        .sync
        .order_item(&visitor.session, &form.item_id, quantity)
        .await;
    log::debug!("Order item '{}': {}", form.item_id, order_status(&outcome));
    visitor.respond(Redirect::to("/"))
}

/// POST /language - switch page language
async fn language_handler(visitor: Visitor, Form(form): Form<LanguageForm>) -> Response {
    match Language::from_code(&form.lang) {
        Some(lang) => visitor.session.with(|session| session.language = lang),
        None => log::warn!("Ignoring unsupported language: {}", form.lang),
    }
    visitor.respond(Redirect::to("/"))
}

/// GET /api/inventory - current snapshot without fetching
async fn api_inventory_handler(visitor: Visitor) -> Response {
    let view = visitor.session.with(|session| InventoryView {
        items: session.snapshot.clone(),
        loading: session.loading,
        language: session.language,
    });

    visitor.respond(Json(ApiResponse {
        success: true,
        data: view,
    }))
}

/// POST /api/refresh
async fn api_refresh_handler<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    visitor: Visitor,
) -> Response {
    let outcome = state.sync.fetch_inventory(&visitor.session).await;
    visitor.respond(outcome_response(outcome.is_success(), fetch_status(&outcome)))
}

/// POST /api/items {"name": ...}
async fn api_add_item_handler<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    visitor: Visitor,
    Json(form): Json<AddItemForm>,
) -> Response {
    let outcome = state.sync.add_item(&visitor.session, &form.name).await;
    // API callers get the duplicate status instead of a page alert
    if matches!(outcome, AddOutcome::Duplicate) {
        visitor.session.with(|session| session.take_notice());
    }
    visitor.respond(outcome_response(outcome.is_success(), add_status(&outcome)))
}

/// POST /api/orders {"item_id": ..., "quantity": ...}
async fn api_order_handler<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    visitor: Visitor,
    Json(request): Json<OrderRequest>,
) -> Response {
    let outcome = state
        .sync
        .order_item(&visitor.session, &request.item_id, request.quantity)
        .await;
    visitor.respond(outcome_response(outcome.is_success(), order_status(&outcome)))
}

/// Build the web server router
pub fn create_router<S: RecordStore + 'static>(
    sync: Arc<InventorySynchronizer<S>>,
    sessions: SessionRegistry,
) -> Router {
    let state = AppState {
        sync,
        sessions: Arc::new(sessions),
    };

    let api = Router::new()
        .route("/api/inventory", get(api_inventory_handler))
        .route("/api/refresh", post(api_refresh_handler::<S>))
        .route("/api/items", post(api_add_item_handler::<S>))
        .route("/api/orders", post(api_order_handler::<S>))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(index_handler::<S>))
        .route("/items", post(add_item_handler::<S>))
        .route("/orders", post(order_handler::<S>))
        .route("/language", post(language_handler))
        .merge(api)
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
    log::info!("Shutting down web server");
}

/// Start the web server (async)
///
/// Binds to 0.0.0.0 (all interfaces) to work with Docker port mapping.
pub async fn serve<S: RecordStore + 'static>(
    sync: InventorySynchronizer<S>,
    sessions: SessionRegistry,
    port: u16,
) -> Result<()> {
    let app = create_router(Arc::new(sync), sessions);
    let addr = format!("0.0.0.0:{}", port);

    log::info!("Web UI listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
