use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bazaar_common::currency::Currency;
use bazaar_common::error::{CatalogError, ValidationError};
use bazaar_common::generation::{DescriptionGenerator, ImageGenerator};
use bazaar_common::listing::{Category, Listing, ListingDraft, Popularity};
use bazaar_common::pipeline::GenerationNotice;
use bazaar_common::popularity::PopularityScorer;
use bazaar_common::query::{self, DEFAULT_TRENDING_LIMIT};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::sessions::{InvalidSessionId, SessionId, SessionRegistry};

pub struct AppState<G> {
    pub registry: SessionRegistry,
    pub generators: G,
    pub scorer: Mutex<Box<dyn PopularityScorer + Send>>,
    pub generation_enabled: bool,
    pub currency: Currency,
}

// ─── API types ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AddListingRequest {
    #[serde(flatten)]
    draft: ListingDraft,
    /// Caller-supplied score; the configured scorer is used when absent.
    #[serde(default)]
    popularity: Option<Popularity>,
}

#[derive(Serialize, Deserialize)]
pub struct AddListingResponse {
    pub listing: Listing,
    /// `listing.price` rendered in the node's display currency.
    pub price_label: String,
    pub notices: Vec<GenerationNotice>,
}

#[derive(Serialize, Deserialize)]
pub struct SessionResponse {
    pub session: String,
    pub listings: usize,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Deserialize)]
struct TrendingParams {
    limit: Option<i64>,
}

#[derive(Serialize)]
struct CategoryResponse {
    id: Category,
    label: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    sessions: usize,
    generation_enabled: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub enum ApiError {
    Session(InvalidSessionId),
    Catalog(CatalogError),
}

impl From<InvalidSessionId> for ApiError {
    fn from(e: InvalidSessionId) -> Self {
        ApiError::Session(e)
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        ApiError::Catalog(e)
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Catalog(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Session(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Catalog(e @ CatalogError::Validation(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            ApiError::Catalog(e @ CatalogError::InvalidArgument { .. }) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn health_handler<G: Send + Sync>(
    State(state): State<Arc<AppState<G>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sessions: state.registry.session_count().await,
        generation_enabled: state.generation_enabled,
    })
}

async fn categories_handler() -> Json<Vec<CategoryResponse>> {
    Json(
        Category::all()
            .iter()
            .map(|c| CategoryResponse {
                id: *c,
                label: c.label(),
            })
            .collect(),
    )
}

async fn init_session_handler<G: Send + Sync>(
    State(state): State<Arc<AppState<G>>>,
    Path(session): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let id = SessionId::parse(&session)?;
    let listings = state.registry.initialize(&id).await;
    Ok(Json(SessionResponse { session, listings }))
}

async fn list_handler<G: Send + Sync>(
    State(state): State<Arc<AppState<G>>>,
    Path(session): Path<String>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let id = SessionId::parse(&session)?;
    Ok(Json(state.registry.snapshot(&id).await.into_vec()))
}

async fn add_listing_handler<G>(
    State(state): State<Arc<AppState<G>>>,
    Path(session): Path<String>,
    Json(req): Json<AddListingRequest>,
) -> Result<(StatusCode, Json<AddListingResponse>), ApiError>
where
    G: DescriptionGenerator + ImageGenerator,
{
    let id = SessionId::parse(&session)?;
    let config = state.registry.config();

    let staged = req.draft.stage(config)?;
    let popularity = match req.popularity {
        Some(p) => p,
        None => state.scorer.lock().await.score(&staged),
    };
    // No lock is held while the generators run.
    let enriched = staged.enrich(&state.generators, &state.generators).await;
    let (listing, notices) = enriched.finalize(popularity, config);

    state.registry.add(&id, listing.clone()).await?;
    info!(
        session = %id,
        listing = %listing.summary(state.currency),
        notices = notices.len(),
        "listing created"
    );
    let price_label = state.currency.price_label(listing.price);
    Ok((
        StatusCode::CREATED,
        Json(AddListingResponse {
            listing,
            price_label,
            notices,
        }),
    ))
}

async fn search_handler<G: Send + Sync>(
    State(state): State<Arc<AppState<G>>>,
    Path(session): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let id = SessionId::parse(&session)?;
    let snapshot = state.registry.snapshot(&id).await;
    Ok(Json(query::search(&snapshot, &params.q)))
}

async fn trending_handler<G: Send + Sync>(
    State(state): State<Arc<AppState<G>>>,
    Path(session): Path<String>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let id = SessionId::parse(&session)?;
    let snapshot = state.registry.snapshot(&id).await;
    let limit = params.limit.unwrap_or(DEFAULT_TRENDING_LIMIT);
    Ok(Json(query::trending(&snapshot, limit)?))
}

pub fn router<G>(state: Arc<AppState<G>>) -> Router
where
    G: DescriptionGenerator + ImageGenerator + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler::<G>))
        .route("/categories", get(categories_handler))
        .route("/sessions/{id}", post(init_session_handler::<G>))
        .route(
            "/sessions/{id}/listings",
            get(list_handler::<G>).post(add_listing_handler::<G>),
        )
        .route("/sessions/{id}/listings/search", get(search_handler::<G>))
        .route("/sessions/{id}/listings/trending", get(trending_handler::<G>))
        .layer(cors)
        .with_state(state)
}
