use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{instrument, warn};
use crate::domain::ProdutoDto;
use crate::patch::{PatchDocument, PatchError};
use crate::repository::ProdutoRepository;
use crate::service::ProdutoService;
use super::error::ApiError;
use super::versioning::{api_version_middleware, ApiVersion};

const PATCH_MEDIA_TYPES: [&str; 2] = ["application/json", "application/json-patch+json"];

#[derive(Debug, Deserialize)]
pub struct IdParam {
    id: String,
}

/// Builds the catalog router: the versioned routes under `/api/v{version}`
/// and the same routes under `/api` for header/query negotiation.
pub fn router<R: ProdutoRepository>(service: ProdutoService<R>, cors: CorsLayer) -> Router {
    let produtos = Router::new()
        .route("/produtos", get(list::<R>).post(create::<R>))
        .route(
            "/produtos/{id}",
            get(get_by_id::<R>).patch(update::<R>).delete(delete::<R>),
        );

    Router::new()
        .nest("/api/{version}", produtos.clone())
        .nest("/api", produtos)
        .with_state(service)
        .layer(axum::middleware::from_fn(api_version_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS policy allowing any method from the given origins.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Route ids must be integers >= 1; anything else is simply not a product.
fn parse_id(raw: &str) -> Result<u32, ApiError> {
    match raw.parse::<u32>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(ApiError::NotFound(format!("Produto not found: {raw}"))),
    }
}

/// Reads a patch document from the request. An empty body means no document.
fn read_patch_document(headers: &HeaderMap, body: &Bytes) -> Result<Option<PatchDocument>, PatchError> {
    if body.is_empty() {
        return Ok(None);
    }
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    if !PATCH_MEDIA_TYPES.iter().any(|accepted| essence.eq_ignore_ascii_case(accepted)) {
        return Err(PatchError::UnsupportedMediaType(content_type.to_string()));
    }
    PatchDocument::from_slice(body).map(Some)
}

#[instrument(skip(service))]
async fn list<R: ProdutoRepository>(
    State(service): State<ProdutoService<R>>,
) -> Result<Json<Vec<ProdutoDto>>, ApiError> {
    Ok(Json(service.list().await?))
}

#[instrument(skip(service))]
async fn get_by_id<R: ProdutoRepository>(
    State(service): State<ProdutoService<R>>,
    Path(param): Path<IdParam>,
) -> Result<Json<ProdutoDto>, ApiError> {
    let id = parse_id(&param.id)?;
    Ok(Json(service.get_by_id(id).await?))
}

#[instrument(skip(service, body))]
async fn create<R: ProdutoRepository>(
    State(service): State<ProdutoService<R>>,
    Extension(version): Extension<ApiVersion>,
    body: Result<Json<ProdutoDto>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let created = service.create(input).await?;
    let location = format!("/api/v{}/produtos/{}", version.major, created.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(created.produto)))
}

#[instrument(skip(service, headers, body))]
async fn update<R: ProdutoRepository>(
    State(service): State<ProdutoService<R>>,
    Path(param): Path<IdParam>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ProdutoDto>, ApiError> {
    let id = parse_id(&param.id)?;
    let document = read_patch_document(&headers, &body)?;
    Ok(Json(service.update(id, document).await?))
}

#[instrument(skip(service))]
async fn delete<R: ProdutoRepository>(
    State(service): State<ProdutoService<R>>,
    Path(param): Path<IdParam>,
) -> Result<Json<ProdutoDto>, ApiError> {
    let id = parse_id(&param.id)?;
    Ok(Json(service.delete(id).await?))
}
