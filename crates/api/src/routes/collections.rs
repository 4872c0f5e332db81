//! Promotional collection endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use datastore::Datastore;
use domain::{Collection, CollectionPatch, CollectionStatus};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CollectionQuery {
    pub id: Option<String>,
    pub status: Option<CollectionStatus>,
}

#[derive(Deserialize)]
pub struct CreateCollectionRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub discount: u32,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub limited_products: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateCollectionRequest {
    pub id: Option<String>,
    #[serde(flatten)]
    pub patch: CollectionPatch,
}

/// A collection as served, with the derived status attached.
#[derive(Serialize)]
pub struct CollectionView {
    #[serde(flatten)]
    pub collection: Collection,
    pub status: CollectionStatus,
}

impl CollectionView {
    fn at(collection: Collection, now: DateTime<Utc>) -> Self {
        let status = collection.status(now);
        Self { collection, status }
    }
}

/// POST /collections — create a time-boxed collection.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateCollectionRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let name = req
        .name
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Collection name is required".to_string()))?;
    let end_date = req
        .end_date
        .ok_or_else(|| ApiError::BadRequest("Collection end date is required".to_string()))?;

    let now = Utc::now();
    let collection = Collection {
        id: req.id.filter(|v| !v.is_empty()).unwrap_or_else(Collection::generate_id),
        name,
        description: req.description,
        end_date,
        discount: req.discount,
        icon: req.icon,
        features: req.features,
        limited_products: req.limited_products,
        created_at: now,
        updated_at: now,
    };

    let collection = state.store.insert_collection(collection).await?;
    let view = CollectionView::at(collection, now);
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "collection": view,
            "message": "Collection created successfully",
        })),
    ))
}

/// GET /collections — one by `?id=`, or all with derived status,
/// optionally filtered by `?status=`.
#[tracing::instrument(skip(state))]
pub async fn fetch<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<CollectionQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let now = Utc::now();

    if let Some(id) = query.id {
        let collection = state
            .store
            .get_collection(&id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Collection {id} not found")))?;
        let view = CollectionView::at(collection, now);
        return Ok(Json(
            serde_json::json!({ "success": true, "collection": view }),
        ));
    }

    let views: Vec<CollectionView> = state
        .store
        .list_collections()
        .await?
        .into_iter()
        .map(|c| CollectionView::at(c, now))
        .filter(|v| query.status.is_none_or(|wanted| v.status == wanted))
        .collect();

    Ok(Json(
        serde_json::json!({ "collections": views, "total": views.len() }),
    ))
}

/// PUT /collections — field-wise update keyed by body `id`.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<UpdateCollectionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = req
        .id
        .ok_or_else(|| ApiError::BadRequest("Collection ID is required".to_string()))?;

    let Some(mut collection) = state.store.get_collection(&id).await? else {
        return Err(ApiError::NotFound(format!("Collection {id} not found")));
    };

    let now = Utc::now();
    collection.apply(req.patch, now);
    let collection = state.store.update_collection(collection).await?;
    let view = CollectionView::at(collection, now);

    Ok(Json(serde_json::json!({
        "success": true,
        "collection": view,
        "message": "Collection updated successfully",
    })))
}

/// DELETE /collections?id=
#[tracing::instrument(skip(state))]
pub async fn remove<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<super::orders::IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = query
        .id
        .ok_or_else(|| ApiError::BadRequest("Collection ID is required".to_string()))?;

    state.store.delete_collection(&id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "message": "Collection deleted successfully" }),
    ))
}
