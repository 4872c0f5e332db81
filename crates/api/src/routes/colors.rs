//! Apparel color endpoints.
//!
//! Unlike the other route families these key updates and deletes by
//! path parameter.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use datastore::Datastore;
use domain::{Color, ColorCategory, ColorPatch};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ColorQuery {
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateColorRequest {
    pub name: Option<String>,
    pub hex_code: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct ColorResponse {
    pub success: bool,
    pub color: Color,
    pub message: String,
}

/// GET /colors?category= — active colors, optionally per category.
#[tracing::instrument(skip(state))]
pub async fn list<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ColorQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(ref category) = query.category
        && ColorCategory::parse(category).is_none()
    {
        return Err(ApiError::BadRequest(
            "Invalid category. Must be shirt or trouser".to_string(),
        ));
    }

    let colors = state.store.list_colors(query.category.as_deref()).await?;
    Ok(Json(
        serde_json::json!({ "colors": colors, "total": colors.len() }),
    ))
}

/// POST /colors — add a color to the palette.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateColorRequest>,
) -> Result<(StatusCode, Json<ColorResponse>), ApiError> {
    let name = req
        .name
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Color name is required".to_string()))?;
    let hex_code = req
        .hex_code
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Color hex code is required".to_string()))?;
    let category = req
        .category
        .as_deref()
        .and_then(ColorCategory::parse)
        .ok_or_else(|| {
            ApiError::BadRequest("Invalid category. Must be shirt or trouser".to_string())
        })?;

    let color = Color {
        id: Color::generate_id(category),
        name,
        hex_code,
        category,
        quantity: req.quantity,
        is_active: true,
        created_at: Utc::now(),
    };

    let color = state.store.insert_color(color).await?;
    Ok((
        StatusCode::CREATED,
        Json(ColorResponse {
            success: true,
            color,
            message: "Color created successfully".to_string(),
        }),
    ))
}

/// PUT /colors/{id} — field-wise update.
#[tracing::instrument(skip(state, patch))]
pub async fn update<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(patch): Json<ColorPatch>,
) -> Result<Json<ColorResponse>, ApiError> {
    let Some(mut color) = state.store.get_color(&id).await? else {
        return Err(ApiError::NotFound(format!("Color {id} not found")));
    };

    color.apply(patch);
    let color = state.store.update_color(color).await?;

    Ok(Json(ColorResponse {
        success: true,
        color,
        message: "Color updated successfully".to_string(),
    }))
}

/// DELETE /colors/{id}
#[tracing::instrument(skip(state))]
pub async fn remove<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.delete_color(&id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "message": "Color deleted successfully" }),
    ))
}
