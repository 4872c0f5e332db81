//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use datastore::{Datastore, ProductFilter};
use domain::{Money, Product, ProductId, ProductPatch};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub id: Option<String>,
    pub category: Option<String>,
    pub collection_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub category: String,
    pub price: Option<Money>,
    pub stock: Option<u32>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub collection_ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub id: Option<String>,
    #[serde(flatten)]
    pub patch: ProductPatch,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
    pub message: String,
}

/// POST /products — create a catalog product.
///
/// Unspecified stock defaults to 5 and price to zero, so a bare
/// id/name submission yields a sellable row.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let id = req
        .id
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Product ID is required".to_string()))?;
    let name = req
        .name
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Product name is required".to_string()))?;

    let now = Utc::now();
    let product = Product {
        id: ProductId::new(id),
        name,
        category: req.category,
        price: req.price.unwrap_or_default(),
        stock: req.stock.unwrap_or(5),
        images: req.images,
        collection_ids: req.collection_ids,
        created_at: now,
        updated_at: now,
    };

    let product = state.store.insert_product(product).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            success: true,
            product,
            message: "Product created successfully".to_string(),
        }),
    ))
}

/// GET /products — one by `?id=`, or the filtered list.
#[tracing::instrument(skip(state))]
pub async fn fetch<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(id) = query.id {
        let product = state
            .store
            .get_product(&ProductId::new(id.clone()))
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;
        return Ok(Json(
            serde_json::json!({ "success": true, "product": product }),
        ));
    }

    let filter = ProductFilter {
        category: query.category,
        collection_id: query.collection_id,
    };
    let products = state.store.list_products(filter).await?;
    Ok(Json(
        serde_json::json!({ "products": products, "total": products.len() }),
    ))
}

/// PUT /products — field-wise update keyed by body `id`.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = req
        .id
        .ok_or_else(|| ApiError::BadRequest("Product ID is required".to_string()))?;

    let product_id = ProductId::new(id.clone());
    let Some(mut product) = state.store.get_product(&product_id).await? else {
        return Err(ApiError::NotFound(format!("Product {id} not found")));
    };

    product.apply(req.patch, Utc::now());
    let product = state.store.update_product(product).await?;

    Ok(Json(ProductResponse {
        success: true,
        product,
        message: "Product updated successfully".to_string(),
    }))
}

/// DELETE /products?id=
#[tracing::instrument(skip(state))]
pub async fn remove<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<super::orders::IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = query
        .id
        .ok_or_else(|| ApiError::BadRequest("Product ID is required".to_string()))?;

    state.store.delete_product(&ProductId::new(id)).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "message": "Product deleted successfully" }),
    ))
}
