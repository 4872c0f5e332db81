//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use checkout::NewOrder;
use datastore::Datastore;
use domain::{Order, OrderId, OrderPatch};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: Order,
    pub message: String,
}

#[derive(Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    pub total: usize,
}

#[derive(Deserialize)]
pub struct UpdateOrderRequest {
    pub id: Option<String>,
    #[serde(flatten)]
    pub patch: OrderPatch,
}

/// POST /orders — validate stock and place an order.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewOrder>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = state.checkout.place_order(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            success: true,
            order,
            message: "Order placed successfully".to_string(),
        }),
    ))
}

/// GET /orders — list all orders, or one when `?id=` is given.
#[tracing::instrument(skip(state))]
pub async fn fetch<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(id) = query.id {
        let order = state
            .store
            .get_order(&OrderId::new(id.clone()))
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;
        return Ok(Json(serde_json::json!({ "success": true, "order": order })));
    }

    let orders = state.store.list_orders().await?;
    let total = orders.len();
    Ok(Json(
        serde_json::to_value(OrderListResponse { orders, total })
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    ))
}

/// PUT /orders — field-wise update; status changes adjust stock.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let id = req
        .id
        .ok_or_else(|| ApiError::BadRequest("Order ID is required".to_string()))?;

    let order = state
        .checkout
        .update_order(&OrderId::new(id), req.patch)
        .await?;

    Ok(Json(OrderResponse {
        success: true,
        order,
        message: "Order updated successfully".to_string(),
    }))
}

/// DELETE /orders?id= — removes the order row only.
#[tracing::instrument(skip(state))]
pub async fn remove<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = query
        .id
        .ok_or_else(|| ApiError::BadRequest("Order ID is required".to_string()))?;

    state.store.delete_order(&OrderId::new(id)).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "message": "Order deleted successfully" }),
    ))
}
