//! Customer endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use datastore::Datastore;
use domain::{Customer, CustomerKey, CustomerPatch};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Deserialize)]
pub struct UpdateCustomerRequest {
    pub id: Option<String>,
    #[serde(flatten)]
    pub patch: CustomerPatch,
}

#[derive(Serialize)]
pub struct CustomerResponse {
    pub success: bool,
    pub customer: Customer,
    pub message: String,
}

/// POST /customers — create a customer record with no orders yet.
///
/// The record is keyed the same way placement keys it: phone when
/// present, else email. Neither present is a validation error.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let key = CustomerKey::derive(&req.phone, &req.email)
        .ok_or_else(|| ApiError::BadRequest("Phone or email is required".to_string()))?;

    let now = Utc::now();
    let customer = Customer {
        id: key,
        name: req.name,
        phone: req.phone,
        email: req.email,
        address: req.address,
        orders: vec![],
        total_orders: 0,
        first_order: None,
        last_order: None,
        created_at: now,
        updated_at: now,
    };

    let customer = state.store.insert_customer(customer).await?;
    Ok((
        StatusCode::CREATED,
        Json(CustomerResponse {
            success: true,
            customer,
            message: "Customer created successfully".to_string(),
        }),
    ))
}

/// GET /customers — one by `?id=`, or all sorted by most recent order.
#[tracing::instrument(skip(state))]
pub async fn fetch<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<super::orders::IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(id) = query.id {
        let customer = state
            .store
            .get_customer(&CustomerKey::new(id.clone()))
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Customer {id} not found")))?;
        return Ok(Json(
            serde_json::json!({ "success": true, "customer": customer }),
        ));
    }

    let customers = state.store.list_customers().await?;
    Ok(Json(
        serde_json::json!({ "customers": customers, "total": customers.len() }),
    ))
}

/// PUT /customers — field-wise update keyed by body `id`.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let id = req
        .id
        .ok_or_else(|| ApiError::BadRequest("Customer ID is required".to_string()))?;

    let key = CustomerKey::new(id.clone());
    let Some(mut customer) = state.store.get_customer(&key).await? else {
        return Err(ApiError::NotFound(format!("Customer {id} not found")));
    };

    customer.apply(req.patch, Utc::now());
    let customer = state.store.update_customer(customer).await?;

    Ok(Json(CustomerResponse {
        success: true,
        customer,
        message: "Customer updated successfully".to_string(),
    }))
}

/// DELETE /customers?id=
#[tracing::instrument(skip(state))]
pub async fn remove<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<super::orders::IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = query
        .id
        .ok_or_else(|| ApiError::BadRequest("Customer ID is required".to_string()))?;

    state.store.delete_customer(&CustomerKey::new(id)).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "message": "Customer deleted successfully" }),
    ))
}
