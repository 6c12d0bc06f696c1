//! HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use luceta_payments::{
    catalog, AudioProduct, Category, CheckoutRequest as PaymentCheckoutRequest, Customer,
    PaymentError, PlanType,
};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub payments_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub product_id: String,
    pub customer: Customer,
    #[serde(default)]
    pub plan_type: PlanType,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 { 1 }

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub category: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        payments_configured: state.payments.is_some(),
    })
}

/// Catalog, optionally filtered by `?category=`
pub async fn list_products(
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<&'static AudioProduct>>, ApiError> {
    match query.category {
        None => Ok(Json(catalog::products().iter().collect())),
        Some(raw) => {
            let category = Category::parse(&raw).ok_or_else(|| {
                api_error(
                    StatusCode::BAD_REQUEST,
                    format!("Unknown category: {raw}"),
                    "INVALID_CATEGORY",
                )
            })?;
            Ok(Json(catalog::get_products_by_category(category)))
        }
    }
}

pub async fn get_product(Path(id): Path<String>) -> Result<Json<&'static AudioProduct>, ApiError> {
    catalog::get_product_by_id(&id).map(Json).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            format!("Product not found: {id}"),
            "PRODUCT_NOT_FOUND",
        )
    })
}

/// Create a Dodo Payments checkout session for one product
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let payments = state.payments.as_ref().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Payments not configured",
            "PAYMENTS_DISABLED",
        )
    })?;

    if payload.quantity == 0 {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Quantity must be at least 1",
            "INVALID_QUANTITY",
        ));
    }

    let mut request = PaymentCheckoutRequest::single(
        payload.product_id,
        payload.quantity,
        payload.customer,
        payments.config().return_url.clone(),
    );
    request
        .metadata
        .insert("plan_type".into(), payload.plan_type.as_str().into());

    let session = payments
        .create_checkout_session(request)
        .await
        .map_err(|e| checkout_error(&e))?;

    Ok(Json(CheckoutResponse {
        checkout_url: session.checkout_url,
        session_id: session.session_id,
    }))
}

fn checkout_error(e: &PaymentError) -> ApiError {
    tracing::error!(status = ?e.status(), "Checkout error: {}", e);
    let status = match e {
        PaymentError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    };
    api_error(status, e.user_message(), "CHECKOUT_ERROR")
}
