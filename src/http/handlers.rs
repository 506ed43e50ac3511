//! Route handlers for the coupon API.
//!
//! Each handler validates its request, runs the boundary checks the service
//! leaves to its caller (code uniqueness, minimum basket value, code
//! existence) and counts the response in `http_requests_total`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::warn;

use super::body::{ApplyRequest, CouponsRequest, CreateRequest, ErrorBody};
use super::{AppState, REQUESTS_TOTAL};
use crate::store::CouponStore;

const APPLY_PATH: &str = "/apply";
const CREATE_PATH: &str = "/create";
const COUPONS_PATH: &str = "/coupons";

/// `POST /api/apply` - apply a coupon to a basket.
pub(super) async fn apply<S: CouponStore + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error(APPLY_PATH, StatusCode::BAD_REQUEST, rejection.body_text())
        }
    };

    let coupon = match state.service().find_by_code(&request.code) {
        Ok(coupon) => coupon,
        Err(e) if e.is_not_found() => {
            return error(
                APPLY_PATH,
                StatusCode::NOT_FOUND,
                format!("Coupon with code {} not found", request.code),
            )
        }
        Err(e) => return error(APPLY_PATH, StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    if !coupon.accepts(&request.basket) {
        return error(
            APPLY_PATH,
            StatusCode::BAD_REQUEST,
            format!(
                "Basket value ({}) inferior to the minimum basket value for this code ({})",
                request.basket.value, coupon.min_basket_value
            ),
        );
    }

    match state.service().apply_coupon(request.basket, &request.code) {
        Ok(basket) => reply(APPLY_PATH, StatusCode::OK, basket),
        Err(e) => {
            warn!(code = %request.code, error = %e, "coupon application failed");
            error(APPLY_PATH, StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// `POST /api/create` - create a coupon under an unused code.
pub(super) async fn create<S: CouponStore + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error(CREATE_PATH, StatusCode::BAD_REQUEST, rejection.body_text())
        }
    };

    match state.service().find_by_code(&request.code) {
        Ok(_) => {
            return error(
                CREATE_PATH,
                StatusCode::BAD_REQUEST,
                format!("Coupon with code {} already exists", request.code),
            )
        }
        Err(e) if e.is_not_found() => {}
        Err(e) => return error(CREATE_PATH, StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }

    match state
        .service()
        .create_coupon(request.discount, &request.code, request.min_basket_value)
    {
        Ok(coupon) => reply(CREATE_PATH, StatusCode::CREATED, coupon),
        Err(e) => {
            warn!(code = %request.code, error = %e, "coupon creation failed");
            error(CREATE_PATH, StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// `GET /api/coupons` - fetch coupons for a list of codes.
pub(super) async fn coupons<S: CouponStore + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CouponsRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error(COUPONS_PATH, StatusCode::BAD_REQUEST, rejection.body_text())
        }
    };

    for code in &request.codes {
        match state.service().find_by_code(code) {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                return error(
                    COUPONS_PATH,
                    StatusCode::NOT_FOUND,
                    format!("Coupon with code {} not found", code),
                )
            }
            Err(e) => {
                return error(COUPONS_PATH, StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }

    // The batch blocks on its lookup threads, keep it off the async workers.
    let service = state.service_handle();
    let lookup = tokio::task::spawn_blocking(move || service.get_coupons(&request.codes)).await;

    match lookup {
        Ok(lookup) => match lookup.into_result() {
            Ok(coupons) => reply(COUPONS_PATH, StatusCode::OK, coupons),
            Err(e) => error(COUPONS_PATH, StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        },
        Err(e) => {
            warn!(error = %e, "batch lookup task failed");
            error(COUPONS_PATH, StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// `GET /metrics` - Prometheus text exposition.
pub(super) async fn render_metrics<S: CouponStore + 'static>(
    State(state): State<AppState<S>>,
) -> Response {
    match state.metrics() {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}

fn reply<T: Serialize>(path: &'static str, status: StatusCode, body: T) -> Response {
    metrics::counter!(
        REQUESTS_TOTAL,
        "status" => status.as_str().to_string(),
        "path" => path
    )
    .increment(1);
    (status, Json(body)).into_response()
}

fn error(path: &'static str, status: StatusCode, message: impl Into<String>) -> Response {
    reply(
        path,
        status,
        ErrorBody {
            error: message.into(),
        },
    )
}
