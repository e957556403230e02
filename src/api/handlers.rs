//! Order endpoints

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::auth::Authenticated;
use crate::api::dto::{CreateOrderRequest, ListParams};
use crate::api::error::ApiError;
use crate::api::AppState;
use crate::services::{OrderListView, OrderView};

pub async fn create_order(
    State(s): State<AppState>,
    Authenticated(identity): Authenticated,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderView>), ApiError> {
    let Json(request) = body?;
    let command = request.into_command()?;
    let view = s.orders.place_order(&identity, command.payment_id, command.cart, command.total_paid).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn list_orders(
    State(s): State<AppState>,
    Authenticated(_): Authenticated,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<OrderListView>, ApiError> {
    let Query(params) = params?;
    let filter = params.into_filter()?;
    Ok(Json(s.orders.list_orders(&filter).await?))
}

pub async fn get_order(
    State(s): State<AppState>,
    Authenticated(_): Authenticated,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<OrderView>, ApiError> {
    let Path(id) = id?;
    Ok(Json(s.orders.order_detail(id).await?))
}
