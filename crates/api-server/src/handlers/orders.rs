use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use domain::{Order, OrderFilter, OrderView, PlaceOrder, RequestedItem};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: Option<String>,
    #[serde(default)]
    pub products: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub product: Option<String>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub message: &'static str,
    pub order: Order,
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub message: &'static str,
    pub orders: Vec<OrderView>,
}

impl From<CreateOrderRequest> for PlaceOrder {
    fn from(request: CreateOrderRequest) -> Self {
        PlaceOrder {
            user_id: request.user_id,
            items: request
                .products
                .into_iter()
                .map(|item| RequestedItem {
                    product: item.product,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

pub async fn place_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    info!("🛒 Placing order for user {:?}", payload.user_id);

    let order = state.store.order_placement.place_order(payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            message: "Order created successfully",
            order,
        }),
    ))
}

pub async fn orders_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<OrderListResponse>, ApiError> {
    let filter = OrderFilter {
        user_id: Some(user_id),
    };
    let orders = state.store.order_admin.list_orders(&filter).await?;
    Ok(Json(OrderListResponse {
        message: "User orders fetched successfully",
        orders,
    }))
}

pub async fn list_orders(State(state): State<AppState>) -> Result<Json<OrderListResponse>, ApiError> {
    let orders = state.store.order_admin.list_orders(&OrderFilter::default()).await?;
    Ok(Json(OrderListResponse {
        message: "Orders fetched successfully",
        orders,
    }))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    let Json(payload) = payload?;
    let order = state
        .store
        .order_admin
        .update_status(&order_id, payload.status.as_deref())
        .await?;
    Ok(Json(OrderResponse {
        message: "Order status updated successfully",
        order,
    }))
}
