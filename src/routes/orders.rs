use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        order_total, CreateOrderRequest, NewOrderItem, Order, OrderResponse, OrderStatus,
        UpdateOrderStatusRequest,
    },
    queries::{order_queries, product_queries, user_queries},
    utils::extractors::{AdminUser, SessionUser},
    AppState,
};

pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    validate_order(&payload)?;

    // Single batch lookup for the whole cart
    let requested_ids: Vec<Uuid> = payload.items.iter().map(|i| i.product_id).collect();
    let products = product_queries::find_by_ids(&state.db, &requested_ids).await?;

    let mut items = Vec::with_capacity(payload.items.len());

    for item in &payload.items {
        let product = products.get(&item.product_id).ok_or_else(|| {
            AppError::NotFound(format!("Product not found: {}", item.product_id))
        })?;

        // Snapshot of the catalog price; later product edits do not touch it
        items.push(NewOrderItem {
            product_id: item.product_id,
            quantity: item.quantity,
            price: product.price,
        });
    }

    let total_amount = order_total(&items);

    let order = order_queries::create_order_with_items(&state.db, &payload, &items, total_amount)
        .await?;

    tracing::info!("Order {} created, total {}", order.id, order.total_amount);

    let items = order_queries::get_items_for_order(&state.db, order.id).await?;

    Ok((StatusCode::CREATED, Json(OrderResponse { order, items })))
}

fn validate_order(payload: &CreateOrderRequest) -> Result<()> {
    if payload.buyer_name.trim().is_empty() {
        return Err(AppError::BadRequest("Buyer name is required".to_string()));
    }

    if payload.buyer_contact.trim().is_empty() {
        return Err(AppError::BadRequest("Buyer contact is required".to_string()));
    }

    if payload.delivery_address.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Delivery address is required".to_string(),
        ));
    }

    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    for item in &payload.items {
        if item.quantity < 1 {
            return Err(AppError::BadRequest(format!(
                "Invalid quantity for product {}",
                item.product_id
            )));
        }
    }

    Ok(())
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>> {
    let order = order_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    let items = order_queries::get_items_for_order(&state.db, id).await?;

    Ok(Json(OrderResponse { order, items }))
}

pub async fn list_orders(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Json<Vec<OrderResponse>>> {
    let orders = order_queries::list_all(&state.db).await?;

    Ok(Json(with_items(&state, orders).await?))
}

pub async fn user_orders(
    State(state): State<AppState>,
    SessionUser(identity): SessionUser,
) -> Result<Json<Vec<OrderResponse>>> {
    let user = user_queries::find_by_email(&state.db, &identity.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let orders = order_queries::list_by_buyer_contact(&state.db, &user.email).await?;

    Ok(Json(with_items(&state, orders).await?))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderResponse>> {
    let new_status = OrderStatus::parse(&payload.status).ok_or_else(|| {
        AppError::BadRequest(format!("Invalid order status: {}", payload.status))
    })?;

    let order = order_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if !order.status.can_transition_to(new_status) {
        return Err(AppError::BadRequest(format!(
            "Cannot transition order from {} to {}",
            order.status.as_str(),
            new_status.as_str()
        )));
    }

    // Last write wins between concurrent transitions
    let order = order_queries::update_status(&state.db, id, new_status)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    tracing::info!("Order {} moved to {}", order.id, order.status.as_str());

    let items = order_queries::get_items_for_order(&state.db, id).await?;

    Ok(Json(OrderResponse { order, items }))
}

async fn with_items(state: &AppState, orders: Vec<Order>) -> Result<Vec<OrderResponse>> {
    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let all_items = order_queries::get_items_for_orders(&state.db, &order_ids).await?;

    let mut items_map: HashMap<Uuid, Vec<_>> = HashMap::new();
    for item in all_items {
        items_map.entry(item.order_id).or_default().push(item);
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = items_map.remove(&order.id).unwrap_or_default();
            OrderResponse { order, items }
        })
        .collect())
}
