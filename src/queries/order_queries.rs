use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{CreateOrderRequest, NewOrderItem, Order, OrderItemDetail, OrderStatus},
};

/// Inserts the order and its line items in a single transaction, so a
/// half-written order is never observable.
pub async fn create_order_with_items(
    pool: &PgPool,
    req: &CreateOrderRequest,
    items: &[NewOrderItem],
    total_amount: Decimal,
) -> Result<Order> {
    let mut tx = pool.begin().await?;

    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (buyer_name, buyer_contact, delivery_address, total_amount, status)
         VALUES ($1, $2, $3, $4, 'PENDING')
         RETURNING *",
    )
    .bind(&req.buyer_name)
    .bind(&req.buyer_contact)
    .bind(&req.delivery_address)
    .bind(total_amount)
    .fetch_one(&mut *tx)
    .await?;

    let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
    let quantities: Vec<i32> = items.iter().map(|i| i.quantity).collect();
    let prices: Vec<Decimal> = items.iter().map(|i| i.price).collect();

    sqlx::query(
        "INSERT INTO order_items (order_id, product_id, quantity, price)
         SELECT $1, unnest($2::uuid[]), unnest($3::int[]), unnest($4::decimal[])",
    )
    .bind(order.id)
    .bind(&product_ids)
    .bind(&quantities)
    .bind(&prices)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(order)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(order)
}

pub async fn update_status(pool: &PgPool, id: Uuid, status: OrderStatus) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $1 WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(order)
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    Ok(orders)
}

pub async fn list_by_buyer_contact(pool: &PgPool, buyer_contact: &str) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE buyer_contact = $1 ORDER BY created_at DESC",
    )
    .bind(buyer_contact)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

pub async fn get_items_for_order(pool: &PgPool, order_id: Uuid) -> Result<Vec<OrderItemDetail>> {
    let items = sqlx::query_as::<_, OrderItemDetail>(
        "SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name, oi.quantity, oi.price
         FROM order_items oi
         JOIN products p ON p.id = oi.product_id
         WHERE oi.order_id = $1
         ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn get_items_for_orders(
    pool: &PgPool,
    order_ids: &[Uuid],
) -> Result<Vec<OrderItemDetail>> {
    let items = sqlx::query_as::<_, OrderItemDetail>(
        "SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name, oi.quantity, oi.price
         FROM order_items oi
         JOIN products p ON p.id = oi.product_id
         WHERE oi.order_id = ANY($1)
         ORDER BY oi.id",
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await?;

    Ok(items)
}
