use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{CreateProductRequest, Product, UpdateProductRequest},
    queries::product_queries,
    utils::extractors::AdminUser,
    AppState,
};

pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    validate_product(&payload.name, payload.price, payload.stock)?;

    let product = product_queries::create_product(&state.db, &payload).await?;

    tracing::info!("Product {} created", product.id);

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    if let Some(ref name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("Name cannot be empty".to_string()));
        }
    }

    if let Some(price) = payload.price {
        if price < Decimal::ZERO {
            return Err(AppError::BadRequest("Price cannot be negative".to_string()));
        }
    }

    if let Some(stock) = payload.stock {
        if stock < 0 {
            return Err(AppError::BadRequest("Stock cannot be negative".to_string()));
        }
    }

    let product = product_queries::update_product(&state.db, id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let deleted = product_queries::delete_product(&state.db, id).await?;

    if !deleted {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn validate_product(name: &str, price: Decimal, stock: i32) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    if price < Decimal::ZERO {
        return Err(AppError::BadRequest("Price cannot be negative".to_string()));
    }

    if stock < 0 {
        return Err(AppError::BadRequest("Stock cannot be negative".to_string()));
    }

    Ok(())
}
