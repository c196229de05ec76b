mod admin;
mod health;
mod login;
mod orders;
mod products;
mod profile;
mod register;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/auth/register", post(register::register_user))
        .route("/auth/verify-otp", post(register::verify_otp))
        .route("/auth/login", post(login::login_user))
        .route("/auth/admin-login", post(login::login_admin))
        .route("/auth/update-password", post(profile::update_password))
        .route(
            "/products",
            get(products::list_products).post(admin::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(admin::update_product)
                .delete(admin::delete_product),
        )
        .route(
            "/orders",
            post(orders::create_order).get(orders::list_orders),
        )
        .route(
            "/orders/{id}",
            get(orders::get_order).put(orders::update_order_status),
        )
        .route("/user-orders", get(orders::user_orders))
}
