use axum::{
    routing::{post, put},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod jwt;
pub mod otp;
pub mod password;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(handlers::signup))
        .route("/signin", post(handlers::signin))
        .route("/verify", post(handlers::verify_email))
        .route("/request-otp", post(handlers::request_otp))
        .route("/update/:id", put(handlers::update_user))
        .route("/start", post(handlers::start_working))
}
