//! HTTP gateway: the frozen route registry bound onto an axum server.

pub mod adapter;
pub mod app;
pub mod config;
pub mod dispatch;
pub mod routes;
pub mod services;
