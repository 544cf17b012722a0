//! HTTP request handlers, grouped by resource.

pub mod chat;
pub mod health;
pub mod models;
pub mod predictions;
pub mod transactions;
pub mod users;
