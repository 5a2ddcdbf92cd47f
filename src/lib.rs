//! Backend for sharing hidden messages: stores short texts under random ids
//! and keeps an append-only log of views.

pub mod app_state;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
