//! Agricultural University Inventory Server
//!
//! A REST JSON API for the equipment, assets and staffing tables kept by
//! the university's departments and affiliated research institutes.
//! Department heads manage their own department; administrators manage all.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod repository;
pub mod schemas;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
