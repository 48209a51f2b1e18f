//! Daily rollup engine: one merged record per calendar day across nutrition,
//! running, resistance training, hydration and body weight.

mod aggregate;
mod axis;
pub mod calories;
pub mod dto;
pub mod error;
pub mod handlers;
mod merge;
pub mod services;
mod weekly;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::analytics_routes()
}
