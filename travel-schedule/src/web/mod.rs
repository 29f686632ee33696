//! Web layer for the schedule browser.
//!
//! A JSON API over the screen controllers. Each list screen can be read
//! as a snapshot, reloaded, filtered, and watched as a stream of
//! server-sent events.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppApi, AppState};
