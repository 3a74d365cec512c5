pub mod guidance;
pub mod handlers;
pub mod responses;
pub mod server;

pub use server::{build_router, start, AppState, ServerConfig, ServerHandle};
