pub mod auth;
pub mod error;
pub mod middleware;
pub mod notice;
pub mod pages;
pub mod routes;
pub mod session;
pub mod state;
pub mod websites;

pub use routes::router;
pub use state::{AppState, AppStateInner};
