//! QR code generator web service: HTTP API, identity cookie, logo store and history.

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod identity;
pub mod server;
pub mod services;

pub use bootstrap::{init_foundation, load_dotenv};
