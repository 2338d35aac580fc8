// reformery-api: Async Rust client for the Reformery studio booking API

pub mod client;
pub mod error;
pub mod models;
pub mod requests;
pub mod session;
pub mod transport;

mod auth;
mod classes;
mod enrollment;
mod packages;
mod schedules;
mod stats;
mod users;

pub use auth::LoginSession;
pub use client::ApiClient;
pub use error::Error;
pub use session::{SessionContext, SessionEvent};
pub use transport::{TlsMode, TransportConfig};
