mod auth;
mod chat;
mod config;

pub use auth::*;
pub use chat::*;
pub use config::*;
