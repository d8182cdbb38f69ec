pub mod auth_service;
pub mod config_service;
pub mod controller;
pub mod gateway;
pub mod session;
pub mod typing;
