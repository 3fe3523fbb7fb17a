pub mod aggregate;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod meals;
pub mod render;
pub mod state;
pub mod views;
