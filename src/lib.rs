// src/lib.rs

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod orchestrator;
pub mod persona;
pub mod prompt;
pub mod session;
pub mod state;
pub mod store;

pub use error::{Result, ShadowError};
pub use orchestrator::Orchestrator;
pub use session::ShadowSession;
