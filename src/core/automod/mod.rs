// Core automod module - banned-word filter business logic.

pub mod automod_models;
pub mod automod_service;

pub use automod_models::*;
pub use automod_service::*;
