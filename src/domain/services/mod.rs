pub mod auth_service;
pub mod authorization;
pub mod event_cache;
