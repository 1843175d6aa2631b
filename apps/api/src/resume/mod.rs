pub mod export;
pub mod handlers;
pub mod mapping;
pub mod models;
pub mod repository;
pub mod store;
pub mod validation;
