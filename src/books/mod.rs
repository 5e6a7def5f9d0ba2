//! Books Module
//! Mission: Owner-scoped storage and endpoints for `libros`

pub mod api;
pub mod models;
pub mod service;
pub mod store;

pub use store::BookStore;
