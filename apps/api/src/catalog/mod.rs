pub mod handlers;
pub mod models;
pub mod ops;
pub mod validation;
