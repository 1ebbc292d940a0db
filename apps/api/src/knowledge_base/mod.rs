pub mod handlers;
pub mod integrity;
