pub mod catalog;
pub mod knowledge_base;
