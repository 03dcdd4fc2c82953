pub mod handler;
pub mod presenter;
