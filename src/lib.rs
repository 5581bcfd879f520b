pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod model;
pub mod proposal;
pub mod session;
pub mod summary;
