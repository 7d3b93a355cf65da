pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod search;
pub mod keywords;
pub mod storage;
pub mod remote;
pub mod presenter;
pub mod app;

pub use error::{Error, Result};
