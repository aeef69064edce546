pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod seed;
pub mod serializer;
pub mod store;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use config::Config;
