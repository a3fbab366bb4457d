//! # HTTP Handlers
//!
//! - [`product`] - The catalog routes under `/Product`
//! - [`health`] - Liveness and database check

pub mod health;
pub mod product;

#[cfg(test)]
mod tests;
