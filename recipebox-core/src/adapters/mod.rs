//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP client for the RecipeApi port
//! - In-memory demo backend for demo mode
//! - In-memory page surface for the ResultsView port

pub mod demo;
pub mod http;
pub mod page;

#[cfg(test)]
pub mod http_mock;
