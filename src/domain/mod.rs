//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains some of:
//! - `mod.rs`: Rich domain types (validated, business-logic-ready)
//! - `wire.rs`: Raw serde structs matching backend responses
//! - `convert.rs`: `TryFrom`/`From` conversions with validation
//! - `state.rs`: State containers with update methods (for feed-driven data)
//! - `client.rs`: Sub-client with HTTP methods and caching

pub mod chart;
pub mod market;
pub mod portfolio;
pub mod trading;
pub mod watchlist;
