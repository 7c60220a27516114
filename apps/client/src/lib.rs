//! HireRig client core: optimistic local state for a social hiring platform,
//! mirrored to a REST backend through an ordered outbox.

pub mod assistant;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod llm_client;
pub mod models;
pub mod seed;
pub mod session;
pub mod state;
pub mod storage;
pub mod store;

#[cfg(test)]
mod test_support;
