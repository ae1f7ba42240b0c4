//! Panel backend transport

pub mod client;
pub mod repo;
