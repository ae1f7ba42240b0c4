//! Deploy panel API models
//!
//! Wire types shared between the panel backend and its clients.

pub mod models;
