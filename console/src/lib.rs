//! Deploy Console Library
//!
//! Keeps a deployment status panel in sync with the panel backend and gates
//! the commands a user can send from it.

pub mod actions;
pub mod app;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod storage;
pub mod sync;
pub mod utils;
pub mod view;
pub mod workers;
