//! Status reconciliation

pub mod page;
pub mod reconciler;
