//! Data models shared by every pipeline stage.

pub mod config;
pub mod discrepancy;
pub mod invoice;
pub mod purchase_order;
pub mod state;
