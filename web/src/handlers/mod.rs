//! HTTP handlers, one module per concern.

pub mod display;
pub mod health;
pub mod identity;
pub mod tickets;
pub mod voucher;
