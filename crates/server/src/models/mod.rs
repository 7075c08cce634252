//! Domain models for the ordering service.
//!
//! - [`catalog`] - Read-only catalog entities (businesses, locations, spots,
//!   products, modifiers)
//! - [`order`] - Orders and their line items, plus the insert shapes used by
//!   the order composer
//! - [`session`] - The session-held business/spot binding

pub mod catalog;
pub mod order;
pub mod session;
