//! Core types and pure logic for resourcekit.
//!
//! The crate is organised bottom-up: [`record`] describes persisted types and
//! their field tables, [`filters`] holds the per-request query constraints,
//! [`selection`] accumulates predicates, [`storage`] defines the store
//! collaborator and the generic [`storage::Repository`], and [`service`] wraps a
//! repository behind an external representation. [`guard`] is independent and
//! consumed by the HTTP layer.

pub mod filters;
pub mod guard;
pub mod record;
pub mod selection;
pub mod service;
pub mod storage;
