//! `wakecall-alarm` — single-slot alarm scheduler with SQLite persistence.
//!
//! # Overview
//!
//! At most one alarm exists at a time. [`scheduler::AlarmScheduler`] owns the
//! pending timer (a spawned Tokio task) and the in-memory state, writing every
//! arm/cancel through to the [`store::AlarmStore`] so the alarm survives a
//! restart. On startup, [`scheduler::AlarmScheduler::restore`] re-arms the
//! persisted alarm unless it is too close to (or past) "now", in which case it
//! is discarded — a stale wake-up call is worse than none.
//!
//! The fire-time side effect is injected as a [`action::WakeAction`]
//! capability; this crate never constructs the notification payload.

pub mod action;
pub mod db;
pub mod error;
pub mod schedule;
pub mod scheduler;
pub mod store;

pub use action::{WakeAction, WakeError};
pub use error::{AlarmError, Result};
pub use schedule::next_occurrence;
pub use scheduler::AlarmScheduler;
pub use store::AlarmStore;
