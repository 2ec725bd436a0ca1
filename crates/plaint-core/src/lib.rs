//! Core types and the lifecycle engine for the Plaint complaint portal.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::ComplaintStore`]; every mutation goes
//! through [`Engine`].

pub mod actor;
pub mod complaint;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod payment;
pub mod response;
pub mod stats;
pub mod store;

use chrono::{DateTime, SubsecRound as _, Utc};

pub use engine::Engine;
pub use error::{Error, Result};

/// The current instant at the microsecond precision stores persist.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }
