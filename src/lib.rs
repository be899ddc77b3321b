//! Core engine for tracking brewing batches, the temperature sensors that
//! monitor them, and the attribution of each recorded measurement to the
//! batch its sensor was clipped onto at the moment of the reading.
//!
//! The HTTP/GraphQL surface, authentication, and deployment wiring live in a
//! separate service; this crate exposes plain async functions that take the
//! database handle and the requesting user's id explicitly.

pub mod common;
pub mod config;

pub mod assignments;
pub mod batches;
pub mod measurements;
pub mod sensors;

pub use common::errors::{CoreError, CoreResult};
pub use common::pagination::{Connection, Cursor, Edge, Page};
