//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on request translation and auth plumbing.
//! Anything that mutates more than one row — admitting an application to a
//! step, recording a pass/fail decision, hiring — runs in a single Postgres
//! transaction here rather than as a sequence of independent updates.

pub mod account;
pub mod application;
pub mod cycle;
pub mod directory;
pub mod job;
pub mod progress;
pub mod session;
pub mod stats;
pub mod verification;
