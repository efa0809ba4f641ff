//! # Genesite Server
//!
//! Serves the generation form, runs the pipeline behind `/api/generate`
//! and keeps an in-memory diagnostics log of every run.

pub mod events;
pub mod observer_impl;
pub mod server;

pub use events::{EventLog, EventStatus, GenerationEvent, DEFAULT_EVENT_CAPACITY};
pub use server::{create_router, ApiError, AppState, GenerateResponse, GenesiteServer};
