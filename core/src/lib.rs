//! Prize wheel core: weighted sector selection reconciled with a
//! decelerating spin that visibly lands on the chosen sector.
//!
//! Pure pieces (`layout`, `selector`, `reconciler`, `motion`, `resolver`)
//! hold no state. `engine` owns the only mutable state and is driven one
//! tick at a time by its host.

pub mod celebration;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod layout;
pub mod motion;
pub mod reconciler;
pub mod resolver;
pub mod rng;
pub mod selector;
pub mod snapshot;
pub mod types;
