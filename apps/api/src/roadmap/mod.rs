// Roadmap generation: skill inference, resource catalog, and the idempotent store.
// Inference and catalog are pure; only the store touches persistence.

pub mod catalog;
pub mod handlers;
pub mod inference;
pub mod store;
