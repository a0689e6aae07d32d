// Per-user state against roadmaps: completion sets and saved-roadmap membership.

pub mod handlers;
pub mod saved;
pub mod tracker;
