//! Core business logic - framework-agnostic presence tracking, aggregate
//! storage, and moderation operations. Nothing in here imports serenity
//! types; the bot layer converts gateway data into the owned values these
//! modules consume.

/// Voice event snapshots and transition classification
pub mod event;
/// Duration and summary formatting for replies
pub mod report;
/// Aggregate store and stats query service
pub mod stats;
/// Session registry, wait tracker, and the transition processor
pub mod tracker;
/// Moderation warnings with optional expiry
pub mod warning;
