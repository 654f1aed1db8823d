//! A GTD next-actions dashboard fed by Trello.
//!
//! Two binaries share this library: `next-actions-api` aggregates Trello
//! cards into an action feed served as JSON, and `next-actions` watches
//! that feed, classifies what is overdue or due soon, and keeps the
//! terminal title current.

pub mod config;
pub mod core;
pub mod feed;
pub mod server;
pub mod trello;
