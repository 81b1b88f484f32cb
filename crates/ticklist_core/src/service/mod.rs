//! Use-case services over the canonical list.
//!
//! # Responsibility
//! - Translate user intents into list mutations plus exactly one recorded
//!   change each.
//! - Keep view/driver layers decoupled from list internals.

pub mod list_manager;
