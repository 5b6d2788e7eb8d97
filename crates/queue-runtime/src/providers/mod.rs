//! Queue provider implementations.
//!
//! This module contains concrete implementations of the `QueueProvider` and
//! `QueueSender` traits for different queue backends.

pub mod filesystem;
pub mod memory;

pub use filesystem::{FilesystemProvider, SpooledMessage};
pub use memory::InMemoryProvider;
