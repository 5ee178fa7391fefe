//! In-memory client registry for a social-network simulation.
//!
//! Clients have a score, follow at most two other clients, and connect to
//! each other in an undirected graph. Everything is reached through
//! [`registry::SocialRegistry`], which keeps the structures below in step:
//!
//! - [`store`] owns the clients, indexed by name and by score.
//! - [`history`] is the undo stack of reversible operations.
//! - [`requests`] queues follow requests in arrival order.
//! - [`tree`] is an unbalanced BST by score, queried by depth.
//! - [`graph`] holds connections and answers hop-count distances.
//!
//! Around the core, [`loader`] bulk-loads clients from JSON, [`snapshot`]
//! reports the full state, and [`protocol`] plus [`console`] drive the
//! interactive shell in `main.rs`.

pub mod cli;
pub mod client;
pub mod console;
pub mod error;
pub mod graph;
pub mod history;
pub mod loader;
pub mod protocol;
pub mod registry;
pub mod requests;
pub mod snapshot;
pub mod store;
pub mod tree;

pub use client::Client;
pub use error::{ErrorKind, RegistryError, Result};
pub use registry::SocialRegistry;
