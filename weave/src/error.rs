//! Error types.
//!
//! Most widget operations never fail: unknown items and stale handles are
//! silently ignored. These errors cover the few places where a caller hands
//! us data we cannot accept.

use thiserror::Error;
use weavedom::NodeId;

/// Errors raised by [`DataProvider`](crate::data::DataProvider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// Two items produced the same identifier.
    #[error("Duplicate item id '{0}'")]
    DuplicateId(String),

    /// An earlier panic left the provider state unusable.
    #[error("Data provider state is poisoned")]
    Poisoned,
}

/// Errors raised by [`ComponentStore`](crate::store::ComponentStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Nothing is registered for the node.
    #[error("No component registered for node {0}")]
    NotRegistered(NodeId),

    /// A component is registered but it is not of the requested type.
    #[error("Component registered for node {node} is not a {expected}")]
    TypeMismatch {
        /// The node that was looked up.
        node: NodeId,
        /// Type name that was requested.
        expected: &'static str,
    },
}

/// Errors raised when loading a [`WeaveConfig`](crate::config::WeaveConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Page size must be greater than zero")]
    ZeroPageSize,

    #[error("At least one page size option is required")]
    NoPageSizeOptions,
}
