//! Lazily loaded concept trees
//!
//! Immutable keyed forests, tree selections with pluggable selection modes,
//! and a node model that pages children from a remote tree service and
//! restores the ancestor hierarchy of search hits.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod forest;
pub mod graph;
pub mod model;
pub mod node_model;
pub mod selection;

pub use error::Error;
pub use forest::KeyedForest;
pub use model::Node;
pub use node_model::NodeModel;
