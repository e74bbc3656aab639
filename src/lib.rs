//! Metabase Provider
//!
//! An infrastructure-as-code provider that manages Metabase collections,
//! permission groups, users and user/group memberships through the Metabase
//! REST API.
//!
//! # Overview
//!
//! The crate is layered:
//!
//! - **Client**: [`MetabaseClient`] sends authenticated JSON requests and maps
//!   non-2xx statuses to [`ProviderError`]
//! - **Repositories**: one per entity, building request bodies and decoding DTOs
//! - **Models**: wire DTOs and the declarative state built from them
//! - **Resources**: per-entity handlers bound into a generic resource with
//!   schema validation, planning and import
//! - **Provider**: [`MetabaseProvider`] turns configuration into a shared client
//!   and routes host calls to resources through [`ProviderService`]
//! - **Logging**: integration with `tracing` for structured logging
//!
//! # Quick Start
//!
//! ```ignore
//! use metabase_provider::{init_logging, MetabaseProvider, ProviderConfig, ProviderService};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging();
//!
//!     let provider = MetabaseProvider::configured(ProviderConfig::from_env()?).await?;
//!     let plan = provider
//!         .plan("metabase_permission_group", None, json!({"name": "Analysts"}), json!({}))
//!         .await?;
//!     let state = provider
//!         .create("metabase_permission_group", plan.planned_state)
//!         .await?;
//!     tracing::info!(%state, "Created permission group");
//!     Ok(())
//! }
//! ```
//!
//! # Resources
//!
//! | type name | deletion |
//! |---|---|
//! | `metabase_collection` | archives the collection |
//! | `metabase_permission_group` | deletes the group |
//! | `metabase_user` | deactivates the user |
//! | `metabase_user_permission_group_membership` | removes the membership |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod plan;
pub mod provider;
pub mod repositories;
pub mod resources;
pub mod schema;
pub mod service;
pub mod testing;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use client::MetabaseClient;
pub use config::ProviderConfig;
pub use error::{ProviderError, Result};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::MetabaseProvider;
pub use schema::ProviderSchema;
pub use service::ProviderService;
pub use types::{AttributeChange, ImportedResource, PlanResult, ProviderMetadata};
pub use validation::{validate, validate_result};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
