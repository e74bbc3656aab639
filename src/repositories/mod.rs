//! One repository per Metabase entity.
//!
//! A repository builds request bodies, calls [`MetabaseClient`](crate::client::MetabaseClient)
//! and decodes the response DTO. Errors from the client propagate unchanged.

mod collection;
mod membership;
mod permission_group;
mod user;

pub use collection::CollectionRepository;
pub use membership::MembershipRepository;
pub use permission_group::PermissionGroupRepository;
pub use user::UserRepository;
