//! Data models: wire DTOs and the declarative state built from them.

pub mod dto;
pub mod state;

pub use dto::{
    CollectionDto, CollectionPatch, CreateCollectionRequest, CreateMembershipRequest,
    CreateUserRequest, MembershipDto, PermissionGroupDto, PermissionGroupRequest,
    UpdateUserRequest, UserDto,
};
pub use state::{CollectionState, MembershipState, PermissionGroupState, UserState};
