//! Declarative state of each resource and its conversion from DTOs.
//!
//! State mirrors the resource schema: ids are strings, and every field is
//! nullable because the host may hand over partial state (after an import) or
//! unknown computed values (during create).

use serde::{Deserialize, Serialize};

use super::dto::{CollectionDto, MembershipDto, PermissionGroupDto, UserDto};
use crate::error::{ProviderError, Result};

/// State of a `metabase_collection`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionState {
    /// Collection id.
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Parent collection id.
    pub parent_id: Option<String>,
    /// Soft-delete flag.
    pub archived: Option<bool>,
}

impl From<CollectionDto> for CollectionState {
    fn from(dto: CollectionDto) -> Self {
        Self {
            id: Some(dto.id.to_string()),
            name: Some(dto.name),
            parent_id: dto.parent_id.map(|id| id.to_string()),
            archived: Some(dto.archived),
        }
    }
}

/// State of a `metabase_permission_group`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionGroupState {
    /// Group id.
    pub id: Option<String>,
    /// Group name.
    pub name: Option<String>,
}

impl From<PermissionGroupDto> for PermissionGroupState {
    fn from(dto: PermissionGroupDto) -> Self {
        Self {
            id: Some(dto.id.to_string()),
            name: Some(dto.name),
        }
    }
}

/// State of a `metabase_user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserState {
    /// User id.
    pub id: Option<String>,
    /// Login email. Changing it replaces the user.
    pub email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Whether the account is active.
    pub is_active: Option<bool>,
}

impl From<UserDto> for UserState {
    fn from(dto: UserDto) -> Self {
        Self {
            id: Some(dto.id.to_string()),
            email: Some(dto.email),
            first_name: dto.first_name,
            last_name: dto.last_name,
            is_active: Some(dto.is_active),
        }
    }
}

/// State of a `metabase_user_permission_group_membership`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipState {
    /// Membership id.
    pub id: Option<String>,
    /// Member user id.
    pub user_id: Option<String>,
    /// Permission group id.
    pub permission_group_id: Option<String>,
}

impl From<MembershipDto> for MembershipState {
    fn from(dto: MembershipDto) -> Self {
        Self {
            id: Some(dto.membership_id.to_string()),
            user_id: Some(dto.user_id.to_string()),
            permission_group_id: Some(dto.group_id.to_string()),
        }
    }
}

/// Borrow a required string attribute, failing if it is unset.
pub fn required<'a>(value: &'a Option<String>, attribute: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| ProviderError::Validation(format!("'{}' must be set", attribute)))
}

/// Parse a string-encoded id into the integer the API expects.
pub fn parse_id(value: &str, attribute: &str) -> Result<i64> {
    value.trim().parse().map_err(|_| {
        ProviderError::Validation(format!(
            "'{}' must be a numeric id, got '{}'",
            attribute, value
        ))
    })
}

/// Parse a required string-encoded id.
pub fn required_id(value: &Option<String>, attribute: &str) -> Result<i64> {
    parse_id(required(value, attribute)?, attribute)
}
