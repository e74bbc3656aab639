//! Wire shapes of Metabase requests and responses.

use serde::{Deserialize, Serialize};

/// A collection as returned by `/api/collection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDto {
    /// Collection id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Parent collection id; `null` for top-level collections.
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Soft-delete flag.
    #[serde(default)]
    pub archived: bool,
}

/// Body of `POST /api/collection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCollectionRequest {
    /// Display name.
    pub name: String,
    /// Parent collection id, omitted for a top-level collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    /// Always `false`; archived collections cannot be created.
    pub archived: bool,
}

/// Partial body of `PUT /api/collection/{id}`.
///
/// A `None` field is left out of the body and keeps its server value.
/// `parent_id: Some(None)` is sent as `null` and moves the collection to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionPatch {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New parent; `Some(None)` clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<i64>>,
    /// New archived flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

impl CollectionPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none() && self.archived.is_none()
    }
}

/// A permission group as returned by `/api/permissions/group`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroupDto {
    /// Group id.
    pub id: i64,
    /// Group name.
    pub name: String,
}

/// Body of `POST` and `PUT` on `/api/permissions/group`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionGroupRequest {
    /// Group name.
    pub name: String,
}

/// A user as returned by `/api/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    /// User id.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Body of `POST /api/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateUserRequest {
    /// Login email.
    pub email: String,
    /// Given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Body of `PUT /api/user/{id}`. Only names are updated through this call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateUserRequest {
    /// Given name; `null` clears it.
    pub first_name: Option<String>,
    /// Family name; `null` clears it.
    pub last_name: Option<String>,
}

/// A user/permission-group membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipDto {
    /// Membership id.
    pub membership_id: i64,
    /// Member user id.
    pub user_id: i64,
    /// Permission group id.
    pub group_id: i64,
}

/// Body of `POST /api/permissions/membership`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreateMembershipRequest {
    /// Member user id.
    pub user_id: i64,
    /// Permission group id.
    pub group_id: i64,
}
