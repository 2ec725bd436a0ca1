//! The acting user, supplied by the identity layer to every engine call.
//!
//! Authentication and session handling live outside this crate; an [`Actor`]
//! is trusted as given.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Citizen,
  Admin,
}

/// `{ userId, role }` for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
  pub user_id: Uuid,
  pub role:    Role,
}

impl Actor {
  pub fn citizen(user_id: Uuid) -> Self { Self { user_id, role: Role::Citizen } }

  pub fn admin(user_id: Uuid) -> Self { Self { user_id, role: Role::Admin } }

  pub fn is_admin(&self) -> bool { self.role == Role::Admin }

  /// Whether this actor filed the complaint owned by `owner_user_id`.
  pub fn owns(&self, owner_user_id: Uuid) -> bool { self.user_id == owner_user_id }
}
