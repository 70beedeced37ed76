//! Acting user reference.
//!
//! Session and credential handling live outside core; this type only
//! carries the stable user id needed for ownership checks.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type UserId = Uuid;

/// Opaque reference to a user. Two identities are equal iff their ids are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(UserId);

impl Identity {
    pub fn new(id: UserId) -> Self {
        Self(id)
    }

    /// Creates an identity with a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn id(&self) -> UserId {
        self.0
    }
}

impl From<UserId> for Identity {
    fn from(value: UserId) -> Self {
        Self(value)
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
