//! [`Client`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use super::{AccountStatus, Email, Name, Phone};

/// Client (coachee) of the platform.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Client {
    /// ID of this [`Client`].
    pub id: Id,

    /// [`Name`] of this [`Client`].
    pub name: Name,

    /// [`Email`] of this [`Client`].
    pub email: Email,

    /// [`Phone`] of this [`Client`].
    #[serde(default)]
    pub phone: Option<Phone>,

    /// [`AccountStatus`] of this [`Client`].
    pub status: AccountStatus,

    /// [`DateTime`] when this [`Client`] was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: CreationDateTime,
}

/// ID of a [`Client`].
///
/// Issued by the platform, opaque to the console.
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(str, String)]
pub struct Id(String);

/// [`DateTime`] when a [`Client`] was created.
pub type CreationDateTime = DateTimeOf<(Client, unit::Creation)>;
