//! [`Coach`] definitions.

use common::{define_kind, unit, DateTimeOf};
#[cfg(doc)]
use common::DateTime;
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use super::{AccountStatus, Email, Name, Phone};

/// Coach employed by the platform.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Coach {
    /// ID of this [`Coach`].
    pub id: Id,

    /// [`Name`] of this [`Coach`].
    pub name: Name,

    /// [`Email`] of this [`Coach`].
    pub email: Email,

    /// [`Phone`] of this [`Coach`].
    #[serde(default)]
    pub phone: Option<Phone>,

    /// Specialty this [`Coach`] advertises.
    #[serde(default)]
    pub specialty: Option<String>,

    /// [`Approval`] state of this [`Coach`].
    pub approval: Approval,

    /// [`AccountStatus`] of this [`Coach`].
    pub status: AccountStatus,

    /// [`DateTime`] when this [`Coach`] was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: CreationDateTime,
}

/// ID of a [`Coach`].
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

define_kind! {
    #[doc = "Approval state of a [`Coach`] application."]
    enum Approval {
        #[doc = "Application is awaiting review."]
        Pending = 1,

        #[doc = "Application has been approved."]
        Approved = 2,

        #[doc = "Application has been rejected."]
        Rejected = 3,
    }
}

/// [`DateTime`] when a [`Coach`] was created.
pub type CreationDateTime = DateTimeOf<(Coach, unit::Creation)>;
