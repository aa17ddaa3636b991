//! [`Subscription`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use super::{client, coach};

/// Subscription of a [`Client`] to a coaching plan.
///
/// [`Client`]: super::Client
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Subscription {
    /// ID of this [`Subscription`].
    pub id: Id,

    /// ID of the [`Client`](super::Client) holding this
    /// [`Subscription`].
    pub client_id: client::Id,

    /// ID of the [`Coach`](super::Coach) assigned to this
    /// [`Subscription`], if any.
    #[serde(default)]
    pub coach_id: Option<coach::Id>,

    /// [`Plan`] of this [`Subscription`].
    pub plan: Plan,

    /// Price of this [`Subscription`] per billing period.
    pub price: Money,

    /// [`Status`] of this [`Subscription`].
    pub status: Status,

    /// [`DateTime`] when this [`Subscription`] started.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub started_at: StartDateTime,

    /// [`DateTime`] when this [`Subscription`] expires, if bounded.
    #[serde(default, with = "common::datetime::serde::rfc3339::option")]
    pub expires_at: Option<ExpirationDateTime>,
}

/// ID of a [`Subscription`].
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

/// Name of the coaching plan a [`Subscription`] is for.
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(str, String)]
pub struct Plan(String);

define_kind! {
    #[doc = "Status of a [`Subscription`]."]
    enum Status {
        #[doc = "Subscription is active and billed."]
        Active = 1,

        #[doc = "Subscription has been cancelled."]
        Cancelled = 2,

        #[doc = "Subscription has run out."]
        Expired = 3,
    }
}

/// [`DateTime`] when a [`Subscription`] started.
pub type StartDateTime = DateTimeOf<(Subscription, unit::Start)>;

/// [`DateTime`] when a [`Subscription`] expires.
pub type ExpirationDateTime = DateTimeOf<(Subscription, unit::Expiration)>;
