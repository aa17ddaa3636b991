//! [`Subscription`] history definitions.
//!
//! [`Subscription`]: super::Subscription

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use super::subscription;

/// Record of a [`Subscription`](super::Subscription) lifecycle event.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Record {
    /// ID of this [`Record`].
    pub id: Id,

    /// ID of the [`Subscription`](super::Subscription) this [`Record`]
    /// describes.
    pub subscription_id: subscription::Id,

    /// [`Event`] this [`Record`] captures.
    pub event: Event,

    /// [`DateTime`] when the [`Event`] occurred.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub occurred_at: OccurrenceDateTime,
}

/// ID of a history [`Record`].
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
    #[doc = "Lifecycle event of a [`Subscription`](super::Subscription)."]
    enum Event {
        #[doc = "Subscription was created."]
        Created = 1,

        #[doc = "Subscription was renewed for another period."]
        Renewed = 2,

        #[doc = "Subscription was cancelled."]
        Cancelled = 3,

        #[doc = "Subscription ran out."]
        Expired = 4,
    }
}

/// [`DateTime`] when a [`Record`]ed event occurred.
pub type OccurrenceDateTime = DateTimeOf<(Record, unit::Occurrence)>;
