//! [`Invoice`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use super::{client, subscription};

/// Invoice issued to a [`Client`](super::Client).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Invoice {
    /// ID of this [`Invoice`].
    pub id: Id,

    /// ID of the billed [`Client`](super::Client).
    pub client_id: client::Id,

    /// ID of the [`Subscription`](super::Subscription) this [`Invoice`]
    /// bills, if any.
    #[serde(default)]
    pub subscription_id: Option<subscription::Id>,

    /// Human-readable [`Number`] of this [`Invoice`].
    pub number: Number,

    /// Billed amount of this [`Invoice`].
    pub amount: Money,

    /// [`Status`] of this [`Invoice`].
    pub status: Status,

    /// [`DateTime`] when this [`Invoice`] was issued.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub issued_at: IssueDateTime,
}

/// ID of an [`Invoice`].
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

/// Human-readable number of an [`Invoice`].
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
pub struct Number(String);

define_kind! {
    #[doc = "Status of an [`Invoice`]."]
    enum Status {
        #[doc = "Invoice has been issued and awaits payment."]
        Issued = 1,

        #[doc = "Invoice has been paid."]
        Paid = 2,

        #[doc = "Invoice has been voided."]
        Void = 3,
    }
}

/// [`DateTime`] when an [`Invoice`] was issued.
pub type IssueDateTime = DateTimeOf<(Invoice, unit::Issue)>;
