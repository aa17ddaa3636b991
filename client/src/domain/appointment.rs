//! [`Appointment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use super::{client, coach};

/// Coaching appointment between a [`Client`](super::Client) and a
/// [`Coach`](super::Coach).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Appointment {
    /// ID of this [`Appointment`].
    pub id: Id,

    /// ID of the attending [`Client`](super::Client).
    pub client_id: client::Id,

    /// ID of the hosting [`Coach`](super::Coach).
    pub coach_id: coach::Id,

    /// [`DateTime`] this [`Appointment`] is scheduled at.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub scheduled_at: ScheduleDateTime,

    /// Duration of this [`Appointment`] in minutes.
    pub duration_minutes: u32,

    /// [`Status`] of this [`Appointment`].
    pub status: Status,
}

/// ID of an [`Appointment`].
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
    #[doc = "Status of an [`Appointment`]."]
    enum Status {
        #[doc = "Appointment is on the calendar."]
        Scheduled = 1,

        #[doc = "Appointment took place."]
        Completed = 2,

        #[doc = "Appointment was called off."]
        Cancelled = 3,
    }
}

/// [`DateTime`] an [`Appointment`] is scheduled at.
pub type ScheduleDateTime = DateTimeOf<(Appointment, unit::Schedule)>;
