//! [`Appointment`]-resource endpoints.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    appointment::{self, ScheduleDateTime, Status},
    client, coach, Appointment,
};

use super::{encode, Ack, Endpoint, Mutation, Query, Tag};

/// `POST appointment/create_appointment` putting an [`Appointment`] on
/// the calendar.
#[derive(Clone, Debug, Serialize)]
pub struct CreateAppointment {
    /// ID of the attending [`Client`](crate::domain::Client).
    pub client_id: client::Id,

    /// ID of the hosting [`Coach`](crate::domain::Coach).
    pub coach_id: coach::Id,

    /// Scheduled date and time.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub scheduled_at: ScheduleDateTime,

    /// Duration in minutes.
    pub duration_minutes: u32,
}

impl Endpoint for CreateAppointment {
    type Output = Appointment;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    fn path(&self) -> String {
        "appointment/create_appointment".into()
    }

    fn body(&self) -> Option<Value> {
        Some(encode(self))
    }
}

impl Mutation for CreateAppointment {
    const INVALIDATES: &'static [Tag] = &[Tag::Appointment];
}

/// `POST appointment/get_all_appointments` listing [`Appointment`]s page
/// by page.
#[derive(Clone, Debug, Default)]
pub struct GetAllAppointments(pub list::Selector);

impl Endpoint for GetAllAppointments {
    type Output = list::Page;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    fn path(&self) -> String {
        "appointment/get_all_appointments".into()
    }

    fn body(&self) -> Option<Value> {
        Some(encode(&self.0))
    }
}

impl Query for GetAllAppointments {
    const TAGS: &'static [Tag] = &[Tag::Appointment];
}

/// Listing of [`Appointment`]s.
pub mod list {
    use serde::Serialize;

    use crate::domain::{appointment::Status, client, coach, Appointment};

    common::define_pagination!(Appointment, Filter);

    /// Filter of an [`Appointment`] listing.
    #[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
    pub struct Filter {
        /// ID of the attending [`Client`](crate::domain::Client).
        #[serde(skip_serializing_if = "Option::is_none")]
        pub client_id: Option<client::Id>,

        /// ID of the hosting [`Coach`](crate::domain::Coach).
        #[serde(skip_serializing_if = "Option::is_none")]
        pub coach_id: Option<coach::Id>,

        /// [`Status`] the listed [`Appointment`]s must have.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<Status>,
    }
}

/// `PUT appointment/update_appointment/{id}` changing the provided
/// fields of an [`Appointment`].
///
/// Cancelling and completing go through the `status` field.
#[derive(Clone, Debug, Serialize)]
pub struct UpdateAppointment {
    /// ID of the [`Appointment`] to update.
    #[serde(skip)]
    pub id: appointment::Id,

    /// New schedule, if it changes.
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "common::datetime::serde::rfc3339::option"
    )]
    pub scheduled_at: Option<ScheduleDateTime>,

    /// New duration in minutes, if it changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,

    /// New [`Status`], if it changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl Endpoint for UpdateAppointment {
    type Output = Appointment;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::PUT
    }

    fn path(&self) -> String {
        format!("appointment/update_appointment/{}", self.id)
    }

    fn body(&self) -> Option<Value> {
        Some(encode(self))
    }
}

impl Mutation for UpdateAppointment {
    const INVALIDATES: &'static [Tag] = &[Tag::Appointment];
}

/// `PUT appointment/delete_appointment/{id}` removing an
/// [`Appointment`].
#[derive(Clone, Debug)]
pub struct DeleteAppointment {
    /// ID of the [`Appointment`] to remove.
    pub id: appointment::Id,
}

impl Endpoint for DeleteAppointment {
    type Output = Ack;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::PUT
    }

    fn path(&self) -> String {
        format!("appointment/delete_appointment/{}", self.id)
    }
}

impl Mutation for DeleteAppointment {
    const INVALIDATES: &'static [Tag] = &[Tag::Appointment];
}
