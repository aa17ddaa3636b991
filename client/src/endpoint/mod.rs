//! Declarations of the platform API endpoints.
//!
//! Each endpoint is a plain struct carrying the request parameters and
//! declaring its wire shape through the [`Endpoint`] trait. Readable
//! endpoints additionally implement [`Query`] and name the cache [`Tag`]s
//! their results carry; writing ones implement [`Mutation`] and name the
//! [`Tag`]s they invalidate.

pub mod appointment;
pub mod auth;
pub mod client;
pub mod coach;
pub mod invoice;
pub mod subscription;
pub mod subscription_history;

use serde::{de, Deserialize, Serialize};
use serde_json::Value;

use crate::transport::Call;

/// Cache tag of a platform resource.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Tag {
    /// Client listings and records.
    Client,

    /// Coach listings and records.
    Coach,

    /// Subscription listings and records.
    Subscription,

    /// Appointment listings and records.
    Appointment,

    /// Subscription history listings.
    SubscriptionHistory,

    /// Invoice listings and records.
    Invoice,
}

/// Declaration of a single platform API endpoint.
pub trait Endpoint {
    /// Type of this [`Endpoint`]'s decoded response.
    type Output: de::DeserializeOwned;

    /// HTTP method of this [`Endpoint`].
    fn method(&self) -> reqwest::Method;

    /// Path of this [`Endpoint`], relative to the API base URL.
    fn path(&self) -> String;

    /// JSON body of this [`Endpoint`]'s request, if any.
    fn body(&self) -> Option<Value> {
        None
    }

    /// Builds the wire [`Call`] of this [`Endpoint`].
    fn call(&self) -> Call {
        Call {
            method: self.method(),
            path: self.path(),
            body: self.body(),
        }
    }
}

/// Readable [`Endpoint`], cached under the [`Tag`]s it declares.
pub trait Query: Endpoint {
    /// [`Tag`]s the results of this [`Query`] carry.
    const TAGS: &'static [Tag];
}

/// Writing [`Endpoint`], invalidating the [`Tag`]s it declares.
pub trait Mutation: Endpoint {
    /// [`Tag`]s this [`Mutation`] invalidates once it succeeds.
    const INVALIDATES: &'static [Tag];
}

/// Acknowledgement of a [`Mutation`] whose response body carries nothing
/// the console needs.
///
/// Decodes from any body, including an absent one.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Ack;

impl<'de> Deserialize<'de> for Ack {
    fn deserialize<D: de::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let _: de::IgnoredAny = de::IgnoredAny::deserialize(deserializer)?;
        Ok(Self)
    }
}

/// Encodes the provided request parameters as a JSON body.
fn encode<T: Serialize>(params: &T) -> Value {
    serde_json::to_value(params)
        .unwrap_or_else(|e| panic!("cannot encode request body: {e}"))
}
