//! [`Subscription`]-resource endpoints.

use common::Money;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    client, coach,
    subscription::{self, ExpirationDateTime, Plan, Status},
    Subscription,
};

use super::{encode, Ack, Endpoint, Mutation, Query, Tag};

/// `POST subscription/create_subscription` subscribing a
/// [`Client`](crate::domain::Client) to a plan.
#[derive(Clone, Debug, Serialize)]
pub struct CreateSubscription {
    /// ID of the subscribing [`Client`](crate::domain::Client).
    pub client_id: client::Id,

    /// ID of the assigned [`Coach`](crate::domain::Coach), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach_id: Option<coach::Id>,

    /// [`Plan`] being subscribed to.
    pub plan: Plan,

    /// Price per billing period.
    pub price: Money,

    /// Expiration of the [`Subscription`], if bounded.
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "common::datetime::serde::rfc3339::option"
    )]
    pub expires_at: Option<ExpirationDateTime>,
}

impl Endpoint for CreateSubscription {
    type Output = Subscription;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    fn path(&self) -> String {
        "subscription/create_subscription".into()
    }

    fn body(&self) -> Option<Value> {
        Some(encode(self))
    }
}

impl Mutation for CreateSubscription {
    const INVALIDATES: &'static [Tag] =
        &[Tag::Subscription, Tag::SubscriptionHistory];
}

/// `POST subscription/get_all_subscriptions` listing [`Subscription`]s
/// page by page.
#[derive(Clone, Debug, Default)]
pub struct GetAllSubscriptions(pub list::Selector);

impl Endpoint for GetAllSubscriptions {
    type Output = list::Page;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    fn path(&self) -> String {
        "subscription/get_all_subscriptions".into()
    }

    fn body(&self) -> Option<Value> {
        Some(encode(&self.0))
    }
}

impl Query for GetAllSubscriptions {
    const TAGS: &'static [Tag] = &[Tag::Subscription];
}

/// Listing of [`Subscription`]s.
pub mod list {
    use serde::Serialize;

    use crate::domain::{client, subscription::Status, Subscription};

    common::define_pagination!(Subscription, Filter);

    /// Filter of a [`Subscription`] listing.
    #[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
    pub struct Filter {
        /// ID of the [`Client`](crate::domain::Client) whose
        /// [`Subscription`]s are listed.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub client_id: Option<client::Id>,

        /// [`Status`] the listed [`Subscription`]s must have.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<Status>,
    }
}

/// `PUT subscription/update_subscription/{id}` changing the provided
/// fields of a [`Subscription`].
#[derive(Clone, Debug, Serialize)]
pub struct UpdateSubscription {
    /// ID of the [`Subscription`] to update.
    #[serde(skip)]
    pub id: subscription::Id,

    /// New [`Plan`], if it changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,

    /// New price, if it changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,

    /// New assigned [`Coach`](crate::domain::Coach), if it changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach_id: Option<coach::Id>,
}

impl Endpoint for UpdateSubscription {
    type Output = Subscription;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::PUT
    }

    fn path(&self) -> String {
        format!("subscription/update_subscription/{}", self.id)
    }

    fn body(&self) -> Option<Value> {
        Some(encode(self))
    }
}

impl Mutation for UpdateSubscription {
    const INVALIDATES: &'static [Tag] =
        &[Tag::Subscription, Tag::SubscriptionHistory];
}

/// `PUT subscription/enable_disable_subscription/{id}` switching a
/// [`Subscription`] between [`Status::Active`] and [`Status::Cancelled`].
#[derive(Clone, Debug, Serialize)]
pub struct EnableDisableSubscription {
    /// ID of the [`Subscription`] to switch.
    #[serde(skip)]
    pub id: subscription::Id,

    /// [`Status`] to set.
    pub status: Status,
}

impl Endpoint for EnableDisableSubscription {
    type Output = Ack;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::PUT
    }

    fn path(&self) -> String {
        format!("subscription/enable_disable_subscription/{}", self.id)
    }

    fn body(&self) -> Option<Value> {
        Some(encode(self))
    }
}

impl Mutation for EnableDisableSubscription {
    const INVALIDATES: &'static [Tag] =
        &[Tag::Subscription, Tag::SubscriptionHistory];
}

/// `PUT subscription/delete_subscription/{id}` removing a
/// [`Subscription`].
#[derive(Clone, Debug)]
pub struct DeleteSubscription {
    /// ID of the [`Subscription`] to remove.
    pub id: subscription::Id,
}

impl Endpoint for DeleteSubscription {
    type Output = Ack;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::PUT
    }

    fn path(&self) -> String {
        format!("subscription/delete_subscription/{}", self.id)
    }
}

impl Mutation for DeleteSubscription {
    const INVALIDATES: &'static [Tag] =
        &[Tag::Subscription, Tag::SubscriptionHistory];
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::domain::subscription::Plan;

    use super::{CreateSubscription, Endpoint as _};

    #[test]
    fn creation_serializes_price_as_string() {
        let creation = CreateSubscription {
            client_id: "c-1".to_owned().into(),
            coach_id: None,
            plan: Plan::from("monthly".to_owned()),
            price: "49.99USD".parse().unwrap(),
            expires_at: None,
        };

        assert_eq!(creation.path(), "subscription/create_subscription");
        assert_eq!(
            creation.body(),
            Some(json!({
                "client_id": "c-1",
                "plan": "monthly",
                "price": "49.99USD",
            })),
        );
    }
}
