//! Subscription-history endpoints.

use serde_json::Value;

use super::{encode, Endpoint, Query, Tag};

/// `POST subscription_history/get_all_subscription_histories` listing
/// [`HistoryRecord`](crate::domain::HistoryRecord)s page by page.
#[derive(Clone, Debug, Default)]
pub struct GetAllSubscriptionHistories(pub list::Selector);

impl Endpoint for GetAllSubscriptionHistories {
    type Output = list::Page;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    fn path(&self) -> String {
        "subscription_history/get_all_subscription_histories".into()
    }

    fn body(&self) -> Option<Value> {
        Some(encode(&self.0))
    }
}

impl Query for GetAllSubscriptionHistories {
    const TAGS: &'static [Tag] = &[Tag::SubscriptionHistory];
}

/// Listing of [`HistoryRecord`](crate::domain::HistoryRecord)s.
pub mod list {
    use serde::Serialize;

    use crate::domain::{subscription, HistoryRecord};

    common::define_pagination!(HistoryRecord, Filter);

    /// Filter of a [`HistoryRecord`] listing.
    #[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
    pub struct Filter {
        /// ID of the [`Subscription`](crate::domain::Subscription) whose
        /// history is listed.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub subscription_id: Option<subscription::Id>,
    }
}
