//! [`Invoice`]-resource endpoints.
//!
//! Invoices are issued by the platform itself, so the console only reads
//! them.

use serde_json::Value;

use crate::domain::{invoice, Invoice};

use super::{encode, Endpoint, Query, Tag};

/// `POST invoice/get_all_invoices` listing [`Invoice`]s page by page.
#[derive(Clone, Debug, Default)]
pub struct GetAllInvoices(pub list::Selector);

impl Endpoint for GetAllInvoices {
    type Output = list::Page;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    fn path(&self) -> String {
        "invoice/get_all_invoices".into()
    }

    fn body(&self) -> Option<Value> {
        Some(encode(&self.0))
    }
}

impl Query for GetAllInvoices {
    const TAGS: &'static [Tag] = &[Tag::Invoice];
}

/// Listing of [`Invoice`]s.
pub mod list {
    use serde::Serialize;

    use crate::domain::{client, invoice::Status, Invoice};

    common::define_pagination!(Invoice, Filter);

    /// Filter of an [`Invoice`] listing.
    #[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
    pub struct Filter {
        /// ID of the billed [`Client`](crate::domain::Client).
        #[serde(skip_serializing_if = "Option::is_none")]
        pub client_id: Option<client::Id>,

        /// [`Status`] the listed [`Invoice`]s must have.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<Status>,
    }
}

/// `POST invoice/get_invoice/{id}` fetching a single [`Invoice`].
#[derive(Clone, Debug)]
pub struct GetInvoice {
    /// ID of the [`Invoice`] to fetch.
    pub id: invoice::Id,
}

impl Endpoint for GetInvoice {
    type Output = Invoice;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    fn path(&self) -> String {
        format!("invoice/get_invoice/{}", self.id)
    }
}

impl Query for GetInvoice {
    const TAGS: &'static [Tag] = &[Tag::Invoice];
}
