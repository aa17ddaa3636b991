//! [`Client`]-resource endpoints.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{client, AccountStatus, Client, Email, Name, Phone};

use super::{encode, Ack, Endpoint, Mutation, Query, Tag};

/// `POST client/create_client` registering a new [`Client`].
#[derive(Clone, Debug, Serialize)]
pub struct CreateClient {
    /// [`Name`] of the new [`Client`].
    pub name: Name,

    /// [`Email`] of the new [`Client`].
    pub email: Email,

    /// [`Phone`] of the new [`Client`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
}

impl Endpoint for CreateClient {
    type Output = Client;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    fn path(&self) -> String {
        "client/create_client".into()
    }

    fn body(&self) -> Option<Value> {
        Some(encode(self))
    }
}

impl Mutation for CreateClient {
    const INVALIDATES: &'static [Tag] = &[Tag::Client];
}

/// `POST client/get_all_clients` listing [`Client`]s page by page.
#[derive(Clone, Debug, Default)]
pub struct GetAllClients(pub list::Selector);

impl Endpoint for GetAllClients {
    type Output = list::Page;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    fn path(&self) -> String {
        "client/get_all_clients".into()
    }

    fn body(&self) -> Option<Value> {
        Some(encode(&self.0))
    }
}

impl Query for GetAllClients {
    const TAGS: &'static [Tag] = &[Tag::Client];
}

/// Listing of [`Client`]s.
pub mod list {
    use serde::Serialize;

    use crate::domain::{AccountStatus, Client};

    common::define_pagination!(Client, Filter);

    /// Filter of a [`Client`] listing.
    #[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
    pub struct Filter {
        /// [`AccountStatus`] the listed [`Client`]s must have.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<AccountStatus>,
    }
}

/// `PUT client/update_client/{id}` changing the provided fields of a
/// [`Client`].
#[derive(Clone, Debug, Serialize)]
pub struct UpdateClient {
    /// ID of the [`Client`] to update.
    #[serde(skip)]
    pub id: client::Id,

    /// New [`Name`], if it changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,

    /// New [`Email`], if it changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,

    /// New [`Phone`], if it changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
}

impl Endpoint for UpdateClient {
    type Output = Client;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::PUT
    }

    fn path(&self) -> String {
        format!("client/update_client/{}", self.id)
    }

    fn body(&self) -> Option<Value> {
        Some(encode(self))
    }
}

impl Mutation for UpdateClient {
    const INVALIDATES: &'static [Tag] = &[Tag::Client];
}

/// `PUT client/enable_disable_client/{id}` toggling a [`Client`]'s
/// [`AccountStatus`].
#[derive(Clone, Debug, Serialize)]
pub struct EnableDisableClient {
    /// ID of the [`Client`] to toggle.
    #[serde(skip)]
    pub id: client::Id,

    /// [`AccountStatus`] to set.
    pub status: AccountStatus,
}

impl Endpoint for EnableDisableClient {
    type Output = Ack;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::PUT
    }

    fn path(&self) -> String {
        format!("client/enable_disable_client/{}", self.id)
    }

    fn body(&self) -> Option<Value> {
        Some(encode(self))
    }
}

impl Mutation for EnableDisableClient {
    const INVALIDATES: &'static [Tag] = &[Tag::Client];
}

/// `PUT client/delete_client/{id}` removing a [`Client`].
#[derive(Clone, Debug)]
pub struct DeleteClient {
    /// ID of the [`Client`] to remove.
    pub id: client::Id,
}

impl Endpoint for DeleteClient {
    type Output = Ack;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::PUT
    }

    fn path(&self) -> String {
        format!("client/delete_client/{}", self.id)
    }
}

impl Mutation for DeleteClient {
    const INVALIDATES: &'static [Tag] = &[Tag::Client];
}
