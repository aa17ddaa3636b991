//! [`Coach`]-resource endpoints.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    coach::{self, Approval},
    AccountStatus, Coach, Email, Name, Phone,
};

use super::{encode, Ack, Endpoint, Mutation, Query, Tag};

/// `POST coach/create_coach` registering a new [`Coach`].
#[derive(Clone, Debug, Serialize)]
pub struct CreateCoach {
    /// [`Name`] of the new [`Coach`].
    pub name: Name,

    /// [`Email`] of the new [`Coach`].
    pub email: Email,

    /// [`Phone`] of the new [`Coach`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,

    /// Specialty the new [`Coach`] advertises.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

impl Endpoint for CreateCoach {
    type Output = Coach;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    fn path(&self) -> String {
        "coach/create_coach".into()
    }

    fn body(&self) -> Option<Value> {
        Some(encode(self))
    }
}

impl Mutation for CreateCoach {
    const INVALIDATES: &'static [Tag] = &[Tag::Coach];
}

/// `POST coach/get_all_coaches` listing [`Coach`]es page by page.
#[derive(Clone, Debug, Default)]
pub struct GetAllCoaches(pub list::Selector);

impl Endpoint for GetAllCoaches {
    type Output = list::Page;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    fn path(&self) -> String {
        "coach/get_all_coaches".into()
    }

    fn body(&self) -> Option<Value> {
        Some(encode(&self.0))
    }
}

impl Query for GetAllCoaches {
    const TAGS: &'static [Tag] = &[Tag::Coach];
}

/// Listing of [`Coach`]es.
pub mod list {
    use serde::Serialize;

    use crate::domain::{coach::Approval, AccountStatus, Coach};

    common::define_pagination!(Coach, Filter);

    /// Filter of a [`Coach`] listing.
    #[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
    pub struct Filter {
        /// [`AccountStatus`] the listed [`Coach`]es must have.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<AccountStatus>,

        /// [`Approval`] state the listed [`Coach`]es must be in.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub approval: Option<Approval>,
    }
}

/// `PUT coach/update_coach/{id}` changing the provided fields of a
/// [`Coach`].
#[derive(Clone, Debug, Serialize)]
pub struct UpdateCoach {
    /// ID of the [`Coach`] to update.
    #[serde(skip)]
    pub id: coach::Id,

    /// New [`Name`], if it changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,

    /// New [`Email`], if it changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,

    /// New [`Phone`], if it changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,

    /// New specialty, if it changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

impl Endpoint for UpdateCoach {
    type Output = Coach;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::PUT
    }

    fn path(&self) -> String {
        format!("coach/update_coach/{}", self.id)
    }

    fn body(&self) -> Option<Value> {
        Some(encode(self))
    }
}

impl Mutation for UpdateCoach {
    const INVALIDATES: &'static [Tag] = &[Tag::Coach];
}

/// `PUT coach/approve_reject_coach/{id}` deciding a [`Coach`]
/// application.
#[derive(Clone, Debug, Serialize)]
pub struct ApproveRejectCoach {
    /// ID of the [`Coach`] to decide on.
    #[serde(skip)]
    pub id: coach::Id,

    /// [`Approval`] decision.
    pub approval: Approval,
}

impl Endpoint for ApproveRejectCoach {
    type Output = Ack;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::PUT
    }

    fn path(&self) -> String {
        format!("coach/approve_reject_coach/{}", self.id)
    }

    fn body(&self) -> Option<Value> {
        Some(encode(self))
    }
}

impl Mutation for ApproveRejectCoach {
    const INVALIDATES: &'static [Tag] = &[Tag::Coach];
}

/// `PUT coach/enable_disable_coach/{id}` toggling a [`Coach`]'s
/// [`AccountStatus`].
#[derive(Clone, Debug, Serialize)]
pub struct EnableDisableCoach {
    /// ID of the [`Coach`] to toggle.
    #[serde(skip)]
    pub id: coach::Id,

    /// [`AccountStatus`] to set.
    pub status: AccountStatus,
}

impl Endpoint for EnableDisableCoach {
    type Output = Ack;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::PUT
    }

    fn path(&self) -> String {
        format!("coach/enable_disable_coach/{}", self.id)
    }

    fn body(&self) -> Option<Value> {
        Some(encode(self))
    }
}

impl Mutation for EnableDisableCoach {
    const INVALIDATES: &'static [Tag] = &[Tag::Coach];
}

/// `PUT coach/delete_coach/{id}` removing a [`Coach`].
#[derive(Clone, Debug)]
pub struct DeleteCoach {
    /// ID of the [`Coach`] to remove.
    pub id: coach::Id,
}

impl Endpoint for DeleteCoach {
    type Output = Ack;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::PUT
    }

    fn path(&self) -> String {
        format!("coach/delete_coach/{}", self.id)
    }
}

impl Mutation for DeleteCoach {
    const INVALIDATES: &'static [Tag] = &[Tag::Coach];
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::domain::coach::Approval;

    use super::{ApproveRejectCoach, Endpoint as _};

    #[test]
    fn approval_decision_serializes_in_wire_format() {
        let decision = ApproveRejectCoach {
            id: "co-3".to_owned().into(),
            approval: Approval::Approved,
        };

        assert_eq!(decision.path(), "coach/approve_reject_coach/co-3");
        assert_eq!(decision.body(), Some(json!({"approval": "APPROVED"})));
    }
}
