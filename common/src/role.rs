//! [`Role`] definitions.

use serde::{Deserialize, Serialize};

/// Role ("scope") of an authenticated console user.
///
/// The platform issues the role as an exact, case-sensitive string, so the
/// closed enumeration below is the only place where those strings exist.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Role {
    /// Full administrative access.
    Admin,

    /// Back-office staff access.
    Staff,

    /// Coach access.
    Coach,

    /// Client (end customer) access.
    Client,
}

impl Role {
    /// All [`Role`]s the platform knows about.
    pub const ALL: [Self; 4] =
        [Self::Admin, Self::Staff, Self::Coach, Self::Client];
}
