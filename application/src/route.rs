//! [`Route`]s of the console.

use std::str::FromStr;

use client::Guard;
use common::Role;
use derive_more::Display;

/// Single addressable screen of the console.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Route {
    /// Login screen, the only route without a guard.
    #[display("login")]
    Login,

    /// Role-gated console screen.
    #[display("{scope}/{section}")]
    Console {
        /// [`Role`] whose console the screen belongs to.
        scope: Role,

        /// [`Section`] being shown.
        section: Section,
    },
}

impl Route {
    /// Returns the [`Guard`] of this [`Route`], if it has one.
    #[must_use]
    pub const fn guard(&self) -> Option<Guard> {
        match self {
            Self::Login => None,
            Self::Console { scope, .. } => Some(Guard::new(*scope)),
        }
    }
}

/// Section of a role-gated console screen.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Section {
    /// Client management.
    #[display("clients")]
    Clients,

    /// Coach management.
    #[display("coaches")]
    Coaches,

    /// Subscription management.
    #[display("subscriptions")]
    Subscriptions,

    /// Appointment calendar.
    #[display("appointments")]
    Appointments,

    /// Subscription lifecycle history.
    #[display("history")]
    History,

    /// Invoice overview.
    #[display("invoices")]
    Invoices,
}

impl Section {
    /// [`Section`]s available to the provided [`Role`], in sidebar order.
    #[must_use]
    pub const fn available_to(scope: Role) -> &'static [Self] {
        match scope {
            Role::Admin => &[
                Self::Clients,
                Self::Coaches,
                Self::Subscriptions,
                Self::Appointments,
                Self::History,
                Self::Invoices,
            ],
            Role::Staff => &[
                Self::Clients,
                Self::Coaches,
                Self::Subscriptions,
                Self::Appointments,
                Self::Invoices,
            ],
            Role::Coach => &[Self::Clients, Self::Appointments],
            Role::Client => {
                &[Self::Subscriptions, Self::Appointments, Self::Invoices]
            }
        }
    }
}

impl FromStr for Section {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clients" => Ok(Self::Clients),
            "coaches" => Ok(Self::Coaches),
            "subscriptions" => Ok(Self::Subscriptions),
            "appointments" => Ok(Self::Appointments),
            "history" => Ok(Self::History),
            "invoices" => Ok(Self::Invoices),
            _ => Err("unknown section"),
        }
    }
}
