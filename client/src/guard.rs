//! Role-based route guarding.

use common::Role;

use crate::session::SessionStore;

/// Guard of a role-gated route.
///
/// Evaluation is synchronous and performs no I/O, so navigation never
/// waits on the network.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Guard {
    /// [`Role`] a session must hold to pass this [`Guard`].
    pub required: Role,
}

/// Outcome of a [`Guard`] evaluation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Navigation proceeds to the guarded route.
    Authorized,

    /// Navigation is redirected to the login route.
    Redirected,
}

impl Guard {
    /// Creates a new [`Guard`] requiring the provided [`Role`].
    #[must_use]
    pub const fn new(required: Role) -> Self {
        Self { required }
    }

    /// Evaluates this [`Guard`] against the provided [`SessionStore`].
    ///
    /// Passes only a session holding a non-empty access token whose scope
    /// is exactly the required [`Role`]. A broader role never implies a
    /// narrower one.
    #[must_use]
    pub fn evaluate(&self, session: &SessionStore) -> Outcome {
        session
            .snapshot()
            .filter(|s| !AsRef::<str>::as_ref(&s.access_token).is_empty())
            .filter(|s| s.scope == self.required)
            .map_or(Outcome::Redirected, |_| Outcome::Authorized)
    }
}
