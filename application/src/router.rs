//! Navigation [`Router`] of the console.

use std::sync::Arc;

use client::{session::SessionStore, Outcome};

use crate::route::Route;

/// Navigation state of the console.
///
/// Every navigation, including going back, re-evaluates the guard of the
/// destination [`Route`]. A denied navigation replaces the current
/// history entry with the login screen instead of pushing a new one, so
/// the back button can never resurface a guarded screen.
#[derive(Debug)]
pub struct Router {
    /// [`SessionStore`] the guards are evaluated against.
    session: Arc<SessionStore>,

    /// Navigation history, the last entry being the current [`Route`].
    ///
    /// Invariant: never empty.
    history: Vec<Route>,
}

impl Router {
    /// Creates a new [`Router`] positioned at the login screen.
    #[must_use]
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            history: vec![Route::Login],
        }
    }

    /// Returns the current [`Route`].
    ///
    /// # Panics
    ///
    /// Never panics: the history is never empty.
    #[must_use]
    pub fn current(&self) -> Route {
        *self.history.last().expect("non-empty history")
    }

    /// Navigates to the provided [`Route`].
    ///
    /// Returns [`Outcome::Redirected`] (and shows the login screen) when
    /// the [`Route`]'s guard denies the navigation.
    pub fn navigate(&mut self, route: Route) -> Outcome {
        match self.check(route) {
            Outcome::Authorized => {
                if self.current() != route {
                    self.history.push(route);
                }
                Outcome::Authorized
            }
            Outcome::Redirected => {
                self.redirect();
                Outcome::Redirected
            }
        }
    }

    /// Navigates one step back in the history.
    ///
    /// The [`Route`] being returned to is re-guarded, so backing into a
    /// screen the session no longer passes lands on the login screen.
    pub fn back(&mut self) -> Route {
        if self.history.len() > 1 {
            drop(self.history.pop());
        }

        let destination = self.current();
        if self.check(destination) == Outcome::Redirected {
            self.redirect();
        }
        self.current()
    }

    /// Resets the history to the login screen.
    ///
    /// Used on logout.
    pub fn reset(&mut self) {
        self.history.clear();
        self.history.push(Route::Login);
    }

    /// Evaluates the guard of the provided [`Route`].
    fn check(&self, route: Route) -> Outcome {
        route
            .guard()
            .map_or(Outcome::Authorized, |g| g.evaluate(&self.session))
    }

    /// Replaces the current history entry with the login screen.
    ///
    /// Deliberately not a push: the denied [`Route`] must not linger in
    /// the history behind the login screen.
    fn redirect(&mut self) {
        drop(self.history.pop());
        self.history.push(Route::Login);
    }
}
