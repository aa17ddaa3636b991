//! Interactive command loop of the console.

use std::io::{self, BufRead, Write};

use client::{
    domain::{
        coach::Approval, subscription::Status as SubscriptionStatus,
        AccountStatus, Email, SecretCode,
    },
    endpoint::{
        appointment, auth, client as client_api, coach, invoice,
        subscription, subscription_history, Mutation,
    },
    session::SessionStore,
    transport::HttpTransport,
    Api, Outcome,
};
use common::pagination::Selector;
use secrecy::SecretBox;
use tracerr::Traced;

use crate::{
    error::Notification,
    route::{Route, Section},
    router::Router,
    screen,
};

/// Command summary printed by `help` and on startup.
const HELP: &str = "\
commands:
  login <email> <secret_code>   authenticate
  logout                        drop the session
  whoami                        show the authenticated user
  go <section>                  open a section of your console
  list [page] [search]          list the current section
  enable <id> | disable <id>    toggle a record of the current section
  approve <id> | reject <id>    decide a coach application
  delete <id>                   delete a record of the current section
  back                          go one screen back
  help                          show this summary
  quit                          leave";

/// Interactive console over the platform [`Api`].
#[derive(Debug)]
pub struct Console {
    /// [`Api`] facade the commands are executed on.
    api: Api<HttpTransport>,

    /// Navigation [`Router`] of this [`Console`].
    router: Router,
}

impl Console {
    /// Creates a new [`Console`] with the provided parameters.
    #[must_use]
    pub fn new(api: Api<HttpTransport>, router: Router) -> Self {
        Self { api, router }
    }

    /// Runs the command loop until `quit` or the end of `input`.
    ///
    /// # Errors
    ///
    /// Returns an error if `input` or `output` fails.
    pub async fn run(
        &mut self,
        input: impl BufRead,
        mut output: impl Write,
    ) -> io::Result<()> {
        writeln!(output, "{HELP}")?;

        for line in input.lines() {
            let line = line?;
            let mut words = line.split_whitespace();

            match words.next() {
                None => {}
                Some("quit" | "exit") => break,
                Some("help") => writeln!(output, "{HELP}")?,
                Some("login") => {
                    let email = words.next();
                    let code = words.next();
                    self.log_in(email, code, &mut output).await?;
                }
                Some("logout") => {
                    self.api.log_out();
                    self.router.reset();
                    writeln!(output, "logged out")?;
                }
                Some("whoami") => {
                    match self.api.session().snapshot() {
                        Some(s) => writeln!(
                            output,
                            "{} ({})",
                            s.login_id, s.scope,
                        )?,
                        None => writeln!(output, "not logged in")?,
                    }
                }
                Some("go") => self.go(words.next(), &mut output)?,
                Some("back") => {
                    let route = self.router.back();
                    writeln!(output, "at {route}")?;
                }
                Some("list") => {
                    let page =
                        words.next().and_then(|w| w.parse().ok()).unwrap_or(1);
                    let search = words.collect::<Vec<_>>().join(" ");
                    self.list(page, search, &mut output).await?;
                }
                Some("enable") => {
                    self.toggle(words.next(), true, &mut output).await?;
                }
                Some("disable") => {
                    self.toggle(words.next(), false, &mut output).await?;
                }
                Some("approve") => {
                    self.decide(words.next(), Approval::Approved, &mut output)
                        .await?;
                }
                Some("reject") => {
                    self.decide(words.next(), Approval::Rejected, &mut output)
                        .await?;
                }
                Some("delete") => {
                    self.delete(words.next(), &mut output).await?;
                }
                Some(other) => writeln!(
                    output,
                    "unknown command `{other}`, try `help`",
                )?,
            }
        }

        Ok(())
    }

    /// Handles the `login` command.
    async fn log_in(
        &mut self,
        email: Option<&str>,
        code: Option<&str>,
        output: &mut impl Write,
    ) -> io::Result<()> {
        let Some(email) = email.and_then(Email::new) else {
            return writeln!(
                output,
                "{}",
                Notification::validation("A valid email is required."),
            );
        };
        let Some(code) = code.and_then(SecretCode::new) else {
            return writeln!(
                output,
                "{}",
                Notification::validation("A secret code is required."),
            );
        };

        match self
            .api
            .log_in(auth::LogIn {
                email,
                secret_code: SecretBox::new(Box::new(code)),
            })
            .await
        {
            Ok(scope) => {
                let section = Section::available_to(scope)[0];
                drop(self.router.navigate(Route::Console { scope, section }));
                writeln!(output, "welcome, at {}", self.router.current())?;
                writeln!(output, "{}", screen::sidebar(scope))
            }
            Err(e) => self.notify(&e, output),
        }
    }

    /// Handles the `go` command.
    fn go(
        &mut self,
        section: Option<&str>,
        output: &mut impl Write,
    ) -> io::Result<()> {
        let Some(scope) = self.api.session().scope() else {
            return writeln!(output, "log in first");
        };
        let Some(section) = section.and_then(|s| s.parse().ok()) else {
            return writeln!(
                output,
                "{}",
                Notification::validation("Unknown section."),
            );
        };
        if !Section::available_to(scope).contains(&section) {
            return writeln!(
                output,
                "{}",
                Notification::validation(format!(
                    "`{section}` is not available to {scope}.",
                )),
            );
        }

        match self.router.navigate(Route::Console { scope, section }) {
            Outcome::Authorized => {
                writeln!(output, "at {}", self.router.current())
            }
            Outcome::Redirected => writeln!(output, "log in first"),
        }
    }

    /// Handles the `list` command for the current [`Route`].
    async fn list(
        &mut self,
        page: u32,
        search: String,
        output: &mut impl Write,
    ) -> io::Result<()> {
        let Route::Console { section, .. } = self.router.current() else {
            return writeln!(output, "log in first");
        };

        match section {
            Section::Clients => {
                let listing = client_api::GetAllClients(
                    Selector::default().to_page(page).search(search),
                );
                match self.api.query(&listing).await {
                    Ok(data) => {
                        writeln!(output, "{}", screen::clients(&data))?;
                        writeln!(
                            output,
                            "{}",
                            screen::footer(&data, &listing.0),
                        )
                    }
                    Err(e) => self.notify(&e, output),
                }
            }
            Section::Coaches => {
                let listing = coach::GetAllCoaches(
                    Selector::default().to_page(page).search(search),
                );
                match self.api.query(&listing).await {
                    Ok(data) => {
                        writeln!(output, "{}", screen::coaches(&data))?;
                        writeln!(
                            output,
                            "{}",
                            screen::footer(&data, &listing.0),
                        )
                    }
                    Err(e) => self.notify(&e, output),
                }
            }
            Section::Subscriptions => {
                let listing = subscription::GetAllSubscriptions(
                    Selector::default().to_page(page).search(search),
                );
                match self.api.query(&listing).await {
                    Ok(data) => {
                        writeln!(output, "{}", screen::subscriptions(&data))?;
                        writeln!(
                            output,
                            "{}",
                            screen::footer(&data, &listing.0),
                        )
                    }
                    Err(e) => self.notify(&e, output),
                }
            }
            Section::Appointments => {
                let listing = appointment::GetAllAppointments(
                    Selector::default().to_page(page).search(search),
                );
                match self.api.query(&listing).await {
                    Ok(data) => {
                        writeln!(output, "{}", screen::appointments(&data))?;
                        writeln!(
                            output,
                            "{}",
                            screen::footer(&data, &listing.0),
                        )
                    }
                    Err(e) => self.notify(&e, output),
                }
            }
            Section::History => {
                let listing =
                    subscription_history::GetAllSubscriptionHistories(
                        Selector::default().to_page(page).search(search),
                    );
                match self.api.query(&listing).await {
                    Ok(data) => {
                        writeln!(output, "{}", screen::history(&data))?;
                        writeln!(
                            output,
                            "{}",
                            screen::footer(&data, &listing.0),
                        )
                    }
                    Err(e) => self.notify(&e, output),
                }
            }
            Section::Invoices => {
                let listing = invoice::GetAllInvoices(
                    Selector::default().to_page(page).search(search),
                );
                match self.api.query(&listing).await {
                    Ok(data) => {
                        writeln!(output, "{}", screen::invoices(&data))?;
                        writeln!(
                            output,
                            "{}",
                            screen::footer(&data, &listing.0),
                        )
                    }
                    Err(e) => self.notify(&e, output),
                }
            }
        }
    }

    /// Handles the `enable`/`disable` commands for the current [`Route`].
    async fn toggle(
        &mut self,
        id: Option<&str>,
        enable: bool,
        output: &mut impl Write,
    ) -> io::Result<()> {
        let Route::Console { section, .. } = self.router.current() else {
            return writeln!(output, "log in first");
        };
        let Some(id) = id else {
            return writeln!(
                output,
                "{}",
                Notification::validation("A record id is required."),
            );
        };

        match section {
            Section::Clients => {
                let status = if enable {
                    AccountStatus::Enabled
                } else {
                    AccountStatus::Disabled
                };
                self.apply(
                    &client_api::EnableDisableClient {
                        id: id.to_owned().into(),
                        status,
                    },
                    output,
                )
                .await
            }
            Section::Coaches => {
                let status = if enable {
                    AccountStatus::Enabled
                } else {
                    AccountStatus::Disabled
                };
                self.apply(
                    &coach::EnableDisableCoach {
                        id: id.to_owned().into(),
                        status,
                    },
                    output,
                )
                .await
            }
            Section::Subscriptions => {
                let status = if enable {
                    SubscriptionStatus::Active
                } else {
                    SubscriptionStatus::Cancelled
                };
                self.apply(
                    &subscription::EnableDisableSubscription {
                        id: id.to_owned().into(),
                        status,
                    },
                    output,
                )
                .await
            }
            Section::Appointments | Section::History | Section::Invoices => {
                writeln!(
                    output,
                    "{}",
                    Notification::validation(format!(
                        "`{section}` records cannot be toggled.",
                    )),
                )
            }
        }
    }

    /// Handles the `approve`/`reject` commands.
    async fn decide(
        &mut self,
        id: Option<&str>,
        approval: Approval,
        output: &mut impl Write,
    ) -> io::Result<()> {
        let Route::Console { section, .. } = self.router.current() else {
            return writeln!(output, "log in first");
        };
        if section != Section::Coaches {
            return writeln!(
                output,
                "{}",
                Notification::validation(
                    "Approval decisions happen in `coaches`.",
                ),
            );
        }
        let Some(id) = id else {
            return writeln!(
                output,
                "{}",
                Notification::validation("A record id is required."),
            );
        };

        self.apply(
            &coach::ApproveRejectCoach {
                id: id.to_owned().into(),
                approval,
            },
            output,
        )
        .await
    }

    /// Handles the `delete` command for the current [`Route`].
    async fn delete(
        &mut self,
        id: Option<&str>,
        output: &mut impl Write,
    ) -> io::Result<()> {
        let Route::Console { section, .. } = self.router.current() else {
            return writeln!(output, "log in first");
        };
        let Some(id) = id else {
            return writeln!(
                output,
                "{}",
                Notification::validation("A record id is required."),
            );
        };

        match section {
            Section::Clients => {
                self.apply(
                    &client_api::DeleteClient {
                        id: id.to_owned().into(),
                    },
                    output,
                )
                .await
            }
            Section::Coaches => {
                self.apply(
                    &coach::DeleteCoach {
                        id: id.to_owned().into(),
                    },
                    output,
                )
                .await
            }
            Section::Subscriptions => {
                self.apply(
                    &subscription::DeleteSubscription {
                        id: id.to_owned().into(),
                    },
                    output,
                )
                .await
            }
            Section::Appointments => {
                self.apply(
                    &appointment::DeleteAppointment {
                        id: id.to_owned().into(),
                    },
                    output,
                )
                .await
            }
            Section::History | Section::Invoices => {
                writeln!(
                    output,
                    "{}",
                    Notification::validation(format!(
                        "`{section}` records cannot be deleted.",
                    )),
                )
            }
        }
    }

    /// Executes the provided [`Mutation`] and reports the outcome.
    async fn apply<M: Mutation>(
        &mut self,
        mutation: &M,
        output: &mut impl Write,
    ) -> io::Result<()> {
        match self.api.mutate(mutation).await {
            Ok(_) => writeln!(output, "done"),
            Err(e) => self.notify(&e, output),
        }
    }

    /// Prints the [`Notification`] of the provided API error.
    ///
    /// An expired session additionally resets the navigation to the
    /// login screen.
    fn notify(
        &mut self,
        err: &Traced<client::Error>,
        output: &mut impl Write,
    ) -> io::Result<()> {
        writeln!(output, "{}", Notification::of_api_error(err))?;
        if err.as_ref().is_session_expired() {
            self.router.reset();
            writeln!(output, "at {}", self.router.current())?;
        }
        Ok(())
    }

    /// Returns the [`SessionStore`] backing this [`Console`].
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        self.api.session()
    }
}

#[cfg(test)]
mod spec {
    use std::{io::Cursor, sync::Arc, time::Duration};

    use client::{
        cache::{self, Cache},
        session::{Session, SessionStore},
        storage::MemoryStorage,
        transport::HttpTransport,
        Api, Config,
    };
    use common::Role;

    use crate::router::Router;

    use super::Console;

    fn console(session: Arc<SessionStore>) -> Console {
        let cache = Arc::new(Cache::new(cache::Config::default()));
        let transport = HttpTransport::new(
            &Config {
                base_url: "http://127.0.0.1:9".to_owned(),
                timeout: Duration::from_secs(1),
            },
            Arc::clone(&session),
            Arc::clone(&cache),
        )
        .unwrap();
        let api = Api::new(transport, Arc::clone(&session), cache);

        Console::new(api, Router::new(session))
    }

    fn logged_in(scope: Role) -> Arc<SessionStore> {
        let store = SessionStore::new(Box::<MemoryStorage>::default());
        store.set_credentials(Session {
            user_id: "u-1".to_owned().into(),
            login_id: "user@example.com".to_owned().into(),
            access_token: "A1".to_owned().into(),
            refresh_token: "R1".to_owned().into(),
            scope,
        });
        Arc::new(store)
    }

    async fn run(console: &mut Console, script: &str) -> String {
        let mut output = Vec::new();
        console
            .run(Cursor::new(script.to_owned()), &mut output)
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn navigation_respects_role() {
        let mut console = console(logged_in(Role::Coach));

        let output = run(&mut console, "go appointments\ngo invoices\n").await;

        assert!(output.contains("at Coach/appointments"));
        assert!(output.contains("`invoices` is not available to Coach"));
    }

    #[tokio::test]
    async fn listing_requires_login() {
        let mut console = console(Arc::new(SessionStore::new(
            Box::<MemoryStorage>::default(),
        )));

        let output = run(&mut console, "go clients\nlist\nquit\n").await;

        assert!(output.contains("log in first"));
    }

    #[tokio::test]
    async fn login_validates_input_locally() {
        let mut console = console(Arc::new(SessionStore::new(
            Box::<MemoryStorage>::default(),
        )));

        let output = run(&mut console, "login not-an-email s3cret\n").await;

        assert!(output.contains("warning: A valid email is required."));
    }

    #[tokio::test]
    async fn actions_require_a_record_id() {
        let mut console = console(logged_in(Role::Admin));

        let output = run(&mut console, "go clients\nenable\ndelete\n").await;

        assert_eq!(
            output.matches("warning: A record id is required.").count(),
            2,
        );
    }

    #[tokio::test]
    async fn actions_respect_the_current_section() {
        let mut console = console(logged_in(Role::Admin));

        let output = run(
            &mut console,
            "go appointments\napprove c-1\nenable a-1\ngo history\n\
             delete h-1\n",
        )
        .await;

        assert!(output.contains("Approval decisions happen in `coaches`."));
        assert!(output.contains("`appointments` records cannot be toggled."));
        assert!(output.contains("`history` records cannot be deleted."));
    }

    #[tokio::test]
    async fn logout_resets_navigation() {
        let mut console = console(logged_in(Role::Admin));

        let output =
            run(&mut console, "go clients\nlogout\nback\nwhoami\n").await;

        assert!(output.contains("logged out"));
        assert!(output.contains("at login"));
        assert!(output.contains("not logged in"));
    }
}
