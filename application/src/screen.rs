//! Text rendering of console screens.

use client::endpoint::{
    appointment, client as client_api, coach, invoice, subscription,
    subscription_history,
};
use common::{pagination::Selector, Role};
use itertools::Itertools as _;

use crate::route::Section;

/// Renders the sidebar of the provided [`Role`]'s console.
#[must_use]
pub fn sidebar(scope: Role) -> String {
    let sections = Section::available_to(scope)
        .iter()
        .map(|s| format!("  {s}"))
        .join("\n");
    format!("[{scope}]\n{sections}")
}

/// Renders a listing footer in the `page X of Y (N total)` form.
#[must_use]
pub fn footer<I, F>(
    page: &common::pagination::Page<I>,
    selector: &Selector<F>,
) -> String {
    format!(
        "page {} of {} ({} total)",
        selector.page,
        page.total_pages(selector),
        page.total_count,
    )
}

/// Renders a [`Client`](client::domain::Client) listing.
#[must_use]
pub fn clients(page: &client_api::list::Page) -> String {
    table(
        ["ID", "NAME", "EMAIL", "PHONE", "STATUS", "CREATED"],
        page.items
            .iter()
            .map(|c| {
                [
                    c.id.to_string(),
                    c.name.to_string(),
                    c.email.to_string(),
                    c.phone.as_ref().map_or_else(String::new, |p| {
                        p.to_string()
                    }),
                    c.status.to_string(),
                    c.created_at.to_rfc3339(),
                ]
            })
            .collect(),
    )
}

/// Renders a [`Coach`](client::domain::Coach) listing.
#[must_use]
pub fn coaches(page: &coach::list::Page) -> String {
    table(
        ["ID", "NAME", "EMAIL", "SPECIALTY", "APPROVAL", "STATUS"],
        page.items
            .iter()
            .map(|c| {
                [
                    c.id.to_string(),
                    c.name.to_string(),
                    c.email.to_string(),
                    c.specialty.clone().unwrap_or_default(),
                    c.approval.to_string(),
                    c.status.to_string(),
                ]
            })
            .collect(),
    )
}

/// Renders a [`Subscription`](client::domain::Subscription) listing.
#[must_use]
pub fn subscriptions(page: &subscription::list::Page) -> String {
    table(
        ["ID", "CLIENT", "PLAN", "PRICE", "STATUS", "STARTED"],
        page.items
            .iter()
            .map(|s| {
                [
                    s.id.to_string(),
                    s.client_id.to_string(),
                    s.plan.to_string(),
                    s.price.to_string(),
                    s.status.to_string(),
                    s.started_at.to_rfc3339(),
                ]
            })
            .collect(),
    )
}

/// Renders an [`Appointment`](client::domain::Appointment) listing.
#[must_use]
pub fn appointments(page: &appointment::list::Page) -> String {
    table(
        ["ID", "CLIENT", "COACH", "SCHEDULED", "MINUTES", "STATUS"],
        page.items
            .iter()
            .map(|a| {
                [
                    a.id.to_string(),
                    a.client_id.to_string(),
                    a.coach_id.to_string(),
                    a.scheduled_at.to_rfc3339(),
                    a.duration_minutes.to_string(),
                    a.status.to_string(),
                ]
            })
            .collect(),
    )
}

/// Renders a [`HistoryRecord`](client::domain::HistoryRecord) listing.
#[must_use]
pub fn history(page: &subscription_history::list::Page) -> String {
    table(
        ["ID", "SUBSCRIPTION", "EVENT", "OCCURRED"],
        page.items
            .iter()
            .map(|r| {
                [
                    r.id.to_string(),
                    r.subscription_id.to_string(),
                    r.event.to_string(),
                    r.occurred_at.to_rfc3339(),
                ]
            })
            .collect(),
    )
}

/// Renders an [`Invoice`](client::domain::Invoice) listing.
#[must_use]
pub fn invoices(page: &invoice::list::Page) -> String {
    table(
        ["ID", "NUMBER", "CLIENT", "AMOUNT", "STATUS", "ISSUED"],
        page.items
            .iter()
            .map(|i| {
                [
                    i.id.to_string(),
                    i.number.to_string(),
                    i.client_id.to_string(),
                    i.amount.to_string(),
                    i.status.to_string(),
                    i.issued_at.to_rfc3339(),
                ]
            })
            .collect(),
    )
}

/// Renders a column-aligned text table.
fn table<const N: usize>(header: [&str; N], rows: Vec<[String; N]>) -> String {
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let render = |cells: [&str; N]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:width$}"))
            .join("  ")
            .trim_end()
            .to_owned()
    };

    let mut lines = vec![render(header)];
    lines.extend(
        rows.iter()
            .map(|row| render(row.each_ref().map(String::as_str))),
    );
    lines.join("\n")
}

#[cfg(test)]
mod spec {
    use common::Role;
    use serde_json::json;

    use super::{clients, footer, sidebar};

    #[test]
    fn sidebar_follows_role() {
        let rendered = sidebar(Role::Coach);

        assert!(rendered.contains("clients"));
        assert!(rendered.contains("appointments"));
        assert!(!rendered.contains("invoices"));
    }

    #[test]
    fn client_listing_renders_aligned_columns() {
        let page: client::endpoint::client::list::Page =
            serde_json::from_value(json!({
                "items": [{
                    "id": "c-1",
                    "name": "Jane Doe",
                    "email": "jane@example.com",
                    "status": "ENABLED",
                    "created_at": "2024-05-17T10:30:00Z",
                }],
                "totalCount": 1,
            }))
            .unwrap();

        let rendered = clients(&page);

        assert!(rendered.starts_with("ID"));
        assert!(rendered.contains("jane@example.com"));
        assert!(rendered.contains("ENABLED"));
    }

    #[test]
    fn footer_spells_out_pagination() {
        let page = common::pagination::Page::<u32> {
            items: vec![1, 2, 3],
            total_count: 25,
        };
        let selector =
            common::pagination::Selector::<()>::default().to_page(2);

        assert_eq!(footer(&page, &selector), "page 2 of 3 (25 total)");
    }
}
