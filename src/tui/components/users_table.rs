//! Users table: one row per record in the visible window, with placeholder
//! rows while a page loads and error rows when one fails.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use crate::api::{RecipeKind, UserRecord};
use crate::pagination::ListSnapshot;
use crate::tui::{styles::Theme, Frame};
use crate::utils::format::format_long_date;

const PLACEHOLDER: &str = "░░░░░░░░░░░░";

/// Primary label plus whichever contact details it did not already show
fn user_lines(record: &UserRecord, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(record.primary_label(), theme.text_style()))];
    let has_name = record.display_name().is_some();
    if has_name {
        if let Some(email) = record.email() {
            lines.push(Line::from(Span::styled(email.to_string(), theme.dim_style())));
        }
    }
    if let Some(phone) = record.phone_number() {
        if has_name || record.email().is_some() {
            lines.push(Line::from(Span::styled(phone.to_string(), theme.dim_style())));
        }
    }
    lines
}

pub fn joined_label(record: &UserRecord) -> String {
    record
        .time_joined()
        .map(|joined| format_long_date(&joined.with_timezone(&Local)))
        .unwrap_or_default()
}

/// What the table body shows for a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    /// `count` placeholder rows while a fetch is in flight
    Loading { count: usize },
    /// The fetch for the visible offset failed
    Failed,
    Empty,
    Rows,
}

impl TableBody {
    pub fn for_snapshot(snapshot: &ListSnapshot<UserRecord>) -> Self {
        if snapshot.is_loading {
            TableBody::Loading {
                count: snapshot.limit,
            }
        } else if snapshot.current_page_failed() {
            TableBody::Failed
        } else if snapshot.window.is_empty() {
            TableBody::Empty
        } else {
            TableBody::Rows
        }
    }
}

/// A failed fetch for the following page leaves the window where it was
pub fn failed_next_offset(snapshot: &ListSnapshot<UserRecord>) -> Option<usize> {
    let next = snapshot.offset + snapshot.limit;
    snapshot.error_offsets.contains(&next).then_some(next)
}

pub struct UsersTable<'a> {
    snapshot: &'a ListSnapshot<UserRecord>,
    title: String,
    selected: Option<usize>,
}

impl<'a> UsersTable<'a> {
    pub fn new(snapshot: &'a ListSnapshot<UserRecord>, tenant: &str) -> Self {
        Self {
            snapshot,
            title: format!(" Users · {} ", tenant),
            selected: None,
        }
    }

    /// Highlight a row of the window; ignored unless user rows are shown
    pub fn with_selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    fn rows(&self, theme: &Theme) -> Vec<Row<'static>> {
        match TableBody::for_snapshot(self.snapshot) {
            TableBody::Loading { count } => (0..count)
                .map(|_| {
                    Row::new(vec![PLACEHOLDER; 3]).style(theme.placeholder_style())
                })
                .collect(),
            TableBody::Failed => vec![Row::new(vec![
                Cell::from("Failed to load user list. Press r to try again."),
            ])
            .style(theme.error_style())],
            TableBody::Empty => vec![Row::new(vec![Cell::from("No users found")])
                .style(theme.placeholder_style())],
            TableBody::Rows => {
                let mut rows: Vec<Row<'static>> = self
                    .snapshot
                    .window
                    .iter()
                    .map(|record| self.row(record, theme))
                    .collect();
                if let Some(failed) = failed_next_offset(self.snapshot) {
                    rows.push(
                        Row::new(vec![Cell::from(format!(
                            "Users from {} failed to load. Press → to retry.",
                            failed + 1
                        ))])
                        .style(theme.error_style()),
                    );
                }
                rows
            }
        }
    }

    fn row(&self, record: &UserRecord, theme: &Theme) -> Row<'static> {
        let user = user_lines(record, theme);
        let height = user.len() as u16;

        let pill = match record.kind() {
            RecipeKind::EmailPassword => theme.pill_style(theme.secondary),
            RecipeKind::Passwordless => theme.pill_style(theme.success),
            RecipeKind::ThirdParty => theme.pill_style(theme.accent),
        };

        Row::new(vec![
            Cell::from(user),
            Cell::from(Span::styled(record.login_method_label(), pill)),
            Cell::from(Span::styled(joined_label(record), theme.dim_style())),
        ])
        .height(height)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let widths = [
            Constraint::Percentage(45),
            Constraint::Percentage(30),
            Constraint::Percentage(25),
        ];
        let header = Row::new(vec!["USER", "LOGIN METHOD", "TIME JOINED"])
            .style(theme.header_style());

        let table = Table::new(self.rows(theme), widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style())
                    .title(self.title.clone()),
            )
            .style(theme.base_style())
            .highlight_style(theme.selection_style())
            .highlight_symbol("› ");

        let mut state = TableState::default();
        if TableBody::for_snapshot(self.snapshot) == TableBody::Rows {
            state.select(self.selected);
        }
        frame.render_stateful_widget(table, area, &mut state);
    }
}
