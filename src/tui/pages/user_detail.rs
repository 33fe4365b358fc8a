//! Read-only view of a single user opened from the users table

use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::{Page, PageId};
use crate::api::UserRecord;
use crate::tui::components::users_table::joined_label;
use crate::tui::{events::Event, styles::Theme, Frame};

pub const USER_DETAIL_PAGE_ID: &str = "user";

const MISSING: &str = "-";
const LABEL_WIDTH: usize = 18;

/// Label and value for every field a listed user carries
pub fn detail_fields(record: &UserRecord) -> Vec<(&'static str, String)> {
    let or_missing = |value: Option<&str>| value.unwrap_or(MISSING).to_string();
    let joined = joined_label(record);

    vec![
        ("User ID", record.id().to_string()),
        ("Name", record.display_name().unwrap_or_else(|| MISSING.to_string())),
        ("Login method", record.kind().to_string()),
        ("Email", or_missing(record.email())),
        ("Phone", or_missing(record.phone_number())),
        ("Provider", or_missing(record.third_party_id())),
        ("Provider user ID", or_missing(record.third_party_user_id())),
        (
            "Joined",
            if joined.is_empty() {
                MISSING.to_string()
            } else {
                joined
            },
        ),
    ]
}

pub struct UserDetailPage {
    id: PageId,
    user: Option<UserRecord>,
}

impl UserDetailPage {
    pub fn new() -> Self {
        Self {
            id: USER_DETAIL_PAGE_ID.to_string(),
            user: None,
        }
    }
}

impl Default for UserDetailPage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Page for UserDetailPage {
    fn id(&self) -> &PageId {
        &self.id
    }

    fn title(&self) -> &str {
        "User"
    }

    async fn handle_key_event(&mut self, _event: KeyEvent) -> Result<()> {
        Ok(())
    }

    async fn handle_app_event(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::UserSelected(record) => self.user = Some(record.as_ref().clone()),
            // Another tenant's user must not linger
            Event::TenantSelected(_) => self.user = None,
            _ => {}
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(record) = &self.user else {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No user selected",
                theme.placeholder_style(),
            )))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style())
                    .title(" User "),
            );
            frame.render_widget(empty, area);
            return;
        };

        let lines: Vec<Line> = detail_fields(record)
            .into_iter()
            .map(|(label, value)| {
                let style = if value == MISSING {
                    theme.dim_style()
                } else {
                    theme.text_style()
                };
                Line::from(vec![
                    Span::styled(
                        format!("{:<width$}", label, width = LABEL_WIDTH),
                        theme.header_style(),
                    ),
                    Span::styled(value, style),
                ])
            })
            .collect();

        let detail = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.focused_border_style())
                    .title(format!(" {} ", record.primary_label())),
            )
            .style(theme.base_style());
        frame.render_widget(detail, area);
    }

    fn help_text(&self) -> Vec<(&str, &str)> {
        vec![("Esc", "Back to users")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PasswordlessUser, ThirdPartyInfo, ThirdPartyUser};
    use ratatui::{backend::TestBackend, Terminal};

    fn grace() -> UserRecord {
        UserRecord::ThirdParty(ThirdPartyUser {
            id: "u3".to_string(),
            email: "grace@example.com".to_string(),
            third_party: ThirdPartyInfo {
                id: "github".to_string(),
                user_id: "gh-42".to_string(),
            },
            time_joined: None,
            first_name: Some("Grace".to_string()),
            last_name: Some("Hopper".to_string()),
        })
    }

    fn rendered(page: &mut UserDetailPage) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|frame| page.render(frame, frame.size(), &Theme::default()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_fields_fill_gaps_with_dash() {
        let phone_only = UserRecord::Passwordless(PasswordlessUser {
            id: "u2".to_string(),
            email: None,
            phone_number: Some("+15550100".to_string()),
            time_joined: None,
            first_name: None,
            last_name: None,
        });
        let fields = detail_fields(&phone_only);
        let value = |label: &str| {
            fields
                .iter()
                .find(|(name, _)| *name == label)
                .map(|(_, value)| value.as_str())
        };
        assert_eq!(value("User ID"), Some("u2"));
        assert_eq!(value("Login method"), Some("Passwordless"));
        assert_eq!(value("Phone"), Some("+15550100"));
        assert_eq!(value("Email"), Some("-"));
        assert_eq!(value("Provider"), Some("-"));
        assert_eq!(value("Joined"), Some("-"));
    }

    #[tokio::test]
    async fn test_renders_selected_user() {
        let mut page = UserDetailPage::new();
        assert!(rendered(&mut page).contains("No user selected"));

        page.handle_app_event(&Event::UserSelected(Box::new(grace())))
            .await
            .unwrap();
        let text = rendered(&mut page);
        assert!(text.contains("Grace Hopper"));
        assert!(text.contains("u3"));
        assert!(text.contains("Third party"));
        assert!(text.contains("grace@example.com"));
        assert!(text.contains("github"));
        assert!(text.contains("gh-42"));
    }

    #[tokio::test]
    async fn test_tenant_switch_forgets_user() {
        let mut page = UserDetailPage::new();
        page.handle_app_event(&Event::UserSelected(Box::new(grace())))
            .await
            .unwrap();
        page.handle_app_event(&Event::TenantSelected("acme".to_string()))
            .await
            .unwrap();
        assert!(rendered(&mut page).contains("No user selected"));
    }
}
