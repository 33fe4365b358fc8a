use crate::api::ApiClient;
use crate::tui::{
    events::Event,
    keys::KeyMap,
    pages::{
        tenants::TenantsPage, user_detail::UserDetailPage, users::UsersPage,
        users::USERS_PAGE_ID, PageManager,
    },
    styles::Theme,
    Frame,
};
use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Ticks a status message stays visible (250ms each)
const STATUS_TICKS: u16 = 16;

/// Main application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Current application dimensions
    pub size: Rect,

    /// Key mappings for the application
    pub key_map: KeyMap,

    /// Page manager for handling different screens
    pub page_manager: PageManager,

    /// Current theme for styling
    pub theme: Theme,

    /// Status message to display
    pub status_message: Option<String>,

    /// Show the help overlay
    pub show_help: bool,

    status_ticks: u16,
}

impl App {
    /// Create the application with the users page active
    pub async fn new(
        client: Arc<ApiClient>,
        tenant: &str,
        page_size: usize,
        event_sender: mpsc::UnboundedSender<Event>,
    ) -> Result<Self> {
        let mut page_manager = PageManager::new();
        page_manager.register_page(Box::new(UsersPage::new(
            client.clone(),
            tenant,
            page_size,
            event_sender.clone(),
        )));
        page_manager.register_page(Box::new(TenantsPage::new(client, event_sender)));
        page_manager.register_page(Box::new(UserDetailPage::new()));

        page_manager.navigate_to(USERS_PAGE_ID.to_string()).await?;

        Ok(Self {
            should_quit: false,
            size: Rect::default(),
            key_map: KeyMap::default(),
            page_manager,
            theme: Theme::default(),
            status_message: None,
            show_help: false,
            status_ticks: 0,
        })
    }

    /// Handle incoming events; returns true when the app should exit
    pub async fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => {
                if self.key_map.should_quit(&key_event) {
                    self.should_quit = true;
                    return Ok(true);
                }

                if self.key_map.should_show_help(&key_event) {
                    self.show_help = !self.show_help;
                    return Ok(false);
                }

                if self.key_map.back.matches(&key_event) {
                    if self.show_help {
                        self.show_help = false;
                    } else {
                        self.page_manager.go_back().await?;
                    }
                    return Ok(false);
                }

                // Forward key events to current page
                if let Some(current_page) = self.page_manager.current_page_mut() {
                    current_page.handle_key_event(key_event).await?;
                }
            }

            Event::Mouse(mouse_event) => {
                if let Some(current_page) = self.page_manager.current_page_mut() {
                    current_page.handle_mouse_event(mouse_event).await?;
                }
            }

            Event::Resize(width, height) => {
                self.size = Rect::new(0, 0, width, height);
                self.page_manager.resize(self.size);
            }

            Event::Tick => {
                if self.status_ticks > 0 {
                    self.status_ticks -= 1;
                    if self.status_ticks == 0 {
                        self.status_message = None;
                    }
                }
                if let Some(current_page) = self.page_manager.current_page_mut() {
                    current_page.tick().await?;
                }
            }

            Event::PageChange(page_id) => {
                self.page_manager.navigate_to(page_id).await?;
            }

            Event::StatusMessage(message) => {
                self.status_message = Some(message);
                self.status_ticks = STATUS_TICKS;
            }

            Event::ClearStatus => {
                self.status_message = None;
                self.status_ticks = 0;
            }

            event @ (Event::PageLoaded { .. }
            | Event::TenantsLoaded(_)
            | Event::TenantSelected(_)
            | Event::UserSelected(_)) => {
                self.page_manager.broadcast(&event).await?;
            }
        }

        Ok(self.should_quit)
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        self.size = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Main content
                Constraint::Length(1), // Status bar
            ])
            .split(frame.size());

        if let Some(current_page) = self.page_manager.current_page_mut() {
            current_page.render(frame, chunks[0], &self.theme);
        } else {
            let empty = Paragraph::new("No active page")
                .block(Block::default().borders(Borders::ALL).title("roster"))
                .style(self.theme.base_style());
            frame.render_widget(empty, chunks[0]);
        }

        self.render_status_bar(frame, chunks[1]);

        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    /// Render the status bar
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status_text = if let Some(ref message) = self.status_message {
            message.clone()
        } else {
            format!(
                "{} | Press Ctrl+G for help | q to quit",
                self.page_manager
                    .current_page()
                    .map_or("roster", |page| page.title())
            )
        };

        let status_paragraph = Paragraph::new(status_text).style(self.theme.status_bar_style());
        frame.render_widget(status_paragraph, area);
    }

    /// Render help overlay
    fn render_help_overlay(&self, frame: &mut Frame) {
        let help_area = centered_rect(60, 60, frame.size());

        let mut help_text = self.key_map.help_text();
        if let Some(page) = self.page_manager.current_page() {
            let page_help = page.help_text();
            if !page_help.is_empty() {
                help_text.push_str(&format!("\n\n{}\n", page.title()));
                for (key, description) in page_help {
                    help_text.push_str(&format!("{:<10} {}\n", key, description));
                }
            }
        }

        let help_block = Block::default()
            .borders(Borders::ALL)
            .title("Help")
            .border_style(self.theme.focused_border_style())
            .style(self.theme.help_style());

        let help_paragraph = Paragraph::new(help_text)
            .block(help_block)
            .style(self.theme.text_style());

        frame.render_widget(Clear, help_area);
        frame.render_widget(help_paragraph, help_area);
    }
}

/// Create a centered rectangle with given percentage of the screen
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClientOptions, EmailPasswordUser, UserRecord};
    use crate::tui::pages::{tenants::TENANTS_PAGE_ID, user_detail::USER_DETAIL_PAGE_ID};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    async fn app() -> (App, mpsc::UnboundedReceiver<Event>) {
        let client = ApiClient::new(ApiClientOptions {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        })
        .unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(Arc::new(client), "public", 10, tx).await.unwrap();
        (app, rx)
    }

    fn current_id(app: &App) -> Option<&str> {
        app.page_manager.current_page().map(|page| page.id().as_str())
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[tokio::test]
    async fn test_starts_on_users_page() {
        let (app, _rx) = app().await;
        assert_eq!(
            current_id(&app),
            Some(USERS_PAGE_ID)
        );
    }

    #[tokio::test]
    async fn test_quit_and_help_keys() {
        let (mut app, _rx) = app().await;
        assert!(!app
            .handle_event(key(KeyCode::Char('g'), KeyModifiers::CONTROL))
            .await
            .unwrap());
        assert!(app.show_help);

        assert!(!app.handle_event(key(KeyCode::Esc, KeyModifiers::NONE)).await.unwrap());
        assert!(!app.show_help);

        assert!(app
            .handle_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_tenants_page_and_back() {
        let (mut app, _rx) = app().await;
        app.handle_event(Event::PageChange(TENANTS_PAGE_ID.to_string()))
            .await
            .unwrap();
        assert_eq!(
            current_id(&app),
            Some(TENANTS_PAGE_ID)
        );

        app.handle_event(key(KeyCode::Esc, KeyModifiers::NONE))
            .await
            .unwrap();
        assert_eq!(
            current_id(&app),
            Some(USERS_PAGE_ID)
        );
    }

    #[tokio::test]
    async fn test_status_message_expires() {
        let (mut app, _rx) = app().await;
        app.handle_event(Event::StatusMessage("Saved".to_string()))
            .await
            .unwrap();
        for _ in 0..STATUS_TICKS - 1 {
            app.handle_event(Event::Tick).await.unwrap();
        }
        assert_eq!(app.status_message.as_deref(), Some("Saved"));
        app.handle_event(Event::Tick).await.unwrap();
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_renders_loading_users_page() {
        let (mut app, _rx) = app().await;
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content.iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Users · public"));
        assert!(text.contains("Ctrl+G for help"));
    }

    #[tokio::test]
    async fn test_clear_status_drops_message() {
        let (mut app, _rx) = app().await;
        app.handle_event(Event::StatusMessage("Failed to load users from 11".to_string()))
            .await
            .unwrap();
        app.handle_event(Event::ClearStatus).await.unwrap();
        assert!(app.status_message.is_none());

        // A later tick must not resurrect or underflow anything
        app.handle_event(Event::Tick).await.unwrap();
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_selected_user_opens_detail_page() {
        let (mut app, _rx) = app().await;
        let record = UserRecord::EmailPassword(EmailPasswordUser {
            id: "u7".to_string(),
            email: "ada@example.com".to_string(),
            time_joined: None,
            first_name: None,
            last_name: None,
        });
        app.handle_event(Event::UserSelected(Box::new(record)))
            .await
            .unwrap();
        app.handle_event(Event::PageChange(USER_DETAIL_PAGE_ID.to_string()))
            .await
            .unwrap();
        assert_eq!(current_id(&app), Some(USER_DETAIL_PAGE_ID));

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("u7"));

        app.handle_event(key(KeyCode::Esc, KeyModifiers::NONE))
            .await
            .unwrap();
        assert_eq!(current_id(&app), Some(USERS_PAGE_ID));
    }
}
