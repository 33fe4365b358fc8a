use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{users::USERS_PAGE_ID, Page, PageId};
use crate::api::{ApiClient, Tenant, TenantService};
use crate::tui::{events::Event, keys::KeyMap, styles::Theme, Frame};

pub const TENANTS_PAGE_ID: &str = "tenants";

#[derive(Debug, Clone, PartialEq, Eq)]
enum TenantsState {
    Idle,
    Loading,
    Loaded(Vec<Tenant>),
    Failed(String),
}

/// Tenant picker; the selection scopes the users page
pub struct TenantsPage {
    id: PageId,
    service: TenantService,
    state: TenantsState,
    list_state: ListState,
    events: mpsc::UnboundedSender<Event>,
    key_map: KeyMap,
}

impl TenantsPage {
    pub fn new(client: Arc<ApiClient>, events: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            id: TENANTS_PAGE_ID.to_string(),
            service: TenantService::new(client),
            state: TenantsState::Idle,
            list_state: ListState::default(),
            events,
            key_map: KeyMap::default(),
        }
    }

    fn fetch(&mut self) {
        self.state = TenantsState::Loading;
        let service = self.service.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = service
                .fetch_login_methods()
                .await
                .map_err(|e| e.to_string());
            if events.send(Event::TenantsLoaded(result)).is_err() {
                debug!("Event loop closed before tenants arrived");
            }
        });
    }

    fn tenants(&self) -> &[Tenant] {
        match &self.state {
            TenantsState::Loaded(tenants) => tenants,
            _ => &[],
        }
    }

    fn selected_tenant(&self) -> Option<&Tenant> {
        self.list_state
            .selected()
            .and_then(|index| self.tenants().get(index))
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.tenants().len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(len - 1)
        } else {
            current.saturating_sub(1)
        };
        self.list_state.select(Some(next));
    }
}

#[async_trait]
impl Page for TenantsPage {
    fn id(&self) -> &PageId {
        &self.id
    }

    fn title(&self) -> &str {
        "Tenants"
    }

    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        if self.key_map.down.matches(&event) {
            self.move_selection(true);
        } else if self.key_map.up.matches(&event) {
            self.move_selection(false);
        } else if self.key_map.reload.matches(&event) {
            self.fetch();
        } else if self.key_map.select.matches(&event) {
            if let Some(tenant) = self.selected_tenant() {
                let tenant_id = tenant.tenant_id.clone();
                self.events.send(Event::TenantSelected(tenant_id))?;
                self.events
                    .send(Event::PageChange(USERS_PAGE_ID.to_string()))?;
            }
        }
        Ok(())
    }

    async fn handle_app_event(&mut self, event: &Event) -> Result<()> {
        if let Event::TenantsLoaded(result) = event {
            self.state = match result {
                Ok(tenants) => {
                    self.list_state
                        .select((!tenants.is_empty()).then_some(0));
                    TenantsState::Loaded(tenants.clone())
                }
                Err(e) => {
                    warn!("Failed to load tenants: {}", e);
                    TenantsState::Failed(e.clone())
                }
            };
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.focused_border_style())
            .title(" Tenants ");

        let message = match &self.state {
            TenantsState::Idle | TenantsState::Loading => {
                Some(Span::styled("Loading tenants…", theme.placeholder_style()))
            }
            TenantsState::Failed(e) => Some(Span::styled(
                format!("Could not load tenants: {}. Press r to retry.", e),
                theme.error_style(),
            )),
            TenantsState::Loaded(tenants) if tenants.is_empty() => {
                Some(Span::styled("No tenants found", theme.placeholder_style()))
            }
            TenantsState::Loaded(_) => None,
        };
        if let Some(message) = message {
            frame.render_widget(Paragraph::new(Line::from(message)).block(block), area);
            return;
        }

        let items: Vec<ListItem> = self
            .tenants()
            .iter()
            .map(|tenant| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<24}", tenant.tenant_id), theme.text_style()),
                    Span::styled(tenant.enabled_methods().join(", "), theme.dim_style()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme.selection_style())
            .highlight_symbol("› ");
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    async fn on_enter(&mut self) -> Result<()> {
        if matches!(self.state, TenantsState::Idle | TenantsState::Failed(_)) {
            self.fetch();
        }
        Ok(())
    }

    fn help_text(&self) -> Vec<(&str, &str)> {
        vec![("↑/↓", "Move"), ("Enter", "Select tenant"), ("Esc", "Back")]
    }
}
