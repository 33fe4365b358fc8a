//! Paginated list of the users of the selected tenant

use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::{user_detail::USER_DETAIL_PAGE_ID, Page, PageId};
use crate::api::{ApiClient, UserListService, UserRecord};
use crate::pagination::{
    Completion, ListSnapshot, Navigation, PageSource, PaginationController,
};
use crate::tui::components::{PaginationBar, UsersTable};
use crate::tui::{events::Event, keys::KeyMap, styles::Theme, Frame};

pub const USERS_PAGE_ID: &str = "users";

/// Page sizes offered by the +/- keys
pub const PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];

pub struct UsersPage {
    id: PageId,
    client: Arc<ApiClient>,
    service: Arc<UserListService>,
    controller: PaginationController<UserRecord>,
    /// Latest controller state, kept current by the subscription
    snapshot: Arc<Mutex<ListSnapshot<UserRecord>>>,
    events: mpsc::UnboundedSender<Event>,
    key_map: KeyMap,
    /// Highlighted row within the visible window
    selected: usize,
    started: bool,
}

impl UsersPage {
    pub fn new(
        client: Arc<ApiClient>,
        tenant: &str,
        page_size: usize,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let mut controller = PaginationController::new(page_size);
        let snapshot = Arc::new(Mutex::new(controller.snapshot()));

        let shared = snapshot.clone();
        controller.subscribe(move |state: &ListSnapshot<UserRecord>| {
            if let Ok(mut latest) = shared.lock() {
                *latest = state.clone();
            }
        });

        let service = Arc::new(UserListService::new(client.clone(), tenant, page_size));
        Self {
            id: USERS_PAGE_ID.to_string(),
            client,
            service,
            controller,
            snapshot,
            events,
            key_map: KeyMap::default(),
            selected: 0,
            started: false,
        }
    }

    pub fn tenant(&self) -> &str {
        self.service.tenant()
    }

    pub fn snapshot(&self) -> ListSnapshot<UserRecord> {
        match self.snapshot.lock() {
            Ok(latest) => latest.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Run the fetch a navigation asked for in the background.
    ///
    /// The result comes back as [`Event::PageLoaded`] through the event loop,
    /// which keeps every controller mutation on the UI task.
    fn dispatch(&self, navigation: Navigation) {
        match navigation {
            Navigation::Fetch(request) => {
                let service = self.service.clone();
                let events = self.events.clone();
                tokio::spawn(async move {
                    let outcome = service.fetch_page(request.cursor()).await;
                    if events.send(Event::PageLoaded { request, outcome }).is_err() {
                        debug!("Event loop closed before page arrived");
                    }
                });
            }
            Navigation::Busy => self.status("Still loading, please wait"),
            Navigation::Local | Navigation::EndOfList => {}
        }
    }

    fn status(&self, message: &str) {
        let _ = self.events.send(Event::StatusMessage(message.to_string()));
    }

    /// Disabled controls ignore their key, apart from a busy notice
    fn go_to_next(&mut self) {
        if self.controller.is_loading() {
            self.dispatch(Navigation::Busy);
        } else if self.controller.can_go_next() {
            self.selected = 0;
            let navigation = self.controller.go_to_next();
            self.dispatch(navigation);
        } else {
            debug!(offset = self.controller.offset(), "next page is disabled");
        }
    }

    fn go_to_previous(&mut self) {
        if self.controller.is_loading() {
            self.dispatch(Navigation::Busy);
        } else if self.controller.can_go_previous() {
            self.selected = 0;
            let navigation = self.controller.go_to_previous();
            self.dispatch(navigation);
        }
    }

    fn move_selection(&mut self, down: bool) {
        let rows = self.controller.visible_window().len();
        if rows == 0 {
            return;
        }
        self.selected = if down {
            (self.selected + 1).min(rows - 1)
        } else {
            self.selected.saturating_sub(1)
        };
    }

    fn selected_row(&self) -> Option<usize> {
        let rows = self.controller.visible_window().len();
        (rows > 0 && !self.controller.is_loading()).then(|| self.selected.min(rows - 1))
    }

    fn open_selected(&self) -> Result<()> {
        let Some(record) = self
            .selected_row()
            .and_then(|row| self.controller.visible_window().get(row))
        else {
            return Ok(());
        };
        debug!(user = record.id(), "Opening user details");
        self.events.send(Event::UserSelected(Box::new(record.clone())))?;
        self.events
            .send(Event::PageChange(USER_DETAIL_PAGE_ID.to_string()))?;
        Ok(())
    }

    fn reload(&mut self) {
        self.selected = 0;
        self.controller.reset();
        let navigation = self.controller.load();
        self.dispatch(navigation);
    }

    fn switch_tenant(&mut self, tenant: &str) {
        if tenant == self.service.tenant() {
            return;
        }
        info!(tenant, "Switching tenant");
        self.service = Arc::new(UserListService::new(
            self.client.clone(),
            tenant,
            self.controller.limit(),
        ));
        self.reload();
    }

    fn change_page_size(&mut self, larger: bool) {
        if self.controller.is_loading() {
            self.dispatch(Navigation::Busy);
            return;
        }

        let current = self.controller.limit();
        let size = if larger {
            PAGE_SIZES.iter().copied().find(|size| *size > current)
        } else {
            PAGE_SIZES.iter().rev().copied().find(|size| *size < current)
        };
        let Some(size) = size else {
            return;
        };

        self.service.set_batch_size(size);
        let navigation = self.controller.set_limit(size);
        self.status(&format!("Showing {} users per page", size));
        self.dispatch(navigation);
    }
}

#[async_trait]
impl Page for UsersPage {
    fn id(&self) -> &PageId {
        &self.id
    }

    fn title(&self) -> &str {
        "Users"
    }

    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        if self.key_map.next_page.matches(&event) {
            self.go_to_next();
        } else if self.key_map.previous_page.matches(&event) {
            self.go_to_previous();
        } else if self.key_map.down.matches(&event) {
            self.move_selection(true);
        } else if self.key_map.up.matches(&event) {
            self.move_selection(false);
        } else if self.key_map.select.matches(&event) {
            self.open_selected()?;
        } else if self.key_map.larger_pages.matches(&event) {
            self.change_page_size(true);
        } else if self.key_map.smaller_pages.matches(&event) {
            self.change_page_size(false);
        } else if self.key_map.reload.matches(&event) {
            self.reload();
        } else if self.key_map.tenants.matches(&event) {
            self.events
                .send(Event::PageChange(super::tenants::TENANTS_PAGE_ID.to_string()))?;
        }
        Ok(())
    }

    async fn handle_app_event(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::PageLoaded { request, outcome } => {
                let retried = self.controller.error_offsets().contains(&request.offset());
                match self.controller.complete(request.clone(), outcome.clone()) {
                    Completion::Failed { offset } => {
                        self.status(&format!("Failed to load users from {}", offset + 1));
                    }
                    Completion::Applied { .. } if retried => {
                        let _ = self.events.send(Event::ClearStatus);
                    }
                    _ => {}
                }
            }
            Event::TenantSelected(tenant) => self.switch_tenant(tenant),
            _ => {}
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let snapshot = self.snapshot();
        UsersTable::new(&snapshot, self.tenant())
            .with_selected(self.selected_row())
            .render(frame, chunks[0], theme);
        PaginationBar::from_snapshot(&snapshot).render(frame, chunks[1], theme);
    }

    async fn on_enter(&mut self) -> Result<()> {
        if !self.started {
            self.started = true;
            let navigation = self.controller.load();
            self.dispatch(navigation);
        }
        Ok(())
    }

    fn help_text(&self) -> Vec<(&str, &str)> {
        vec![
            ("←/→", "Previous / next page"),
            ("↑/↓", "Select user"),
            ("Enter", "User details"),
            ("+/-", "Page size"),
            ("r", "Reload"),
            ("t", "Tenants"),
        ]
    }
}
