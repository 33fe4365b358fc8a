pub mod tenants;
pub mod user_detail;
pub mod users;

use crate::tui::{events::Event, styles::Theme, Frame};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;
use std::collections::HashMap;

pub use tenants::TenantsPage;
pub use user_detail::UserDetailPage;
pub use users::UsersPage;

/// Page identifier type
pub type PageId = String;

/// Base trait for all pages
#[async_trait]
pub trait Page: Send + Sync {
    /// Get the page ID
    fn id(&self) -> &PageId;

    /// Get the page title
    fn title(&self) -> &str;

    /// Handle keyboard input
    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()>;

    /// Handle mouse input
    async fn handle_mouse_event(&mut self, _event: MouseEvent) -> Result<()> {
        Ok(())
    }

    /// Handle events raised by background work, delivered to every page
    async fn handle_app_event(&mut self, _event: &Event) -> Result<()> {
        Ok(())
    }

    /// Handle periodic updates
    async fn tick(&mut self) -> Result<()> {
        Ok(())
    }

    /// Render the page
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Called when the page becomes active
    async fn on_enter(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called when the page becomes inactive
    async fn on_exit(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called when the page is resized
    fn on_resize(&mut self, _area: Rect) {}

    /// Get page-specific help text
    fn help_text(&self) -> Vec<(&str, &str)> {
        vec![]
    }
}

/// Page manager for handling navigation between pages
pub struct PageManager {
    /// All registered pages
    pages: HashMap<PageId, Box<dyn Page>>,

    /// Current active page
    current_page: Option<PageId>,

    /// Page history for navigation
    history: Vec<PageId>,

    /// Maximum history size
    max_history: usize,
}

impl PageManager {
    /// Create a new page manager
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            current_page: None,
            history: Vec::new(),
            max_history: 10,
        }
    }

    /// Register a page
    pub fn register_page(&mut self, page: Box<dyn Page>) {
        let id = page.id().clone();
        self.pages.insert(id, page);
    }

    /// Navigate to a page, running the exit and enter hooks
    pub async fn navigate_to(&mut self, page_id: PageId) -> Result<()> {
        if !self.pages.contains_key(&page_id) {
            return Err(anyhow::anyhow!("Page '{}' not found", page_id));
        }
        if self.current_page.as_ref() == Some(&page_id) {
            return Ok(());
        }

        if let Some(current_id) = self.current_page.clone() {
            if let Some(page) = self.pages.get_mut(&current_id) {
                page.on_exit().await?;
            }
            self.add_to_history(current_id);
        }

        self.current_page = Some(page_id.clone());
        if let Some(page) = self.pages.get_mut(&page_id) {
            page.on_enter().await?;
        }

        Ok(())
    }

    /// Return to the previously shown page, if any
    pub async fn go_back(&mut self) -> Result<bool> {
        let Some(previous) = self.history.pop() else {
            return Ok(false);
        };

        if let Some(current_id) = self.current_page.clone() {
            if let Some(page) = self.pages.get_mut(&current_id) {
                page.on_exit().await?;
            }
        }
        self.current_page = Some(previous.clone());
        if let Some(page) = self.pages.get_mut(&previous) {
            page.on_enter().await?;
        }
        Ok(true)
    }

    /// Get the current page
    pub fn current_page(&self) -> Option<&dyn Page> {
        self.current_page
            .as_ref()
            .and_then(|id| self.pages.get(id))
            .map(|p| p.as_ref())
    }

    /// Get the current page mutably
    pub fn current_page_mut(&mut self) -> Option<&mut dyn Page> {
        match self.current_page {
            Some(ref current_id) => match self.pages.get_mut(current_id) {
                Some(page) => Some(page.as_mut()),
                None => None,
            },
            None => None,
        }
    }

    /// Deliver an application event to every page
    pub async fn broadcast(&mut self, event: &Event) -> Result<()> {
        for page in self.pages.values_mut() {
            page.handle_app_event(event).await?;
        }
        Ok(())
    }

    /// Resize all pages
    pub fn resize(&mut self, area: Rect) {
        for page in self.pages.values_mut() {
            page.on_resize(area);
        }
    }

    /// Add page to history
    fn add_to_history(&mut self, page_id: PageId) {
        // Don't add duplicate consecutive entries
        if self.history.last() != Some(&page_id) {
            self.history.push(page_id);

            if self.history.len() > self.max_history {
                self.history.remove(0);
            }
        }
    }
}

impl Default for PageManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingPage {
        id: PageId,
        entered: Arc<AtomicUsize>,
        events: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Page for CountingPage {
        fn id(&self) -> &PageId {
            &self.id
        }

        fn title(&self) -> &str {
            "counting"
        }

        async fn handle_key_event(&mut self, _event: KeyEvent) -> Result<()> {
            Ok(())
        }

        async fn handle_app_event(&mut self, _event: &Event) -> Result<()> {
            self.events.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn render(&mut self, _frame: &mut Frame, _area: Rect, _theme: &Theme) {}

        async fn on_enter(&mut self) -> Result<()> {
            self.entered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn current_id(manager: &PageManager) -> Option<&str> {
        manager.current_page().map(|page| page.id().as_str())
    }

    fn page(id: &str, entered: &Arc<AtomicUsize>, events: &Arc<AtomicUsize>) -> Box<dyn Page> {
        Box::new(CountingPage {
            id: id.to_string(),
            entered: entered.clone(),
            events: events.clone(),
        })
    }

    #[tokio::test]
    async fn test_navigation_and_back() {
        let entered = Arc::new(AtomicUsize::new(0));
        let events = Arc::new(AtomicUsize::new(0));
        let mut manager = PageManager::new();
        manager.register_page(page("users", &entered, &events));
        manager.register_page(page("tenants", &entered, &events));

        manager.navigate_to("users".to_string()).await.unwrap();
        manager.navigate_to("tenants".to_string()).await.unwrap();
        assert_eq!(current_id(&manager), Some("tenants"));

        assert!(manager.go_back().await.unwrap());
        assert_eq!(current_id(&manager), Some("users"));
        assert!(!manager.go_back().await.unwrap());
        assert_eq!(entered.load(Ordering::SeqCst), 3);

        assert!(manager.navigate_to("missing".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_page() {
        let entered = Arc::new(AtomicUsize::new(0));
        let events = Arc::new(AtomicUsize::new(0));
        let mut manager = PageManager::new();
        manager.register_page(page("users", &entered, &events));
        manager.register_page(page("tenants", &entered, &events));

        manager
            .broadcast(&Event::TenantSelected("acme".to_string()))
            .await
            .unwrap();
        assert_eq!(events.load(Ordering::SeqCst), 2);
    }
}
