//! "X - Y of Z" footer with previous/next controls.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::pagination::ListSnapshot;
use crate::tui::{styles::Theme, Frame};
use crate::utils::format::format_number;

/// Footer state extracted from a list snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationBar {
    first: usize,
    last: usize,
    estimated_count: usize,
    limit: usize,
    can_go_previous: bool,
    can_go_next: bool,
}

impl PaginationBar {
    pub fn from_snapshot<R>(snapshot: &ListSnapshot<R>) -> Self {
        let (first, last) = snapshot.display_range();
        Self {
            first,
            last,
            estimated_count: snapshot.estimated_count,
            limit: snapshot.limit,
            can_go_previous: snapshot.can_go_previous,
            can_go_next: snapshot.can_go_next,
        }
    }

    /// The footer only appears once there is something to count
    pub fn is_visible(&self) -> bool {
        self.estimated_count > 0
    }

    /// Buttons only appear when everything does not fit on one page
    pub fn shows_buttons(&self) -> bool {
        self.estimated_count > self.limit
    }

    pub fn range_label(&self) -> String {
        format!(
            "{} - {} of {}",
            format_number(self.first),
            format_number(self.last),
            format_number(self.estimated_count)
        )
    }

    pub fn line(&self, theme: &Theme) -> Option<Line<'static>> {
        if !self.is_visible() {
            return None;
        }

        let mut spans = vec![Span::styled(self.range_label(), theme.text_style())];
        if self.shows_buttons() {
            let button = |label: &'static str, enabled: bool| {
                let style = if enabled {
                    theme.enabled_style()
                } else {
                    theme.disabled_style()
                };
                Span::styled(label, style)
            };
            spans.push(Span::raw("  "));
            spans.push(button("‹ prev", self.can_go_previous));
            spans.push(Span::raw("  "));
            spans.push(button("next ›", self.can_go_next));
        }
        Some(Line::from(spans))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if let Some(line) = self.line(theme) {
            frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn snapshot(offset: usize, shown: usize, estimated: usize) -> ListSnapshot<u32> {
        ListSnapshot {
            window: (0..shown as u32).collect(),
            offset,
            limit: 10,
            cached_len: offset + shown,
            estimated_count: estimated,
            is_loading: false,
            error_offsets: BTreeSet::new(),
            can_go_next: offset + shown < estimated,
            can_go_previous: offset > 0,
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_hidden_when_empty() {
        let bar = PaginationBar::from_snapshot(&snapshot(0, 0, 0));
        assert!(!bar.is_visible());
        assert!(bar.line(&Theme::default()).is_none());
    }

    #[test]
    fn test_single_page_has_no_buttons() {
        let bar = PaginationBar::from_snapshot(&snapshot(0, 7, 7));
        let line = bar.line(&Theme::default()).unwrap();
        assert_eq!(text(&line), "1 - 7 of 7");
    }

    #[test]
    fn test_middle_page_label_and_buttons() {
        let bar = PaginationBar::from_snapshot(&snapshot(10, 10, 1250));
        assert_eq!(bar.range_label(), "11 - 20 of 1,250");

        let theme = Theme::default();
        let line = bar.line(&theme).unwrap();
        assert!(text(&line).ends_with("‹ prev  next ›"));
        assert_eq!(line.spans[2].style, theme.enabled_style());
    }

    #[test]
    fn test_first_page_disables_previous() {
        let theme = Theme::default();
        let bar = PaginationBar::from_snapshot(&snapshot(0, 10, 25));
        let line = bar.line(&theme).unwrap();
        assert_eq!(line.spans[2].style, theme.disabled_style());
        assert_eq!(line.spans[4].style, theme.enabled_style());
    }
}
