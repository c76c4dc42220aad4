use crate::book::{BookInfo, NavTree};
use crate::core::widget::ChatWidget;
use crate::ui::scroll::ScrollCalculator;
use crate::utils::logging::LoggingState;
use ratatui::text::Line;
use std::time::Instant;

/// Everything the terminal front-end draws: the book outline (the "page")
/// and the chat widget floating over it.
pub struct App {
    pub widget: ChatWidget,
    pub nav: NavTree,
    pub book: BookInfo,
    pub logging: LoggingState,
    pub status: Option<String>,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub outline_offset: u16,
    /// Transcript viewport as (height, width) from the last draw.
    pub viewport: (u16, u16),
    pub pulse_start: Instant,
    logged_messages: usize,
}

impl App {
    pub fn new(widget: ChatWidget, nav: NavTree, book: BookInfo, logging: LoggingState) -> Self {
        Self {
            widget,
            nav,
            book,
            logging,
            status: None,
            scroll_offset: 0,
            auto_scroll: true,
            outline_offset: 0,
            viewport: (0, 0),
            pulse_start: Instant::now(),
            logged_messages: 0,
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn get_logging_status(&self) -> String {
        self.logging.get_status_string()
    }

    /// Append transcript entries that have not been written to the log yet.
    pub fn flush_transcript_log(&mut self) {
        let pending = &self.widget.messages()[self.logged_messages..];
        for message in pending {
            if let Err(e) = self.logging.log_message(message) {
                self.status = Some(format!("Logging error: {e}"));
                break;
            }
        }
        self.logged_messages = self.widget.messages().len();
    }

    pub fn build_display_lines(&self) -> Vec<Line<'static>> {
        ScrollCalculator::build_display_lines(self.widget.messages(), self.widget.greeting())
    }

    pub fn update_scroll_position(&mut self, available_height: u16, terminal_width: u16) {
        self.viewport = (available_height, terminal_width);
        if self.auto_scroll {
            let lines = self.build_display_lines();
            self.scroll_offset = ScrollCalculator::calculate_scroll_to_bottom(
                &lines,
                terminal_width,
                available_height,
            );
        }
    }

    pub fn scroll_up(&mut self) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self, available_height: u16, terminal_width: u16) {
        let lines = self.build_display_lines();
        let max_offset =
            ScrollCalculator::calculate_scroll_to_bottom(&lines, terminal_width, available_height);
        self.scroll_offset = (self.scroll_offset + 1).min(max_offset);
        self.auto_scroll = self.scroll_offset >= max_offset;
    }

    pub fn outline_up(&mut self) {
        self.outline_offset = self.outline_offset.saturating_sub(1);
    }

    pub fn outline_down(&mut self) {
        let max = self.nav.render_lines().len().saturating_sub(1);
        let max = u16::try_from(max).unwrap_or(u16::MAX);
        self.outline_offset = (self.outline_offset + 1).min(max);
    }
}
