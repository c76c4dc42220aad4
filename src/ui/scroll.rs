use crate::core::message::Message;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::collections::VecDeque;
use unicode_width::UnicodeWidthChar;

/// Handles transcript line building and scroll arithmetic
pub struct ScrollCalculator;

impl ScrollCalculator {
    /// Build display lines for all messages, or the greeting when there are none
    pub fn build_display_lines(messages: &[Message], greeting: Option<&str>) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if messages.is_empty() {
            if let Some(text) = greeting {
                lines.push(Line::from(Span::styled(
                    text.to_string(),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            return lines;
        }

        for msg in messages {
            Self::add_message_lines(&mut lines, msg);
        }

        lines
    }

    fn add_message_lines(lines: &mut Vec<Line<'static>>, msg: &Message) {
        if msg.is_user() {
            lines.push(Line::from(vec![
                Span::styled(
                    "You: ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(msg.text.clone(), Style::default().fg(Color::Cyan)),
            ]));
        } else {
            for content_line in msg.text.lines() {
                if content_line.trim().is_empty() {
                    lines.push(Line::from(""));
                } else {
                    lines.push(Line::from(Span::styled(
                        content_line.to_string(),
                        Style::default().fg(Color::White),
                    )));
                }
            }
        }
        lines.push(Line::from("")); // Empty line for spacing
    }

    /// Calculate how many wrapped lines the given lines will take
    pub fn calculate_wrapped_line_count(lines: &[Line], terminal_width: u16) -> u16 {
        let mut total_wrapped_lines = 0u16;

        for line in lines {
            let line_text = line.to_string();

            if line_text.trim().is_empty() || terminal_width == 0 {
                total_wrapped_lines = total_wrapped_lines.saturating_add(1);
            } else {
                let wrapped_count = Self::calculate_word_wrapped_lines(&line_text, terminal_width);
                total_wrapped_lines = total_wrapped_lines.saturating_add(wrapped_count);
            }
        }

        total_wrapped_lines
    }

    /// Calculate how many rows a single line occupies under `Wrap { trim: true }`.
    ///
    /// Follows ratatui's word wrapper: a word that does not fit moves to the next
    /// row, and a word wider than the row is split across as many rows as it needs.
    fn calculate_word_wrapped_lines(text: &str, terminal_width: u16) -> u16 {
        let max_width = terminal_width as usize;
        let mut line_count = 0u16;

        let mut line_empty = true;
        let mut line_width = 0usize;
        let mut word_empty = true;
        let mut word_width = 0usize;
        let mut whitespace: VecDeque<usize> = VecDeque::new();
        let mut whitespace_width = 0usize;
        let mut non_whitespace_previous = false;

        for ch in text.chars() {
            let is_whitespace = ch == '\u{200b}' || (ch.is_whitespace() && ch != '\u{a0}');
            let symbol_width = ch.width().unwrap_or(0);
            if symbol_width > max_width {
                continue;
            }

            let word_found = non_whitespace_previous && is_whitespace;
            let word_overflow = line_empty && word_width + symbol_width > max_width;
            let whitespace_overflow = line_empty && whitespace_width + symbol_width > max_width;

            if word_found || word_overflow || whitespace_overflow {
                if !line_empty {
                    line_width += whitespace_width;
                }
                if !word_empty {
                    line_empty = false;
                }
                line_width += word_width;
                whitespace.clear();
                whitespace_width = 0;
                word_width = 0;
                word_empty = true;
            }

            let line_full = line_width >= max_width;
            let pending_word_overflow =
                symbol_width > 0 && line_width + whitespace_width + word_width >= max_width;

            if line_full || pending_word_overflow {
                let mut remaining_width = max_width.saturating_sub(line_width);
                line_count = line_count.saturating_add(1);
                line_empty = true;
                line_width = 0;

                // Whitespace that still fits on the finished row is dropped with it
                while let Some(&width) = whitespace.front() {
                    if width > remaining_width {
                        break;
                    }
                    whitespace_width -= width;
                    remaining_width -= width;
                    whitespace.pop_front();
                }

                if is_whitespace && whitespace.is_empty() {
                    continue;
                }
            }

            if is_whitespace {
                whitespace_width += symbol_width;
                whitespace.push_back(symbol_width);
            } else {
                word_width += symbol_width;
                word_empty = false;
            }
            non_whitespace_previous = !is_whitespace;
        }

        if line_empty && word_empty && !whitespace.is_empty() {
            line_count = line_count.saturating_add(1);
        }
        if !line_empty || !word_empty {
            line_count = line_count.saturating_add(1);
        }

        line_count.max(1)
    }

    /// Scroll offset that shows the bottom of the transcript
    pub fn calculate_scroll_to_bottom(
        lines: &[Line],
        terminal_width: u16,
        available_height: u16,
    ) -> u16 {
        let total_wrapped_lines = Self::calculate_wrapped_line_count(lines, terminal_width);
        total_wrapped_lines.saturating_sub(available_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_messages() -> Vec<Message> {
        vec![
            Message::user("Hello"),
            Message::bot("Hi there!"),
            Message::user("How are you?"),
            Message::bot("I'm doing well, thank you for asking!"),
        ]
    }

    #[test]
    fn test_build_display_lines_basic() {
        let messages = create_test_messages();
        let lines = ScrollCalculator::build_display_lines(&messages, None);

        // Each message gets 2 lines (content + empty spacing)
        assert_eq!(lines.len(), 8);
        assert!(lines[0].to_string().starts_with("You: "));
        assert!(lines[4].to_string().starts_with("You: "));
        assert!(!lines[2].to_string().starts_with("You: "));
    }

    #[test]
    fn empty_transcript_shows_greeting_only() {
        let lines = ScrollCalculator::build_display_lines(&[], Some("Hi!"));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].to_string(), "Hi!");

        let greeting_ignored =
            ScrollCalculator::build_display_lines(&create_test_messages(), Some("Hi!"));
        assert!(greeting_ignored.iter().all(|l| l.to_string() != "Hi!"));
    }

    #[test]
    fn test_word_wrapping() {
        let lines = vec![Line::from(
            "This is a very long line that should wrap multiple times when displayed in a narrow terminal",
        )];
        assert_eq!(ScrollCalculator::calculate_wrapped_line_count(&lines, 20), 5);
        assert_eq!(ScrollCalculator::calculate_wrapped_line_count(&lines, 200), 1);
    }

    const TOPICS_URL: &str = "https://docs.ros.org/en/humble/Tutorials/Beginner-CLI-Tools/Understanding-ROS2-Topics/Understanding-ROS2-Topics.html";

    #[test]
    fn long_word_is_split_across_rows() {
        let lines = vec![Line::from(format!("See {TOPICS_URL}"))];
        // "See" on its own row, then the URL in rows of 20 (116 = 5 * 20 + 16)
        assert_eq!(ScrollCalculator::calculate_wrapped_line_count(&lines, 20), 7);
    }

    #[test]
    fn wrapped_count_matches_rendered_paragraph() {
        use ratatui::{
            backend::TestBackend,
            widgets::{Paragraph, Wrap},
            Terminal,
        };

        let messages = vec![
            Message::user("Where are the topic tutorials?"),
            Message::bot(format!(
                "See {TOPICS_URL}\n\nTopics carry messages between ROS 2 nodes."
            )),
        ];
        let lines = ScrollCalculator::build_display_lines(&messages, None);

        let (width, height) = (20u16, 60u16);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(
                    Paragraph::new(lines.clone()).wrap(Wrap { trim: true }),
                    f.area(),
                )
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let last_row = (0..height)
            .rev()
            .find(|&y| (0..width).any(|x| buffer[(x, y)].symbol() != " "))
            .expect("paragraph rendered something");

        // The trailing spacing line renders blank below the last text row.
        let rendered_rows = last_row + 1 + 1;
        assert_eq!(
            ScrollCalculator::calculate_wrapped_line_count(&lines, width),
            rendered_rows
        );
        assert!(rendered_rows < height);
    }

    #[test]
    fn test_scroll_to_bottom() {
        let lines = ScrollCalculator::build_display_lines(&create_test_messages(), None);
        assert_eq!(ScrollCalculator::calculate_scroll_to_bottom(&lines, 80, 3), 5);
        assert_eq!(ScrollCalculator::calculate_scroll_to_bottom(&lines, 80, 100), 0);
    }
}
