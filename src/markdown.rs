//! Markdown to ratatui rendering
//!
//! Model replies use headings, lists, emphasis and block quotes heavily; those
//! are styled. Anything else is flattened to text so nothing is dropped.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Render markdown content to ratatui Lines.
pub fn render_markdown(content: &str, base_style: Style) -> Vec<Line<'static>> {
    let renderer = MarkdownRenderer::new(base_style);
    renderer.render(content)
}

struct MarkdownRenderer {
    base_style: Style,
    lines: Vec<Line<'static>>,
    current_spans: Vec<Span<'static>>,

    // Counters rather than flags so nested emphasis unwinds correctly
    bold_count: usize,
    italic_count: usize,
    strike_count: usize,
    heading: Option<HeadingLevel>,

    in_code_block: bool,
    quote_depth: usize,
    list_stack: Vec<Option<u64>>,
    link_dest: Option<String>,
}

impl MarkdownRenderer {
    fn new(base_style: Style) -> Self {
        Self {
            base_style,
            lines: Vec::new(),
            current_spans: Vec::new(),
            bold_count: 0,
            italic_count: 0,
            strike_count: 0,
            heading: None,
            in_code_block: false,
            quote_depth: 0,
            list_stack: Vec::new(),
            link_dest: None,
        }
    }

    fn render(mut self, content: &str) -> Vec<Line<'static>> {
        let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
        for event in Parser::new_ext(content, options) {
            self.handle_event(event);
        }
        self.flush_line();

        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.handle_text(&text),
            Event::Code(code) => {
                let style = self.base_style.fg(Color::LightMagenta);
                self.push_span(Span::styled(code.to_string(), style));
            }
            Event::SoftBreak => self.push_span(Span::styled(" ", self.base_style)),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(24),
                    self.base_style.fg(Color::DarkGray),
                )));
                self.blank_line();
            }
            Event::TaskListMarker(done) => {
                self.push_span(Span::styled(if done { "[x] " } else { "[ ] " }, self.base_style));
            }
            // LLM replies occasionally include HTML-looking tags; keep them visible
            Event::Html(html) | Event::InlineHtml(html) => self.handle_text(&html),
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_line();
                self.heading = Some(level);
            }
            Tag::Strong => self.bold_count += 1,
            Tag::Emphasis => self.italic_count += 1,
            Tag::Strikethrough => self.strike_count += 1,
            Tag::BlockQuote { .. } => {
                self.flush_line();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(_) => {
                self.flush_line();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                self.flush_line();
                self.list_stack.push(start);
            }
            Tag::Item => {
                self.flush_line();
                let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                let marker = match self.list_stack.last_mut() {
                    Some(Some(idx)) => {
                        let m = format!("{}{}. ", indent, idx);
                        *idx += 1;
                        m
                    }
                    _ => format!("{}• ", indent),
                };
                self.push_span(Span::styled(marker, self.base_style.fg(Color::Cyan)));
            }
            Tag::Link { dest_url, .. } => {
                self.link_dest = Some(dest_url.to_string());
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.flush_line();
                self.heading = None;
                self.blank_line();
            }
            TagEnd::Strong => self.bold_count = self.bold_count.saturating_sub(1),
            TagEnd::Emphasis => self.italic_count = self.italic_count.saturating_sub(1),
            TagEnd::Strikethrough => self.strike_count = self.strike_count.saturating_sub(1),
            TagEnd::Paragraph => {
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::BlockQuote { .. } => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.blank_line();
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Item => self.flush_line(),
            TagEnd::Link => {
                if let Some(dest) = self.link_dest.take() {
                    self.push_span(Span::styled(
                        format!(" ({})", dest),
                        self.base_style.fg(Color::DarkGray),
                    ));
                }
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        if self.in_code_block {
            let style = self.base_style.fg(Color::LightMagenta);
            for line in text.lines() {
                self.push_span(Span::styled(format!("  {}", line), style));
                self.flush_line();
            }
            return;
        }
        let style = self.current_style();
        self.push_span(Span::styled(text.to_string(), style));
    }

    fn current_style(&self) -> Style {
        let mut style = self.base_style;
        if let Some(level) = self.heading {
            style = style.add_modifier(Modifier::BOLD);
            style = match level {
                HeadingLevel::H1 | HeadingLevel::H2 => style.fg(Color::Cyan),
                _ => style.fg(Color::LightBlue),
            };
        }
        if self.bold_count > 0 {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic_count > 0 {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.strike_count > 0 {
            style = style.add_modifier(Modifier::CROSSED_OUT);
        }
        if self.link_dest.is_some() {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }

    fn push_span(&mut self, span: Span<'static>) {
        if self.current_spans.is_empty() && self.quote_depth > 0 {
            self.current_spans.push(Span::styled(
                "│ ".repeat(self.quote_depth),
                self.base_style.fg(Color::Blue),
            ));
        }
        self.current_spans.push(span);
    }

    fn flush_line(&mut self) {
        if !self.current_spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current_spans)));
        }
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|l| !l.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_heading_is_bold_and_followed_by_blank() {
        let lines = render_markdown("### Legal Fact Sorting\nThe deposit was kept.", Style::default());
        assert_eq!(plain(&lines), vec!["Legal Fact Sorting", "", "The deposit was kept."]);
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_lists_get_markers() {
        let bullets = render_markdown("- lease\n- receipts", Style::default());
        assert_eq!(plain(&bullets), vec!["• lease", "• receipts"]);
        let numbered = render_markdown("1. first\n2. second", Style::default());
        assert_eq!(plain(&numbered), vec!["1. first", "2. second"]);
    }

    #[test]
    fn test_bold_nests_inside_text() {
        let lines = render_markdown("Keep **all receipts** now", Style::default());
        assert_eq!(lines.len(), 1);
        let bold = &lines[0].spans[1];
        assert_eq!(bold.content, "all receipts");
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
        assert!(!lines[0].spans[2].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_blockquote_prefix() {
        let lines = render_markdown("> [Note: applicable law varies by jurisdiction]", Style::default());
        assert_eq!(plain(&lines), vec!["│ [Note: applicable law varies by jurisdiction]"]);
    }

    #[test]
    fn test_link_shows_destination() {
        let lines = render_markdown("[Civil Code](https://law.moj.gov.tw)", Style::default());
        assert_eq!(plain(&lines), vec!["Civil Code (https://law.moj.gov.tw)"]);
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        assert!(render_markdown("", Style::default()).is_empty());
    }
}
