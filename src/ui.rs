use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, DraftFocus, InputMode, Popup, Scroll};
use crate::i18n::{Feature, Language, Strings};
use crate::input::TextInput;
use crate::markdown::render_markdown;
use crate::prompt::DocumentType;
use crate::state::{Mode, Role, Source};

const ACCENT: Color = Color::Cyan;
const WARM: Color = Color::Yellow;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(2),
    ])
    .areas(area);

    app.body_area = Some(body_area);

    render_header(app, frame, header_area);

    match app.mode {
        Mode::Home => render_home(app, frame, body_area),
        Mode::Chat => render_chat(app, frame, body_area),
        Mode::Draft => render_draft(app, frame, body_area),
        Mode::Analyze => render_analyze(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);

    match app.popup {
        Some(Popup::Language) => render_language_picker(app, frame, area),
        Some(Popup::ApiKey) => render_api_key_input(app, frame, area),
        Some(Popup::Mission) => render_mission(app, frame, area),
        None => {}
    }
}

fn mode_label(strings: &Strings, mode: Mode) -> &'static str {
    match mode {
        Mode::Home => strings.nav.home,
        Mode::Chat => strings.nav.chat,
        Mode::Draft => strings.nav.draft,
        Mode::Analyze => strings.nav.analyze,
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let strings = app.strings();

    let mut spans = vec![
        Span::styled(format!(" ⚖ {} ", strings.name), Style::default().fg(ACCENT).bold()),
        Span::raw(" "),
    ];

    for (idx, mode) in Mode::all().into_iter().enumerate() {
        let style = if mode == app.mode {
            Style::default().bg(ACCENT).fg(Color::Black).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} {} ", idx + 1, mode_label(strings, mode)), style));
        spans.push(Span::raw(" "));
    }

    let left = Line::from(spans);

    let key_hint = match app.key_source() {
        Some(_) => Span::styled(format!("{} ", app.model), Style::default().fg(Color::DarkGray)),
        None => Span::styled(format!("{} ", strings.keys.api_key_missing), Style::default().fg(Color::Red).bold()),
    };
    let right = Line::from(vec![
        key_hint,
        Span::styled(format!("{} ", app.language), Style::default().fg(WARM)),
        Span::styled(format!("[{}] ", strings.nav.contact), Style::default().fg(Color::DarkGray)),
    ]);

    let right_width = right.width() as u16;
    let [left_area, right_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(right_width.min(area.width)),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(left), left_area);
    frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), right_area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let strings = app.strings();
    let keys = &strings.keys;

    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => keys.normal,
        InputMode::Editing => keys.editing,
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().fg(Color::White);

    let pairs: Vec<(&str, &str)> = match (app.mode, app.input_mode) {
        (Mode::Home, _) => vec![
            ("←/→", keys.select),
            ("Enter", keys.open),
            ("m", strings.learn_more),
            ("L", keys.language),
            ("q", keys.quit),
        ],
        (Mode::Chat, InputMode::Normal) => vec![
            ("i", keys.type_text),
            ("j/k", keys.scroll),
            ("Tab", keys.next),
            ("L", keys.language),
            ("q", keys.quit),
        ],
        (Mode::Chat, InputMode::Editing) => vec![("Enter", keys.send), ("Esc", keys.stop_typing)],
        (Mode::Draft, InputMode::Normal) => vec![
            ("t/T", strings.draft.doc_type),
            ("i", keys.details),
            ("s", keys.draft),
            ("y", strings.draft.copy),
            ("Tab", keys.focus),
            ("q", keys.quit),
        ],
        (Mode::Analyze, InputMode::Normal) => vec![
            ("i", keys.paste),
            ("s", keys.analyze),
            ("j/k", keys.scroll),
            ("Tab", keys.next),
            ("q", keys.quit),
        ],
        (_, InputMode::Editing) => vec![
            ("Ctrl+S", keys.submit),
            ("Enter", keys.newline),
            ("Esc", keys.stop_typing),
        ],
    };

    let mut hints = vec![Span::styled(format!(" {} ", mode_text), mode_style), Span::raw(" ")];
    for (key, label) in pairs {
        hints.push(Span::styled(format!(" {} ", key), key_style));
        hints.push(Span::styled(format!(" {} ", label), label_style));
    }

    let [hint_area, note_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    frame.render_widget(Paragraph::new(Line::from(hints)), hint_area);
    frame.render_widget(
        Paragraph::new(format!(" {}  ·  {}", strings.footer.desc, strings.footer.disclaimer))
            .style(Style::default().fg(Color::DarkGray)),
        note_area,
    );
}

// Home

fn render_home(app: &App, frame: &mut Frame, area: Rect) {
    let strings = app.strings();

    let [hero_area, cards_area] =
        Layout::vertical([Constraint::Length(9), Constraint::Min(0)]).areas(area);

    let hero = Text::from(vec![
        Line::default(),
        Line::from(Span::styled(strings.subtitle, Style::default().fg(Color::DarkGray))),
        Line::from(vec![
            Span::styled(strings.hero_title, Style::default().bold()),
            Span::raw(" "),
            Span::styled(strings.hero_title_highlight, Style::default().fg(WARM).bold()),
        ]),
        Line::default(),
        Line::from(Span::styled(strings.hero_desc, Style::default().fg(Color::Gray))),
        Line::default(),
        Line::from(vec![
            Span::styled(
                format!(" {} (c) ", strings.start_chat),
                Style::default().bg(ACCENT).fg(Color::Black).bold(),
            ),
            Span::raw("   "),
            Span::styled(format!(" {} (m) ", strings.learn_more), Style::default().fg(ACCENT)),
        ]),
    ]);

    frame.render_widget(
        Paragraph::new(hero)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        hero_area.inner(Margin { vertical: 0, horizontal: 2 }),
    );

    let cards = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(cards_area.inner(Margin { vertical: 0, horizontal: 1 }));

    let features = [&strings.features.chat, &strings.features.draft, &strings.features.analyze];
    let icons = ["💬", "📝", "🛡"];
    for (idx, (feature, icon)) in features.iter().zip(icons).enumerate() {
        render_feature_card(frame, cards[idx], feature, icon, idx == app.home_selection);
    }
}

fn render_feature_card(frame: &mut Frame, area: Rect, feature: &Feature, icon: &str, selected: bool) {
    let border_color = if selected { ACCENT } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} {} ", icon, feature.title));

    let action_style = if selected {
        Style::default().fg(ACCENT).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let body = Text::from(vec![
        Line::from(feature.desc),
        Line::default(),
        Line::from(Span::styled(format!("{} →", feature.action), action_style)),
    ]);

    frame.render_widget(Paragraph::new(body).block(block).wrap(Wrap { trim: true }), area);
}

// Chat

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let strings = app.strings();
    let editing = app.input_mode == InputMode::Editing;

    let input_height = (app.chat.input.value().lines().count().max(1) as u16 + 2).min(6);
    let [history_area, input_area, note_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(input_height),
        Constraint::Length(1),
    ])
    .areas(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing { Color::DarkGray } else { ACCENT }))
        .title(format!(" {} ", strings.chat.title))
        .title_bottom(Line::from(format!(" {} ", strings.chat.subtitle)).fg(Color::DarkGray));

    let mut lines: Vec<Line<'static>> = Vec::new();
    for msg in &app.chat.messages {
        match msg.role {
            Role::User => {
                lines.push(Line::from(Span::styled(
                    format!("{}:", strings.chat.you),
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                )));
                for line in msg.text.lines() {
                    lines.push(Line::from(line.to_string()));
                }
            }
            Role::Model => {
                lines.push(Line::from(Span::styled(
                    format!("{}:", strings.name),
                    Style::default().fg(WARM).add_modifier(Modifier::BOLD),
                )));
                lines.extend(render_markdown(&msg.text, Style::default()));
                push_sources(&mut lines, &msg.sources, strings.chat.source, strings.chat.source_placeholder);
            }
        }
        lines.push(Line::default());
    }

    if app.chat.is_loading() {
        lines.push(Line::from(Span::styled(
            format!("{}:", strings.name),
            Style::default().fg(WARM).add_modifier(Modifier::BOLD),
        )));
        lines.push(loading_line(strings.chat.loading, app.animation_frame));
    }

    render_scrolled(frame, history_area, block, lines, &mut app.chat.scroll);

    render_input(
        frame,
        input_area,
        &app.chat.input,
        strings.chat.placeholder,
        " > ",
        editing,
    );

    frame.render_widget(
        Paragraph::new(format!(" {}", strings.chat.disclaimer)).style(Style::default().fg(Color::DarkGray)),
        note_area,
    );
}

fn push_sources(lines: &mut Vec<Line<'static>>, sources: &[Source], heading: &str, placeholder: &str) {
    if sources.is_empty() {
        return;
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("{}:", heading),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )));
    for (idx, source) in sources.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!(" [{}] ", idx + 1), Style::default().fg(Color::Green)),
            Span::raw(source.display_title(placeholder).to_string()),
        ]));
        lines.push(Line::from(Span::styled(
            format!("     {}", source.uri),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        )));
    }
}

/// Animated ellipsis: cycles through ".", "..", "..."
fn loading_line(label: &str, frame: u8) -> Line<'static> {
    let dots = ".".repeat(frame as usize + 1);
    Line::from(Span::styled(
        format!("{}{}", label.trim_end_matches(['.', '…']), dots),
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    ))
}

// Draft

fn render_draft(app: &mut App, frame: &mut Frame, area: Rect) {
    let strings = app.strings();
    let editing = app.input_mode == InputMode::Editing;
    let focus = app.draft.focus;

    let [form_area, preview_area] = Layout::horizontal([
        Constraint::Percentage(40),
        Constraint::Percentage(60),
    ])
    .areas(area);

    let [type_area, details_area, button_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(form_area);

    // Document type selector
    let type_block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(focus == DraftFocus::DocType))
        .title(format!(" {} ", strings.draft.title));
    let position = DocumentType::all()
        .iter()
        .position(|t| *t == app.draft.doc_type)
        .unwrap_or(0);
    let selector = Line::from(vec![
        Span::styled(format!("{}: ", strings.draft.doc_type), Style::default().fg(Color::Gray)),
        Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.draft.doc_type.label(strings), Style::default().fg(WARM).bold()),
        Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("  {}/{}", position + 1, DocumentType::all().len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(selector).block(type_block), type_area);

    // Details
    let details_title = format!(" {} ", strings.draft.details);
    render_input_block(
        frame,
        details_area,
        &app.draft.details,
        strings.draft.details_placeholder,
        &details_title,
        editing,
        focus == DraftFocus::Details,
    );

    // Start button
    let button = if app.draft.is_loading() {
        loading_line(strings.chat.loading, app.animation_frame)
    } else {
        let style = if app.draft.details.is_blank() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().bg(ACCENT).fg(Color::Black).bold()
        };
        Line::from(Span::styled(format!(" {} (s / Ctrl+S) ", strings.draft.start_btn), style))
    };
    frame.render_widget(Paragraph::new(button).alignment(Alignment::Center), button_area);

    // Preview
    let copy_label = if app.draft.is_copied() {
        Span::styled(format!(" ✓ {} ", strings.draft.copy_success), Style::default().fg(Color::Green).bold())
    } else {
        Span::styled(format!(" {} (y) ", strings.draft.copy), Style::default().fg(Color::DarkGray))
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(focus == DraftFocus::Preview))
        .title(format!(" {} ", strings.draft.preview));
    if !app.draft.result.is_empty() {
        block = block.title(Line::from(copy_label).right_aligned());
    }

    let lines: Vec<Line<'static>> = if app.draft.is_loading() {
        vec![loading_line(strings.chat.loading, app.animation_frame)]
    } else if app.draft.result.is_empty() {
        vec![Line::from(Span::styled(
            strings.draft.empty.to_string(),
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        let mut lines = render_markdown(&app.draft.result, Style::default());
        push_sources(&mut lines, &app.draft.sources, strings.draft.legal_basis, strings.chat.source_placeholder);
        lines
    };

    render_scrolled(frame, preview_area, block, lines, &mut app.draft.scroll);
}

fn focus_style(focused: bool) -> Style {
    Style::default().fg(if focused { ACCENT } else { Color::DarkGray })
}

// Analyze

fn render_analyze(app: &mut App, frame: &mut Frame, area: Rect) {
    let strings = app.strings();
    let editing = app.input_mode == InputMode::Editing;

    let [input_area, button_area, report_area, note_area] = Layout::vertical([
        Constraint::Percentage(35),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let title = format!(" {} ", strings.analyze.title);
    render_input_block(
        frame,
        input_area,
        &app.analyze.content,
        strings.analyze.placeholder,
        &title,
        editing,
        editing,
    );

    let button = if app.analyze.is_loading() {
        loading_line(strings.chat.loading, app.animation_frame)
    } else {
        let style = if app.analyze.content.is_blank() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().bg(ACCENT).fg(Color::Black).bold()
        };
        Line::from(Span::styled(format!(" {} (s / Ctrl+S) ", strings.analyze.start_btn), style))
    };
    frame.render_widget(Paragraph::new(button).alignment(Alignment::Center), button_area);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(!editing))
        .title(format!(" {} ", strings.analyze.report_title));
    if !app.analyze.analysis.is_empty() && !app.analyze.is_loading() {
        block = block.title(
            Line::from(Span::styled(
                format!(" ✓ {} ", strings.analyze.completed),
                Style::default().fg(Color::Green).bold(),
            ))
            .right_aligned(),
        );
    }

    let lines = if app.analyze.is_loading() {
        vec![loading_line(strings.chat.loading, app.animation_frame)]
    } else {
        render_markdown(&app.analyze.analysis, Style::default())
    };
    render_scrolled(frame, report_area, block, lines, &mut app.analyze.scroll);

    frame.render_widget(
        Paragraph::new(format!(" {}", strings.analyze.disclaimer)).style(Style::default().fg(Color::DarkGray)),
        note_area,
    );
}

// Shared widgets

/// Rows a set of lines occupies once wrapped to `width` columns
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = width.max(1) as usize;
    let rows: usize = lines
        .iter()
        .map(|line| {
            let w = line.width();
            if w == 0 { 1 } else { w.div_ceil(width) }
        })
        .sum();
    rows.min(u16::MAX as usize) as u16
}

/// Render a bordered, wrapped, scrollable pane and keep `scroll` in range
fn render_scrolled(frame: &mut Frame, area: Rect, block: Block, lines: Vec<Line<'static>>, scroll: &mut Scroll) {
    let inner = block.inner(area);
    let total = wrapped_height(&lines, inner.width);
    scroll.set_max(total.saturating_sub(inner.height));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll.offset, 0));
    frame.render_widget(paragraph, area);

    if total > inner.height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let mut scrollbar_state = ScrollbarState::new(scroll.max as usize + 1)
            .position(scroll.offset as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// Single-pane input with a prompt prefix, used by the chat box
fn render_input(frame: &mut Frame, area: Rect, input: &TextInput, placeholder: &str, prefix: &str, editing: bool) {
    let border_color = if editing { WARM } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [prefix_area, text_area] = Layout::horizontal([
        Constraint::Length(prefix.width() as u16),
        Constraint::Min(0),
    ])
    .areas(inner);
    frame.render_widget(Paragraph::new(prefix).style(Style::default().fg(WARM).bold()), prefix_area);

    render_input_text(frame, text_area, input, placeholder, editing);
}

/// Titled multi-line input
fn render_input_block(
    frame: &mut Frame,
    area: Rect,
    input: &TextInput,
    placeholder: &str,
    title: &str,
    editing: bool,
    focused: bool,
) {
    let border_color = if editing && focused {
        WARM
    } else if focused {
        ACCENT
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title.to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    render_input_text(frame, inner, input, placeholder, editing && focused);
}

/// Draw the buffer, scrolled so the cursor stays visible, and place the
/// terminal cursor when editing
fn render_input_text(frame: &mut Frame, area: Rect, input: &TextInput, placeholder: &str, show_cursor: bool) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    if input.is_empty() {
        frame.render_widget(
            Paragraph::new(placeholder.to_string())
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    let (line, col) = input.cursor_line_col();
    let cursor_line = input.value().split('\n').nth(line).unwrap_or("");
    let before_cursor: String = cursor_line.chars().take(col).collect();
    let cursor_x = before_cursor.width() as u16;

    let scroll_y = (line as u16).saturating_sub(area.height - 1);
    let scroll_x = cursor_x.saturating_sub(area.width - 1);

    if !input.is_empty() {
        let lines: Vec<Line> = input.value().split('\n').map(Line::from).collect();
        frame.render_widget(Paragraph::new(lines).scroll((scroll_y, scroll_x)), area);
    }

    if show_cursor {
        frame.set_cursor_position((
            area.x + cursor_x - scroll_x,
            area.y + line as u16 - scroll_y,
        ));
    }
}

/// Centered popup of at most the given size
fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

// Popups

fn render_language_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    let languages = Language::all();
    let popup_area = popup_rect(area, 36, languages.len() as u16 + 2);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(format!(" {} ", app.strings().keys.language_title));

    let items: Vec<ListItem> = languages
        .iter()
        .map(|lang| {
            let is_current = *lang == app.language;
            let style = if is_current {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let prefix = if is_current { "* " } else { "  " };
            ListItem::new(format!("{}{}  {}", prefix, lang, lang.code())).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut app.language_picker_state);
}

/// Mask the key with asterisks, keeping the last four characters visible
fn mask_key(key: &str) -> String {
    let len = key.chars().count();
    if len <= 4 {
        "*".repeat(len)
    } else {
        let masked_len = len - 4;
        let last_four: String = key.chars().skip(masked_len).collect();
        format!("{}...{}", "*".repeat(masked_len.min(20)), last_four)
    }
}

fn render_api_key_input(app: &App, frame: &mut Frame, area: Rect) {
    let keys = &app.strings().keys;
    let popup_area = popup_rect(area, 60, 7);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(WARM))
        .title(format!(" {} ", keys.api_key_title));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    if inner.height < 5 {
        return;
    }

    let instructions = Paragraph::new(keys.api_key_help)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(instructions, Rect::new(inner.x, inner.y, inner.width, 1));

    let input_area = Rect::new(inner.x, inner.y + 2, inner.width, 1);
    let display_text = mask_key(app.api_key_input.value());
    let cursor_x = (display_text.width() as u16).min(input_area.width.saturating_sub(1));
    frame.render_widget(Paragraph::new(display_text).style(Style::default().fg(ACCENT)), input_area);
    frame.set_cursor_position((input_area.x + cursor_x, input_area.y));

    let status = match app.key_source() {
        Some("env") => keys.key_from_env,
        Some(_) => keys.key_from_config,
        None => keys.key_none,
    };
    let status_line = format!(
        "{} {}  ·  {}",
        app.api_key_input.value().chars().count(),
        keys.characters,
        status
    );
    frame.render_widget(
        Paragraph::new(status_line).style(Style::default().fg(Color::DarkGray)),
        Rect::new(inner.x, inner.y + 4, inner.width, 1),
    );
}

fn render_mission(app: &App, frame: &mut Frame, area: Rect) {
    let strings = app.strings();
    let popup_area = popup_rect(area, 70, 14);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(WARM))
        .title(format!(" {} ", strings.learn_more));

    let text = Text::from(vec![
        Line::from(Span::styled(strings.subtitle, Style::default().fg(WARM).bold())),
        Line::default(),
        Line::from(strings.hero_desc),
        Line::default(),
        Line::from(strings.footer.desc),
        Line::default(),
        Line::from(Span::styled(strings.footer.disclaimer, Style::default().fg(Color::DarkGray))),
    ]);

    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: true }),
        popup_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        // Skip the padding cells ratatui places after wide (e.g. CJK) glyphs.
        let mut text = String::new();
        let mut skip = 0;
        for cell in buffer.content.iter() {
            if skip > 0 {
                skip -= 1;
                continue;
            }
            let symbol = cell.symbol();
            skip = unicode_width::UnicodeWidthStr::width(symbol).saturating_sub(1);
            text.push_str(symbol);
        }
        text
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key(""), "");
        assert_eq!(mask_key("abc"), "***");
        assert_eq!(mask_key("abcdefgh"), "****...efgh");
    }

    #[test]
    fn test_wrapped_height_counts_wrapped_rows() {
        let lines = vec![Line::from("a".repeat(25)), Line::default(), Line::from("short")];
        assert_eq!(wrapped_height(&lines, 10), 3 + 1 + 1);
    }

    #[test]
    fn test_header_follows_language() {
        let mut app = App::new(Config { language: Language::En, ..Config::default() });
        let screen = draw(&mut app);
        assert!(screen.contains("Home"));
        assert!(app.body_area.is_some());
    }

    #[test]
    fn test_render_all_modes_and_popups() {
        let mut app = App::new(Config { language: Language::En, ..Config::default() });
        for mode in Mode::all() {
            app.set_mode(mode);
            draw(&mut app);
        }
        for popup in [Popup::Language, Popup::ApiKey, Popup::Mission] {
            app.popup = Some(popup);
            draw(&mut app);
        }
    }

    #[test]
    fn test_labels_follow_traditional_chinese() {
        let english = [
            "NORMAL", "EDIT", "select", "open", "language", "quit", "scroll", "stop typing",
            "details", "focus", "paste/type", "newline", "submit", "API key?", "Paste your",
            "characters", "No key configured", "Current key",
        ];
        let mut app = App::new(Config {
            language: Language::ZhTw,
            api_key: None,
            ..Config::default()
        });

        let mut screens = Vec::new();
        for mode in Mode::all() {
            app.set_mode(mode);
            screens.push(draw(&mut app));
            app.start_editing();
            screens.push(draw(&mut app));
            app.input_mode = InputMode::Normal;
        }
        for popup in [Popup::Language, Popup::ApiKey] {
            app.popup = Some(popup);
            screens.push(draw(&mut app));
        }

        for screen in &screens {
            for word in english {
                assert!(!screen.contains(word), "zh-TW screen shows English '{}'", word);
            }
        }
        assert!(screens[0].contains("離開"));
    }
}
