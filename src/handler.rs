use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{App, DraftFocus, InputMode, Popup};
use crate::state::Mode;
use crate::tui::AppEvent;

/// Lines moved per page key
const PAGE: u16 = 10;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => handle_paste(app, &text),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if let Some(popup) = app.popup {
        handle_popup(app, popup, key);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_popup(app: &mut App, popup: Popup, key: KeyEvent) {
    match popup {
        Popup::Language => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => app.popup = None,
            KeyCode::Char('j') | KeyCode::Down => app.language_picker_nav_down(),
            KeyCode::Char('k') | KeyCode::Up => app.language_picker_nav_up(),
            KeyCode::Enter => app.select_language_from_picker(),
            _ => {}
        },
        Popup::ApiKey => match key.code {
            KeyCode::Esc => {
                app.api_key_input.clear();
                app.popup = None;
            }
            KeyCode::Enter => {
                let key = app.api_key_input.take();
                app.set_api_key(&key);
                app.popup = None;
            }
            KeyCode::Backspace => app.api_key_input.backspace(),
            KeyCode::Left => app.api_key_input.move_left(),
            KeyCode::Right => app.api_key_input.move_right(),
            KeyCode::Char(c) => app.api_key_input.insert(c),
            _ => {}
        },
        Popup::Mission => app.popup = None,
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    // Keys shared by every screen
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab if app.mode != Mode::Draft => {
            app.set_mode(app.mode.next());
            return;
        }
        KeyCode::BackTab => {
            app.set_mode(app.mode.prev());
            return;
        }
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            app.set_mode(Mode::all()[idx]);
            return;
        }
        KeyCode::Char('L') => {
            app.open_language_picker();
            return;
        }
        KeyCode::Char('K') => {
            app.open_api_key_input();
            return;
        }
        KeyCode::Char('m') => {
            app.popup = Some(Popup::Mission);
            return;
        }
        _ => {}
    }

    match app.mode {
        Mode::Home => handle_home_normal(app, key),
        Mode::Chat => handle_chat_normal(app, key),
        Mode::Draft => handle_draft_normal(app, key),
        Mode::Analyze => handle_analyze_normal(app, key),
    }
}

fn handle_home_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('j') | KeyCode::Down => app.home_nav_next(),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('k') | KeyCode::Up => app.home_nav_prev(),
        KeyCode::Enter => app.home_activate(),
        KeyCode::Char('c') => app.set_mode(Mode::Chat),
        _ => {}
    }
}

fn handle_scroll_keys(app: &mut App, key: KeyEvent) {
    let Some(scroll) = app.active_scroll_mut() else { return };
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => scroll.down(1),
        KeyCode::Char('k') | KeyCode::Up => scroll.up(1),
        KeyCode::PageDown => scroll.down(PAGE),
        KeyCode::PageUp => scroll.up(PAGE),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => scroll.down(PAGE),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => scroll.up(PAGE),
        KeyCode::Char('g') | KeyCode::Home => scroll.to_top(),
        KeyCode::Char('G') | KeyCode::End => scroll.to_bottom(),
        _ => {}
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Enter => app.start_editing(),
        KeyCode::Esc => app.set_mode(Mode::Home),
        _ => handle_scroll_keys(app, key),
    }
}

fn handle_draft_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => app.cycle_draft_focus(),
        KeyCode::Char('i') => app.start_editing(),
        KeyCode::Char('s') => {
            app.submit_draft();
        }
        KeyCode::Char('y') => {
            app.copy_draft();
        }
        KeyCode::Char('t') => app.cycle_document_type(true),
        KeyCode::Char('T') => app.cycle_document_type(false),
        KeyCode::Esc => app.set_mode(Mode::Home),
        _ => match app.draft.focus {
            DraftFocus::DocType => match key.code {
                KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('j') | KeyCode::Down => {
                    app.cycle_document_type(true)
                }
                KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('k') | KeyCode::Up => {
                    app.cycle_document_type(false)
                }
                KeyCode::Enter => app.draft.focus = DraftFocus::Details,
                _ => {}
            },
            DraftFocus::Details => {
                if key.code == KeyCode::Enter {
                    app.start_editing();
                }
            }
            DraftFocus::Preview => handle_scroll_keys(app, key),
        },
    }
}

fn handle_analyze_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') => app.start_editing(),
        KeyCode::Char('s') | KeyCode::Enter => {
            app.submit_analysis();
        }
        KeyCode::Esc => app.set_mode(Mode::Home),
        _ => handle_scroll_keys(app, key),
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            return;
        }
        // Chat sends on Enter; the long-form views submit on Ctrl+S
        KeyCode::Enter if app.mode == Mode::Chat && !alt => {
            if app.send_chat() {
                app.input_mode = InputMode::Normal;
            }
            return;
        }
        KeyCode::Char('s') if ctrl && app.mode == Mode::Draft => {
            if app.submit_draft() {
                app.input_mode = InputMode::Normal;
            }
            return;
        }
        KeyCode::Char('s') if ctrl && app.mode == Mode::Analyze => {
            if app.submit_analysis() {
                app.input_mode = InputMode::Normal;
            }
            return;
        }
        _ => {}
    }

    let Some(input) = app.active_input_mut() else {
        app.input_mode = InputMode::Normal;
        return;
    };

    match key.code {
        KeyCode::Enter => input.insert('\n'),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        KeyCode::Char('u') if ctrl => input.clear(),
        KeyCode::Char(c) if !ctrl => input.insert(c),
        _ => {}
    }
}

fn handle_paste(app: &mut App, text: &str) {
    if app.popup == Some(Popup::ApiKey) {
        app.api_key_input.insert_str(text.trim());
        return;
    }
    if app.popup.is_some() {
        return;
    }

    // Pasting a contract should just work, even if the user never pressed `i`
    if app.input_mode == InputMode::Normal && app.mode != Mode::Home {
        app.start_editing();
    }
    let single_line = app.mode == Mode::Chat;
    if let Some(input) = app.active_input_mut() {
        if single_line {
            input.insert_str(&text.replace(['\r', '\n'], " "));
        } else {
            input.insert_str(text);
        }
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_body = app
        .body_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_body || app.popup.is_some() {
        return;
    }

    let Some(scroll) = app.active_scroll_mut() else { return };
    match mouse.kind {
        MouseEventKind::ScrollDown => scroll.down(3),
        MouseEventKind::ScrollUp => scroll.up(3),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::i18n::Language;
    use crate::prompt::DocumentType;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c)));
        }
    }

    fn app() -> App {
        App::new(Config {
            base_url: Some("http://127.0.0.1:9".into()),
            ..Config::default()
        })
    }

    #[test]
    fn test_number_keys_switch_modes() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.mode, Mode::Draft);
        handle_event(&mut app, key(KeyCode::Char('1')));
        assert_eq!(app.mode, Mode::Home);
    }

    #[test]
    fn test_ctrl_c_quits_even_while_editing() {
        let mut app = app();
        app.set_mode(Mode::Chat);
        handle_event(&mut app, key(KeyCode::Char('i')));
        assert_eq!(app.input_mode, InputMode::Editing);
        handle_event(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_typing_q_while_editing_does_not_quit() {
        let mut app = app();
        app.set_mode(Mode::Analyze);
        handle_event(&mut app, key(KeyCode::Char('i')));
        type_str(&mut app, "quit notice");
        assert!(!app.should_quit);
        assert_eq!(app.analyze.content.value(), "quit notice");
    }

    #[test]
    fn test_enter_on_blank_chat_keeps_editing() {
        let mut app = app();
        app.set_mode(Mode::Chat);
        handle_event(&mut app, key(KeyCode::Enter));
        type_str(&mut app, "   ");
        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.chat.messages.len(), 1);
    }

    #[test]
    fn test_draft_details_accept_newlines() {
        let mut app = app();
        app.set_mode(Mode::Draft);
        handle_event(&mut app, key(KeyCode::Char('i')));
        type_str(&mut app, "Tenant: Lin");
        handle_event(&mut app, key(KeyCode::Enter));
        type_str(&mut app, "Deposit: 20000");
        assert_eq!(app.draft.details.value(), "Tenant: Lin\nDeposit: 20000");
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_doc_type_cycles_when_focused() {
        let mut app = app();
        app.set_mode(Mode::Draft);
        handle_event(&mut app, key(KeyCode::Right));
        assert_eq!(app.draft.doc_type, DocumentType::Contract);
        handle_event(&mut app, key(KeyCode::Char('T')));
        assert_eq!(app.draft.doc_type, DocumentType::Letter);
    }

    #[test]
    fn test_language_popup_flow() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('L')));
        assert_eq!(app.popup, Some(Popup::Language));
        handle_event(&mut app, key(KeyCode::Down));
        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.language, Language::En);
        assert_eq!(app.popup, None);
    }

    #[test]
    fn test_paste_into_chat_flattens_newlines() {
        let mut app = app();
        app.set_mode(Mode::Chat);
        handle_event(&mut app, AppEvent::Paste("line one\nline two".into()));
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.chat.input.value(), "line one line two");
    }

    #[test]
    fn test_paste_into_api_key_popup() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('K')));
        handle_event(&mut app, AppEvent::Paste("  abc123\n".into()));
        assert_eq!(app.api_key_input.value(), "abc123");
        handle_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.popup, None);
        assert!(app.api_key_input.is_empty());
    }
}
