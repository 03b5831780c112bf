use std::path::PathBuf;

use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::task::{JoinError, JoinHandle};
use tracing::{info, warn};

use crate::config::Config;
use crate::gemini::{GeminiClient, GeminiError, GenerateRequest, Generation};
use crate::i18n::{Language, Strings};
use crate::input::TextInput;
use crate::prompt::{self, DocumentType};
use crate::state::{ChatMessage, Mode, Source};

pub type RequestTask = JoinHandle<Result<Generation, GeminiError>>;

/// How many ticks the "copied" label stays up (about two seconds)
const COPIED_TICKS: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    Language,
    ApiKey,
    Mission,
}

/// Vertical scroll for a pane whose content height is only known at render time
#[derive(Debug, Clone, Copy, Default)]
pub struct Scroll {
    pub offset: u16,
    pub max: u16,
    /// Stick to the bottom as content grows
    pub follow: bool,
}

impl Scroll {
    pub fn up(&mut self, n: u16) {
        self.offset = self.offset.saturating_sub(n);
        self.follow = false;
    }

    pub fn down(&mut self, n: u16) {
        self.offset = self.offset.saturating_add(n).min(self.max);
        self.follow = self.offset >= self.max;
    }

    pub fn to_top(&mut self) {
        self.offset = 0;
        self.follow = false;
    }

    pub fn to_bottom(&mut self) {
        self.follow = true;
        self.offset = self.max;
    }

    /// Called by the renderer once the wrapped content height is known
    pub fn set_max(&mut self, max: u16) {
        self.max = max;
        if self.follow {
            self.offset = max;
        }
        self.offset = self.offset.min(max);
    }
}

#[derive(Default)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub input: TextInput,
    pub task: Option<RequestTask>,
    pub scroll: Scroll,
}

impl ChatState {
    pub fn is_loading(&self) -> bool {
        self.task.is_some()
    }

    fn reset(&mut self, strings: &Strings) {
        self.messages = vec![ChatMessage::model(strings.chat.greeting)];
        self.scroll = Scroll::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftFocus {
    #[default]
    DocType,
    Details,
    Preview,
}

#[derive(Default)]
pub struct DraftState {
    pub doc_type: DocumentType,
    pub details: TextInput,
    pub result: String,
    pub sources: Vec<Source>,
    pub task: Option<RequestTask>,
    pub focus: DraftFocus,
    pub copied_ticks: u8,
    pub scroll: Scroll,
}

impl DraftState {
    pub fn is_loading(&self) -> bool {
        self.task.is_some()
    }

    pub fn is_copied(&self) -> bool {
        self.copied_ticks > 0
    }
}

#[derive(Default)]
pub struct AnalyzeState {
    pub content: TextInput,
    pub analysis: String,
    pub task: Option<RequestTask>,
    pub scroll: Scroll,
}

impl AnalyzeState {
    pub fn is_loading(&self) -> bool {
        self.task.is_some()
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub mode: Mode,
    pub language: Language,
    pub input_mode: InputMode,

    // Views
    pub home_selection: usize,
    pub chat: ChatState,
    pub draft: DraftState,
    pub analyze: AnalyzeState,

    // Popups
    pub popup: Option<Popup>,
    pub language_picker_state: ListState,
    pub api_key_input: TextInput,

    // Animation state
    pub animation_frame: u8,

    // Body area for mouse hit-testing (updated during render)
    pub body_area: Option<Rect>,

    // Provider
    pub client: GeminiClient,
    pub model: String,
    pub google_search: bool,

    config: Config,
    config_path: Option<PathBuf>,
}

impl App {
    /// Build the app from a resolved configuration. Nothing is written back
    /// to disk unless [`App::with_config_path`] is used.
    pub fn new(config: Config) -> Self {
        let client = Self::build_client(&config, config.resolved_api_key().as_deref().unwrap_or_default());

        let mut app = Self {
            should_quit: false,
            mode: Mode::Home,
            language: config.language,
            input_mode: InputMode::Normal,

            home_selection: 0,
            chat: ChatState::default(),
            draft: DraftState::default(),
            analyze: AnalyzeState::default(),

            popup: None,
            language_picker_state: ListState::default(),
            api_key_input: TextInput::new(),

            animation_frame: 0,
            body_area: None,

            client,
            model: config.model.clone(),
            google_search: config.google_search,

            config,
            config_path: None,
        };
        let strings = app.strings();
        app.chat.reset(strings);
        app
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    fn build_client(config: &Config, api_key: &str) -> GeminiClient {
        let client = GeminiClient::new(api_key);
        match &config.base_url {
            Some(url) => client.with_base_url(url),
            None => client,
        }
    }

    pub fn strings(&self) -> &'static Strings {
        self.language.strings()
    }

    pub fn key_source(&self) -> Option<&'static str> {
        self.config.key_source()
    }

    fn persist(&self) {
        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!(target: "ai_lawyer::config", "failed to save config: {}", e);
            }
        }
    }

    // Mode and language

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            info!(target: "ai_lawyer::app", ?mode, "switching mode");
        }
        self.mode = mode;
        self.input_mode = InputMode::Normal;
        if mode == Mode::Chat && self.chat.messages.is_empty() {
            let strings = self.strings();
            self.chat.reset(strings);
        }
    }

    /// Switch display language. The consultation restarts with a greeting in
    /// the new language.
    pub fn set_language(&mut self, language: Language) {
        info!(target: "ai_lawyer::app", language = language.code(), "switching language");
        self.language = language;
        let strings = self.strings();
        self.chat.reset(strings);
        self.config.language = language;
        self.persist();
    }

    pub fn open_language_picker(&mut self) {
        self.language_picker_state.select(Some(self.language.index()));
        self.popup = Some(Popup::Language);
    }

    pub fn language_picker_nav_down(&mut self) {
        let len = Language::all().len();
        let i = self.language_picker_state.selected().unwrap_or(0);
        self.language_picker_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn language_picker_nav_up(&mut self) {
        let i = self.language_picker_state.selected().unwrap_or(0);
        self.language_picker_state.select(Some(i.saturating_sub(1)));
    }

    pub fn select_language_from_picker(&mut self) {
        if let Some(lang) = self
            .language_picker_state
            .selected()
            .and_then(|i| Language::all().get(i).copied())
        {
            self.set_language(lang);
        }
        self.popup = None;
    }

    pub fn open_api_key_input(&mut self) {
        self.api_key_input.clear();
        self.popup = Some(Popup::ApiKey);
    }

    /// Store a new API key and rebuild the client around it
    pub fn set_api_key(&mut self, key: &str) {
        let key = key.trim();
        if key.is_empty() {
            return;
        }
        self.config.api_key = Some(key.to_string());
        self.client = Self::build_client(&self.config, key);
        self.persist();
        info!(target: "ai_lawyer::app", "API key updated");
    }

    // Home

    pub fn home_nav_next(&mut self) {
        self.home_selection = (self.home_selection + 1) % 3;
    }

    pub fn home_nav_prev(&mut self) {
        self.home_selection = (self.home_selection + 2) % 3;
    }

    pub fn home_activate(&mut self) {
        let mode = match self.home_selection {
            0 => Mode::Chat,
            1 => Mode::Draft,
            _ => Mode::Analyze,
        };
        self.set_mode(mode);
    }

    // Requests

    /// Send the chat input. Returns false when nothing was sent: blank input,
    /// or a reply still pending.
    pub fn send_chat(&mut self) -> bool {
        if self.chat.input.is_blank() || self.chat.is_loading() {
            return false;
        }

        let text = self.chat.input.take();
        self.chat.messages.push(ChatMessage::user(text));

        let request = GenerateRequest::chat(
            &self.model,
            &self.chat.messages,
            prompt::system_instruction(self.language),
            self.google_search,
        );
        self.chat.task = Some(self.spawn_request(request));
        self.chat.scroll.to_bottom();
        true
    }

    /// Request a document draft. Returns false when the details are blank or
    /// a draft is already pending.
    pub fn submit_draft(&mut self) -> bool {
        if self.draft.details.is_blank() || self.draft.is_loading() {
            return false;
        }

        self.draft.result.clear();
        self.draft.sources.clear();
        self.draft.scroll = Scroll::default();

        let label = self.draft.doc_type.label(self.strings());
        let task_prompt = prompt::draft_prompt(label, self.draft.details.value(), self.language);
        let request = GenerateRequest::single(
            &self.model,
            task_prompt,
            prompt::system_instruction(self.language),
            self.google_search,
        );
        self.draft.task = Some(self.spawn_request(request));
        self.draft.focus = DraftFocus::Preview;
        true
    }

    /// Request a risk analysis. Returns false when the content is blank or an
    /// analysis is already pending.
    pub fn submit_analysis(&mut self) -> bool {
        if self.analyze.content.is_blank() || self.analyze.is_loading() {
            return false;
        }

        self.analyze.analysis.clear();
        self.analyze.scroll = Scroll::default();

        let task_prompt = prompt::analyze_prompt(self.analyze.content.value(), self.language);
        // Analysis works on the pasted text only, never web results
        let request = GenerateRequest::single(
            &self.model,
            task_prompt,
            prompt::system_instruction(self.language),
            false,
        );
        self.analyze.task = Some(self.spawn_request(request));
        true
    }

    fn spawn_request(&self, request: GenerateRequest) -> RequestTask {
        let client = self.client.clone();
        tokio::spawn(async move { client.generate(&request).await })
    }

    pub fn is_loading(&self) -> bool {
        self.chat.is_loading() || self.draft.is_loading() || self.analyze.is_loading()
    }

    /// Harvest finished requests and apply their outcome to the owning view
    pub async fn poll_requests(&mut self) {
        if let Some(task) = take_finished(&mut self.chat.task) {
            let outcome = flatten(task.await);
            self.apply_chat_outcome(outcome);
        }
        if let Some(task) = take_finished(&mut self.draft.task) {
            let outcome = flatten(task.await);
            self.apply_draft_outcome(outcome);
        }
        if let Some(task) = take_finished(&mut self.analyze.task) {
            let outcome = flatten(task.await);
            self.apply_analysis_outcome(outcome);
        }
    }

    /// Wait for every pending request to complete. Used by one-shot commands
    /// and tests; the TUI polls instead.
    pub async fn wait_for_requests(&mut self) {
        if let Some(task) = self.chat.task.take() {
            let outcome = flatten(task.await);
            self.apply_chat_outcome(outcome);
        }
        if let Some(task) = self.draft.task.take() {
            let outcome = flatten(task.await);
            self.apply_draft_outcome(outcome);
        }
        if let Some(task) = self.analyze.task.take() {
            let outcome = flatten(task.await);
            self.apply_analysis_outcome(outcome);
        }
    }

    fn apply_chat_outcome(&mut self, outcome: Result<Generation, String>) {
        let strings = self.strings();
        let message = match outcome {
            Ok(generation) => {
                let text = generation.text.unwrap_or_else(|| strings.chat.no_answer.to_string());
                ChatMessage::model(text).with_sources(generation.sources)
            }
            Err(e) => {
                warn!(target: "ai_lawyer::app", "chat request failed: {}", e);
                ChatMessage::model(strings.chat.error)
            }
        };
        self.chat.messages.push(message);
        self.chat.scroll.to_bottom();
    }

    fn apply_draft_outcome(&mut self, outcome: Result<Generation, String>) {
        let strings = self.strings();
        match outcome {
            Ok(generation) => {
                self.draft.result = generation.text.unwrap_or_else(|| strings.chat.error.to_string());
                self.draft.sources = generation.sources;
            }
            Err(e) => {
                warn!(target: "ai_lawyer::app", "draft request failed: {}", e);
                self.draft.result = strings.chat.error.to_string();
                self.draft.sources.clear();
            }
        }
    }

    fn apply_analysis_outcome(&mut self, outcome: Result<Generation, String>) {
        let strings = self.strings();
        self.analyze.analysis = match outcome {
            Ok(generation) => generation.text.unwrap_or_else(|| strings.chat.error.to_string()),
            Err(e) => {
                warn!(target: "ai_lawyer::app", "analysis request failed: {}", e);
                strings.chat.error.to_string()
            }
        };
    }

    // Drafting helpers

    pub fn cycle_document_type(&mut self, forward: bool) {
        self.draft.doc_type = if forward {
            self.draft.doc_type.next()
        } else {
            self.draft.doc_type.prev()
        };
    }

    pub fn cycle_draft_focus(&mut self) {
        self.draft.focus = match self.draft.focus {
            DraftFocus::DocType => DraftFocus::Details,
            DraftFocus::Details => DraftFocus::Preview,
            DraftFocus::Preview => DraftFocus::DocType,
        };
    }

    /// Copy the drafted document. Returns false when there is nothing to copy
    /// or no clipboard helper is available.
    pub fn copy_draft(&mut self) -> bool {
        if self.draft.result.is_empty() || self.draft.is_loading() {
            return false;
        }
        match crate::clipboard::copy_to_clipboard(&self.draft.result) {
            Ok(()) => {
                self.draft.copied_ticks = COPIED_TICKS;
                true
            }
            Err(e) => {
                warn!(target: "ai_lawyer::clipboard", "copy failed: {}", e);
                false
            }
        }
    }

    // Editing

    /// The text input the keyboard edits in the current mode, if any
    pub fn active_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.mode {
            Mode::Home => None,
            Mode::Chat => Some(&mut self.chat.input),
            Mode::Draft => Some(&mut self.draft.details),
            Mode::Analyze => Some(&mut self.analyze.content),
        }
    }

    pub fn start_editing(&mut self) {
        if self.mode == Mode::Home {
            return;
        }
        if self.mode == Mode::Draft {
            self.draft.focus = DraftFocus::Details;
        }
        self.input_mode = InputMode::Editing;
    }

    pub fn active_scroll_mut(&mut self) -> Option<&mut Scroll> {
        match self.mode {
            Mode::Home => None,
            Mode::Chat => Some(&mut self.chat.scroll),
            Mode::Draft => Some(&mut self.draft.scroll),
            Mode::Analyze => Some(&mut self.analyze.scroll),
        }
    }

    /// Tick animation frame and expire transient labels (called by Tick event)
    pub fn tick(&mut self) {
        if self.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        self.draft.copied_ticks = self.draft.copied_ticks.saturating_sub(1);
    }
}

fn take_finished(slot: &mut Option<RequestTask>) -> Option<RequestTask> {
    if slot.as_ref().is_some_and(|task| task.is_finished()) {
        slot.take()
    } else {
        None
    }
}

fn flatten(joined: Result<Result<Generation, GeminiError>, JoinError>) -> Result<Generation, String> {
    match joined {
        Ok(Ok(generation)) => Ok(generation),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("request task failed: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_app() -> App {
        App::new(Config {
            api_key: None,
            base_url: Some("http://127.0.0.1:9".into()),
            ..Config::default()
        })
    }

    #[test]
    fn test_starts_home_with_greeting_ready() {
        let app = offline_app();
        assert_eq!(app.mode, Mode::Home);
        assert_eq!(app.chat.messages, vec![ChatMessage::model(Language::ZhTw.strings().chat.greeting)]);
    }

    #[test]
    fn test_language_switch_resets_chat_to_new_greeting() {
        let mut app = offline_app();
        app.chat.messages.push(ChatMessage::user("hello"));
        app.set_language(Language::En);
        assert_eq!(app.strings().nav.home, "Home");
        assert_eq!(app.chat.messages, vec![ChatMessage::model(Language::En.strings().chat.greeting)]);
    }

    #[test]
    fn test_blank_submissions_are_noops() {
        let mut app = offline_app();
        app.chat.input.insert_str("   ");
        assert!(!app.send_chat());
        assert_eq!(app.chat.messages.len(), 1);
        assert!(!app.chat.is_loading());

        app.draft.details.insert_str("\n\n");
        assert!(!app.submit_draft());
        assert!(!app.draft.is_loading());

        assert!(!app.submit_analysis());
        assert!(!app.analyze.is_loading());
    }

    #[tokio::test]
    async fn test_second_send_ignored_while_pending() {
        let mut app = offline_app();
        app.chat.input.insert_str("first");
        assert!(app.send_chat());
        app.chat.input.insert_str("second");
        assert!(!app.send_chat());
        assert_eq!(app.chat.input.value(), "second");
        assert_eq!(app.chat.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_key_surfaces_fallback_text() {
        let mut app = offline_app();
        app.set_language(Language::En);
        app.analyze.content.insert_str("Clause 9: no refunds ever");
        assert!(app.submit_analysis());
        app.wait_for_requests().await;
        assert_eq!(app.analyze.analysis, "Error. Please try again.");
        assert!(!app.analyze.is_loading());
    }

    #[test]
    fn test_scroll_follow_and_clamp() {
        let mut scroll = Scroll::default();
        scroll.to_bottom();
        scroll.set_max(10);
        assert_eq!(scroll.offset, 10);
        scroll.up(3);
        scroll.set_max(20);
        assert_eq!(scroll.offset, 7);
        scroll.down(50);
        assert_eq!(scroll.offset, 20);
        assert!(scroll.follow);
        scroll.set_max(5);
        assert_eq!(scroll.offset, 5);
    }

    #[test]
    fn test_home_cards_wrap() {
        let mut app = offline_app();
        app.home_nav_prev();
        assert_eq!(app.home_selection, 2);
        app.home_activate();
        assert_eq!(app.mode, Mode::Analyze);
    }

    #[test]
    fn test_language_picker_selects() {
        let mut app = offline_app();
        app.open_language_picker();
        assert_eq!(app.language_picker_state.selected(), Some(0));
        app.language_picker_nav_down();
        app.language_picker_nav_down();
        app.select_language_from_picker();
        assert_eq!(app.language, Language::ZhCn);
        assert_eq!(app.popup, None);
    }

    #[test]
    fn test_copied_label_expires_after_its_ticks() {
        let mut app = offline_app();
        app.draft.copied_ticks = COPIED_TICKS;
        assert!(app.draft.is_copied());
        for _ in 0..COPIED_TICKS - 1 {
            app.tick();
        }
        assert!(app.draft.is_copied());
        app.tick();
        assert!(!app.draft.is_copied());
        app.tick();
        assert_eq!(app.draft.copied_ticks, 0);
    }

    #[test]
    fn test_animation_only_runs_while_loading() {
        let mut app = offline_app();
        for _ in 0..5 {
            app.tick();
        }
        assert_eq!(app.animation_frame, 0);
    }

    #[tokio::test]
    async fn test_animation_cycles_while_loading() {
        let mut app = offline_app();
        app.chat.input.insert_str("question");
        assert!(app.send_chat());
        app.tick();
        assert_eq!(app.animation_frame, 1);
        app.tick();
        app.tick();
        assert_eq!(app.animation_frame, 0);
    }
}
