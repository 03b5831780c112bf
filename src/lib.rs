//! Multilingual legal assistant: consultation chat, document drafting and
//! case risk analysis backed by Gemini.

pub mod app;
pub mod clipboard;
pub mod config;
pub mod gemini;
pub mod handler;
pub mod i18n;
pub mod input;
pub mod logging;
pub mod markdown;
pub mod prompt;
pub mod state;
pub mod tui;
pub mod ui;
