use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Result, anyhow};

/// Clipboard commands tried in order: macOS, Wayland, X11
const CLIPBOARD_COMMANDS: [(&str, &[&str]); 3] = [
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
];

/// Copy text to the system clipboard using the first helper that is installed
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    for (program, args) in CLIPBOARD_COMMANDS {
        let Ok(mut child) = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        else {
            continue;
        };

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        let status = child.wait()?;
        if status.success() {
            tracing::debug!(target: "ai_lawyer::clipboard", program, bytes = text.len(), "copied");
            return Ok(());
        }
    }

    Err(anyhow!("no clipboard helper found (tried pbcopy, wl-copy, xclip)"))
}
