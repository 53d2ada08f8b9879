//! Clipboard integration for the copy action.
//!
//! Primary path pipes the text into the platform clipboard tool. When no tool
//! is available the legacy fallback emits an OSC 52 escape sequence, which
//! most modern terminals translate into a clipboard write.

use base64::Engine;
use std::io::Write;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::Result;

#[cfg(target_os = "macos")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
];

/// Copy text to the system clipboard.
pub async fn copy(text: &str) -> Result<()> {
    for (program, args) in CLIPBOARD_TOOLS {
        match pipe_to_command(program, args, text).await {
            Ok(()) => {
                tracing::debug!("Copied {} bytes via {}", text.len(), program);
                return Ok(());
            }
            Err(err) => {
                tracing::debug!("Clipboard tool {} unavailable: {:#}", program, err);
            }
        }
    }

    osc52_copy(text)
}

async fn pipe_to_command(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).await?;
    }

    let status = child.wait().await?;
    if !status.success() {
        anyhow::bail!("{} exited with {}", program, status);
    }

    Ok(())
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{}\x07", encoded)
}

fn osc52_write(target: &mut impl Write, text: &str) -> Result<()> {
    target.write_all(osc52_sequence(text).as_bytes())?;
    target.flush()?;
    Ok(())
}

/// Copy via OSC 52 on stderr; stdout stays clean for piped captions.
fn osc52_copy(text: &str) -> Result<()> {
    osc52_write(&mut std::io::stderr(), text)
}
