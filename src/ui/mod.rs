//! Terminal presentation layer: panels, busy spinner, timed confirmations,
//! and the interactive session loop.

use console::{style, Key, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::CaptionBackend;
use crate::workflow::{Action, View, WorkflowController};
use crate::youtube::oembed::{MetadataFetcher, VideoMetadata};
use crate::{utils, youtube, Result};

/// Demo video from the original project, handy for trying the client out.
pub const DEMO_VIDEO_URL: &str = "https://www.youtube.com/watch?v=M7lc1UVf-VE";

const SECTION_SEPARATOR: &str = "────────────────────────────────────────";

/// A label that temporarily switches to a confirmation message and reverts to
/// its original text after a fixed delay. Repeated triggers each spawn their
/// own revert; overlap only ever affects the label text.
#[derive(Clone)]
pub struct TransientLabel {
    original: String,
    current: Arc<Mutex<String>>,
}

impl TransientLabel {
    pub fn new(original: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            current: Arc::new(Mutex::new(original.clone())),
            original,
        }
    }

    pub fn current(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    pub fn flash(&self, message: impl Into<String>, duration: Duration) {
        *self.current.lock().unwrap() = message.into();

        let current = Arc::clone(&self.current);
        let original = self.original.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            *current.lock().unwrap() = original;
        });
    }
}

/// Terminal implementation of the workflow's view seam.
///
/// Panels, errors, and the spinner go to stderr so that one-shot mode can pipe
/// raw captions cleanly from stdout. The captions body itself is printed here
/// only in interactive mode.
pub struct TerminalView {
    term: Term,
    spinner: Option<ProgressBar>,
    confirm_duration: Duration,
    copy_button: TransientLabel,
    download_button: TransientLabel,
    interactive: bool,
    quiet: bool,
    #[cfg(test)]
    captured: Option<Arc<Mutex<Vec<String>>>>,
}

impl TerminalView {
    pub fn new(confirm_duration: Duration, quiet: bool, interactive: bool) -> Self {
        Self {
            term: Term::stderr(),
            spinner: None,
            confirm_duration,
            copy_button: TransientLabel::new("copy"),
            download_button: TransientLabel::new("download"),
            interactive,
            quiet,
            #[cfg(test)]
            captured: None,
        }
    }

    /// View whose output lands in a buffer instead of the terminal.
    #[cfg(test)]
    fn captured(
        confirm_duration: Duration,
        quiet: bool,
        interactive: bool,
    ) -> (Self, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let mut view = Self::new(confirm_duration, quiet, interactive);
        view.captured = Some(Arc::clone(&lines));
        (view, lines)
    }

    fn emit(&self, text: &str) {
        #[cfg(test)]
        if let Some(lines) = &self.captured {
            lines.lock().unwrap().push(text.to_string());
            return;
        }

        let _ = self.term.write_line(text);
    }

    fn line(&self, text: &str) {
        if !self.quiet {
            self.emit(text);
        }
    }

    fn footer(&self) {
        if self.interactive {
            self.line(&format!(
                "commands: {} · {} · reset (Esc) · quit",
                self.copy_button.current(),
                self.download_button.current()
            ));
        }
    }

    fn confirm(&self, message: &str, button: &TransientLabel) {
        button.flash(format!("✔ {}", message), self.confirm_duration);

        if self.quiet {
            return;
        }

        if self.interactive {
            // Transient line that clears itself after the confirmation window
            let bar = ProgressBar::new_spinner();
            bar.set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
            bar.set_message(format!("✔ {}", message));

            let duration = self.confirm_duration;
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                bar.finish_and_clear();
            });
        } else {
            self.emit(&style(format!("✔ {}", message)).green().to_string());
        }
    }
}

impl View for TerminalView {
    fn hide_all(&mut self) {
        if self.interactive {
            let _ = self.term.clear_screen();
        } else {
            self.line(&style(SECTION_SEPARATOR).dim().to_string());
        }
    }

    fn set_busy(&mut self, busy: bool) {
        if busy {
            let bar = if self.quiet {
                ProgressBar::hidden()
            } else {
                ProgressBar::new_spinner()
            };
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap(),
            );
            bar.set_message("Extracting captions...");
            bar.enable_steady_tick(Duration::from_millis(100));
            self.spinner = Some(bar);
        } else if let Some(bar) = self.spinner.take() {
            bar.finish_and_clear();
        }
    }

    fn show_video(&mut self, video_id: &str, metadata: &VideoMetadata) {
        if self.quiet {
            return;
        }

        self.line("");
        self.line(&style(&metadata.title).bold().to_string());
        self.line(&style(format!("by {}", metadata.author)).dim().to_string());
        if let Some(duration) = metadata.duration {
            self.line(&style(utils::format_duration(duration)).dim().to_string());
        }
        self.line(&style(youtube::watch_url(video_id)).underlined().to_string());
        if let Some(thumbnail) = &metadata.thumbnail {
            self.line(&style(format!("thumbnail: {}", thumbnail)).dim().to_string());
        }
    }

    fn show_result(&mut self, captions: &str, video_id: &str) {
        self.line("");
        self.line(&format!(
            "{}  {}",
            style(format!("Video ID: {}", video_id)).cyan(),
            style(format!(
                "{} characters",
                utils::format_count(captions.chars().count())
            ))
            .dim()
        ));

        if self.interactive {
            self.line("");
            self.emit(captions);
            self.line("");
            self.footer();
        }
    }

    fn show_error(&mut self, message: &str) {
        self.emit(&style(format!("✖ {}", message)).red().to_string());
    }

    fn confirm_copied(&mut self) {
        let button = self.copy_button.clone();
        self.confirm("Copied to clipboard", &button);
    }

    fn confirm_downloaded(&mut self) {
        let button = self.download_button.clone();
        self.confirm("Downloaded", &button);
    }

    fn focus_input(&mut self) {
        let _ = self.term.flush();
    }
}

/// A submitted line of session input, decoded into a workflow-facing command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Extract(String),
    Copy,
    Download,
    Reset,
    Demo,
    Quit,
    Empty,
}

/// Decode a line of session input. Known command words are matched first;
/// anything else is treated as a URL to extract.
pub fn parse_session_command(input: &str) -> SessionCommand {
    let trimmed = input.trim();

    match trimmed.to_lowercase().as_str() {
        "" => SessionCommand::Empty,
        "copy" | "c" => SessionCommand::Copy,
        "download" | "d" => SessionCommand::Download,
        "reset" => SessionCommand::Reset,
        "demo" => SessionCommand::Demo,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        _ => SessionCommand::Extract(trimmed.to_string()),
    }
}

const COMMAND_WORDS: &[&str] = &[
    "copy", "download", "reset", "demo", "quit", "exit", "c", "d", "q",
];

fn looks_like_command(input: &str) -> bool {
    COMMAND_WORDS
        .iter()
        .any(|word| word.starts_with(&input.to_lowercase()))
}

enum PromptResult {
    Submitted(String),
    Escape,
}

fn render_prompt(term: &Term, buffer: &str) -> Result<()> {
    term.clear_line()?;

    // Live validity feedback, recolored on every keystroke
    let shown = if buffer.is_empty()
        || looks_like_command(buffer)
        || youtube::is_valid_youtube_url(buffer)
    {
        buffer.to_string()
    } else {
        style(buffer).red().to_string()
    };

    term.write_str(&format!("url> {}", shown))?;
    Ok(())
}

fn prompt_line(term: &Term) -> Result<PromptResult> {
    let mut buffer = String::new();
    render_prompt(term, &buffer)?;

    loop {
        match term.read_key()? {
            Key::Enter => {
                term.write_line("")?;
                return Ok(PromptResult::Submitted(buffer));
            }
            Key::Escape => {
                term.write_line("")?;
                return Ok(PromptResult::Escape);
            }
            Key::Backspace => {
                buffer.pop();
                render_prompt(term, &buffer)?;
            }
            Key::Char(c) => {
                buffer.push(c);
                render_prompt(term, &buffer)?;
            }
            _ => {}
        }
    }
}

/// Run the interactive extraction session until the user quits.
pub async fn run_session<B, M>(
    controller: &mut WorkflowController<B, M, TerminalView>,
) -> Result<()>
where
    B: CaptionBackend,
    M: MetadataFetcher,
{
    let term = Term::stderr();
    term.write_line(&style("YouTube Caption Extractor").bold().to_string())?;
    term.write_line("Paste a YouTube URL and press Enter. Esc resets, 'quit' exits.")?;

    loop {
        let submitted = match prompt_line(&term)? {
            PromptResult::Submitted(line) => line,
            PromptResult::Escape => {
                controller.handle(Action::Reset).await;
                continue;
            }
        };

        match parse_session_command(&submitted) {
            SessionCommand::Empty => {}
            SessionCommand::Quit => break,
            SessionCommand::Copy => {
                controller.handle(Action::Copy).await;
            }
            SessionCommand::Download => {
                controller.handle(Action::Download).await;
            }
            SessionCommand::Reset => {
                controller.handle(Action::Reset).await;
            }
            SessionCommand::Demo => {
                controller
                    .handle(Action::Extract {
                        url: DEMO_VIDEO_URL.to_string(),
                    })
                    .await;
            }
            SessionCommand::Extract(url) => {
                controller.handle(Action::Extract { url }).await;
            }
        }
    }

    Ok(())
}
