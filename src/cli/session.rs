//! `pinpoint session`: interactive address entry.
//!
//! Plain lines replace the text field. Lines starting with `:` are commands:
//!
//! | Command     | Effect                                   |
//! |-------------|------------------------------------------|
//! | `:go`       | submit the current text                  |
//! | `:pick N`   | resolve the N-th visible suggestion      |
//! | `:focus`    | focus the field (re-shows cached list)   |
//! | `:blur`     | hide suggestions                         |
//! | `:manual`   | stop using the device position           |
//! | `:help`     | list commands                            |
//! | `:quit`     | end the session                          |

use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;

use super::args::DeviceArgs;
use super::common;
use super::display::{render_result, render_suggestions};
use crate::actor::{MapEvent, Phase, SessionMsg, SessionSnapshot, Update};
use crate::actor::session::SessionHandle;
use crate::config::AppConfig;
use crate::core::GeocodingResult;
use crate::logger::StatusBlock;

/// After stdin closes, quit once nothing was published for this long.
const QUIET: Duration = Duration::from_secs(1);

const HELP: &str = "\
type an address, then `:go` to search or `:pick N` to choose a suggestion
  :focus   :blur   :manual   :help   :quit";

pub fn run_session(config: &Arc<AppConfig>, device: &DeviceArgs) -> Result<()> {
    let rt = common::runtime()?;
    rt.block_on(async {
        let mut coordinator = common::coordinator(config, device.geolocator())?;
        if let Some(rx) = crate::core::shutdown_signal() {
            coordinator = coordinator.with_shutdown_signal(rx);
        }
        let mut session = coordinator.spawn();
        let handle = session.handle.clone();

        let (line_tx, mut lines) = mpsc::channel::<String>(16);
        spawn_stdin_reader(line_tx);

        println!("{HELP}");
        handle.send(SessionMsg::Start).await;

        let mut view = SessionView::new();
        let mut input_open = true;
        loop {
            tokio::select! {
                line = lines.recv(), if input_open => match line {
                    Some(line) => {
                        view.detach();
                        if !dispatch(&handle, Command::parse(&line)).await {
                            break;
                        }
                    }
                    None => input_open = false,
                },
                update = session.next_update() => match update {
                    Some(Update::Frame(frame)) => view.render(frame),
                    Some(Update::Map(event)) => view.map(&event),
                    None => break,
                },
                () = tokio::time::sleep(QUIET), if !input_open && view.is_settled() => break,
            }
        }

        drop(handle);
        session.shutdown().await;
        Ok::<_, anyhow::Error>(())
    })
}

/// Read stdin lines on a plain thread; the receiver sees `None` on EOF.
fn spawn_stdin_reader(tx: mpsc::Sender<String>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if crate::core::is_shutdown() || tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
}

/// Returns `false` when the session should end.
async fn dispatch(handle: &SessionHandle, command: Command) -> bool {
    let msg = match command {
        Command::Text(text) => SessionMsg::TextChanged(text),
        Command::Submit => SessionMsg::Submit,
        Command::Pick(index) => SessionMsg::SelectSuggestion(index),
        Command::Focus => SessionMsg::Focus,
        Command::Blur => SessionMsg::Blur,
        Command::Manual => SessionMsg::ManualInput,
        Command::Help => {
            println!("{HELP}");
            return true;
        }
        Command::Invalid(reason) => {
            crate::log!("session"; "{}", reason);
            return true;
        }
        Command::Quit => return false,
    };
    handle.send(msg).await
}

// ============================================================================
// Input commands
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Text(String),
    Submit,
    /// Zero-based suggestion index.
    Pick(usize),
    Focus,
    Blur,
    Manual,
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let Some(rest) = line.trim().strip_prefix(':') else {
            return Self::Text(line.trim_end_matches(['\r', '\n']).to_string());
        };

        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or_default();
        match name {
            "go" | "submit" => Self::Submit,
            "pick" | "p" => match words.next().map(str::parse::<usize>) {
                Some(Ok(n)) if n > 0 => Self::Pick(n - 1),
                _ => Self::Invalid("usage: :pick N (1-based)".to_string()),
            },
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "manual" => Self::Manual,
            "help" | "h" => Self::Help,
            "quit" | "q" => Self::Quit,
            other => Self::Invalid(format!("unknown command `:{other}`, try :help")),
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Status line redrawn per snapshot; results are printed above it.
struct SessionView {
    status: StatusBlock,
    shown: Option<GeocodingResult>,
    settled: bool,
}

impl SessionView {
    fn new() -> Self {
        Self {
            status: StatusBlock::new(),
            shown: None,
            settled: false,
        }
    }

    fn is_settled(&self) -> bool {
        self.settled
    }

    fn detach(&mut self) {
        self.status.detach();
    }

    fn render(&mut self, frame: SessionSnapshot) {
        self.settled = frame.is_settled();

        if frame.result != self.shown {
            if let Some(result) = &frame.result {
                self.status.detach();
                println!("{}", render_result(result));
            }
            self.shown = frame.result.clone();
        }

        if let Some(error) = &frame.error {
            self.status.error(error, "");
        } else if frame.loading || frame.phase == Phase::ResolvingFromPosition {
            self.status.pending("resolving address");
        } else if frame.phase == Phase::RequestingPosition {
            self.status.pending("requesting position");
        } else if frame.suggestions_visible() {
            self.status.info(&format!(
                "suggestions for `{}`:\n{}",
                frame.text.trim(),
                render_suggestions(&frame.suggestions)
            ));
        } else if frame.text.is_empty() {
            self.status.info(frame.phase.label());
        } else {
            self.status
                .info(&format!("{}: {}", frame.phase.label(), frame.text));
        }
    }

    fn map(&mut self, event: &MapEvent) {
        match event {
            MapEvent::Attached(_) => {}
            MapEvent::Failed(e) => self.status.error("map not rendered", e),
        }
        self.status.detach();
    }
}

// ============================================================================
// Tests
// ============================================================================
