// # Terminal Console
//
// crossterm implementation of the agent's console collaborators:
// - `Display`: clear + print lines
// - `KeySource`: non-blocking key polling
// - `TextInput`: inline line editor with an initial value
// - `HostControl`: stops once Ctrl-C / SIGTERM is received
//
// ## Modes
//
// On a terminal the console switches to raw mode for its whole lifetime so
// single key presses can be polled without Enter. Without a terminal (piped
// stdin/stdout, `TERM=dumb`) keys are never reported and prompts fall back to
// plain line input.
//
// Raw mode is left when the console is dropped.

pub mod keymap;
pub mod line;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, queue, terminal};
use ddns_core::traits::{Display, HostControl, KeySet, KeySource, TextInput};
use ddns_core::Result;
use std::env;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

pub use keymap::{Input, KEY_HINT, translate};
pub use line::LineBuffer;

/// crossterm-backed console
pub struct TerminalConsole {
    stdout: io::Stdout,
    interactive: bool,
    stop: Arc<AtomicBool>,
}

impl TerminalConsole {
    /// Open the console
    ///
    /// Installs the Ctrl-C / SIGTERM handler and enters raw mode when stdout
    /// is a capable terminal.
    pub fn new() -> Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            warn!("Failed to install signal handler: {}", e);
        }

        let interactive = supports_interactive_input();
        if interactive {
            terminal::enable_raw_mode()?;
        }
        debug!("Console opened (interactive: {})", interactive);

        Ok(Self {
            stdout: io::stdout(),
            interactive,
            stop,
        })
    }

    /// Whether single key presses are available
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Key hint matching this console's bindings
    pub fn key_hint(&self) -> &'static str {
        KEY_HINT
    }

    fn interrupt(&self) {
        debug!("Interrupt received from terminal");
        self.stop.store(true, Ordering::SeqCst);
    }

    fn prompt_interactive(&mut self, hint: &str, initial: &str) -> io::Result<Option<String>> {
        let mut line = LineBuffer::new(initial);
        execute!(self.stdout, cursor::Show)?;

        let result = loop {
            self.draw_prompt(hint, &line)?;

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Enter => break Some(line.into_text()),
                KeyCode::Esc => break None,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.interrupt();
                    break None;
                }
                KeyCode::Backspace => line.backspace(),
                KeyCode::Delete => line.delete(),
                KeyCode::Left => line.left(),
                KeyCode::Right => line.right(),
                KeyCode::Home => line.home(),
                KeyCode::End => line.end(),
                KeyCode::Char(ch)
                    if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    line.insert(ch)
                }
                _ => {}
            }
        };

        execute!(self.stdout, cursor::Hide)?;
        write!(self.stdout, "\r\n")?;
        self.stdout.flush()?;
        Ok(result)
    }

    fn draw_prompt(&mut self, hint: &str, line: &LineBuffer) -> io::Result<()> {
        let label = format!("{}: ", hint);
        let column = label.chars().count() + line.cursor();
        queue!(
            self.stdout,
            cursor::MoveToColumn(0),
            terminal::Clear(terminal::ClearType::CurrentLine)
        )?;
        write!(self.stdout, "{}{}", label, line.text())?;
        queue!(
            self.stdout,
            cursor::MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX))
        )?;
        self.stdout.flush()
    }

    fn prompt_fallback(&mut self, hint: &str, initial: &str) -> io::Result<Option<String>> {
        write!(self.stdout, "{} [{}]: ", hint, initial)?;
        self.stdout.flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let typed = line.trim_end_matches(['\r', '\n']);
        if typed.is_empty() {
            Ok(Some(initial.to_string()))
        } else {
            Ok(Some(typed.to_string()))
        }
    }
}

fn supports_interactive_input() -> bool {
    if !io::stdout().is_terminal() || !io::stdin().is_terminal() {
        return false;
    }

    if let Ok(term) = env::var("TERM")
        && term.eq_ignore_ascii_case("dumb")
    {
        return false;
    }

    true
}

impl Display for TerminalConsole {
    fn clear(&mut self) -> Result<()> {
        if self.interactive {
            execute!(
                self.stdout,
                terminal::Clear(terminal::ClearType::All),
                cursor::MoveTo(0, 0),
                cursor::Hide
            )?;
        }
        Ok(())
    }

    fn print_line(&mut self, line: &str) -> Result<()> {
        // Raw mode does not translate "\n" into a carriage return
        let eol = if self.interactive { "\r\n" } else { "\n" };
        write!(self.stdout, "{}{}", line, eol)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl KeySource for TerminalConsole {
    fn poll_keys(&mut self) -> KeySet {
        let mut keys = KeySet::empty();
        if !self.interactive {
            return keys;
        }

        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    warn!("Failed to poll terminal events: {}", e);
                    break;
                }
            }

            match event::read() {
                Ok(Event::Key(key)) => match translate(&key) {
                    Some(Input::Key(k)) => keys.insert(k),
                    Some(Input::Interrupt) => self.interrupt(),
                    None => {}
                },
                Ok(_) => {}
                Err(e) => {
                    warn!("Failed to read terminal event: {}", e);
                    break;
                }
            }
        }
        keys
    }
}

impl TextInput for TerminalConsole {
    fn prompt(&mut self, hint: &str, initial: &str) -> Option<String> {
        let result = if self.interactive {
            self.prompt_interactive(hint, initial)
        } else {
            self.prompt_fallback(hint, initial)
        };

        result.unwrap_or_else(|e| {
            warn!("Prompt failed: {}", e);
            None
        })
    }
}

impl HostControl for TerminalConsole {
    fn should_continue(&self) -> bool {
        !self.stop.load(Ordering::SeqCst)
    }
}

impl Drop for TerminalConsole {
    fn drop(&mut self) {
        if self.interactive {
            let _ = execute!(self.stdout, cursor::Show);
            let _ = terminal::disable_raw_mode();
        }
        let _ = self.stdout.flush();
    }
}
