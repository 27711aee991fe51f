use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Once;

pub type TerminalType = Terminal<CrosstermBackend<Stdout>>;

static PANIC_HOOK: Once = Once::new();

/// Owns the terminal for the lifetime of the chat view: raw mode, alternate
/// screen, and bracketed paste are entered on construction and undone when
/// the session drops, so `App::run` cannot leave the shell broken on any
/// exit path. Panics inside the draw loop restore the display first.
pub struct TerminalSession {
    terminal: TerminalType,
}

impl TerminalSession {
    pub fn begin() -> Result<Self> {
        PANIC_HOOK.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |panic_info| {
                restore_display();
                original_hook(panic_info);
            }));
        });

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;

        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut TerminalType {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_display();
    }
}

/// Best-effort: every step tolerates already being undone, so the panic
/// hook and `Drop` may both run.
fn restore_display() {
    let _ = disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableBracketedPaste,
        Show
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_display_tolerates_repeated_calls() {
        // The panic hook and Drop can both fire; without an active session
        // both calls are no-ops and neither may panic.
        restore_display();
        restore_display();
    }
}
