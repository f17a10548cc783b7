use std::io::{self, Write, stdout};

use crossterm::{
    cursor::{Hide, Show},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode, supports_keyboard_enhancement,
    },
};
use log::{debug, info, warn};

/// Raw-mode terminal owned for the lifetime of the board.
///
/// Restores the terminal on [`TerminalSession::restore`] or drop, whichever
/// comes first.
#[derive(Debug)]
pub struct TerminalSession {
    active: bool,
    key_release_reports: bool,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        let mut out = stdout();
        enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

        let key_release_reports = matches!(supports_keyboard_enhancement(), Ok(true));
        if key_release_reports {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        } else {
            warn!("terminal: no key release reports, holds will read as taps");
        }
        out.flush()?;
        info!("terminal: raw mode key_release_reports={}", key_release_reports);

        Ok(Self {
            active: true,
            key_release_reports,
        })
    }

    pub const fn reports_key_release(&self) -> bool {
        self.key_release_reports
    }

    pub fn restore(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        let mut out = stdout();
        if self.key_release_reports {
            let _ = execute!(out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(out, Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
        debug!("terminal: restored");
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.restore();
    }
}
