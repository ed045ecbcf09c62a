use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use slosh_core::{Flow, Frame, FrameSink};

/// Current terminal size as `(cols, rows)`, if it can be queried.
pub fn terminal_size() -> Option<(u16, u16)> {
    terminal::size().ok().filter(|&(c, r)| c > 0 && r > 0)
}

/// Cursor and buffer handling for full-screen frames, independent of the tty.
struct Screen<W: Write> {
    out: W,
    syncing: bool,
}

impl<W: Write> Screen<W> {
    fn new(out: W) -> Self {
        Self { out, syncing: false }
    }

    fn enter(&mut self) -> io::Result<()> {
        execute!(
            self.out,
            EnterAlternateScreen,
            DisableLineWrap,
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )
    }

    /// Replaces the screen contents with `text`, one row per line.
    fn draw(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;
        self.syncing = true;
        queue!(self.out, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
        // Raw mode: position every row explicitly instead of relying on '\n'.
        for (y, line) in text.lines().enumerate() {
            let y = u16::try_from(y).unwrap_or(u16::MAX);
            queue!(self.out, cursor::MoveTo(0, y), Print(line))?;
        }
        queue!(self.out, EndSynchronizedUpdate)?;
        self.syncing = false;
        self.out.flush()
    }

    /// Undoes `enter`, closing a synchronized update left open by a failed draw.
    fn restore(&mut self) -> io::Result<()> {
        if self.syncing {
            queue!(self.out, EndSynchronizedUpdate)?;
            self.syncing = false;
        }
        execute!(
            self.out,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )
    }
}

/// Raw mode plus the alternate screen for as long as it lives.
struct TermGuard {
    screen: Screen<Stdout>,
}

impl TermGuard {
    fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // Built before entering so a failed `enter` still restores on drop.
        let mut guard = Self {
            screen: Screen::new(io::stdout()),
        };
        guard.screen.enter()?;
        Ok(guard)
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = self.screen.restore();
        let _ = terminal::disable_raw_mode();
    }
}

/// Full-screen redraw of every frame; `q`, `Esc` or `Ctrl-C` stop the run.
pub struct TerminalSink {
    guard: TermGuard,
}

impl TerminalSink {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            guard: TermGuard::new()?,
        })
    }

    /// Shows `lines` for up to `hold`; returns `Stop` if a quit key arrives first.
    pub fn intro(&mut self, lines: &[String], hold: Duration) -> io::Result<Flow> {
        self.guard.screen.draw(&lines.join("\n"))?;
        self.pause(hold)
    }
}

impl FrameSink for TerminalSink {
    type Error = io::Error;

    fn present(&mut self, frame: &Frame<'_>) -> io::Result<Flow> {
        self.guard.screen.draw(frame.text)?;
        Ok(Flow::Continue)
    }

    fn pause(&mut self, delay: Duration) -> io::Result<Flow> {
        let deadline = Instant::now() + delay;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                return Ok(Flow::Continue);
            }
            if is_quit(&event::read()?) {
                return Ok(Flow::Stop);
            }
        }
    }
}

fn is_quit(ev: &Event) -> bool {
    match ev {
        Event::Key(k) if k.kind == KeyEventKind::Press => matches!(
            (k.code, k.modifiers),
            (KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc, _)
                | (KeyCode::Char('c'), KeyModifiers::CONTROL)
        ),
        _ => false,
    }
}
