//! Crossterm terminal output backend.
//!
//! The `Driver` wraps a buffered stdout writer and provides methods for
//! entering/leaving the alternate screen and drawing painted lines.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::{self, Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use super::paint::{Line, Span};
use crate::theme::Palette;
use crate::view::Color;

/// Terminal output backend using crossterm.
///
/// Does NOT enter the alternate screen on creation; call
/// [`enter_alt_screen`](Driver::enter_alt_screen) explicitly.
pub struct Driver {
    writer: BufWriter<Stdout>,
}

impl Driver {
    pub fn new() -> Self {
        Self {
            writer: BufWriter::new(io::stdout()),
        }
    }

    /// Enter alternate screen, enable raw mode, hide the cursor.
    pub fn enter_alt_screen(&mut self) -> io::Result<()> {
        execute!(self.writer, EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()?;
        Ok(())
    }

    /// Leave alternate screen and restore the terminal.
    pub fn leave_alt_screen(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.writer, cursor::Show, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Terminal size (columns, rows).
    pub fn terminal_size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Redraw the screen: a title bar, then `lines` on the theme background.
    pub fn draw(&mut self, title: &str, lines: &[Line], palette: &Palette) -> io::Result<()> {
        let bg = to_crossterm(palette.background);
        queue!(self.writer, SetBackgroundColor(bg), Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        queue!(
            self.writer,
            SetForegroundColor(to_crossterm(palette.accent)),
            SetAttribute(Attribute::Bold),
            Print(title),
            SetAttribute(Attribute::Reset),
        )?;
        for (row, line) in lines.iter().enumerate() {
            let y = u16::try_from(row + 2).unwrap_or(u16::MAX);
            queue!(self.writer, cursor::MoveTo(0, y), SetBackgroundColor(bg))?;
            for span in &line.spans {
                self.queue_span(span, bg)?;
            }
        }
        queue!(self.writer, ResetColor)?;
        self.writer.flush()
    }

    fn queue_span(&mut self, span: &Span, bg: style::Color) -> io::Result<()> {
        let span_bg = span.bg.map_or(bg, to_crossterm);
        queue!(self.writer, SetForegroundColor(to_crossterm(span.fg)), SetBackgroundColor(span_bg))?;
        if span.bold {
            queue!(self.writer, SetAttribute(Attribute::Bold))?;
        }
        if span.reverse {
            queue!(self.writer, SetAttribute(Attribute::Reverse))?;
        }
        queue!(self.writer, Print(&span.text), SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

/// Packed ARGB to a crossterm true color. Fully transparent maps to `Reset`.
pub fn to_crossterm(color: Color) -> style::Color {
    if color.alpha() == 0 {
        return style::Color::Reset;
    }
    style::Color::Rgb {
        r: color.red(),
        g: color.green(),
        b: color.blue(),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
