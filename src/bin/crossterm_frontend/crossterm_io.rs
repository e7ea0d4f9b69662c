use chip_8_vm::emulator::framebuffer::{Framebuffer, SCREEN_HEIGHT, SCREEN_WIDTH};

use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{stdout, Stdout, Write};

/// Every pixel is two cells wide so the picture keeps its proportions.
const CELL_WIDTH: u16 = 2;

/// Where the emulator output lands on the terminal.
pub struct CrosstermScreen {
    out: Stdout,
    /// What is currently on the terminal, so only changes are drawn.
    cells: [[bool; SCREEN_WIDTH]; SCREEN_HEIGHT],
}

impl CrosstermScreen {
    pub fn new() -> crossterm::Result<CrosstermScreen> {
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        terminal::enable_raw_mode()?;

        let mut screen = CrosstermScreen {
            out,
            cells: [[false; SCREEN_WIDTH]; SCREEN_HEIGHT],
        };
        screen.draw_border()?;
        Ok(screen)
    }

    fn draw_border(&mut self) -> crossterm::Result<()> {
        let right = SCREEN_WIDTH as u16 * CELL_WIDTH + 1;
        let bottom = SCREEN_HEIGHT as u16 + 1;
        let horizontal = "━".repeat(right as usize - 1);

        queue!(self.out, cursor::MoveTo(0, 0), Print(format!("┏{}┓", horizontal)))?;
        for y in 1..bottom {
            queue!(
                self.out,
                cursor::MoveTo(0, y),
                Print('┃'),
                cursor::MoveTo(right, y),
                Print('┃')
            )?;
        }
        queue!(self.out, cursor::MoveTo(0, bottom), Print(format!("┗{}┛", horizontal)))?;
        self.out.flush()?;
        Ok(())
    }

    /// Draw the pixels that changed since the last call.
    pub fn draw(&mut self, frame: &Framebuffer) -> crossterm::Result<()> {
        for (y, row) in frame.rows().enumerate() {
            for (x, lit) in row.iter().enumerate() {
                if self.cells[y][x] != *lit {
                    self.cells[y][x] = *lit;
                    queue!(
                        self.out,
                        cursor::MoveTo(x as u16 * CELL_WIDTH + 1, y as u16 + 1),
                        Print(if *lit { "██" } else { "  " })
                    )?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// The line under the screen: sound indicator and pause state.
    pub fn draw_status(&mut self, sound: bool, paused: bool) -> crossterm::Result<()> {
        let status = format!(
            "{}  {}  [Esc] quit  [Space] pause  [n] step",
            if sound { "♪" } else { " " },
            if paused { "PAUSED " } else { "RUNNING" },
        );
        queue!(
            self.out,
            cursor::MoveTo(0, SCREEN_HEIGHT as u16 + 2),
            Clear(ClearType::CurrentLine),
            Print(status)
        )?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for CrosstermScreen {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("Could not leave raw mode: {}", e);
        }
        if let Err(e) = execute!(self.out, LeaveAlternateScreen, cursor::Show) {
            log::error!("Could not restore the terminal: {}", e);
        }
    }
}
