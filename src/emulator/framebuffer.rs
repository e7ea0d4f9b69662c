use std::fmt;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// The 64x32 monochrome display.
///
/// Pixels are only ever toggled, never assigned, since collision
/// detection depends on knowing when a lit pixel is switched off.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [[bool; SCREEN_WIDTH]; SCREEN_HEIGHT],
}

impl Framebuffer {
    pub fn new() -> Framebuffer {
        Framebuffer {
            pixels: [[false; SCREEN_WIDTH]; SCREEN_HEIGHT],
        }
    }

    /// Whether the pixel is lit. Coordinates wrap around the screen.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y % SCREEN_HEIGHT][x % SCREEN_WIDTH]
    }

    /// XOR the pixel at (x, y), wrapping around the edges.
    /// Returns true if this switched a lit pixel off.
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let pixel = &mut self.pixels[y % SCREEN_HEIGHT][x % SCREEN_WIDTH];
        let was_lit = *pixel;
        *pixel = !was_lit;
        was_lit
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; SCREEN_WIDTH]; SCREEN_HEIGHT];
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool; SCREEN_WIDTH]> {
        self.pixels.iter()
    }

    pub fn lit_count(&self) -> usize {
        self.rows().map(|row| row.iter().filter(|p| **p).count()).sum()
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for lit in row.iter() {
                write!(f, "{}", if *lit { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// Printing 2048 booleans is useless, the picture is what matters.
impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Framebuffer")?;
        fmt::Display::fmt(self, f)
    }
}
