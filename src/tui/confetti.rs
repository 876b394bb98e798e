//! Confetti burst shown while a winner is being celebrated.
//!
//! Consumes only the `active` flag and the screen size. One burst per
//! activation; pieces that fall off the bottom are not recycled.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};
use std::time::Duration;

const PIECES: usize = 300;
/// Cells per second squared.
const GRAVITY: f64 = 18.0;
const WIND: f64 = 0.8;
/// Cells per second.
const MAX_VX: f64 = 10.0;
const MIN_VY: f64 = 12.0;
const MAX_VY: f64 = 28.0;
/// Spawn band, as fractions of the screen height from the top.
const SOURCE_TOP: f64 = 0.7;
const SOURCE_HEIGHT: f64 = 0.3;

const GLYPHS: [&str; 6] = ["*", "•", "▪", "◆", "✦", "~"];
const PALETTE: [Color; 7] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
    Color::LightYellow,
];

#[derive(Debug, Clone)]
struct Piece {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    glyph: &'static str,
    color: Color,
}

pub struct ConfettiField {
    active: bool,
    launched: bool,
    pieces: Vec<Piece>,
    rng: StdRng,
}

impl Default for ConfettiField {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfettiField {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            active: false,
            launched: false,
            pieces: Vec::new(),
            rng,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    #[cfg(test)]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Turning the effect off removes every piece immediately.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.launched = false;
        self.pieces.clear();
    }

    /// Advance the simulation by `dt` on a `width` x `height` screen.
    pub fn update(&mut self, dt: Duration, width: u16, height: u16) {
        if !self.active || width == 0 || height == 0 {
            return;
        }
        if !self.launched {
            self.launch(width, height);
        }

        let dt = dt.as_secs_f64();
        let (w, h) = (width as f64, height as f64);
        for p in &mut self.pieces {
            p.vy += GRAVITY * dt;
            p.vx += WIND * dt;
            p.x += p.vx * dt;
            p.y += p.vy * dt;
        }
        self.pieces
            .retain(|p| p.y < h && p.x > -MAX_VX && p.x < w + MAX_VX);
    }

    fn launch(&mut self, width: u16, height: u16) {
        let (w, h) = (width as f64, height as f64);
        self.pieces = (0..PIECES)
            .map(|_| Piece {
                x: self.rng.gen_range(0.0..w),
                y: h * SOURCE_TOP + self.rng.gen_range(0.0..(h * SOURCE_HEIGHT).max(1.0)),
                vx: self.rng.gen_range(-MAX_VX..MAX_VX),
                vy: -self.rng.gen_range(MIN_VY..MAX_VY),
                glyph: GLYPHS[self.rng.gen_range(0..GLYPHS.len())],
                color: PALETTE[self.rng.gen_range(0..PALETTE.len())],
            })
            .collect();
        self.launched = true;
    }

    /// Pieces currently on screen, as cell offsets within a `width` x `height` area.
    fn visible(&self, width: u16, height: u16) -> impl Iterator<Item = (u16, u16, &Piece)> {
        self.pieces.iter().filter_map(move |p| {
            if p.x < 0.0 || p.y < 0.0 {
                return None;
            }
            let (x, y) = (p.x as u16, p.y as u16);
            (x < width && y < height).then_some((x, y, p))
        })
    }
}

impl Widget for &ConfettiField {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.active {
            return;
        }
        for (x, y, p) in self.visible(area.width, area.height) {
            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_symbol(p.glyph).set_fg(p.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> ConfettiField {
        ConfettiField::with_rng(StdRng::seed_from_u64(3))
    }

    #[test]
    fn inactive_field_stays_empty() {
        let mut f = field();
        f.update(Duration::from_millis(50), 80, 24);
        assert_eq!(f.piece_count(), 0);
    }

    #[test]
    fn activation_launches_one_burst() {
        let mut f = field();
        f.set_active(true);
        f.update(Duration::from_millis(1), 80, 24);
        assert!(f.piece_count() > 0);
        assert!(f.piece_count() <= PIECES);
    }

    #[test]
    fn pieces_eventually_fall_off_without_recycling() {
        let mut f = field();
        f.set_active(true);
        for _ in 0..400 {
            f.update(Duration::from_millis(50), 80, 24);
        }
        assert_eq!(f.piece_count(), 0);
        assert!(f.is_active());
    }

    #[test]
    fn deactivation_clears_pieces() {
        let mut f = field();
        f.set_active(true);
        f.update(Duration::from_millis(16), 80, 24);
        f.set_active(false);
        assert_eq!(f.piece_count(), 0);
    }

    #[test]
    fn render_stays_inside_area() {
        let mut f = field();
        f.set_active(true);
        f.update(Duration::from_millis(200), 40, 12);
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        (&f).render(area, &mut buf);
        let painted = buf
            .content
            .iter()
            .filter(|c| c.symbol() != " ")
            .count();
        assert!(painted > 0);
        assert!(f.visible(40, 12).all(|(x, y, _)| x < 40 && y < 12));
    }
}
