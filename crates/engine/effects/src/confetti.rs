//! Confetti canvas simulation

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const COLORS: [&str; 5] = ["#6366f1", "#ec4899", "#8b5cf6", "#f59e0b", "#10b981"];

/// Drawing target for confetti
pub trait ConfettiCanvas {
    fn clear(&mut self, width: f32, height: f32);

    /// Fill a square of `size` centred at `position`, rotated by `rotation` degrees
    fn fill_piece(&mut self, position: Vec2, rotation: f32, size: f32, color: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub color: &'static str,
    /// Degrees
    pub rotation: f32,
    /// Degrees per frame
    pub spin: f32,
}

/// Falling confetti pieces over a viewport-sized canvas
#[derive(Debug)]
pub struct ConfettiField {
    pieces: Vec<ConfettiPiece>,
    size: Vec2,
    rng: StdRng,
}

impl ConfettiField {
    pub fn new(width: f32, height: f32, rng: StdRng) -> Self {
        Self {
            pieces: Vec::new(),
            size: Vec2::new(width, height),
            rng,
        }
    }

    pub fn seeded(width: f32, height: f32, seed: u64) -> Self {
        Self::new(width, height, StdRng::seed_from_u64(seed))
    }

    /// Match the canvas to a new viewport size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width.max(0.0), height.max(0.0));
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Add `count` pieces, starting up to one canvas height above the top
    pub fn burst(&mut self, count: u32) {
        let Vec2 { x: width, y: height } = self.size;
        for _ in 0..count {
            let piece = ConfettiPiece {
                position: Vec2::new(
                    self.rng.random::<f32>() * width,
                    self.rng.random::<f32>() * height - height,
                ),
                velocity: Vec2::new(
                    self.rng.random_range(-1.0..1.0),
                    self.rng.random_range(2.0..5.0),
                ),
                size: self.rng.random_range(4.0..12.0),
                color: COLORS[self.rng.random_range(0..COLORS.len())],
                rotation: self.rng.random_range(0.0..360.0),
                spin: self.rng.random_range(-5.0..5.0),
            };
            self.pieces.push(piece);
        }
        tracing::debug!(count, total = self.pieces.len(), "Confetti burst");
    }

    /// Advance one frame; pieces falling past the bottom wrap to the top
    pub fn step(&mut self) {
        let Vec2 { x: width, y: height } = self.size;
        for piece in &mut self.pieces {
            piece.position += piece.velocity;
            piece.rotation += piece.spin;
            if piece.position.y > height {
                piece.position.y = -10.0;
                piece.position.x = self.rng.random::<f32>() * width;
            }
        }
    }

    pub fn draw<C: ConfettiCanvas + ?Sized>(&self, canvas: &mut C) {
        canvas.clear(self.size.x, self.size.y);
        for piece in &self.pieces {
            canvas.fill_piece(piece.position, piece.rotation, piece.size, piece.color);
        }
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.pieces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }
}
