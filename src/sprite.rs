//! Sprite sheets and frame animation
//!
//! A sprite pairs an optional image with a grid layout and a frame cursor.
//! Missing images degrade to a flat-color rectangle, so a failed asset load
//! never blocks rendering. Mirroring happens at draw time by flipping the
//! surface transform around the sprite's right edge.

use crate::render::Surface;
use crate::sim::Rect;

/// Hold-counter frame animation.
///
/// Each `advance` bumps an elapsed counter; every `hold` advances the frame
/// index circularly. A single-frame cursor never moves.
#[derive(Clone, Copy, Debug)]
pub struct FrameCursor {
    count: u32,
    hold: u32,
    current: u32,
    elapsed: u32,
}

impl FrameCursor {
    pub fn new(count: u32, hold: u32) -> Self {
        Self {
            count,
            // A zero hold would stall the modulo below
            hold: hold.max(1),
            current: 0,
            elapsed: 0,
        }
    }

    pub fn frame(&self) -> u32 {
        self.current
    }

    pub fn advance(&mut self) {
        if self.count <= 1 {
            return;
        }
        self.elapsed += 1;
        if self.elapsed % self.hold == 0 {
            self.current = (self.current + 1) % self.count;
        }
    }

    /// Snap back to the first frame without touching the elapsed counter.
    pub fn rewind(&mut self) {
        self.current = 0;
    }
}

/// Grid layout of a sprite sheet. Frame dimensions come from the image at
/// draw time, so art can be resized without touching code.
#[derive(Clone, Copy, Debug)]
pub struct SheetGrid {
    pub columns: u32,
    pub rows: u32,
}

impl SheetGrid {
    pub fn single_row(columns: u32) -> Self {
        Self {
            columns: columns.max(1),
            rows: 1,
        }
    }

    /// Source rectangle for a frame index within a given row.
    pub fn source_rect(&self, image_size: (f32, f32), frame: u32, row: u32) -> Rect {
        let frame_w = image_size.0 / self.columns as f32;
        let frame_h = image_size.1 / self.rows as f32;
        let col = frame % self.columns;
        Rect::new(col as f32 * frame_w, row as f32 * frame_h, frame_w, frame_h)
    }
}

/// An animated image bound to one on-screen entity.
pub struct Sprite<I> {
    image: Option<I>,
    grid: SheetGrid,
    cursor: FrameCursor,
    row: u32,
    fallback: &'static str,
}

impl<I> Sprite<I> {
    pub fn new(
        image: Option<I>,
        grid: SheetGrid,
        cursor: FrameCursor,
        fallback: &'static str,
    ) -> Self {
        Self {
            image,
            grid,
            cursor,
            row: 0,
            fallback,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn frame(&self) -> u32 {
        self.cursor.frame()
    }

    /// Switch to another animation row, restarting from its first frame.
    pub fn set_row(&mut self, row: u32) {
        if self.row != row {
            self.row = row;
            self.cursor.rewind();
        }
    }

    /// Reset the animation to its first frame.
    pub fn rewind(&mut self) {
        self.cursor.rewind();
    }

    /// Draw into `dest`, mirrored when `flip` is set. When `animate` is set
    /// the frame cursor advances after drawing, image or not.
    pub fn draw<S: Surface<Image = I>>(
        &mut self,
        surface: &mut S,
        dest: Rect,
        flip: bool,
        animate: bool,
    ) {
        match &self.image {
            Some(image) => {
                let src =
                    self.grid
                        .source_rect(surface.image_size(image), self.cursor.frame(), self.row);
                if flip {
                    // Invert the axis around the right edge so the sprite
                    // stays inside its own destination rectangle
                    surface.save();
                    surface.translate(dest.right(), dest.top());
                    surface.scale(-1.0, 1.0);
                    surface.draw_image_region(
                        image,
                        src,
                        Rect::new(0.0, 0.0, dest.size.x, dest.size.y),
                    );
                    surface.restore();
                } else {
                    surface.draw_image_region(image, src, dest);
                }
            }
            None => surface.fill_rect(dest, self.fallback),
        }
        if animate {
            self.cursor.advance();
        }
    }
}
