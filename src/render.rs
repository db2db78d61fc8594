//! Frame rendering
//!
//! One call per rendered frame walks the session in a fixed order: clear,
//! sky, then the camera-translated world (platforms, coins, enemies,
//! player). The `Surface` trait is the seam to the canvas; a recording
//! implementation makes whole frames assertable in native tests.

use crate::consts::{
    COIN_FRAME_HOLD, COIN_FRAMES, ENEMY_FRAME_HOLD, ENEMY_FRAMES, PLAYER_FRAME_HOLD,
    PLAYER_FRAMES, RUN_ANIM_THRESHOLD, VIEWPORT_H, VIEWPORT_W,
};
use crate::sim::{Facing, Rect, Session};
use crate::sprite::{FrameCursor, SheetGrid, Sprite};

/// Fallback palette, used whenever an image is absent.
pub mod colors {
    pub const SKY: &str = "#87CEEB";
    pub const PLATFORM: &str = "#8B4513";
    pub const GOAL: &str = "#00FF00";
    pub const COIN: &str = "#FFD700";
    pub const ENEMY: &str = "#0000FF";
    pub const PLAYER: &str = "#FF0000";
}

/// Destination for draw calls.
///
/// Mirrors the 2d canvas surface: rect fills, sub-region image blits, and a
/// save/translate/scale/restore transform stack.
pub trait Surface {
    type Image;

    /// Wipe the whole viewport.
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    /// Copy `src` (in image pixels) onto `dest` (in world coordinates).
    fn draw_image_region(&mut self, image: &Self::Image, src: Rect, dest: Rect);
    fn image_size(&self, image: &Self::Image) -> (f32, f32);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn scale(&mut self, x: f32, y: f32);
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    FillRect { rect: Rect, color: String },
    DrawImageRegion { image: String, src: Rect, dest: Rect },
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Scale { x: f32, y: f32 },
}

/// Surface that records every call instead of drawing.
///
/// Images are plain strings and report a fixed 128x32 size, which divides
/// evenly into the stock four-column sheet.
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    pub image_size: (f32, f32),
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            image_size: (128.0, 32.0),
        }
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for RecordingSurface {
    type Image = String;

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ops.push(DrawOp::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn draw_image_region(&mut self, image: &String, src: Rect, dest: Rect) {
        self.ops.push(DrawOp::DrawImageRegion {
            image: image.clone(),
            src,
            dest,
        });
    }

    fn image_size(&self, _image: &String) -> (f32, f32) {
        self.image_size
    }

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::Translate { x, y });
    }

    fn scale(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::Scale { x, y });
    }
}

/// Sprites and textures for one session, bound at loading time.
///
/// Each enemy gets its own sprite instance so their animations advance
/// once per frame apiece, not once per enemy.
pub struct SpriteBank<I> {
    pub player: Sprite<I>,
    pub enemies: Vec<Sprite<I>>,
    pub coin: Sprite<I>,
    pub platform: Option<I>,
}

impl<I: Clone> SpriteBank<I> {
    /// Bank for the stock art: a four-frame player run cycle, two-frame
    /// enemies, static coins.
    pub fn standard(
        player: Option<I>,
        enemy: Option<I>,
        coin: Option<I>,
        platform: Option<I>,
        enemy_count: usize,
    ) -> Self {
        let enemies = (0..enemy_count)
            .map(|_| {
                Sprite::new(
                    enemy.clone(),
                    SheetGrid::single_row(ENEMY_FRAMES),
                    FrameCursor::new(ENEMY_FRAMES, ENEMY_FRAME_HOLD),
                    colors::ENEMY,
                )
            })
            .collect();
        Self {
            player: Sprite::new(
                player,
                SheetGrid::single_row(PLAYER_FRAMES),
                FrameCursor::new(PLAYER_FRAMES, PLAYER_FRAME_HOLD),
                colors::PLAYER,
            ),
            enemies,
            coin: Sprite::new(
                coin,
                SheetGrid::single_row(COIN_FRAMES),
                FrameCursor::new(COIN_FRAMES, COIN_FRAME_HOLD),
                colors::COIN,
            ),
            platform,
        }
    }
}

/// Draw one full frame of the session.
pub fn draw_frame<S: Surface>(surface: &mut S, session: &Session, bank: &mut SpriteBank<S::Image>) {
    surface.clear();
    surface.fill_rect(
        Rect::new(0.0, 0.0, VIEWPORT_W, VIEWPORT_H),
        colors::SKY,
    );

    // Everything below scrolls with the camera
    surface.save();
    surface.translate(-session.camera.x, 0.0);

    for platform in &session.platforms {
        match &bank.platform {
            Some(texture) => {
                let (w, h) = surface.image_size(texture);
                surface.draw_image_region(texture, Rect::new(0.0, 0.0, w, h), platform.body);
            }
            None => {
                let color = if platform.is_goal {
                    colors::GOAL
                } else {
                    colors::PLATFORM
                };
                surface.fill_rect(platform.body, color);
            }
        }
    }

    for coin in &session.coins {
        if !coin.collected {
            bank.coin.draw(surface, coin.body, false, true);
        }
    }

    for (enemy, sprite) in session.enemies.iter().zip(bank.enemies.iter_mut()) {
        sprite.draw(surface, enemy.body, enemy.vx < 0.0, true);
    }

    // The run cycle only plays while actually moving; at rest the player
    // shows the first frame
    let moving = session.player.vel.x.abs() > RUN_ANIM_THRESHOLD;
    if !moving {
        bank.player.rewind();
    }
    bank.player.draw(
        surface,
        session.player.body,
        session.player.facing == Facing::Left,
        moving,
    );

    surface.restore();
}

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

#[cfg(target_arch = "wasm32")]
mod canvas {
    use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

    use super::Surface;
    use crate::sim::Rect;

    /// Surface backed by a 2d canvas context.
    pub struct CanvasSurface {
        ctx: CanvasRenderingContext2d,
        width: f64,
        height: f64,
    }

    impl CanvasSurface {
        pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
            Self { ctx, width, height }
        }
    }

    impl Surface for CanvasSurface {
        type Image = HtmlImageElement;

        fn clear(&mut self) {
            self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        }

        fn fill_rect(&mut self, rect: Rect, color: &str) {
            self.ctx.set_fill_style_str(color);
            self.ctx.fill_rect(
                f64::from(rect.pos.x),
                f64::from(rect.pos.y),
                f64::from(rect.size.x),
                f64::from(rect.size.y),
            );
        }

        fn draw_image_region(&mut self, image: &HtmlImageElement, src: Rect, dest: Rect) {
            let _ = self
                .ctx
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    image,
                    f64::from(src.pos.x),
                    f64::from(src.pos.y),
                    f64::from(src.size.x),
                    f64::from(src.size.y),
                    f64::from(dest.pos.x),
                    f64::from(dest.pos.y),
                    f64::from(dest.size.x),
                    f64::from(dest.size.y),
                );
        }

        fn image_size(&self, image: &HtmlImageElement) -> (f32, f32) {
            (image.natural_width() as f32, image.natural_height() as f32)
        }

        fn save(&mut self) {
            self.ctx.save();
        }

        fn restore(&mut self) {
            self.ctx.restore();
        }

        fn translate(&mut self, x: f32, y: f32) {
            let _ = self.ctx.translate(f64::from(x), f64::from(y));
        }

        fn scale(&mut self, x: f32, y: f32) {
            let _ = self.ctx.scale(f64::from(x), f64::from(y));
        }
    }
}
