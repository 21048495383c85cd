//! ASCII surface for terminals and logs

use std::collections::HashMap;
use std::fmt::Write as _;

use glam::Vec2;

use super::{Hud, Surface};
use crate::consts::CANVAS_SIZE;
use crate::sim::{Body, EntityId, EntityKind};

#[derive(Debug, Clone, Copy)]
struct Sprite {
    kind: EntityKind,
    pos: Vec2,
    radius: f32,
}

fn glyph(kind: EntityKind) -> char {
    match kind {
        EntityKind::Ship => 'A',
        EntityKind::PlayerProjectile => '|',
        EntityKind::EnemyProjectile => '!',
        EntityKind::Enemy => 'W',
        EntityKind::Wall => '#',
        EntityKind::BreachHole => ' ',
    }
}

/// Later layers overwrite earlier ones
fn layer(kind: EntityKind) -> u8 {
    match kind {
        EntityKind::Wall => 0,
        EntityKind::BreachHole => 1,
        EntityKind::Enemy => 2,
        EntityKind::EnemyProjectile | EntityKind::PlayerProjectile => 3,
        EntityKind::Ship => 4,
    }
}

/// Keeps one sprite per entity id and rasterises them on demand
#[derive(Debug, Default)]
pub struct TextSurface {
    sprites: HashMap<EntityId, Sprite>,
    hud: Option<Hud>,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn hud_line(&self) -> String {
        let Some(hud) = &self.hud else {
            return String::new();
        };
        let mut line = format!(
            "Score: {}  Level: {}  Lives: {}",
            hud.score, hud.level, hud.lives
        );
        if !hud.upgrades.is_empty() {
            let _ = write!(line, "  [{}]", hud.upgrades.join(" "));
        }
        if let Some(banner) = hud.banner {
            let _ = write!(line, "  {}", banner.message());
        }
        line
    }

    /// Draw the playfield into a `cols` x `rows` character grid. An empty
    /// grid yields only the HUD line.
    pub fn render(&self, cols: usize, rows: usize) -> String {
        if cols == 0 || rows == 0 {
            return self.hud_line();
        }

        let mut grid = vec![vec![' '; cols]; rows];
        let scale = Vec2::new(cols as f32, rows as f32) / CANVAS_SIZE;

        let mut sprites: Vec<&Sprite> = self.sprites.values().collect();
        sprites.sort_by_key(|s| layer(s.kind));

        for sprite in sprites {
            // Walls and holes are large enough to cover several cells
            let reach = (sprite.radius * scale).floor();
            let centre = sprite.pos * scale;
            let low = (centre - reach).max(Vec2::ZERO);
            let high = (centre + reach).max(Vec2::ZERO);
            let cols_hit = (low.x as usize)..=(high.x as usize).min(cols - 1);
            let rows_hit = (low.y as usize)..=(high.y as usize).min(rows - 1);
            for row in rows_hit {
                for col in cols_hit.clone() {
                    grid[row][col] = glyph(sprite.kind);
                }
            }
        }

        let mut out = String::with_capacity((cols + 1) * (rows + 1));
        for row in grid {
            out.extend(row);
            out.push('\n');
        }
        out.push_str(&self.hud_line());
        out
    }
}

impl Surface for TextSurface {
    fn contains(&self, id: EntityId) -> bool {
        self.sprites.contains_key(&id)
    }

    fn create(&mut self, body: &Body) {
        self.sprites.insert(
            body.id,
            Sprite {
                kind: body.kind(),
                pos: body.pos,
                radius: body.radius,
            },
        );
    }

    fn move_to(&mut self, id: EntityId, pos: Vec2) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.pos = pos;
        }
    }

    fn remove(&mut self, id: EntityId) -> bool {
        self.sprites.remove(&id).is_some()
    }

    fn set_hud(&mut self, hud: &Hud) {
        self.hud = Some(hud.clone());
    }
}
