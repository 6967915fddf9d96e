//! Static table geometry: cushions, pockets and the marked areas.
//! World units are canvas pixels, y down.

use std::f32::consts::{FRAC_PI_2, PI};

use baize_engine::{
    trapezoid_vertices, BodyDesc, ColliderDesc, ColliderMaterial, EngineContext, Entity, EntityId,
    Frame, Rgba,
};
use glam::Vec2;
use rand::Rng;

// Table dimensions (12ft x 6ft scaled to an 800px long bed)
pub const TABLE_ORIGIN: Vec2 = Vec2::new(150.0, 60.0);
pub const TABLE_LENGTH: f32 = 800.0;
pub const TABLE_WIDTH: f32 = TABLE_LENGTH / 2.0;
pub const RAILING_WIDTH: f32 = 15.0;
pub const CUSHION_WIDTH: f32 = TABLE_WIDTH / 72.0 * 1.5;
pub const BALL_DIAMETER: f32 = TABLE_WIDTH / 36.0;
pub const BALL_RADIUS: f32 = BALL_DIAMETER / 2.0;

/// Centre line along the long axis.
pub const CENTRE_Y: f32 = TABLE_ORIGIN.y + TABLE_WIDTH / 2.0;

pub const POCKET_RADIUS: f32 = BALL_DIAMETER * 1.5;
pub const POCKETS: [Vec2; 6] = [
    Vec2::new(172.0, 82.0),
    Vec2::new(550.0, 75.0),
    Vec2::new(928.0, 82.0),
    Vec2::new(172.0, 438.0),
    Vec2::new(550.0, 445.0),
    Vec2::new(928.0, 438.0),
];

/// Baulk line x; the D opens towards the left of it.
pub const BAULK_X: f32 = TABLE_ORIGIN.x + TABLE_LENGTH / 5.0;
pub const D_CENTRE: Vec2 = Vec2::new(BAULK_X, CENTRE_Y);
pub const D_RADIUS: f32 = 75.0;

/// Collision categories. Each is a distinct bit so masks OR together.
pub mod category {
    pub const CUE: u32 = 0x0001;
    pub const BALL: u32 = 0x0002;
    pub const WHITE_BALL: u32 = 0x0004;
    pub const CUSHION: u32 = 0x0008;
}

/// What each category is allowed to touch.
pub mod mask {
    use super::category::*;

    pub const CUE_MASK: u32 = WHITE_BALL;
    pub const BALL_MASK: u32 = CUSHION | WHITE_BALL | BALL;
    pub const WHITE_BALL_MASK: u32 = CUE | BALL | CUSHION;
    pub const CUSHION_MASK: u32 = WHITE_BALL | BALL;
}

/// Axis-aligned rectangle, inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Uniform random point inside the rectangle.
    pub fn sample(&self, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            rng.gen_range(self.min.x..self.max.x),
            rng.gen_range(self.min.y..self.max.y),
        )
    }
}

/// Where the cue ball may be. Leaving it is a foul.
pub const LEGAL_BOUNDS: Bounds = Bounds::new(Vec2::new(165.0, 75.0), Vec2::new(935.0, 445.0));

/// Where randomly placed balls may land, clear of rails and cushions.
pub const LAYOUT_BOUNDS: Bounds = Bounds::new(
    Vec2::new(
        TABLE_ORIGIN.x + 12.0 + RAILING_WIDTH + CUSHION_WIDTH,
        TABLE_ORIGIN.y + 12.0 + RAILING_WIDTH + CUSHION_WIDTH,
    ),
    Vec2::new(
        TABLE_ORIGIN.x + TABLE_LENGTH - 24.0 - RAILING_WIDTH - CUSHION_WIDTH,
        TABLE_ORIGIN.y + TABLE_WIDTH - 12.0 - RAILING_WIDTH - CUSHION_WIDTH,
    ),
);

/// Index of the first pocket whose capture radius holds `p`.
pub fn pocket_containing(p: Vec2) -> Option<usize> {
    POCKETS.iter().position(|pocket| pocket.distance(p) < POCKET_RADIUS)
}

/// The half-disc behind the baulk line where the cue ball is placed.
pub fn in_d(p: Vec2) -> bool {
    p.distance(D_CENTRE) < D_RADIUS && p.x < BAULK_X
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CushionDef {
    pub name: &'static str,
    pub center: Vec2,
    pub width: f32,
    pub slope: f32,
    pub angle: f32,
}

pub const CUSHIONS: [CushionDef; 6] = [
    CushionDef { name: "top left cushion", center: Vec2::new(358.0, 79.0), width: 342.5, slope: -0.05, angle: 0.0 },
    CushionDef { name: "top right cushion", center: Vec2::new(742.0, 79.0), width: 343.0, slope: -0.05, angle: 0.0 },
    CushionDef { name: "left cushion", center: Vec2::new(169.0, 259.5), width: 343.0, slope: 0.05, angle: FRAC_PI_2 },
    CushionDef { name: "bottom left cushion", center: Vec2::new(358.0, 441.0), width: 359.0, slope: 0.05, angle: 0.0 },
    CushionDef { name: "bottom right cushion", center: Vec2::new(742.0, 441.0), width: 359.0, slope: 0.05, angle: 0.0 },
    CushionDef { name: "right cushion", center: Vec2::new(931.0, 260.0), width: 341.0, slope: 0.05, angle: -FRAC_PI_2 },
];

const CUSHION_MATERIAL: ColliderMaterial = ColliderMaterial {
    restitution: 1.0,
    friction: 0.0,
    density: 1.0,
};

impl CushionDef {
    /// World-space outline, for drawing.
    pub fn outline(&self) -> [Vec2; 4] {
        let rot = Vec2::from_angle(self.angle);
        trapezoid_vertices(self.width, CUSHION_WIDTH, self.slope).map(|v| self.center + rot.rotate(v))
    }
}

/// The six cushion bodies plus their per-tick contact flags.
pub struct Table {
    cushions: [EntityId; 6],
    hit: [bool; 6],
}

impl Table {
    /// Spawn the cushion bodies.
    pub fn build(ctx: &mut EngineContext) -> Self {
        let cushions = CUSHIONS.map(|def| {
            let id = ctx.next_id();
            let desc = BodyDesc::fixed(ColliderDesc::Trapezoid {
                width: def.width,
                height: CUSHION_WIDTH,
                slope: def.slope,
            })
            .with_position(def.center)
            .with_rotation(def.angle)
            .with_collision_filter(category::CUSHION, mask::CUSHION_MASK);
            ctx.spawn_with_body(Entity::new(id), desc, CUSHION_MATERIAL)
        });
        log::debug!("table built with {} cushions", cushions.len());
        Self {
            cushions,
            hit: [false; 6],
        }
    }

    pub fn cushion_ids(&self) -> &[EntityId; 6] {
        &self.cushions
    }

    /// Which cushion an entity is, if any.
    pub fn cushion_index(&self, id: EntityId) -> Option<usize> {
        self.cushions.iter().position(|&c| c == id)
    }

    /// Flag each cushion by whether the cue ball is touching it right now.
    pub fn update_contacts(&mut self, ctx: &EngineContext, cue_ball: EntityId) {
        for (hit, &cushion) in self.hit.iter_mut().zip(self.cushions.iter()) {
            *hit = ctx.collides(cue_ball, cushion);
        }
    }

    pub fn clear_contacts(&mut self) {
        self.hit = [false; 6];
    }

    pub fn is_hit(&self, index: usize) -> bool {
        self.hit.get(index).copied().unwrap_or(false)
    }

    pub fn draw(&self, frame: &mut Frame) {
        let slab = Rgba::rgb8(83, 108, 77);
        let rail = Rgba::rgb8(99, 59, 59);
        let pocket_rim = Rgba::rgb8(241, 215, 74);
        let hole = Rgba::rgb8(125, 125, 125);
        let line = Rgba::WHITE;

        let o = TABLE_ORIGIN;
        frame.rect(Vec2::new(o.x + 12.0, o.y), Vec2::new(TABLE_LENGTH - 24.0, TABLE_WIDTH), slab);

        for (i, def) in CUSHIONS.iter().enumerate() {
            let fill = if self.hit[i] {
                Rgba::rgb8(0x69, 0xF3, 0x19)
            } else {
                Rgba::rgb8(0x34, 0x62, 0x19)
            };
            frame.polygon(&def.outline(), fill);
        }

        // Railings
        frame.rect(Vec2::new(o.x, o.y + 25.0), Vec2::new(RAILING_WIDTH, TABLE_WIDTH - 50.0), rail);
        frame.rect(Vec2::new(162.0, o.y), Vec2::new(TABLE_LENGTH - RAILING_WIDTH - 12.0, RAILING_WIDTH), rail);
        frame.rect(
            Vec2::new(o.x + TABLE_LENGTH - RAILING_WIDTH, o.y + 20.0),
            Vec2::new(RAILING_WIDTH, TABLE_WIDTH - RAILING_WIDTH - 20.0),
            rail,
        );
        frame.rect(
            Vec2::new(o.x + 25.0, o.y + TABLE_WIDTH - RAILING_WIDTH),
            Vec2::new(TABLE_LENGTH - RAILING_WIDTH * 2.0 - 10.0, RAILING_WIDTH),
            rail,
        );

        for pocket in POCKETS {
            frame.circle(pocket, POCKET_RADIUS * 0.5 + 6.0, pocket_rim);
            frame.circle(pocket, POCKET_RADIUS * 0.5, hole);
        }

        // Baulk line and the D
        frame.line(
            Vec2::new(BAULK_X, o.y + RAILING_WIDTH + CUSHION_WIDTH),
            Vec2::new(BAULK_X, o.y + TABLE_WIDTH - 22.0),
            1.0,
            line,
        );
        const ARC_SEGMENTS: usize = 24;
        let arc_point = |i: usize| {
            let theta = FRAC_PI_2 + PI * i as f32 / ARC_SEGMENTS as f32;
            D_CENTRE + D_RADIUS * Vec2::from_angle(theta)
        };
        for i in 0..ARC_SEGMENTS {
            frame.line(arc_point(i), arc_point(i + 1), 1.0, line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baize_engine::GameConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn derived_dimensions() {
        assert!((BALL_RADIUS - 5.5556).abs() < 1e-3);
        assert!((CUSHION_WIDTH - 8.3333).abs() < 1e-3);
        assert!((POCKET_RADIUS - 16.6667).abs() < 1e-3);
        assert_eq!(BAULK_X, 310.0);
        assert_eq!(CENTRE_Y, 260.0);
    }

    #[test]
    fn pocket_capture_is_strict_radius() {
        assert_eq!(pocket_containing(Vec2::new(172.0, 82.0)), Some(0));
        assert_eq!(pocket_containing(Vec2::new(550.0, 445.0 - 16.0)), Some(4));
        assert_eq!(pocket_containing(Vec2::new(550.0, 445.0 - 17.0)), None);
        assert_eq!(pocket_containing(Vec2::new(550.0, 260.0)), None);
    }

    #[test]
    fn pockets_are_far_enough_apart_for_single_capture() {
        for (i, a) in POCKETS.iter().enumerate() {
            for b in POCKETS.iter().skip(i + 1) {
                assert!(a.distance(*b) > 2.0 * POCKET_RADIUS);
            }
        }
    }

    #[test]
    fn d_zone_is_the_left_half_disc() {
        assert!(in_d(Vec2::new(280.0, 260.0)));
        assert!(in_d(Vec2::new(250.0, 300.0)));
        // Right of the baulk line
        assert!(!in_d(Vec2::new(320.0, 260.0)));
        // On the line itself
        assert!(!in_d(Vec2::new(310.0, 260.0)));
        // Too far from the centre
        assert!(!in_d(Vec2::new(230.0, 260.0)));
    }

    #[test]
    fn layout_bounds_sit_inside_legal_bounds() {
        assert!(LAYOUT_BOUNDS.min.x > LEGAL_BOUNDS.min.x);
        assert!(LAYOUT_BOUNDS.min.y > LEGAL_BOUNDS.min.y);
        assert!(LAYOUT_BOUNDS.max.x < LEGAL_BOUNDS.max.x);
        assert!(LAYOUT_BOUNDS.max.y < LEGAL_BOUNDS.max.y);

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            assert!(LAYOUT_BOUNDS.contains(LAYOUT_BOUNDS.sample(&mut rng)));
        }
    }

    #[test]
    fn legal_bounds_are_inclusive() {
        assert!(LEGAL_BOUNDS.contains(Vec2::new(165.0, 75.0)));
        assert!(LEGAL_BOUNDS.contains(Vec2::new(935.0, 445.0)));
        assert!(!LEGAL_BOUNDS.contains(Vec2::new(164.9, 200.0)));
        assert!(!LEGAL_BOUNDS.contains(Vec2::new(500.0, 445.1)));
    }

    #[test]
    fn side_cushions_point_into_the_table() {
        // The narrow edge of the left cushion faces +x
        let left = CUSHIONS[2].outline();
        let max_x = left.iter().map(|v| v.x).fold(f32::MIN, f32::max);
        let narrow: Vec<_> = left.iter().filter(|v| (v.x - max_x).abs() < 1e-3).collect();
        assert_eq!(narrow.len(), 2);
        let span = (narrow[0].y - narrow[1].y).abs();
        assert!(span < CUSHIONS[2].width);
    }

    #[test]
    fn build_spawns_six_fixed_cushions() {
        let mut ctx = EngineContext::from_config(&GameConfig::default());
        let table = Table::build(&mut ctx);
        assert_eq!(ctx.physics.body_count(), 6);
        for (i, id) in table.cushion_ids().iter().enumerate() {
            assert_eq!(table.cushion_index(*id), Some(i));
            let pos = ctx.position(*id).unwrap();
            assert_eq!(pos, CUSHIONS[i].center);
        }
        assert_eq!(table.cushion_index(EntityId(999)), None);
    }

    #[test]
    fn cue_ball_touching_a_cushion_lights_it() {
        let mut ctx = EngineContext::from_config(&GameConfig::default());
        let mut table = Table::build(&mut ctx);

        // Resting against the inner face of the top-left cushion
        let id = ctx.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
            .with_position(Vec2::new(358.0, 79.0 + CUSHION_WIDTH / 2.0 + 4.9))
            .with_collision_filter(category::WHITE_BALL, mask::WHITE_BALL_MASK);
        ctx.spawn_with_body(Entity::new(id), desc, ColliderMaterial::default());
        ctx.step();

        table.update_contacts(&ctx, id);
        assert!(table.is_hit(0));
        assert!((1..6).all(|i| !table.is_hit(i)));

        table.clear_contacts();
        assert!(!table.is_hit(0));
    }

    #[test]
    fn draw_emits_table_shapes() {
        let mut ctx = EngineContext::new();
        let table = Table::build(&mut ctx);
        let mut frame = Frame::new();
        table.draw(&mut frame);
        assert!(frame.len() > 6 + 6 * 2);
    }
}
