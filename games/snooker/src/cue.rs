//! Cue stick: aiming, the strike impulse, and the settle/reset cycle.
//!
//! While aiming the cue is a kinematic body held on the aim line behind the
//! cue ball. A strike hands it to the solver with a velocity taken from the
//! pull-back distance; after the settle delay it is frozen, fades out, and
//! comes back once the cue ball has stopped rolling.

use std::f32::consts::TAU;

use baize_engine::{
    inverse_lerp, remap_clamped, BodyDesc, BodyType, ColliderDesc, ColliderMaterial, Cooldown,
    Deadline, EngineContext, Entity, EntityId, Frame, Rgba,
};
use glam::Vec2;
use rand::Rng;

use crate::config::CueConfig;
use crate::table::{category, mask};

pub const CUE_LENGTH: f32 = 120.0;
pub const CUE_THICKNESS: f32 = 8.0;
const BUTT_WIDTH: f32 = 10.0;
const TIP_WIDTH: f32 = 4.0;

const CUE_MATERIAL: ColliderMaterial = ColliderMaterial {
    restitution: 0.4,
    friction: 0.01,
    density: 0.005,
};

const POWER_BAR_ORIGIN: Vec2 = Vec2::new(20.0, 20.0);
const POWER_BAR_SIZE: Vec2 = Vec2::new(200.0, 20.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueState {
    Aiming,
    Struck,
    Resetting,
}

/// Display band of the power bar. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerTier {
    Safe,
    Risky,
    FlyoutRisk,
}

impl PowerTier {
    pub fn from_fraction(fraction: f32) -> Self {
        if fraction > 0.94 {
            PowerTier::FlyoutRisk
        } else if fraction > 0.6 {
            PowerTier::Risky
        } else {
            PowerTier::Safe
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerTier::Safe => "safe",
            PowerTier::Risky => "risky",
            PowerTier::FlyoutRisk => "flyout_risk",
        }
    }

    pub fn rgba(self) -> Rgba {
        match self {
            PowerTier::Safe => Rgba::GREEN,
            PowerTier::Risky => Rgba::rgb8(255, 165, 0),
            PowerTier::FlyoutRisk => Rgba::RED,
        }
    }
}

/// Fraction of full speed delivered by a strike from `distance`.
pub fn strike_power(distance: f32, cfg: &CueConfig) -> f32 {
    let fraction = remap_clamped(
        distance,
        cfg.min_distance,
        cfg.max_distance,
        cfg.power_low,
        cfg.power_high,
    );
    cfg.power_curve.apply(fraction)
}

/// Pull-back as a fraction of the usable range, for the power bar.
pub fn power_fraction(distance: f32, cfg: &CueConfig) -> f32 {
    inverse_lerp(cfg.min_distance, cfg.max_distance, distance)
}

pub fn power_percent(distance: f32, cfg: &CueConfig) -> u32 {
    (power_fraction(distance, cfg) * 100.0).round() as u32
}

fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[derive(Debug)]
pub struct Cue {
    cfg: CueConfig,
    body: Option<EntityId>,
    angle: f32,
    distance: f32,
    state: CueState,
    alpha: u8,
    fading: bool,
    dragging: bool,
    pointer: Option<Vec2>,
    settle: Option<Deadline>,
    reset: Cooldown,
}

impl Cue {
    /// Build a cue aimed along `angle`, at minimum distance behind the ball.
    pub fn new(ctx: &mut EngineContext, cfg: CueConfig, ball: Vec2, angle: f32) -> Self {
        let mut cue = Self {
            reset: Cooldown::new(cfg.reset_cooldown),
            distance: cfg.min_distance,
            cfg,
            body: None,
            angle,
            state: CueState::Aiming,
            alpha: u8::MAX,
            fading: false,
            dragging: false,
            pointer: None,
            settle: None,
        };
        cue.rebuild(ctx, ball);
        cue
    }

    fn rebuild(&mut self, ctx: &mut EngineContext, ball: Vec2) {
        if let Some(old) = self.body.take() {
            ctx.despawn(old);
        }
        let id = ctx.next_id();
        let desc = BodyDesc::kinematic(ColliderDesc::Cuboid {
            half_width: CUE_LENGTH / 2.0,
            half_height: CUE_THICKNESS / 2.0,
        })
        .with_position(self.holding_position(ball))
        .with_rotation(self.angle)
        .with_ccd(true)
        .with_collision_filter(category::CUE, mask::CUE_MASK);
        ctx.spawn_with_body(Entity::new(id), desc, CUE_MATERIAL);
        self.body = Some(id);
    }

    /// Where the cue sits while aiming: `distance` behind the ball on the aim line.
    pub fn holding_position(&self, ball: Vec2) -> Vec2 {
        ball - self.distance * direction(self.angle)
    }

    fn adjustable(&self) -> bool {
        self.state == CueState::Aiming && !self.dragging
    }

    pub fn rotate(&mut self, delta: f32) {
        if self.adjustable() {
            self.angle += delta;
        }
    }

    pub fn rotate_left(&mut self) {
        self.rotate(-self.cfg.angle_step);
    }

    pub fn rotate_right(&mut self) {
        self.rotate(self.cfg.angle_step);
    }

    /// One keyboard step of extra pull-back.
    pub fn draw_back(&mut self) {
        if self.adjustable() {
            self.set_distance(self.distance + self.cfg.draw_step);
        }
    }

    fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(self.cfg.min_distance, self.cfg.max_distance);
    }

    pub fn begin_drag(&mut self, pointer: Vec2) {
        if self.state == CueState::Aiming {
            self.dragging = true;
            self.pointer = Some(pointer);
        }
    }

    /// Aim away from the pointer; pull-back follows the pointer distance.
    pub fn drag_to(&mut self, pointer: Vec2, ball: Vec2) {
        if !self.dragging {
            return;
        }
        let offset = ball - pointer;
        if offset.length_squared() > f32::EPSILON {
            self.angle = offset.y.atan2(offset.x);
        }
        self.set_distance(offset.length());
        self.pointer = Some(pointer);
    }

    /// Releasing a drag strikes.
    pub fn end_drag(&mut self, ctx: &mut EngineContext, ball: Vec2) -> bool {
        let was_dragging = std::mem::replace(&mut self.dragging, false);
        self.pointer = None;
        was_dragging && self.strike(ctx, ball)
    }

    /// Release the cue toward the ball. Returns `false` when not aiming.
    pub fn strike(&mut self, ctx: &mut EngineContext, ball: Vec2) -> bool {
        if self.state != CueState::Aiming {
            return false;
        }
        let Some(body) = self.body.and_then(|id| ctx.body_of(id)) else {
            return false;
        };
        self.dragging = false;
        self.pointer = None;

        // Bearing from the cue to the ball centre, so the hit is always square
        let from = self.holding_position(ball);
        let to_ball = ball - from;
        self.angle = to_ball.y.atan2(to_ball.x);

        let power = strike_power(self.distance, &self.cfg);
        let velocity = power * self.cfg.max_speed * direction(self.angle);

        ctx.physics.set_body_type(&body, BodyType::Dynamic);
        ctx.physics.set_position(&body, from);
        ctx.physics.set_angle(&body, self.angle);
        ctx.physics.set_velocity(&body, velocity);

        self.state = CueState::Struck;
        self.settle = Some(Deadline::after(ctx.now(), self.cfg.settle_delay));
        log::info!(
            "strike: distance {:.0}, power {:.3}, speed {:.0}",
            self.distance,
            power,
            velocity.length()
        );
        true
    }

    /// Per-tick motion: track the ball while aiming, freeze after the settle
    /// delay, then fade.
    pub fn update(&mut self, ctx: &mut EngineContext, ball: Vec2) {
        match self.state {
            CueState::Aiming => {
                if let Some(body) = self.body.and_then(|id| ctx.body_of(id)) {
                    let pos = self.holding_position(ball);
                    ctx.physics.set_kinematic_position(&body, pos, self.angle);
                }
            }
            CueState::Struck => {
                if self.settle.is_some_and(|d| d.expired(ctx.now())) {
                    self.settle = None;
                    if let Some(body) = self.body.and_then(|id| ctx.body_of(id)) {
                        ctx.physics.set_velocity(&body, Vec2::ZERO);
                        ctx.physics.set_angular_velocity(&body, 0.0);
                        ctx.physics.set_static(&body, true);
                    }
                    self.fading = true;
                    self.state = CueState::Resetting;
                    log::debug!("cue settled");
                }
            }
            CueState::Resetting => {}
        }
        self.fade(ctx);
    }

    fn fade(&mut self, ctx: &mut EngineContext) {
        if !self.fading {
            return;
        }
        self.alpha = self.alpha.saturating_sub(self.cfg.fade_step);
        if self.alpha == 0 {
            self.fading = false;
            if let Some(id) = self.body.take() {
                ctx.despawn(id);
            }
        }
    }

    /// Bring the cue back once the cue ball has stayed below the reset speed
    /// for the whole cooldown. Returns `true` on the tick the cue is rebuilt.
    pub fn check_for_reset(
        &mut self,
        ctx: &mut EngineContext,
        ball: Vec2,
        ball_speed: f32,
        rng: &mut impl Rng,
    ) -> bool {
        if self.state != CueState::Resetting {
            return false;
        }
        let settled = ball_speed < self.cfg.reset_epsilon;
        if !self.reset.observe(ctx.now(), settled) {
            return false;
        }

        self.angle = rng.gen_range(0.0..TAU);
        self.distance = self.cfg.min_distance;
        self.alpha = u8::MAX;
        self.fading = false;
        self.dragging = false;
        self.state = CueState::Aiming;
        self.rebuild(ctx, ball);
        log::info!("cue reset, angle {:.2}", self.angle);
        true
    }

    /// Remove the cue body, if still in the world.
    pub fn despawn(&mut self, ctx: &mut EngineContext) {
        if let Some(id) = self.body.take() {
            ctx.despawn(id);
        }
    }

    pub fn body_id(&self) -> Option<EntityId> {
        self.body
    }

    pub fn state(&self) -> CueState {
        self.state
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn tier(&self) -> PowerTier {
        PowerTier::from_fraction(power_fraction(self.distance, &self.cfg))
    }

    pub fn draw(&self, ctx: &EngineContext, ball: Vec2, frame: &mut Frame) {
        let Some(id) = self.body else { return };
        let Some(entity) = ctx.scene.get(id) else { return };

        // Tapered stick, butt at the back, tip facing the ball
        let (sin, cos) = entity.rotation.sin_cos();
        let local = [
            Vec2::new(-CUE_LENGTH / 2.0, -BUTT_WIDTH / 2.0),
            Vec2::new(-CUE_LENGTH / 2.0, BUTT_WIDTH / 2.0),
            Vec2::new(CUE_LENGTH / 2.0, TIP_WIDTH / 2.0),
            Vec2::new(CUE_LENGTH / 2.0, -TIP_WIDTH / 2.0),
        ];
        let outline: Vec<Vec2> = local
            .iter()
            .map(|p| entity.pos + Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos))
            .collect();
        frame.polygon(&outline, Rgba::rgb8(180, 140, 90).with_alpha8(self.alpha));

        if self.state != CueState::Aiming {
            return;
        }

        let guide = Rgba::WHITE.with_alpha8(180);
        match self.pointer.filter(|_| self.dragging) {
            Some(pointer) => {
                let anchor = self.holding_position(ball);
                let reach = pointer - anchor;
                let t = if reach.length() > self.distance {
                    self.distance / reach.length()
                } else {
                    1.0
                };
                frame.line(anchor, anchor + reach * t, 3.0, guide);
            }
            None => frame.line(entity.pos, ball, 3.0, guide),
        }

        let tier = self.tier();
        let percent = power_percent(self.distance, &self.cfg);
        frame.power_bar(POWER_BAR_ORIGIN, POWER_BAR_SIZE, percent, tier.label(), tier.rgba());
        frame.text(
            format!("Force: {}%", percent),
            POWER_BAR_ORIGIN + Vec2::new(0.0, POWER_BAR_SIZE.y + 14.0),
            12.0,
            Rgba::WHITE,
        );
    }
}
