//! Snooker - turn/match controller.
//!
//! Physics has already advanced when `update` runs. Each tick then applies,
//! in order: input, the out-of-bounds foul, cushion contacts, the cue-ball
//! collision banner, potting, the win check, drawing, and finally the cue
//! (motion, fade, reset). The match clock and banner expiry close the tick.

use std::str::FromStr;

use baize_engine::{
    keys, BodyDesc, ColliderDesc, ColliderMaterial, EngineContext, Entity, EntityId, Frame, Game,
    GameConfig, GameEvent, InputEvent, InputQueue, Rgba,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::balls::{BallKind, LayoutMode};
use crate::config::{ConfigError, SnookerConfig};
use crate::cue::Cue;
use crate::messages::Banner;
use crate::registry::BallRegistry;
use crate::score::ScoreLedger;
use crate::table::{self, category, mask, Table, CUSHIONS, LEGAL_BOUNDS};
use crate::timer::MatchTimer;

const WORLD_W: f32 = 1200.0;
const WORLD_H: f32 = 600.0;

const CUE_BALL_RADIUS: f32 = 5.0;
const CUE_BALL_MATERIAL: ColliderMaterial = ColliderMaterial {
    restitution: 0.95,
    friction: 0.0,
    density: 0.04,
};
const CUE_BALL_LINEAR_DAMPING: f32 = 0.6;

/// Room for a whole table potted in one tick, both fouls, the win, the
/// final whistle and the status line, with headroom.
const MAX_EVENTS_PER_TICK: usize = 64;

const OUT_OF_BOUNDS_FOUL: &str = "Penalty: White ball left the table";

/// Event kinds forwarded to the host.
pub mod game_events {
    /// Every tick: a = score, b = reds left, c = colours left.
    pub const STATUS: f32 = 1.0;
    /// a = points scored by the ball.
    pub const POTTED: f32 = 2.0;
    /// a = points deducted.
    pub const FOUL: f32 = 3.0;
    pub const WON: f32 = 4.0;
    pub const TIME_UP: f32 = 5.0;
}

/// What a physics body is, from the game's point of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyTag {
    CueBall,
    Ball(BallKind),
    Cushion(usize),
    Cue,
}

impl BodyTag {
    pub fn label(self) -> &'static str {
        match self {
            BodyTag::CueBall => "White Ball",
            BodyTag::Ball(kind) => kind.label(),
            BodyTag::Cushion(i) => CUSHIONS.get(i).map_or("cushion", |c| c.name),
            BodyTag::Cue => "Cue",
        }
    }
}

pub struct SnookerGame {
    cfg: SnookerConfig,
    rng: StdRng,
    table: Option<Table>,
    balls: BallRegistry,
    cue_ball: Option<EntityId>,
    cue: Option<Cue>,
    score: ScoreLedger,
    timer: MatchTimer,
    foul_banner: Banner,
    collision_banner: Banner,
}

impl SnookerGame {
    pub fn new() -> Self {
        Self::with_config(SnookerConfig::default())
    }

    pub fn with_config(cfg: SnookerConfig) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            table: None,
            balls: BallRegistry::new(),
            cue_ball: None,
            cue: None,
            score: ScoreLedger::new(),
            timer: MatchTimer::new(cfg.match_secs),
            foul_banner: Banner::new(cfg.foul_banner_secs),
            collision_banner: Banner::new(cfg.collision_banner_secs),
            cfg,
        }
    }

    pub fn score(&self) -> i32 {
        self.score.points()
    }

    pub fn balls(&self) -> &BallRegistry {
        &self.balls
    }

    pub fn cue(&self) -> Option<&Cue> {
        self.cue.as_ref()
    }

    pub fn cue_ball(&self) -> Option<EntityId> {
        self.cue_ball
    }

    pub fn is_placed(&self) -> bool {
        self.cue_ball.is_some()
    }

    pub fn timer(&self) -> &MatchTimer {
        &self.timer
    }

    /// Identify a body by entity id.
    pub fn tag_of(&self, id: EntityId) -> Option<BodyTag> {
        if self.cue_ball == Some(id) {
            return Some(BodyTag::CueBall);
        }
        if self.cue.as_ref().and_then(Cue::body_id) == Some(id) {
            return Some(BodyTag::Cue);
        }
        if let Some(index) = self.table.as_ref().and_then(|t| t.cushion_index(id)) {
            return Some(BodyTag::Cushion(index));
        }
        self.balls.kind_of(id).map(BodyTag::Ball)
    }

    fn cue_ball_pos(&self, ctx: &EngineContext) -> Option<Vec2> {
        self.cue_ball.and_then(|id| ctx.position(id))
    }

    // -- Input --

    fn handle_input(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::KeyDown { key_code: keys::KEY_N } => self.new_game(ctx),
                InputEvent::KeyDown { key_code } => match LayoutMode::from_key(key_code) {
                    Some(mode) => self.select_layout(ctx, mode),
                    None => self.cue_key(ctx, key_code),
                },
                InputEvent::PointerDown { x, y } => self.pointer_down(ctx, Vec2::new(x, y)),
                InputEvent::PointerMove { .. } | InputEvent::PointerUp { .. }
                    if self.timer.is_up() => {}
                InputEvent::PointerMove { x, y } => {
                    let ball = self.cue_ball_pos(ctx);
                    if let (Some(cue), Some(ball)) = (self.cue.as_mut(), ball) {
                        cue.drag_to(Vec2::new(x, y), ball);
                    }
                }
                InputEvent::PointerUp { .. } => {
                    let ball = self.cue_ball_pos(ctx);
                    if let (Some(cue), Some(ball)) = (self.cue.as_mut(), ball) {
                        cue.end_drag(ctx, ball);
                    }
                }
                _ => {}
            }
        }
    }

    fn select_layout(&mut self, ctx: &mut EngineContext, mode: LayoutMode) {
        if let Some(current) = self.balls.mode() {
            log::warn!("layout already '{}', press N for a new game", current);
            return;
        }
        self.balls.set_layout(ctx, mode, &mut self.rng);
    }

    fn cue_key(&mut self, ctx: &mut EngineContext, key_code: u32) {
        if self.timer.is_up() {
            return;
        }
        let ball = self.cue_ball_pos(ctx);
        let (Some(cue), Some(ball)) = (self.cue.as_mut(), ball) else {
            return;
        };
        match key_code {
            keys::ARROW_LEFT => cue.rotate_left(),
            keys::ARROW_RIGHT => cue.rotate_right(),
            keys::ARROW_DOWN => cue.draw_back(),
            keys::ENTER => {
                cue.strike(ctx, ball);
            }
            _ => {}
        }
    }

    fn pointer_down(&mut self, ctx: &mut EngineContext, p: Vec2) {
        if self.timer.is_up() {
            return;
        }
        if self.is_placed() {
            if let Some(cue) = self.cue.as_mut() {
                cue.begin_drag(p);
            }
        } else {
            self.place_cue_ball(ctx, p);
        }
    }

    /// Put the cue ball down inside the D and bring out the cue.
    pub fn place_cue_ball(&mut self, ctx: &mut EngineContext, p: Vec2) -> bool {
        if self.balls.mode().is_none() || self.is_placed() {
            return false;
        }
        if !table::in_d(p) {
            log::warn!("cue ball must be placed inside the D, got {:?}", p);
            return false;
        }

        let id = ctx.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Ball {
            radius: CUE_BALL_RADIUS,
        })
        .with_position(p)
        .with_linear_damping(CUE_BALL_LINEAR_DAMPING)
        .with_ccd(true)
        .with_collision_filter(category::WHITE_BALL, mask::WHITE_BALL_MASK);
        ctx.spawn_with_body(Entity::new(id), desc, CUE_BALL_MATERIAL);
        self.cue_ball = Some(id);

        if let Some(mut old) = self.cue.take() {
            old.despawn(ctx);
        }
        self.cue = Some(Cue::new(ctx, self.cfg.cue.clone(), p, 0.0));
        self.timer.start(ctx.now());
        log::info!("cue ball placed at ({:.0}, {:.0})", p.x, p.y);
        true
    }

    /// Tear down every ball and the cue, and go back to layout selection.
    pub fn new_game(&mut self, ctx: &mut EngineContext) {
        self.remove_cue_ball(ctx);
        self.balls.clear(ctx);
        self.score.reset();
        self.timer.reset();
        self.foul_banner.clear();
        self.collision_banner.clear();
        ctx.physics_paused = false;
        log::info!("new game");
    }

    fn remove_cue_ball(&mut self, ctx: &mut EngineContext) {
        if let Some(id) = self.cue_ball.take() {
            ctx.despawn(id);
        }
        if let Some(mut cue) = self.cue.take() {
            cue.despawn(ctx);
        }
        if let Some(table) = self.table.as_mut() {
            table.clear_contacts();
        }
    }

    // -- Rules --

    /// Penalise a cue ball outside the legal rectangle and take it off the
    /// table. Returns `true` if it was still in play.
    fn check_cue_ball_in_play(&mut self, ctx: &mut EngineContext) -> bool {
        let Some(pos) = self.cue_ball_pos(ctx) else {
            return false;
        };
        if LEGAL_BOUNDS.contains(pos) {
            return true;
        }
        let penalty = self.cfg.foul_penalty;
        log::warn!("cue ball out of play at ({:.0}, {:.0}), -{}", pos.x, pos.y, penalty);
        self.score.add(-penalty);
        self.foul_banner.show(OUT_OF_BOUNDS_FOUL, ctx.now());
        ctx.emit_event(GameEvent::new(game_events::FOUL, penalty as f32, 0.0, 0.0));
        self.remove_cue_ball(ctx);
        self.timer.pause(ctx.now());
        false
    }

    fn report_cue_ball_contacts(&mut self, ctx: &EngineContext, cue_ball: EntityId) {
        let others: Vec<EntityId> = ctx
            .collisions()
            .iter()
            .filter(|pair| pair.started)
            .filter_map(|pair| pair.other(cue_ball))
            .collect();
        for other in others {
            let label = self.tag_of(other).map_or("unknown", BodyTag::label);
            log::debug!("white ball collided with {}", label);
            self.collision_banner
                .show(format!("White ball collided with: {}", label), ctx.now());
        }
    }

    fn check_pockets(&mut self, ctx: &mut EngineContext) {
        let report = self
            .balls
            .potted_check(ctx, &mut self.score, self.cfg.foul_penalty);
        for kind in &report.potted {
            ctx.emit_event(GameEvent::new(game_events::POTTED, kind.value() as f32, 0.0, 0.0));
        }
        if report.foul {
            if let Some(reason) = self.balls.foul() {
                self.foul_banner.show(reason, ctx.now());
            }
            ctx.emit_event(GameEvent::new(
                game_events::FOUL,
                self.cfg.foul_penalty as f32,
                0.0,
                0.0,
            ));
        }
        if report.won {
            log::info!("won with {} points", self.score.points());
            ctx.emit_event(GameEvent::new(game_events::WON, self.score.points() as f32, 0.0, 0.0));
        }
    }

    fn update_cue(&mut self, ctx: &mut EngineContext) {
        let Some(ball) = self.cue_ball else { return };
        let Some(pos) = ctx.position(ball) else { return };
        let speed = ctx.velocity(ball).length();
        let Some(cue) = self.cue.as_mut() else { return };

        cue.update(ctx, pos);
        if cue.check_for_reset(ctx, pos, speed, &mut self.rng) {
            self.balls.new_turn(ctx);
            if let Some(body) = ctx.body_of(ball) {
                ctx.physics.sleep(&body);
            }
        }
    }

    // -- Drawing --

    fn draw(&self, ctx: &EngineContext, frame: &mut Frame) {
        if let Some(table) = &self.table {
            table.draw(frame);
        }
        self.balls.draw(ctx, frame);
        if let Some(pos) = self.cue_ball_pos(ctx) {
            frame.circle(pos, CUE_BALL_RADIUS, Rgba::WHITE);
            if let Some(cue) = &self.cue {
                cue.draw(ctx, pos, frame);
            }
        }
        self.draw_hud(frame);
    }

    fn draw_hud(&self, frame: &mut Frame) {
        let white = Rgba::WHITE;
        let yellow = Rgba::YELLOW;
        let red = Rgba::RED;

        frame.text("Snooker", Vec2::new(450.0, 40.0), 22.0, white);

        let Some(mode) = self.balls.mode() else {
            frame.text(
                "To start, there are three possible play modes:",
                Vec2::new(350.0, 180.0),
                12.0,
                white,
            );
            frame.text(
                "- \"1\" for standard starting positions layout\n- \"2\" for random reds only\n- \"3\" for random (colors and reds)\n\n\"n\" to reset",
                Vec2::new(350.0, 210.0),
                12.0,
                white,
            );
            return;
        };

        frame.text(format!("Score: {}", self.score.points()), Vec2::new(10.0, 80.0), 24.0, yellow);
        frame.text(format!("mode: {}", mode), Vec2::new(10.0, 100.0), 14.0, white);

        if self.timer.is_up() {
            frame.text("TIME'S UP!", Vec2::new(10.0, 150.0), 18.0, red);
        } else if self.timer.is_running() || self.timer.is_paused() {
            frame.text(
                format!("Time left: {}", self.timer.display()),
                Vec2::new(10.0, 150.0),
                18.0,
                yellow,
            );
        }

        if self.balls.is_won() {
            frame.text("YOU WIN!!!", Vec2::new(450.0, 200.0), 32.0, Rgba::GREEN);
        }
        if let Some(text) = self.foul_banner.text() {
            frame.text(text, Vec2::new(400.0, 260.0), 20.0, red);
        }

        if !self.is_placed() {
            frame.text(
                "Click anywhere within the D arc to place the cue ball (white)",
                Vec2::new(350.0, 180.0),
                12.0,
                yellow,
            );
            return;
        }

        let counters = [
            format!("Reds Left: {}", self.balls.reds_left()),
            format!("Colors Left: {}", self.balls.colours_left()),
            format!("Consecutive Colors: {}", self.balls.consecutive_colours()),
            format!("Target: {}", self.balls.target().label()),
        ];
        for (i, line) in counters.into_iter().enumerate() {
            frame.text(line, Vec2::new(10.0, 275.0 + 15.0 * i as f32), 12.0, yellow);
        }

        let instructions = [
            "Instructions:",
            "- 'n' to start a new game",
            "- Right Arrow Key rotates the cue clockwise",
            "- Left Arrow Key rotates the cue counter clockwise",
            "- Down Arrow Key adds shot power, Enter strikes",
            "--- Hold and drag center of cue adds shot power",
        ];
        for (i, line) in instructions.iter().enumerate() {
            frame.text(*line, Vec2::new(250.0, 475.0 + 15.0 * i as f32), 12.0, yellow);
        }
        frame.text("- Order is one red followed by a color", Vec2::new(550.0, 490.0), 12.0, yellow);
        frame.text(
            "- Two colors consecutively incur a penalty of -4 points",
            Vec2::new(550.0, 505.0),
            12.0,
            yellow,
        );

        if let Some(text) = self.collision_banner.text() {
            frame.text(text, Vec2::new(550.0, 530.0), 16.0, red);
        }
    }
}

impl Default for SnookerGame {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for SnookerGame {
    type Err = ConfigError;

    /// Build a game from a JSON configuration document.
    fn from_str(json: &str) -> Result<Self, Self::Err> {
        SnookerConfig::from_json(json).map(Self::with_config)
    }
}

impl Game for SnookerGame {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: 1.0 / 60.0,
            time_scale: self.cfg.time_scale,
            world_width: WORLD_W,
            world_height: WORLD_H,
            gravity: Vec2::ZERO, // top-down table
            max_events: MAX_EVENTS_PER_TICK,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.table = Some(Table::build(ctx));
        log::info!("snooker ready, match length {}s", self.cfg.match_secs);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        self.handle_input(ctx, input);

        if self.cue_ball.is_some() && self.check_cue_ball_in_play(ctx) {
            if let Some(cue_ball) = self.cue_ball {
                if let Some(table) = self.table.as_mut() {
                    table.update_contacts(ctx, cue_ball);
                }
                self.report_cue_ball_contacts(ctx, cue_ball);
            }
            self.check_pockets(ctx);
        }

        let mut frame = std::mem::take(&mut ctx.frame);
        self.draw(ctx, &mut frame);
        ctx.frame = frame;

        if !self.timer.is_up() {
            self.update_cue(ctx);
        }

        let now = ctx.now();
        if self.timer.update(now) {
            log::info!("time's up, final score {}", self.score.points());
            ctx.physics_paused = true;
            ctx.emit_event(GameEvent::new(game_events::TIME_UP, self.score.points() as f32, 0.0, 0.0));
        }
        self.foul_banner.expire(now);
        self.collision_banner.expire(now);

        ctx.emit_event(GameEvent::new(
            game_events::STATUS,
            self.score.points() as f32,
            self.balls.reds_left() as f32,
            self.balls.colours_left() as f32,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balls::{Colour, RED_COUNT};
    use crate::cue::CueState;
    use crate::table::{D_CENTRE, POCKETS};

    const IN_D: Vec2 = Vec2::new(290.0, 260.0);

    fn setup(cfg: SnookerConfig) -> (SnookerGame, EngineContext) {
        let mut game = SnookerGame::with_config(SnookerConfig {
            seed: Some(7),
            ..cfg
        });
        let mut ctx = EngineContext::from_config(&game.config());
        game.init(&mut ctx);
        (game, ctx)
    }

    fn tick(game: &mut SnookerGame, ctx: &mut EngineContext, events: Vec<InputEvent>) {
        ctx.clear_frame_data();
        ctx.step();
        let input: InputQueue = events.into_iter().collect();
        game.update(ctx, &input);
    }

    fn key(key_code: u32) -> InputEvent {
        InputEvent::KeyDown { key_code }
    }

    fn click(p: Vec2) -> InputEvent {
        InputEvent::PointerDown { x: p.x, y: p.y }
    }

    fn standard_placed() -> (SnookerGame, EngineContext) {
        let (mut game, mut ctx) = setup(SnookerConfig::default());
        tick(&mut game, &mut ctx, vec![key(keys::DIGIT_1)]);
        tick(&mut game, &mut ctx, vec![click(IN_D)]);
        assert!(game.is_placed());
        (game, ctx)
    }

    fn has_text(ctx: &EngineContext, needle: &str) -> bool {
        ctx.frame.texts().any(|t| t.contains(needle))
    }

    #[test]
    fn init_builds_the_cushions_only() {
        let (mut game, mut ctx) = setup(SnookerConfig::default());
        assert_eq!(ctx.physics.body_count(), 6);
        tick(&mut game, &mut ctx, vec![]);
        assert!(has_text(&ctx, "three possible play modes"));
    }

    #[test]
    fn mode_keys_choose_the_layout_once() {
        let (mut game, mut ctx) = setup(SnookerConfig::default());
        tick(&mut game, &mut ctx, vec![key(keys::DIGIT_2)]);
        assert_eq!(game.balls().mode(), Some(LayoutMode::PartiallyOrdered));
        assert_eq!(game.balls().reds_left(), RED_COUNT);
        assert!(has_text(&ctx, "mode: unordered"));

        tick(&mut game, &mut ctx, vec![key(keys::DIGIT_3)]);
        assert_eq!(game.balls().mode(), Some(LayoutMode::PartiallyOrdered));
        assert_eq!(ctx.physics.body_count(), 6 + 21);
    }

    #[test]
    fn placement_needs_a_layout() {
        let (mut game, mut ctx) = setup(SnookerConfig::default());
        tick(&mut game, &mut ctx, vec![click(IN_D)]);
        assert!(!game.is_placed());
        assert!(game.cue().is_none());
    }

    #[test]
    fn placement_only_inside_the_d() {
        let (mut game, mut ctx) = setup(SnookerConfig::default());
        tick(&mut game, &mut ctx, vec![key(keys::DIGIT_1)]);

        // Right of the baulk line, and left of it but outside the arc
        tick(&mut game, &mut ctx, vec![click(D_CENTRE + Vec2::new(10.0, 0.0))]);
        tick(&mut game, &mut ctx, vec![click(D_CENTRE - Vec2::new(80.0, 0.0))]);
        assert!(!game.is_placed());
        assert!(has_text(&ctx, "place the cue ball"));

        tick(&mut game, &mut ctx, vec![click(IN_D)]);
        assert!(game.is_placed());
        assert_eq!(game.cue().map(Cue::state), Some(CueState::Aiming));
        assert!(game.timer().is_running());
        assert!(has_text(&ctx, "Reds Left: 15"));
        assert!(has_text(&ctx, "Time left: 10:00"));
    }

    #[test]
    fn cue_ball_off_the_table_is_a_foul() {
        let (mut game, mut ctx) = standard_placed();
        let cue_ball = game.cue_ball().unwrap();
        ctx.teleport(cue_ball, Vec2::new(100.0, 100.0));
        tick(&mut game, &mut ctx, vec![]);

        assert_eq!(game.score(), -4);
        assert!(!game.is_placed());
        assert!(game.cue().is_none());
        assert!(!ctx.scene.contains(cue_ball));
        assert!(has_text(&ctx, OUT_OF_BOUNDS_FOUL));
        assert!(ctx
            .events
            .iter()
            .any(|e| e.kind == game_events::FOUL && e.a == 4.0));

        // Nothing to strike with until the ball is back
        tick(&mut game, &mut ctx, vec![key(keys::ENTER)]);
        assert!(game.cue().is_none());
        assert_eq!(game.score(), -4);

        tick(&mut game, &mut ctx, vec![click(IN_D)]);
        assert!(game.is_placed());
        assert_eq!(game.cue().map(Cue::state), Some(CueState::Aiming));
    }

    #[test]
    fn potted_ball_scores_through_the_controller() {
        let (mut game, mut ctx) = standard_placed();
        let red = game.balls().red_ids()[0];
        ctx.teleport(red, POCKETS[2]);
        tick(&mut game, &mut ctx, vec![]);

        assert_eq!(game.score(), 1);
        assert!(has_text(&ctx, "Score: 1"));
        assert!(has_text(&ctx, "Target: Colored Ball"));
        assert!(ctx
            .events
            .iter()
            .any(|e| e.kind == game_events::POTTED && e.a == 1.0));
        let status = ctx.events.iter().find(|e| e.kind == game_events::STATUS).unwrap();
        assert_eq!((status.a, status.b, status.c), (1.0, 14.0, 6.0));
    }

    #[test]
    fn consecutive_colours_show_the_foul_banner() {
        let (mut game, mut ctx) = standard_placed();
        for colour in [Colour::Blue, Colour::Pink] {
            let id = game.balls().colour_ball(colour).unwrap();
            ctx.teleport(id, POCKETS[4]);
            tick(&mut game, &mut ctx, vec![]);
        }
        assert_eq!(game.score(), 5 + 6 - 4);
        assert!(has_text(&ctx, "Two consecutive colors"));

        // Banner lasts three seconds
        for _ in 0..200 {
            tick(&mut game, &mut ctx, vec![]);
        }
        assert!(!has_text(&ctx, "Two consecutive colors"));
    }

    #[test]
    fn cue_ball_contact_names_the_other_body() {
        let (mut game, mut ctx) = standard_placed();
        let cue_ball = game.cue_ball().unwrap();
        ctx.set_velocity(cue_ball, Vec2::new(300.0, 0.0));

        let mut seen = false;
        for _ in 0..20 {
            tick(&mut game, &mut ctx, vec![]);
            seen |= has_text(&ctx, "White ball collided with: Brown Ball");
        }
        assert!(seen);
    }

    #[test]
    fn tags_cover_every_body() {
        let (game, _ctx) = standard_placed();
        let cue_ball = game.cue_ball().unwrap();
        let cue = game.cue().and_then(Cue::body_id).unwrap();
        let black = game.balls().colour_ball(Colour::Black).unwrap();
        assert_eq!(game.tag_of(cue_ball), Some(BodyTag::CueBall));
        assert_eq!(game.tag_of(cue).map(BodyTag::label), Some("Cue"));
        assert_eq!(
            game.tag_of(black),
            Some(BodyTag::Ball(BallKind::Colour(Colour::Black)))
        );
        assert_eq!(BodyTag::Cushion(2).label(), "left cushion");
        assert_eq!(game.tag_of(EntityId(9999)), None);
    }

    #[test]
    fn strike_cycle_returns_to_aiming() {
        let (mut game, mut ctx) = standard_placed();
        tick(&mut game, &mut ctx, vec![key(keys::ENTER)]);
        assert_eq!(game.cue().map(Cue::state), Some(CueState::Struck));

        let mut ticks = 0;
        while game.cue().map(Cue::state) != Some(CueState::Aiming) {
            tick(&mut game, &mut ctx, vec![]);
            ticks += 1;
            assert!(ticks < 1200, "cue never came back");
        }
        assert_eq!(game.balls().consecutive_colours(), 0);
        assert_eq!(game.balls().foul(), None);
    }

    #[test]
    fn new_game_clears_everything_but_the_table() {
        let (mut game, mut ctx) = standard_placed();
        let red = game.balls().red_ids()[0];
        ctx.teleport(red, POCKETS[0]);
        tick(&mut game, &mut ctx, vec![]);
        assert_eq!(game.score(), 1);

        tick(&mut game, &mut ctx, vec![key(keys::KEY_N)]);
        assert_eq!(game.score(), 0);
        assert_eq!(game.balls().mode(), None);
        assert!(!game.is_placed());
        assert!(!game.timer().is_running());
        assert_eq!(ctx.physics.body_count(), 6);

        tick(&mut game, &mut ctx, vec![key(keys::DIGIT_3)]);
        assert_eq!(game.balls().mode(), Some(LayoutMode::Random));
    }

    #[test]
    fn time_up_freezes_play() {
        let (mut game, mut ctx) = setup(SnookerConfig {
            match_secs: 1,
            ..SnookerConfig::default()
        });
        tick(&mut game, &mut ctx, vec![key(keys::DIGIT_1)]);
        tick(&mut game, &mut ctx, vec![click(IN_D)]);
        for _ in 0..70 {
            tick(&mut game, &mut ctx, vec![]);
        }
        assert!(game.timer().is_up());
        assert!(ctx.physics_paused);
        assert!(has_text(&ctx, "TIME'S UP!"));

        tick(&mut game, &mut ctx, vec![key(keys::ENTER)]);
        assert_eq!(game.cue().map(Cue::state), Some(CueState::Aiming));

        tick(&mut game, &mut ctx, vec![key(keys::KEY_N)]);
        assert!(!ctx.physics_paused);
    }

    #[test]
    fn releasing_a_drag_after_time_up_does_not_strike() {
        let (mut game, mut ctx) = setup(SnookerConfig {
            match_secs: 1,
            ..SnookerConfig::default()
        });
        tick(&mut game, &mut ctx, vec![key(keys::DIGIT_1)]);
        tick(&mut game, &mut ctx, vec![click(IN_D)]);
        tick(&mut game, &mut ctx, vec![click(Vec2::new(150.0, 260.0))]);
        assert!(game.cue().is_some_and(Cue::is_dragging));

        for _ in 0..70 {
            tick(&mut game, &mut ctx, vec![]);
        }
        assert!(game.timer().is_up());

        tick(
            &mut game,
            &mut ctx,
            vec![
                InputEvent::PointerMove { x: 100.0, y: 260.0 },
                InputEvent::PointerUp { x: 100.0, y: 260.0 },
            ],
        );
        assert_eq!(game.cue().map(Cue::state), Some(CueState::Aiming));
        let cue_ball = game.cue_ball().unwrap();
        assert!(ctx.velocity(cue_ball).length() < 1e-3);
    }

    #[test]
    fn match_clock_waits_while_the_cue_ball_is_off_the_table() {
        let (mut game, mut ctx) = standard_placed();
        for _ in 0..70 {
            tick(&mut game, &mut ctx, vec![]);
        }
        assert_eq!(game.timer().display(), "09:59");

        let cue_ball = game.cue_ball().unwrap();
        ctx.teleport(cue_ball, Vec2::new(100.0, 100.0));
        tick(&mut game, &mut ctx, vec![]);
        assert!(!game.is_placed());
        assert!(game.timer().is_paused());

        for _ in 0..300 {
            tick(&mut game, &mut ctx, vec![]);
        }
        assert_eq!(game.timer().display(), "09:59");
        assert!(has_text(&ctx, "Time left: 09:59"));

        tick(&mut game, &mut ctx, vec![click(IN_D)]);
        assert!(game.timer().is_running());
        for _ in 0..70 {
            tick(&mut game, &mut ctx, vec![]);
        }
        assert_eq!(game.timer().display(), "09:58");
    }

    #[test]
    fn clearing_the_table_in_one_tick_keeps_every_event() {
        let (mut game, mut ctx) = standard_placed();
        let offsets = [
            Vec2::new(-6.0, -6.0),
            Vec2::new(6.0, -6.0),
            Vec2::new(-6.0, 6.0),
            Vec2::new(6.0, 6.0),
        ];
        let ids: Vec<EntityId> = game.balls().iter().map(|(id, _)| id).collect();
        for (i, id) in ids.iter().enumerate() {
            let pos = POCKETS[i % POCKETS.len()] + offsets[i / POCKETS.len()];
            ctx.teleport(*id, pos);
        }
        tick(&mut game, &mut ctx, vec![]);

        assert!(game.balls().is_won());
        let count = |kind: f32| ctx.events.iter().filter(|e| e.kind == kind).count();
        assert_eq!(count(game_events::POTTED), 21);
        assert_eq!(count(game_events::WON), 1);
        assert_eq!(count(game_events::STATUS), 1);
        assert!(ctx.events.len() <= game.config().max_events);
        let status = ctx.events.last().unwrap();
        assert_eq!(status.kind, game_events::STATUS);
        assert_eq!((status.b, status.c), (0.0, 0.0));
    }

    #[test]
    fn parses_json_configuration() {
        let game: SnookerGame = r#"{"match_secs": 300, "seed": 1}"#.parse().unwrap();
        assert_eq!(game.timer().display(), "05:00");
        assert!(matches!(
            r#"{"match_secs": 0}"#.parse::<SnookerGame>(),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            "not json".parse::<SnookerGame>(),
            Err(ConfigError::Parse(_))
        ));
    }
}
