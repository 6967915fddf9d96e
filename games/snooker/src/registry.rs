//! Live object balls and the potting rules.
//!
//! Reds are interchangeable so they live in a plain list; each colour maps
//! to at most one live ball. A potted colour is re-spotted in the same pass
//! while any red remains, so the colour map only empties once the reds are
//! gone. Both containers empty is the only way to win.

use std::collections::BTreeMap;

use baize_engine::{BodyDesc, ColliderDesc, ColliderMaterial, EngineContext, Entity, EntityId, Frame};
use glam::Vec2;
use rand::Rng;

use crate::balls::{layout_positions, BallKind, Colour, LayoutMode};
use crate::score::ScoreLedger;
use crate::table::{self, category, mask, BALL_RADIUS};

const BALL_MATERIAL: ColliderMaterial = ColliderMaterial {
    restitution: 0.9,
    friction: 0.7,
    density: 1.0,
};
const BALL_LINEAR_DAMPING: f32 = 0.6;

/// Colours potted back to back before this many is a foul.
const CONSECUTIVE_COLOUR_LIMIT: u32 = 2;

pub const CONSECUTIVE_COLOUR_FOUL: &str = "Penalty: Two consecutive colors sunk";

/// Which category of ball is legal to pot next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    RedBall,
    ColoredBall,
}

impl Target {
    pub fn label(self) -> &'static str {
        match self {
            Target::RedBall => "Red Ball",
            Target::ColoredBall => "Colored Ball",
        }
    }
}

/// What one potting pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PotReport {
    /// Balls captured this pass, in capture order.
    pub potted: Vec<BallKind>,
    /// Net score change, penalties included.
    pub points: i32,
    /// A consecutive-colour foul was called this pass.
    pub foul: bool,
    /// This pass emptied the table.
    pub won: bool,
}

#[derive(Debug, Default)]
pub struct BallRegistry {
    reds: Vec<EntityId>,
    colours: BTreeMap<Colour, EntityId>,
    mode: Option<LayoutMode>,
    target: Target,
    consecutive_colours: u32,
    foul: Option<&'static str>,
    won: bool,
}

impl BallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear any existing balls and set out a fresh layout.
    pub fn set_layout(&mut self, ctx: &mut EngineContext, mode: LayoutMode, rng: &mut impl Rng) {
        self.clear(ctx);
        for (kind, pos) in layout_positions(mode, rng) {
            self.spawn(ctx, kind, pos);
        }
        self.mode = Some(mode);
        log::info!(
            "layout '{}': {} reds, {} colours",
            mode,
            self.reds.len(),
            self.colours.len()
        );
    }

    /// Named-mode variant. Unknown names leave the table untouched.
    pub fn set_layout_named(&mut self, ctx: &mut EngineContext, name: &str, rng: &mut impl Rng) -> bool {
        match name.parse::<LayoutMode>() {
            Ok(mode) => {
                self.set_layout(ctx, mode, rng);
                true
            }
            Err(err) => {
                log::warn!("{}, ignoring", err);
                false
            }
        }
    }

    fn spawn(&mut self, ctx: &mut EngineContext, kind: BallKind, pos: Vec2) -> EntityId {
        let id = ctx.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: BALL_RADIUS })
            .with_position(pos)
            .with_linear_damping(BALL_LINEAR_DAMPING)
            .with_ccd(true)
            .with_collision_filter(category::BALL, mask::BALL_MASK);
        ctx.spawn_with_body(Entity::new(id), desc, BALL_MATERIAL);
        match kind {
            BallKind::Red => self.reds.push(id),
            BallKind::Colour(colour) => {
                // At most one live ball per colour
                if let Some(old) = self.colours.insert(colour, id) {
                    ctx.despawn(old);
                }
            }
        }
        id
    }

    /// Capture every ball whose centre is inside a pocket and apply the
    /// scoring rules to each in turn.
    pub fn potted_check(
        &mut self,
        ctx: &mut EngineContext,
        score: &mut ScoreLedger,
        foul_penalty: i32,
    ) -> PotReport {
        let mut report = PotReport::default();
        if self.mode.is_none() {
            return report;
        }

        let live: Vec<(EntityId, BallKind)> = self.iter().collect();
        for (id, kind) in live {
            let Some(pos) = ctx.position(id) else { continue };
            let Some(pocket) = table::pocket_containing(pos) else { continue };

            ctx.despawn(id);
            report.potted.push(kind);
            log::info!("{} potted in pocket {}", kind.label(), pocket);

            match kind {
                BallKind::Red => {
                    self.reds.retain(|&r| r != id);
                    score.add(kind.value());
                    report.points += kind.value();
                    self.target = Target::ColoredBall;
                    self.consecutive_colours = 0;
                }
                BallKind::Colour(colour) => {
                    self.colours.remove(&colour);
                    score.add(kind.value());
                    report.points += kind.value();

                    self.consecutive_colours += 1;
                    if self.consecutive_colours >= CONSECUTIVE_COLOUR_LIMIT {
                        log::warn!("foul: {} colours in a row, -{}", self.consecutive_colours, foul_penalty);
                        score.add(-foul_penalty);
                        report.points -= foul_penalty;
                        report.foul = true;
                        self.foul = Some(CONSECUTIVE_COLOUR_FOUL);
                        self.consecutive_colours = 0;
                    }

                    if self.reds.is_empty() {
                        self.target = Target::RedBall;
                    } else {
                        self.spawn(ctx, kind, colour.spot());
                        log::debug!("{} re-spotted", colour.label());
                    }
                }
            }
        }

        if !self.won && self.reds.is_empty() && self.colours.is_empty() {
            self.won = true;
            report.won = true;
            log::info!("table cleared");
        }
        report
    }

    /// Reset per-shot state and bring every ball to rest for the next strike.
    pub fn new_turn(&mut self, ctx: &mut EngineContext) {
        self.foul = None;
        self.consecutive_colours = 0;
        for (id, _) in self.iter().collect::<Vec<_>>() {
            if let Some(body) = ctx.body_of(id) {
                ctx.physics.sleep(&body);
            }
        }
    }

    /// Despawn every ball and forget the layout.
    pub fn clear(&mut self, ctx: &mut EngineContext) {
        for (id, _) in self.iter().collect::<Vec<_>>() {
            ctx.despawn(id);
        }
        *self = Self::default();
    }

    /// Every live ball, reds first.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, BallKind)> + '_ {
        self.reds
            .iter()
            .map(|&id| (id, BallKind::Red))
            .chain(self.colours.iter().map(|(&c, &id)| (id, BallKind::Colour(c))))
    }

    pub fn kind_of(&self, id: EntityId) -> Option<BallKind> {
        self.iter().find(|&(ball, _)| ball == id).map(|(_, kind)| kind)
    }

    pub fn colour_ball(&self, colour: Colour) -> Option<EntityId> {
        self.colours.get(&colour).copied()
    }

    pub fn red_ids(&self) -> &[EntityId] {
        &self.reds
    }

    pub fn reds_left(&self) -> usize {
        self.reds.len()
    }

    pub fn colours_left(&self) -> usize {
        self.colours.len()
    }

    pub fn mode(&self) -> Option<LayoutMode> {
        self.mode
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn consecutive_colours(&self) -> u32 {
        self.consecutive_colours
    }

    pub fn foul(&self) -> Option<&'static str> {
        self.foul
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn draw(&self, ctx: &EngineContext, frame: &mut Frame) {
        for (id, kind) in self.iter() {
            if let Some(pos) = ctx.position(id) {
                frame.circle(pos, BALL_RADIUS, kind.rgba());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balls::RED_COUNT;
    use crate::table::POCKETS;
    use baize_engine::GameConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup(mode: LayoutMode) -> (EngineContext, BallRegistry) {
        let mut ctx = EngineContext::from_config(&GameConfig::default());
        let mut reg = BallRegistry::new();
        let mut rng = StdRng::seed_from_u64(11);
        reg.set_layout(&mut ctx, mode, &mut rng);
        (ctx, reg)
    }

    /// Drop a ball straight into a pocket.
    fn sink(ctx: &mut EngineContext, id: EntityId) {
        ctx.teleport(id, POCKETS[1]);
    }

    #[test]
    fn standard_layout_fills_both_containers() {
        let (ctx, reg) = setup(LayoutMode::Standard);
        assert_eq!(reg.reds_left(), RED_COUNT);
        assert_eq!(reg.colours_left(), 6);
        assert_eq!(ctx.physics.body_count(), 21);
        assert_eq!(reg.target(), Target::RedBall);
        assert_eq!(reg.mode(), Some(LayoutMode::Standard));
    }

    #[test]
    fn relayout_replaces_previous_balls() {
        let (mut ctx, mut reg) = setup(LayoutMode::Standard);
        let mut rng = StdRng::seed_from_u64(5);
        reg.set_layout(&mut ctx, LayoutMode::Random, &mut rng);
        assert_eq!(ctx.physics.body_count(), 21);
        assert_eq!(reg.mode(), Some(LayoutMode::Random));
    }

    #[test]
    fn unknown_layout_name_is_a_no_op() {
        let mut ctx = EngineContext::new();
        let mut reg = BallRegistry::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(!reg.set_layout_named(&mut ctx, "bar-billiards", &mut rng));
        assert_eq!(reg.mode(), None);
        assert_eq!(ctx.physics.body_count(), 0);
        assert!(reg.set_layout_named(&mut ctx, "random", &mut rng));
        assert_eq!(reg.colours_left(), 6);
    }

    #[test]
    fn nothing_potted_on_a_fresh_rack() {
        let (mut ctx, mut reg) = setup(LayoutMode::Standard);
        let mut score = ScoreLedger::new();
        let report = reg.potted_check(&mut ctx, &mut score, 4);
        assert!(report.potted.is_empty());
        assert_eq!(score.points(), 0);
    }

    #[test]
    fn potting_a_red_scores_and_targets_colours() {
        let (mut ctx, mut reg) = setup(LayoutMode::Standard);
        let mut score = ScoreLedger::new();
        let red = reg.red_ids()[0];
        sink(&mut ctx, red);

        let report = reg.potted_check(&mut ctx, &mut score, 4);
        assert_eq!(report.potted, vec![BallKind::Red]);
        assert_eq!(score.points(), 1);
        assert_eq!(reg.reds_left(), RED_COUNT - 1);
        assert_eq!(reg.target(), Target::ColoredBall);
        assert!(!ctx.scene.contains(red));
    }

    #[test]
    fn potted_colour_is_respotted_while_reds_remain() {
        let (mut ctx, mut reg) = setup(LayoutMode::Standard);
        let mut score = ScoreLedger::new();
        let red = reg.red_ids()[0];
        sink(&mut ctx, red);
        reg.potted_check(&mut ctx, &mut score, 4);

        let blue = reg.colour_ball(Colour::Blue).unwrap();
        sink(&mut ctx, blue);
        let report = reg.potted_check(&mut ctx, &mut score, 4);

        assert_eq!(report.potted, vec![BallKind::Colour(Colour::Blue)]);
        assert_eq!(score.points(), 1 + 5);
        assert_eq!(reg.colours_left(), 6);
        let respotted = reg.colour_ball(Colour::Blue).unwrap();
        assert_ne!(respotted, blue);
        assert_eq!(ctx.position(respotted), Some(Colour::Blue.spot()));
        // Still on colours: re-spotting never flips the target back
        assert_eq!(reg.target(), Target::ColoredBall);
        assert_eq!(reg.consecutive_colours(), 1);
    }

    #[test]
    fn two_colours_in_a_row_cost_four() {
        let (mut ctx, mut reg) = setup(LayoutMode::Standard);
        let mut score = ScoreLedger::new();

        let pink = reg.colour_ball(Colour::Pink).unwrap();
        sink(&mut ctx, pink);
        let first = reg.potted_check(&mut ctx, &mut score, 4);
        assert!(!first.foul);

        let black = reg.colour_ball(Colour::Black).unwrap();
        sink(&mut ctx, black);
        let second = reg.potted_check(&mut ctx, &mut score, 4);

        assert!(second.foul);
        assert_eq!(score.points(), 6 + 7 - 4);
        assert_eq!(reg.consecutive_colours(), 0);
        assert_eq!(reg.foul(), Some(CONSECUTIVE_COLOUR_FOUL));
    }

    #[test]
    fn a_red_between_colours_avoids_the_foul() {
        let (mut ctx, mut reg) = setup(LayoutMode::Standard);
        let mut score = ScoreLedger::new();

        let yellow = reg.colour_ball(Colour::Yellow).unwrap();
        sink(&mut ctx, yellow);
        reg.potted_check(&mut ctx, &mut score, 4);

        let red = reg.red_ids()[3];
        sink(&mut ctx, red);
        reg.potted_check(&mut ctx, &mut score, 4);

        let green = reg.colour_ball(Colour::Green).unwrap();
        sink(&mut ctx, green);
        let report = reg.potted_check(&mut ctx, &mut score, 4);

        assert!(!report.foul);
        assert_eq!(score.points(), 2 + 1 + 3);
    }

    #[test]
    fn both_colours_in_one_pass_also_foul() {
        let (mut ctx, mut reg) = setup(LayoutMode::Standard);
        let mut score = ScoreLedger::new();
        let brown = reg.colour_ball(Colour::Brown).unwrap();
        let blue = reg.colour_ball(Colour::Blue).unwrap();
        ctx.teleport(brown, POCKETS[0]);
        ctx.teleport(blue, POCKETS[5]);

        let report = reg.potted_check(&mut ctx, &mut score, 4);
        assert_eq!(report.potted.len(), 2);
        assert!(report.foul);
        assert_eq!(report.points, 4 + 5 - 4);
        assert_eq!(score.points(), 5);
    }

    #[test]
    fn new_turn_clears_foul_and_sleeps_balls() {
        let (mut ctx, mut reg) = setup(LayoutMode::Standard);
        let mut score = ScoreLedger::new();
        for colour in [Colour::Pink, Colour::Black] {
            let id = reg.colour_ball(colour).unwrap();
            sink(&mut ctx, id);
            reg.potted_check(&mut ctx, &mut score, 4);
        }
        assert!(reg.foul().is_some());

        let red = reg.red_ids()[0];
        ctx.set_velocity(red, Vec2::new(100.0, 0.0));
        reg.new_turn(&mut ctx);

        assert_eq!(reg.foul(), None);
        assert_eq!(reg.consecutive_colours(), 0);
        let body = ctx.body_of(red).unwrap();
        assert!(ctx.physics.is_sleeping(&body));
        assert_eq!(ctx.velocity(red), Vec2::ZERO);
    }

    #[test]
    fn clearing_the_table_wins_exactly_once() {
        let (mut ctx, mut reg) = setup(LayoutMode::Standard);
        let mut score = ScoreLedger::new();

        for id in reg.red_ids().to_vec() {
            sink(&mut ctx, id);
        }
        reg.potted_check(&mut ctx, &mut score, 4);
        assert_eq!(reg.reds_left(), 0);
        assert_eq!(score.points(), 15);
        assert!(!reg.is_won());

        // With no reds left, colours stay down and the target flips back
        let yellow = reg.colour_ball(Colour::Yellow).unwrap();
        sink(&mut ctx, yellow);
        reg.potted_check(&mut ctx, &mut score, 4);
        assert_eq!(reg.colours_left(), 5);
        assert_eq!(reg.target(), Target::RedBall);
        reg.new_turn(&mut ctx);

        let rest: Vec<_> = Colour::ALL[1..]
            .iter()
            .filter_map(|&c| reg.colour_ball(c))
            .collect();
        for id in rest {
            sink(&mut ctx, id);
        }
        let report = reg.potted_check(&mut ctx, &mut score, 4);
        assert!(report.won);
        assert!(reg.is_won());

        let points = score.points();
        let again = reg.potted_check(&mut ctx, &mut score, 4);
        assert!(!again.won);
        assert!(reg.is_won());
        assert_eq!(score.points(), points);
    }

    #[test]
    fn kind_lookup_by_handle() {
        let (_ctx, reg) = setup(LayoutMode::Standard);
        let red = reg.red_ids()[7];
        let pink = reg.colour_ball(Colour::Pink).unwrap();
        assert_eq!(reg.kind_of(red), Some(BallKind::Red));
        assert_eq!(reg.kind_of(pink), Some(BallKind::Colour(Colour::Pink)));
        assert_eq!(reg.kind_of(EntityId(10_000)), None);
    }

    #[test]
    fn clear_removes_every_ball() {
        let (mut ctx, mut reg) = setup(LayoutMode::Random);
        reg.clear(&mut ctx);
        assert_eq!(ctx.physics.body_count(), 0);
        assert_eq!(reg.reds_left(), 0);
        assert_eq!(reg.mode(), None);
        assert!(!reg.is_won());
    }
}
