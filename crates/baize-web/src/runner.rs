use baize_engine::{EngineContext, FixedTimestep, Game, GameConfig, InputEvent, InputQueue};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly. See [`export_game!`](crate::export_game).
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            timestep: FixedTimestep::new(config.fixed_dt),
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            config,
            game,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one host frame: accumulate `dt` into fixed ticks and run each one.
    ///
    /// Pending input is handed to the first tick only, so a key press is
    /// applied once no matter how many ticks the frame covers. When the
    /// frame is too short for a whole tick, input stays queued.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        let steps = self.timestep.accumulate(dt);
        if steps == 0 {
            return;
        }

        self.ctx.clear_frame_data();
        let input: InputQueue = self.input.drain().into_iter().collect();
        let idle = InputQueue::new();

        for step in 0..steps {
            self.ctx.frame.clear();
            self.ctx.step();
            let pending = if step == 0 { &input } else { &idle };
            self.game.update(&mut self.ctx, pending);
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// The most recent tick's draw list as JSON.
    pub fn frame_json(&self) -> String {
        self.ctx.frame.to_json().unwrap_or_else(|err| {
            log::error!("frame serialisation failed: {}", err);
            String::from("{\"commands\":[]}")
        })
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn game_events_ptr(&self) -> *const f32 {
        baize_engine::events_as_floats(&self.ctx.events).as_ptr()
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }
}
