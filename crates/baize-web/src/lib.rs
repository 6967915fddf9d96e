pub mod runner;

pub use runner::GameRunner;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (init, tick, input handlers, data accessors)
///
/// The game type must provide `new()` and implement `FromStr` so the host
/// can pass a JSON configuration to `game_init_with`.
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use baize_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// baize_web::export_game!(MyGame, "my-game");
/// ```
///
/// Exports called before `game_init` are no-ops that return zero values.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R: Default>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
                Some(runner) => f(runner),
                None => {
                    log::warn!("{}: not initialized, call game_init() first", $game_name);
                    R::default()
                }
            })
        }

        fn install(game: $game_type) {
            let runner = $crate::GameRunner::new(game);
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        fn init_browser_hooks() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);
        }

        #[wasm_bindgen]
        pub fn game_init() {
            init_browser_hooks();
            install(<$game_type>::new());
        }

        /// Initialize from a JSON configuration document. Falls back to the
        /// default configuration when the document is rejected.
        #[wasm_bindgen]
        pub fn game_init_with(json: &str) {
            init_browser_hooks();
            let game = match json.parse::<$game_type>() {
                Ok(game) => game,
                Err(err) => {
                    log::error!("{}: bad configuration ({}), using defaults", $game_name, err);
                    <$game_type>::new()
                }
            };
            install(game);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_frame_json() -> String {
            with_runner(|r| r.frame_json())
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            RUNNER.with(|cell| match cell.borrow().as_ref() {
                Some(r) => r.game_events_ptr(),
                None => std::ptr::null(),
            })
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width())
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height())
        }
    };
}
