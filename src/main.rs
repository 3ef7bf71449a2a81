//! Prime Popper entry point
//!
//! Browser builds wire the DOM presentation adapter and the three tick
//! drivers (1s countdown interval, 3s spawn interval, animation-frame
//! motion loop). The native build runs a short headless autoplay session
//! as a smoke check.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, MouseEvent};

    use prime_popper::audio::AudioManager;
    use prime_popper::haptics;
    use prime_popper::sim::{
        BubbleState, Difficulty, GameEvent, GamePhase, GameSession, PopOutcome, PowerUpKind,
    };
    use prime_popper::{HighScore, Settings};

    /// Game instance holding the session and its adapters
    struct Game {
        session: GameSession,
        audio: AudioManager,
        settings: Settings,
        high_score: HighScore,
        /// Events queued by the interval drivers and tap handlers,
        /// drained once per animation frame (single-writer invariant)
        pending_events: Vec<GameEvent>,
        /// Interval handles, held only while Running
        countdown_handle: Option<i32>,
        spawn_handle: Option<i32>,
        /// Phase seen by the last frame, for timer acquisition/release
        last_phase: GamePhase,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let audio = AudioManager::new(settings.sound_enabled);
            Self {
                session: GameSession::new(seed),
                audio,
                settings,
                high_score: HighScore::load(),
                pending_events: Vec::new(),
                countdown_handle: None,
                spawn_handle: None,
                last_phase: GamePhase::Instructions,
                last_time: 0.0,
            }
        }

        /// Release both interval handles (safe when already released)
        fn stop_timers(&mut self) {
            let window = web_sys::window().expect("no window");
            if let Some(handle) = self.countdown_handle.take() {
                window.clear_interval_with_handle(handle);
            }
            if let Some(handle) = self.spawn_handle.take() {
                window.clear_interval_with_handle(handle);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Prime Popper starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        update_sound_button(&document, game.borrow().settings.sound_enabled);
        update_best_label(&document, game.borrow().high_score.best);

        setup_menu_buttons(&document, game.clone());
        setup_arena_input(&document, game.clone());
        setup_keyboard(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Prime Popper running!");
    }

    fn setup_menu_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        // Difficulty buttons on the instructions screen
        for (btn_id, difficulty) in [
            ("start-easy", Difficulty::Easy),
            ("start-medium", Difficulty::Medium),
            ("start-hard", Difficulty::Hard),
        ] {
            if let Some(btn) = document.get_element_by_id(btn_id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().session.start(difficulty);
                    set_message("Tap the prime numbers!");
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Play again keeps the difficulty the session ended with
        if let Some(btn) = document.get_element_by_id("play-again-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let difficulty = g.session.difficulty;
                g.session.start(difficulty);
                set_message("Tap the prime numbers!");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Back to instructions, from game over or mid-run
        for btn_id in ["instructions-btn", "quit-btn"] {
            if let Some(btn) = document.get_element_by_id(btn_id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().session.quit();
                    set_message("");
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                match g.session.phase {
                    GamePhase::Running => g.session.pause(),
                    GamePhase::Paused => g.session.resume(),
                    _ => {}
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("sound-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.settings.sound_enabled = !g.settings.sound_enabled;
                g.settings.save();
                let enabled = g.settings.sound_enabled;
                g.audio.set_enabled(enabled);
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    update_sound_button(&document, enabled);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// One delegated click handler on the arena; bubble divs carry their
    /// id in a data attribute.
    fn setup_arena_input(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(arena) = document.get_element_by_id("arena") else {
            log::warn!("No #arena element - input disabled");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(target) = event.target() else { return };
            let Some(el) = target.dyn_ref::<Element>() else {
                return;
            };
            let Some(id) = el
                .get_attribute("data-bubble-id")
                .and_then(|s| s.parse::<u32>().ok())
            else {
                return;
            };
            let mut g = game.borrow_mut();
            let events = g.session.tap(id);
            if !events.is_empty() {
                haptics::pulse(haptics::TAP_PULSE_MS);
                g.pending_events.extend(events);
            }
        });
        let _ = arena.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if event.key() == "Escape" {
                let mut g = game.borrow_mut();
                match g.session.phase {
                    GamePhase::Running => g.session.pause(),
                    GamePhase::Paused => g.session.resume(),
                    _ => {}
                }
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Pause when the tab is hidden so the countdown never runs unseen
    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let document = web_sys::window()
            .expect("no window")
            .document()
            .expect("no document");
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.session.phase == GamePhase::Running {
                    g.session.pause();
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Acquire the 1s countdown and 3s spawn intervals. Both closures
    /// only queue work; mutation happens on the frame loop.
    fn start_timers(game: &Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        let countdown = {
            let game = game.clone();
            Closure::<dyn FnMut()>::new(move || {
                let mut g = game.borrow_mut();
                let events = g.session.countdown_tick();
                g.pending_events.extend(events);
            })
        };
        let spawner = {
            let game = game.clone();
            Closure::<dyn FnMut()>::new(move || {
                game.borrow_mut().session.spawn_tick();
            })
        };

        let mut g = game.borrow_mut();
        g.countdown_handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                countdown.as_ref().unchecked_ref(),
                1000,
            )
            .ok();
        g.spawn_handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                spawner.as_ref().unchecked_ref(),
                3000,
            )
            .ok();
        countdown.forget();
        spawner.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let mut needs_timers = false;
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                (((time - g.last_time) / 1000.0) as f32).min(0.1)
            } else {
                0.0
            };
            g.last_time = time;

            g.session.frame_tick(dt);

            let events: Vec<GameEvent> = g.pending_events.drain(..).collect();
            for event in &events {
                handle_event(&mut g, event);
            }

            // Timer handles follow the phase: acquired entering Running,
            // released on every exit path (pause, timeout, quit)
            let phase = g.session.phase;
            if phase != g.last_phase {
                match phase {
                    GamePhase::Running => needs_timers = true,
                    _ => g.stop_timers(),
                }
                g.last_phase = phase;
            }

            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                render(&document, &g);
            }
        }
        if needs_timers {
            start_timers(&game);
        }

        request_animation_frame(game);
    }

    fn handle_event(g: &mut Game, event: &GameEvent) {
        g.audio.play_event(event);
        match event {
            GameEvent::CorrectTap { value, points, .. } => {
                set_message(&format!("Good job! {value} is a prime number! +{points}"));
            }
            GameEvent::IncorrectTap { value, factors } => {
                if factors.len() >= 2 {
                    let product = factors
                        .iter()
                        .map(|f| f.to_string())
                        .collect::<Vec<_>>()
                        .join(" × ");
                    set_message(&format!("Oops! {value} = {product} is not prime."));
                } else {
                    set_message(&format!("Oops! {value} is not a prime number."));
                }
            }
            GameEvent::LevelUp { level } => {
                set_message(&format!(
                    "Level up! Now look for prime numbers up to {}",
                    level * 10
                ));
            }
            GameEvent::PowerUpActivated(PowerUpKind::SlowTime) => {
                set_message("Slow time! Fresh bubbles drift gently.");
            }
            GameEvent::PowerUpActivated(PowerUpKind::HighlightPrimes) => {
                set_message("Prime sight! Prime bubbles glow.");
            }
            GameEvent::GameOver { score, .. } => {
                let new_best = g.high_score.record(*score);
                if new_best {
                    set_message(&format!("Time's up! New high score: {score}!"));
                } else {
                    set_message("Time's up!");
                }
            }
        }
    }

    // === DOM rendering ===

    fn set_message(text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("message"))
        {
            el.set_text_content(Some(text));
        }
    }

    fn update_sound_button(document: &Document, enabled: bool) {
        if let Some(el) = document.get_element_by_id("sound-btn") {
            el.set_text_content(Some(if enabled { "🔊" } else { "🔇" }));
        }
    }

    fn update_best_label(document: &Document, best: u32) {
        if let Some(el) = document.get_element_by_id("best-score") {
            el.set_text_content(Some(&best.to_string()));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    /// Push `(bubbles, session state)` into the DOM for this frame
    fn render(document: &Document, g: &Game) {
        let session = &g.session;

        set_hidden(
            document,
            "screen-instructions",
            session.phase != GamePhase::Instructions,
        );
        set_hidden(document, "screen-game-over", session.phase != GamePhase::Over);
        set_hidden(
            document,
            "hud",
            matches!(session.phase, GamePhase::Instructions | GamePhase::Over),
        );
        set_hidden(document, "pause-overlay", session.phase != GamePhase::Paused);

        set_text(document, "hud-score", &session.score.to_string());
        set_text(document, "hud-level", &session.level.to_string());
        set_text(document, "hud-time", &format!("{}s", session.time_remaining));
        if session.combo >= 2 {
            set_text(document, "hud-combo", &format!("x{}", session.combo));
        } else {
            set_text(document, "hud-combo", "");
        }

        if session.phase == GamePhase::Over {
            set_text(document, "final-score", &session.score.to_string());
            set_text(document, "final-level", &session.level.to_string());
            set_text(document, "final-combo", &session.max_combo.to_string());
            update_best_label(document, g.high_score.best);
        }

        sync_bubbles(document, g);
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Mirror the bubble population into positioned divs, creating and
    /// removing elements as entities come and go.
    fn sync_bubbles(document: &Document, g: &Game) {
        let Some(arena) = document.get_element_by_id("arena") else {
            return;
        };
        let highlight = g.session.power_ups.highlight_active();

        let mut live: HashSet<u32> = HashSet::new();
        for bubble in g.session.bubbles.iter() {
            live.insert(bubble.id);
            let el_id = format!("bubble-{}", bubble.id);
            let el = match document.get_element_by_id(&el_id) {
                Some(el) => el,
                None => {
                    let Ok(el) = document.create_element("div") else {
                        continue;
                    };
                    el.set_id(&el_id);
                    let _ = el.set_attribute("data-bubble-id", &bubble.id.to_string());
                    el.set_text_content(Some(&bubble.value.to_string()));
                    let _ = arena.append_child(&el);
                    el
                }
            };

            el.set_class_name(match bubble.state {
                BubbleState::Active => "bubble",
                BubbleState::Popping {
                    outcome: PopOutcome::Correct,
                    ..
                } => "bubble popping correct",
                BubbleState::Popping {
                    outcome: PopOutcome::Incorrect,
                    ..
                } => "bubble popping incorrect",
            });

            if let Some(html) = el.dyn_ref::<HtmlElement>() {
                let style = html.style();
                let d = bubble.radius * 2.0 * 100.0;
                let _ = style.set_property(
                    "left",
                    &format!("{:.2}%", (bubble.pos.x - bubble.radius) * 100.0),
                );
                let _ = style.set_property(
                    "top",
                    &format!("{:.2}%", (bubble.pos.y - bubble.radius) * 100.0),
                );
                let _ = style.set_property("width", &format!("{d:.2}%"));
                let _ = style.set_property("height", &format!("{d:.2}%"));
                let _ = style.set_property(
                    "background",
                    &format!("hsla({:.0}, 80%, 70%, 0.85)", bubble.display_hue(highlight)),
                );
            }
        }

        // Drop elements whose bubble retired
        let children = arena.children();
        let mut stale = Vec::new();
        for i in 0..children.length() {
            if let Some(child) = children.item(i) {
                let keep = child
                    .get_attribute("data-bubble-id")
                    .and_then(|s| s.parse::<u32>().ok())
                    .map(|id| live.contains(&id))
                    .unwrap_or(true);
                if !keep {
                    stale.push(child);
                }
            }
        }
        for el in stale {
            el.remove();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use prime_popper::sim::{is_prime, Difficulty, GameEvent, GamePhase, GameSession};

    env_logger::init();
    log::info!("Prime Popper (native) starting...");
    log::info!("Run with `trunk serve` for the browser version; autoplaying a headless session");

    // Headless smoke run: tap the first visible prime once a second
    let mut session = GameSession::new(0xC0FFEE);
    session.start(Difficulty::Medium);
    let dt = 1.0 / 60.0;
    let mut frame = 0u32;

    while session.phase == GamePhase::Running {
        session.frame_tick(dt);
        frame += 1;

        if frame % 60 == 30 {
            let target = session
                .bubbles
                .iter()
                .find(|b| b.is_active() && is_prime(b.value))
                .map(|b| b.id);
            if let Some(id) = target {
                for event in session.tap(id) {
                    if let GameEvent::LevelUp { level } = event {
                        println!("level up -> {level}");
                    }
                }
            }
        }
        if frame % 180 == 0 {
            session.spawn_tick();
        }
        if frame % 60 == 0 {
            session.countdown_tick();
        }
    }

    println!(
        "game over: score {} level {} max combo {}",
        session.score, session.level, session.max_combo
    );
}
