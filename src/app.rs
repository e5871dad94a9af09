//! Application shell
//!
//! The top-level state machine: menu, playing, score display. Everything is
//! driven as a synchronous frame loop over one [`Gateway`] backend; each
//! screen owns its loop and returns a plain outcome value, so the
//! transitions in [`App::run`] read as ordinary control flow and the
//! screens stay testable against a scripted gateway.

use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use glam::IVec2;

use crate::assets::Assets;
use crate::consts::{DEATH_HOLD_MS, SCREEN_H, SCREEN_W};
use crate::error::GameError;
use crate::gateway::{Flip, Gateway, InputEvent, Key, Rgb, TextureId};
use crate::highscore;
use crate::settings::Settings;
use crate::sim::{ControlEvent, Session, advance, handle_control};

const MENU_BG: Rgb = Rgb::new(239, 228, 176);
const MENU_TEXT: Rgb = Rgb::BLACK;
const MENU_HOVER: Rgb = Rgb::new(193, 0, 0);
const PLAY_BG: Rgb = Rgb::WHITE;
const HUD_TEXT: Rgb = Rgb::new(72, 45, 30);
const SCORE_BG: Rgb = Rgb::BLACK;
const SCORE_TEXT: Rgb = Rgb::new(250, 202, 10);

const MENU_ENTRIES: [&str; 3] = ["New Game", "High Score", "Exit"];
const MENU_CHOICES: [MenuChoice; 3] =
    [MenuChoice::NewGame, MenuChoice::HighScore, MenuChoice::Exit];

/// Menu entry the player activated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    NewGame,
    HighScore,
    Exit,
}

/// How a play session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Died { score: u32, new_record: bool },
    Quit,
}

/// What to show on the score display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreScreen {
    Final { score: u32, new_record: bool },
    Best(u32),
}

/// How the player left the score display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreChoice {
    Restart,
    Back,
    Quit,
}

struct MenuEntry {
    label: &'static str,
    id: TextureId,
    pos: IVec2,
    size: IVec2,
    lit: bool,
}

fn entry_at(entries: &[MenuEntry], pos: IVec2) -> Option<usize> {
    entries.iter().position(|e| {
        pos.x >= e.pos.x
            && pos.x <= e.pos.x + e.size.x
            && pos.y >= e.pos.y
            && pos.y <= e.pos.y + e.size.y
    })
}

/// Center each entry horizontally and stack the block below the logo,
/// every entry drawn up a little less than the one before
fn stack_entries(sizes: impl IntoIterator<Item = IVec2>) -> Vec<IVec2> {
    let mut lift = 50;
    let mut stack = 0;
    let mut out = Vec::new();
    for size in sizes {
        out.push(IVec2::new(
            (SCREEN_W - size.x) / 2,
            (stack + (100 + SCREEN_H - size.y) / 2) - lift,
        ));
        lift -= 10;
        stack += size.y;
    }
    out
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

pub struct App<G: Gateway> {
    gw: G,
    assets: Assets,
    settings: Settings,
    frame_budget: Duration,
    clock: Instant,
}

impl<G: Gateway> App<G> {
    pub fn new(mut gw: G, settings: Settings) -> Result<Self, GameError> {
        let assets = Assets::load(&mut gw, &settings.assets_dir)?;
        let frame_budget = settings.frame_budget();
        Ok(Self {
            gw,
            assets,
            settings,
            frame_budget,
            clock: Instant::now(),
        })
    }

    /// The backend, for inspection from tests
    pub fn gateway(&self) -> &G {
        &self.gw
    }

    /// Drive the state machine until the player exits
    pub fn run(&mut self) -> Result<(), GameError> {
        loop {
            match self.menu()? {
                MenuChoice::Exit => return Ok(()),
                MenuChoice::HighScore => {
                    let best = highscore::load(&self.settings.highscore_file);
                    if let ScoreChoice::Quit = self.score_screen(ScoreScreen::Best(best))? {
                        return Ok(());
                    }
                }
                MenuChoice::NewGame => loop {
                    match self.play()? {
                        PlayOutcome::Quit => return Ok(()),
                        PlayOutcome::Died { score, new_record } => {
                            match self.score_screen(ScoreScreen::Final { score, new_record })? {
                                ScoreChoice::Restart => {}
                                ScoreChoice::Back => break,
                                ScoreChoice::Quit => return Ok(()),
                            }
                        }
                    }
                },
            }
        }
    }

    /// Title menu: logo plus a stacked entry list. Arrows or the mouse move
    /// the highlight, Enter or a click activates, ESC exits.
    pub fn menu(&mut self) -> Result<MenuChoice, GameError> {
        let logo_size = self.gw.size_of(self.assets.logo);
        let logo_pos = IVec2::new((SCREEN_W - logo_size.x) / 2, 50);

        let mut staged = Vec::with_capacity(MENU_ENTRIES.len());
        for label in MENU_ENTRIES {
            let id = self.gw.load_glyph(label, MENU_TEXT)?;
            staged.push((label, id, self.gw.size_of(id)));
        }
        let positions = stack_entries(staged.iter().map(|(_, _, size)| *size));
        let mut entries: Vec<MenuEntry> = staged
            .into_iter()
            .zip(positions)
            .map(|((label, id, size), pos)| MenuEntry {
                label,
                id,
                pos,
                size,
                lit: false,
            })
            .collect();

        let mut selected: Option<usize> = None;
        let choice = 'menu: loop {
            let frame_start = Instant::now();

            for event in self.gw.poll_events()? {
                match event {
                    InputEvent::Quit => break 'menu MenuChoice::Exit,
                    InputEvent::KeyDown {
                        key: Key::Escape, ..
                    } => break 'menu MenuChoice::Exit,
                    InputEvent::KeyDown { key: Key::Down, .. } => {
                        selected = Some(selected.map_or(0, |s| (s + 1) % entries.len()));
                    }
                    InputEvent::KeyDown { key: Key::Up, .. } => {
                        let last = entries.len() - 1;
                        selected = Some(selected.map_or(last, |s| (s + last) % entries.len()));
                    }
                    InputEvent::KeyDown {
                        key: Key::Enter, ..
                    } => {
                        if let Some(hit) = selected {
                            break 'menu MENU_CHOICES[hit];
                        }
                    }
                    InputEvent::MouseMove { pos } => selected = entry_at(&entries, pos),
                    InputEvent::MouseDown { pos } => {
                        if let Some(hit) = entry_at(&entries, pos) {
                            break 'menu MENU_CHOICES[hit];
                        }
                    }
                    _ => {}
                }
            }

            // Re-rasterize only the entries whose highlight changed
            for (i, entry) in entries.iter_mut().enumerate() {
                let lit = selected == Some(i);
                if lit != entry.lit {
                    self.gw.free(entry.id);
                    let color = if lit { MENU_HOVER } else { MENU_TEXT };
                    entry.id = self.gw.load_glyph(entry.label, color)?;
                    entry.lit = lit;
                }
            }

            self.gw.clear(MENU_BG);
            self.gw
                .render(self.assets.logo, logo_pos.x, logo_pos.y, None, 0.0, Flip::None);
            for entry in &entries {
                self.gw
                    .render(entry.id, entry.pos.x, entry.pos.y, None, 0.0, Flip::None);
            }
            self.gw.present()?;
            self.pace(frame_start);
        };

        for entry in entries {
            self.gw.free(entry.id);
        }
        log::debug!("menu choice: {choice:?}");
        Ok(choice)
    }

    /// One session from spawn to the end of the death hold
    pub fn play(&mut self) -> Result<PlayOutcome, GameError> {
        let seed = self.settings.rng_seed.unwrap_or_else(clock_seed);
        let mut session = Session::new(seed, self.now_ms());
        log::info!("session started, seed {seed}");

        let mut hud: Option<(u32, TextureId)> = None;
        let outcome = 'play: loop {
            let frame_start = Instant::now();

            for event in self.gw.poll_events()? {
                match event {
                    InputEvent::Quit => break 'play PlayOutcome::Quit,
                    InputEvent::KeyDown {
                        key: Key::Space,
                        repeat: false,
                    } => handle_control(&mut session, ControlEvent::FlapPressed),
                    InputEvent::KeyUp { key: Key::Space } => {
                        handle_control(&mut session, ControlEvent::FlapReleased);
                    }
                    _ => {}
                }
            }

            advance(&mut session, self.now_ms());
            self.render_play(&session, &mut hud)?;

            if session.over {
                let score = session.score;
                let new_record = highscore::record(&self.settings.highscore_file, score);
                // Hold the final frame, then drop whatever the player mashed
                thread::sleep(Duration::from_millis(DEATH_HOLD_MS));
                let quit = self
                    .gw
                    .poll_events()?
                    .iter()
                    .any(|e| matches!(e, InputEvent::Quit));
                break 'play if quit {
                    PlayOutcome::Quit
                } else {
                    PlayOutcome::Died { score, new_record }
                };
            }
            self.pace(frame_start);
        };

        if let Some((_, id)) = hud.take() {
            self.gw.free(id);
        }
        Ok(outcome)
    }

    fn render_play(
        &mut self,
        session: &Session,
        hud: &mut Option<(u32, TextureId)>,
    ) -> Result<(), GameError> {
        // Re-rasterize the HUD only when the score changes
        let score = session.score;
        let stale = match hud {
            Some((cached, _)) => *cached != score,
            None => true,
        };
        if stale {
            if let Some((_, old)) = hud.take() {
                self.gw.free(old);
            }
            let id = self.gw.load_glyph(&format!("Score: {score}"), HUD_TEXT)?;
            *hud = Some((score, id));
        }

        self.gw.clear(PLAY_BG);

        let bg_w = self.gw.size_of(self.assets.background).x;
        self.gw
            .render(self.assets.background, session.scroll, 0, None, 0.0, Flip::None);
        self.gw.render(
            self.assets.background,
            session.scroll + bg_w,
            0,
            None,
            0.0,
            Flip::None,
        );

        for pair in &session.pairs {
            let shelf = pair.shelf().pos();
            self.gw
                .render(self.assets.shelf, shelf.x, shelf.y, None, 0.0, Flip::None);
            // Lamp art is authored bulb-up; flip it so it hangs
            let lamp = pair.lamp().pos();
            self.gw
                .render(self.assets.lamp, lamp.x, lamp.y, None, 0.0, Flip::Vertical);
        }

        let moth = session.moth.pos();
        self.gw
            .render(self.assets.moth, moth.x, moth.y, None, 0.0, Flip::None);

        if let Some((_, id)) = hud {
            self.gw.render(*id, 10, 10, None, 0.0, Flip::None);
        }
        self.gw.present()
    }

    /// Score display, either the final tally of a run or the stored best
    pub fn score_screen(&mut self, kind: ScoreScreen) -> Result<ScoreChoice, GameError> {
        let (headline, prompt, new_record) = match kind {
            ScoreScreen::Final { score, new_record } => (
                format!("Your score: {score}"),
                "Press [SPACE] to restart or [ESC] to exit.",
                new_record,
            ),
            ScoreScreen::Best(score) => {
                (format!("High Score: {score}"), "Press [ESC] to exit.", false)
            }
        };
        let restartable = matches!(kind, ScoreScreen::Final { .. });

        let headline_id = self.gw.load_glyph(&headline, SCORE_TEXT)?;
        let headline_size = self.gw.size_of(headline_id);
        let headline_pos = IVec2::new(
            (SCREEN_W - headline_size.x) / 2,
            (SCREEN_H - headline_size.y) / 2,
        );

        let prompt_id = self.gw.load_glyph(prompt, SCORE_TEXT)?;
        let prompt_size = self.gw.size_of(prompt_id);
        let prompt_pos = IVec2::new(
            (SCREEN_W - prompt_size.x) / 2,
            headline_pos.y + headline_size.y + 50,
        );

        let banner = if new_record {
            let id = self.gw.load_glyph("New high score!", SCORE_TEXT)?;
            let size = self.gw.size_of(id);
            let pos = IVec2::new((SCREEN_W - size.x) / 2, headline_pos.y - size.y - 20);
            Some((id, pos))
        } else {
            None
        };

        let choice = 'score: loop {
            let frame_start = Instant::now();

            for event in self.gw.poll_events()? {
                match event {
                    InputEvent::Quit => break 'score ScoreChoice::Quit,
                    InputEvent::KeyDown {
                        key: Key::Escape, ..
                    } => break 'score ScoreChoice::Back,
                    InputEvent::KeyDown {
                        key: Key::Space, ..
                    } if restartable => break 'score ScoreChoice::Restart,
                    _ => {}
                }
            }

            self.gw.clear(SCORE_BG);
            self.gw
                .render(headline_id, headline_pos.x, headline_pos.y, None, 0.0, Flip::None);
            self.gw
                .render(prompt_id, prompt_pos.x, prompt_pos.y, None, 0.0, Flip::None);
            if let Some((id, pos)) = banner {
                self.gw.render(id, pos.x, pos.y, None, 0.0, Flip::None);
            }
            self.gw.present()?;
            self.pace(frame_start);
        };

        self.gw.free(headline_id);
        self.gw.free(prompt_id);
        if let Some((id, _)) = banner {
            self.gw.free(id);
        }
        log::debug!("score screen: {choice:?}");
        Ok(choice)
    }

    /// Sleep out the remainder of the frame budget
    fn pace(&self, frame_start: Instant) {
        if let Some(remainder) = self.frame_budget.checked_sub(frame_start.elapsed()) {
            thread::sleep(remainder);
        }
    }

    /// Milliseconds since the app clock started
    fn now_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }
}
