//! Frame driver: one tick + render per scheduled frame
//!
//! The loop stays armed while the game is `Playing`. A level-up or game over
//! disarms it; the host re-arms it by choosing an upgrade or calling `resume`.
//! Frames that arrive while disarmed still advance the session clock.

use super::state::{GameEvent, GamePhase, GameState};
use super::tick::tick;
use super::upgrade::UpgradeKind;
use crate::error::SelectError;
use crate::platform::InputSource;
use crate::renderer::{Renderer, draw_frame};

/// Host-side upgrade picker
pub trait UpgradeUi {
    /// Show the candidates; the host answers with `GameLoop::select_upgrade`
    fn open(&mut self, choices: &[UpgradeKind]);
    fn close(&mut self);
}

/// Owns the simulation context and its collaborators
pub struct GameLoop<R: Renderer, U: UpgradeUi> {
    state: GameState,
    renderer: R,
    ui: U,
    armed: bool,
    ui_open: bool,
}

impl<R: Renderer, U: UpgradeUi> GameLoop<R, U> {
    pub fn new(state: GameState, renderer: R, ui: U) -> Self {
        Self {
            state,
            renderer,
            ui,
            armed: true,
            ui_open: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// Whether the next `frame` call will run
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Run one scheduled frame. Returns false if the loop was not armed.
    pub fn frame(&mut self, input: &impl InputSource, dt_ms: f32) -> bool {
        if !self.armed {
            self.state.advance_session_clock(dt_ms);
            return false;
        }

        let input = input.sample();
        tick(&mut self.state, &input, dt_ms);
        draw_frame(&self.state, &mut self.renderer);

        match self.state.phase {
            GamePhase::Playing => {}
            GamePhase::ChoosingUpgrade => {
                self.armed = false;
                if let Some(draft) = self.state.pending_draft {
                    if !self.ui_open {
                        self.ui.open(draft.choices());
                        self.ui_open = true;
                    }
                }
            }
            GamePhase::GameOver => {
                self.armed = false;
                self.close_ui();
            }
        }
        true
    }

    /// Stop scheduling frames
    pub fn pause(&mut self) {
        self.armed = false;
    }

    /// Re-arm the loop. No-op if already armed or play cannot continue.
    pub fn resume(&mut self) -> bool {
        if self.armed || self.state.phase != GamePhase::Playing {
            return false;
        }
        self.armed = true;
        true
    }

    /// Apply one upgrade from the open draft, close the picker and resume
    pub fn select_upgrade(&mut self, index: usize) -> Result<UpgradeKind, SelectError> {
        let upgrade = self.state.choose_upgrade(index)?;
        self.close_ui();
        self.resume();
        Ok(upgrade)
    }

    /// Events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.take_events()
    }

    /// Throw the run away and start a fresh one with the same tuning
    pub fn restart(&mut self, seed: u64) {
        let tuning = self.state.tuning.clone();
        self.state = GameState::new(seed, tuning);
        self.close_ui();
        self.armed = true;
        log::info!("Started new game with seed: {}", seed);
    }

    fn close_ui(&mut self) {
        if self.ui_open {
            self.ui.close();
            self.ui_open = false;
        }
    }
}
