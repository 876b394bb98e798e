//! Draw controller: the raffle state machine.
//!
//! Owns the audience registry, the current winner and the celebration flag.
//! Delayed transitions are not run here; the controller hands back a
//! [`ScheduledTimer`] tagged with the current draw generation and the owner
//! feeds it back through [`DrawController::on_timer`] once the delay elapsed.
//! Any draw or reset bumps the generation, so firings issued before it are
//! ignored.

mod selection;

use crate::error::ValidationError;
use crate::model::{DrawConfig, DrawPhase, ScheduledTimer, TimerKind, Winner};
use crate::registry::AudienceRegistry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// What a timer firing did to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerOutcome {
    /// Drawing -> Announcing. The celebration clear is scheduled next.
    WinnerSelected {
        winner: Winner,
        next: ScheduledTimer,
    },
    CelebrationEnded,
    /// Issued for an older generation or a state that no longer applies.
    Stale,
}

pub struct DrawController<R = StdRng> {
    cfg: DrawConfig,
    registry: AudienceRegistry,
    phase: DrawPhase,
    winner: Option<Winner>,
    celebrating: bool,
    generation: u64,
    rng: R,
}

impl DrawController<StdRng> {
    pub fn new(cfg: DrawConfig) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(cfg, rng)
    }
}

impl<R: Rng> DrawController<R> {
    pub fn with_rng(cfg: DrawConfig, rng: R) -> Self {
        Self {
            cfg,
            registry: AudienceRegistry::new(),
            phase: DrawPhase::Idle,
            winner: None,
            celebrating: false,
            generation: 0,
            rng,
        }
    }

    pub fn config(&self) -> &DrawConfig {
        &self.cfg
    }

    pub fn registry(&self) -> &AudienceRegistry {
        &self.registry
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn winner(&self) -> Option<&Winner> {
        self.winner.as_ref()
    }

    pub fn celebrating(&self) -> bool {
        self.celebrating
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Add names from free text. The list is frozen while a selection is pending.
    pub fn add_audience(&mut self, raw_text: &str) -> Result<usize, ValidationError> {
        if self.phase == DrawPhase::Drawing {
            return Err(ValidationError::DrawInProgress);
        }
        self.registry.append(raw_text)
    }

    /// Start a draw. Allowed from `Idle` and `Announcing`.
    pub fn draw(&mut self) -> Result<ScheduledTimer, ValidationError> {
        if self.phase == DrawPhase::Drawing {
            return Err(ValidationError::DrawInProgress);
        }
        if self.registry.is_empty() {
            return Err(ValidationError::EmptyAudience);
        }

        self.generation += 1;
        self.phase = DrawPhase::Drawing;
        self.winner = None;
        self.celebrating = false;
        tracing::debug!(
            generation = self.generation,
            audience = self.registry.size(),
            "draw started"
        );

        Ok(ScheduledTimer {
            kind: TimerKind::Selection,
            generation: self.generation,
            delay: self.cfg.draw_delay,
        })
    }

    /// Apply a timer firing issued for `generation`.
    pub fn on_timer(&mut self, kind: TimerKind, generation: u64) -> TimerOutcome {
        if generation != self.generation {
            tracing::debug!(
                ?kind,
                generation,
                current = self.generation,
                "ignoring stale timer"
            );
            return TimerOutcome::Stale;
        }

        match (kind, self.phase) {
            (TimerKind::Selection, DrawPhase::Drawing) => self.select_winner(),
            (TimerKind::CelebrationEnd, DrawPhase::Announcing) if self.celebrating => {
                self.celebrating = false;
                tracing::debug!(generation, "celebration ended");
                TimerOutcome::CelebrationEnded
            }
            _ => TimerOutcome::Stale,
        }
    }

    /// Back to `Idle` with an empty audience. Pending timers become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = DrawPhase::Idle;
        self.winner = None;
        self.celebrating = false;
        self.registry.clear();
        tracing::debug!(generation = self.generation, "raffle reset");
    }

    fn select_winner(&mut self) -> TimerOutcome {
        let size = self.registry.size();
        let Some(index) = selection::pick_index(&mut self.rng, size) else {
            // The list is frozen while Drawing; fall back to Idle regardless.
            self.phase = DrawPhase::Idle;
            return TimerOutcome::Stale;
        };
        let Some(entrant) = self.registry.get(index) else {
            self.phase = DrawPhase::Idle;
            return TimerOutcome::Stale;
        };

        let winner = Winner {
            name: entrant.as_str().to_string(),
            index,
            audience_size: size,
        };
        self.phase = DrawPhase::Announcing;
        self.winner = Some(winner.clone());
        self.celebrating = true;
        tracing::info!(
            generation = self.generation,
            winner = %winner.name,
            index,
            audience = size,
            "winner selected"
        );

        TimerOutcome::WinnerSelected {
            winner,
            next: ScheduledTimer {
                kind: TimerKind::CelebrationEnd,
                generation: self.generation,
                delay: self.cfg.celebration,
            },
        }
    }
}
