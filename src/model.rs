use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_DRAW_DELAY: Duration = Duration::from_millis(2000);
pub const DEFAULT_CELEBRATION: Duration = Duration::from_millis(7000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawConfig {
    /// Suspense delay between starting a draw and announcing the winner.
    #[serde(with = "humantime_serde")]
    pub draw_delay: Duration,
    /// How long the celebration stays active once a winner is announced.
    #[serde(with = "humantime_serde")]
    pub celebration: Duration,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            draw_delay: DEFAULT_DRAW_DELAY,
            celebration: DEFAULT_CELEBRATION,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawPhase {
    Idle,
    Drawing,
    Announcing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub name: String,
    pub index: usize,
    pub audience_size: usize,
}

/// Which delayed transition a timer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Drawing -> Announcing (D1).
    Selection,
    /// Clears the celebration flag (D2).
    CelebrationEnd,
}

/// A delayed transition requested by the draw controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTimer {
    pub kind: TimerKind,
    pub generation: u64,
    pub delay: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RaffleEvent {
    AudienceChanged {
        entrants: Vec<String>,
    },
    PhaseChanged {
        phase: DrawPhase,
    },
    WinnerSelected {
        winner: Winner,
    },
    CelebrationChanged {
        active: bool,
    },
    /// A validation failure the user should see.
    Rejected(String),
    Info(InfoEvent),
    DrawCompleted {
        // Boxed to keep the event enum small.
        record: Box<DrawRecord>,
    },
}

/// Structured info events emitted by the orchestrator and consumed by UI/CLI layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InfoEvent {
    Message(String),
    Added { count: usize, total: usize },
    Reset,
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Message(msg) => msg.clone(),
            InfoEvent::Added { count, total } => {
                format!("Added {} name(s), {} in the audience", count, total)
            }
            InfoEvent::Reset => "Raffle reset".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawRecord {
    #[serde(default)]
    pub timestamp_utc: String,
    pub winner: String,
    pub index: usize,
    pub audience_size: usize,
    #[serde(with = "humantime_serde")]
    pub draw_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub celebration: Duration,
}

impl DrawRecord {
    pub fn new(winner: &Winner, cfg: &DrawConfig) -> Self {
        Self {
            timestamp_utc: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "now".into()),
            winner: winner.name.clone(),
            index: winner.index,
            audience_size: winner.audience_size,
            draw_delay: cfg.draw_delay,
            celebration: cfg.celebration,
        }
    }
}
