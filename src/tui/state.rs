use crate::model::{DrawPhase, DrawRecord, InfoEvent, RaffleEvent, Winner};
use crate::tui::confetti::ConfettiField;
use ratatui::{
    style::Color,
    style::Style,
    text::{Line, Span},
};

pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

pub struct UiState {
    pub tab: usize,
    pub phase: DrawPhase,
    pub info: String,

    /// Text box contents, newline separated.
    pub input: String,
    /// Set once the input was submitted; cleared when the add lands or is rejected.
    pub awaiting_add: bool,
    /// Current validation message.
    pub error: Option<String>,

    pub entrants: Vec<String>,
    pub audience_scroll: usize,
    pub winner: Option<Winner>,
    pub celebrating: bool,
    pub last_record: Option<DrawRecord>,

    pub confetti: ConfettiField,
    pub spinner_frame: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: 0,
            phase: DrawPhase::Idle,
            info: String::new(),
            input: String::new(),
            awaiting_add: false,
            error: None,
            entrants: Vec::new(),
            audience_scroll: 0,
            winner: None,
            celebrating: false,
            last_record: None,
            confetti: ConfettiField::new(),
            spinner_frame: 0,
        }
    }
}

impl UiState {
    /// "Add Audience" is enabled once the box holds something besides whitespace.
    pub fn can_add(&self) -> bool {
        !self.input.trim().is_empty()
    }

    /// "Draw Winner" is disabled with no audience or while a draw is running.
    pub fn can_draw(&self) -> bool {
        !self.entrants.is_empty() && self.phase != DrawPhase::Drawing
    }

    /// "Reset" is disabled when there is nothing to clear.
    pub fn can_reset(&self) -> bool {
        !self.entrants.is_empty() || self.winner.is_some()
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
        self.error = None;
    }

    pub fn newline(&mut self) {
        self.input.push('\n');
        self.error = None;
    }

    pub fn backspace(&mut self) {
        self.input.pop();
        self.error = None;
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.error = None;
    }

    pub fn scroll_audience(&mut self, delta: isize) {
        let max = self.entrants.len().saturating_sub(1);
        self.audience_scroll = self
            .audience_scroll
            .saturating_add_signed(delta)
            .min(max);
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn apply_event(&mut self, ev: RaffleEvent) {
        match ev {
            RaffleEvent::AudienceChanged { entrants } => {
                self.entrants = entrants;
                if self.audience_scroll >= self.entrants.len() {
                    self.audience_scroll = self.entrants.len().saturating_sub(1);
                }
            }
            RaffleEvent::PhaseChanged { phase } => {
                self.phase = phase;
                match phase {
                    DrawPhase::Drawing => {
                        self.winner = None;
                        self.error = None;
                        self.info = "Drawing…".into();
                    }
                    DrawPhase::Idle => {
                        self.winner = None;
                        self.last_record = None;
                    }
                    DrawPhase::Announcing => {}
                }
            }
            RaffleEvent::WinnerSelected { winner } => {
                self.info = format!("{} is the lucky winner!", winner.name);
                self.winner = Some(winner);
            }
            RaffleEvent::CelebrationChanged { active } => {
                self.celebrating = active;
                self.confetti.set_active(active);
            }
            RaffleEvent::Rejected(msg) => {
                self.awaiting_add = false;
                self.error = Some(msg);
            }
            RaffleEvent::Info(info) => {
                if matches!(info, InfoEvent::Added { .. }) && self.awaiting_add {
                    self.awaiting_add = false;
                    self.input.clear();
                    self.error = None;
                }
                if matches!(info, InfoEvent::Reset) {
                    self.input.clear();
                    self.error = None;
                    self.audience_scroll = 0;
                }
                self.info = info.to_message();
            }
            RaffleEvent::DrawCompleted { record } => {
                self.last_record = Some(*record);
            }
        }
    }
}

/// Key hint styled by whether its trigger is currently enabled.
pub fn key_hint(key: &str, label: &str, enabled: bool) -> Line<'static> {
    let (key_style, label_style) = if enabled {
        (
            Style::default().fg(Color::Magenta),
            Style::default().fg(Color::White),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        )
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{key:<8}"), key_style),
        Span::styled(label.to_string(), label_style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn winner(name: &str) -> Winner {
        Winner {
            name: name.into(),
            index: 0,
            audience_size: 1,
        }
    }

    #[test]
    fn triggers_follow_audience_and_phase() {
        let mut s = UiState::default();
        assert!(!s.can_add());
        assert!(!s.can_draw());
        assert!(!s.can_reset());

        s.push_char(' ');
        s.newline();
        assert!(!s.can_add());
        s.push_char('A');
        assert!(s.can_add());

        s.apply_event(RaffleEvent::AudienceChanged {
            entrants: vec!["A".into()],
        });
        assert!(s.can_draw());
        assert!(s.can_reset());

        s.apply_event(RaffleEvent::PhaseChanged {
            phase: DrawPhase::Drawing,
        });
        assert!(!s.can_draw());
    }

    #[test]
    fn editing_clears_validation_message() {
        let mut s = UiState::default();
        s.apply_event(RaffleEvent::Rejected("Please enter at least one name.".into()));
        assert!(s.error.is_some());
        s.push_char('x');
        assert!(s.error.is_none());
    }

    #[test]
    fn successful_add_clears_submitted_input() {
        let mut s = UiState::default();
        s.input = "Alice\nBob".into();
        s.awaiting_add = true;
        s.apply_event(RaffleEvent::AudienceChanged {
            entrants: vec!["Alice".into(), "Bob".into()],
        });
        s.apply_event(RaffleEvent::Info(InfoEvent::Added { count: 2, total: 2 }));
        assert!(s.input.is_empty());
        assert!(!s.awaiting_add);
        assert_eq!(s.entrants.len(), 2);
    }

    #[test]
    fn rejected_add_keeps_input() {
        let mut s = UiState::default();
        s.input = "   ".into();
        s.awaiting_add = true;
        s.apply_event(RaffleEvent::Rejected("Please enter at least one name.".into()));
        assert_eq!(s.input, "   ");
        assert!(!s.awaiting_add);
    }

    #[test]
    fn new_draw_hides_previous_winner_and_reset_clears_all() {
        let mut s = UiState::default();
        s.apply_event(RaffleEvent::WinnerSelected {
            winner: winner("Solo"),
        });
        s.apply_event(RaffleEvent::CelebrationChanged { active: true });
        assert!(s.celebrating);
        assert!(s.confetti.is_active());

        s.apply_event(RaffleEvent::CelebrationChanged { active: false });
        s.apply_event(RaffleEvent::PhaseChanged {
            phase: DrawPhase::Drawing,
        });
        assert!(s.winner.is_none());

        s.apply_event(RaffleEvent::WinnerSelected {
            winner: winner("Solo"),
        });
        s.apply_event(RaffleEvent::AudienceChanged {
            entrants: Vec::new(),
        });
        s.apply_event(RaffleEvent::PhaseChanged {
            phase: DrawPhase::Idle,
        });
        s.apply_event(RaffleEvent::Info(InfoEvent::Reset));
        assert!(s.winner.is_none());
        assert!(s.entrants.is_empty());
        assert!(!s.can_reset());
    }

    #[test]
    fn audience_scroll_is_clamped() {
        let mut s = UiState::default();
        s.apply_event(RaffleEvent::AudienceChanged {
            entrants: vec!["a".into(), "b".into(), "c".into()],
        });
        s.scroll_audience(10);
        assert_eq!(s.audience_scroll, 2);
        s.scroll_audience(-5);
        assert_eq!(s.audience_scroll, 0);
    }
}
