//! Raffle lifecycle controller.
//!
//! Single owner of the draw state. Applies UI commands, runs the delayed
//! transitions as spawned sleep tasks and emits events for presentation layers.

use crate::engine::{DrawController, TimerOutcome};
use crate::model::{DrawConfig, DrawRecord, InfoEvent, RaffleEvent, ScheduledTimer, TimerKind};
use anyhow::Result;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    AddAudience(String),
    Draw,
    Reset,
    Quit,
}

/// A timer that elapsed, posted back by its sleep task.
#[derive(Debug, Clone, Copy)]
struct TimerFired {
    kind: TimerKind,
    generation: u64,
}

/// Outstanding sleep tasks. Aborted on reset and on a new draw; the
/// generation check in the controller covers firings already in the channel.
#[derive(Default)]
struct PendingTimers {
    handles: Vec<JoinHandle<()>>,
}

impl PendingTimers {
    fn schedule(&mut self, timer: ScheduledTimer, tx: &UnboundedSender<TimerFired>) {
        let tx = tx.clone();
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(tokio::spawn(async move {
            tokio::time::sleep(timer.delay).await;
            let _ = tx.send(TimerFired {
                kind: timer.kind,
                generation: timer.generation,
            });
        }));
    }

    fn cancel_all(&mut self) {
        for h in self.handles.drain(..) {
            h.abort();
        }
    }
}

impl Drop for PendingTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Apply commands to the draw controller and emit events back to presentation layers.
pub(crate) async fn run_controller(
    cfg: DrawConfig,
    event_tx: UnboundedSender<RaffleEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let mut ctl = DrawController::new(cfg);
    let (timer_tx, mut timer_rx) = mpsc::unbounded_channel::<TimerFired>();
    let mut timers = PendingTimers::default();

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::AddAudience(text)) => match ctl.add_audience(&text) {
                        Ok(count) => {
                            let total = ctl.registry().size();
                            tracing::info!(count, total, "audience added");
                            let _ = event_tx.send(RaffleEvent::AudienceChanged {
                                entrants: ctl.registry().names(),
                            });
                            let _ = event_tx.send(RaffleEvent::Info(InfoEvent::Added { count, total }));
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, "add audience rejected");
                            let _ = event_tx.send(RaffleEvent::Rejected(e.to_string()));
                        }
                    },
                    Some(UiCommand::Draw) => match ctl.draw() {
                        Ok(timer) => {
                            // Only the new generation's timers may run.
                            timers.cancel_all();
                            timers.schedule(timer, &timer_tx);
                            let _ = event_tx.send(RaffleEvent::CelebrationChanged { active: false });
                            let _ = event_tx.send(RaffleEvent::PhaseChanged { phase: ctl.phase() });
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, "draw rejected");
                            let _ = event_tx.send(RaffleEvent::Rejected(e.to_string()));
                        }
                    },
                    Some(UiCommand::Reset) => {
                        timers.cancel_all();
                        ctl.reset();
                        tracing::info!(generation = ctl.generation(), "raffle reset");
                        let _ = event_tx.send(RaffleEvent::AudienceChanged { entrants: Vec::new() });
                        let _ = event_tx.send(RaffleEvent::CelebrationChanged { active: false });
                        let _ = event_tx.send(RaffleEvent::PhaseChanged { phase: ctl.phase() });
                        let _ = event_tx.send(RaffleEvent::Info(InfoEvent::Reset));
                    }
                    Some(UiCommand::Quit) | None => break,
                }
            }
            fired = timer_rx.recv() => {
                // We hold `timer_tx`, so the channel never closes.
                let Some(fired) = fired else { continue };
                match ctl.on_timer(fired.kind, fired.generation) {
                    TimerOutcome::WinnerSelected { winner, next } => {
                        timers.schedule(next, &timer_tx);
                        let record = DrawRecord::new(&winner, ctl.config());
                        let _ = event_tx.send(RaffleEvent::WinnerSelected { winner });
                        let _ = event_tx.send(RaffleEvent::PhaseChanged { phase: ctl.phase() });
                        let _ = event_tx.send(RaffleEvent::CelebrationChanged { active: ctl.celebrating() });
                        let _ = event_tx.send(RaffleEvent::DrawCompleted { record: Box::new(record) });
                    }
                    TimerOutcome::CelebrationEnded => {
                        tracing::info!(winner = ?ctl.winner().map(|w| w.name.as_str()), "celebration over");
                        let _ = event_tx.send(RaffleEvent::CelebrationChanged { active: false });
                    }
                    TimerOutcome::Stale => {}
                }
            }
        }
    }

    timers.cancel_all();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DrawPhase;
    use std::time::Duration;

    struct Harness {
        cmd_tx: UnboundedSender<UiCommand>,
        event_rx: UnboundedReceiver<RaffleEvent>,
        handle: JoinHandle<Result<()>>,
    }

    fn spawn_controller() -> Harness {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let cfg = DrawConfig {
            seed: Some(5),
            ..Default::default()
        };
        let handle = tokio::spawn(run_controller(cfg, event_tx, cmd_rx));
        Harness {
            cmd_tx,
            event_rx,
            handle,
        }
    }

    /// Folded view of the event stream, like a UI would keep.
    #[derive(Debug, Default)]
    struct Seen {
        entrants: Vec<String>,
        phase: Option<DrawPhase>,
        winner: Option<String>,
        celebrating: bool,
        rejected: Vec<String>,
        completed: usize,
    }

    impl Seen {
        fn drain(&mut self, rx: &mut UnboundedReceiver<RaffleEvent>) {
            while let Ok(ev) = rx.try_recv() {
                match ev {
                    RaffleEvent::AudienceChanged { entrants } => self.entrants = entrants,
                    RaffleEvent::PhaseChanged { phase } => {
                        if phase != DrawPhase::Announcing {
                            self.winner = None;
                        }
                        self.phase = Some(phase);
                    }
                    RaffleEvent::WinnerSelected { winner } => self.winner = Some(winner.name),
                    RaffleEvent::CelebrationChanged { active } => self.celebrating = active,
                    RaffleEvent::Rejected(msg) => self.rejected.push(msg),
                    RaffleEvent::DrawCompleted { .. } => self.completed += 1,
                    RaffleEvent::Info(_) => {}
                }
            }
        }
    }

    async fn settle() {
        // Let the controller task process everything queued so far.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn draw_cycle_follows_configured_delays() {
        let mut h = spawn_controller();
        let mut seen = Seen::default();

        h.cmd_tx
            .send(UiCommand::AddAudience("Alice\nBob\nCarol".into()))
            .unwrap();
        h.cmd_tx.send(UiCommand::Draw).unwrap();
        settle().await;
        seen.drain(&mut h.event_rx);
        assert_eq!(seen.entrants.len(), 3);
        assert_eq!(seen.phase, Some(DrawPhase::Drawing));
        assert!(seen.winner.is_none());

        tokio::time::sleep(Duration::from_millis(1900)).await;
        settle().await;
        seen.drain(&mut h.event_rx);
        assert_eq!(seen.phase, Some(DrawPhase::Drawing));

        tokio::time::sleep(Duration::from_millis(200)).await;
        settle().await;
        seen.drain(&mut h.event_rx);
        assert_eq!(seen.phase, Some(DrawPhase::Announcing));
        let winner = seen.winner.clone().expect("winner announced");
        assert!(["Alice", "Bob", "Carol"].contains(&winner.as_str()));
        assert!(seen.celebrating);
        assert_eq!(seen.completed, 1);

        tokio::time::sleep(Duration::from_millis(7000)).await;
        settle().await;
        seen.drain(&mut h.event_rx);
        assert!(!seen.celebrating);
        assert_eq!(seen.winner.as_deref(), Some(winner.as_str()));

        h.cmd_tx.send(UiCommand::Reset).unwrap();
        settle().await;
        seen.drain(&mut h.event_rx);
        assert!(seen.entrants.is_empty());
        assert!(seen.winner.is_none());
        assert_eq!(seen.phase, Some(DrawPhase::Idle));

        h.cmd_tx.send(UiCommand::Quit).unwrap();
        h.handle.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn reset_mid_draw_never_announces() {
        let mut h = spawn_controller();
        let mut seen = Seen::default();

        h.cmd_tx.send(UiCommand::AddAudience("Alice\nBob".into())).unwrap();
        h.cmd_tx.send(UiCommand::Draw).unwrap();
        settle().await;
        tokio::time::sleep(Duration::from_millis(1000)).await;
        h.cmd_tx.send(UiCommand::Reset).unwrap();
        settle().await;

        tokio::time::sleep(Duration::from_millis(5000)).await;
        settle().await;
        seen.drain(&mut h.event_rx);
        assert_eq!(seen.phase, Some(DrawPhase::Idle));
        assert!(seen.winner.is_none());
        assert!(!seen.celebrating);
        assert_eq!(seen.completed, 0);

        drop(h.cmd_tx);
        h.handle.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn validation_errors_are_reported() {
        let mut h = spawn_controller();
        let mut seen = Seen::default();

        h.cmd_tx.send(UiCommand::Draw).unwrap();
        h.cmd_tx.send(UiCommand::AddAudience("  \n ".into())).unwrap();
        h.cmd_tx.send(UiCommand::AddAudience("Solo".into())).unwrap();
        h.cmd_tx.send(UiCommand::Draw).unwrap();
        h.cmd_tx.send(UiCommand::Draw).unwrap();
        h.cmd_tx.send(UiCommand::AddAudience("Late".into())).unwrap();
        settle().await;
        seen.drain(&mut h.event_rx);

        assert_eq!(
            seen.rejected,
            vec![
                "Add some audience members first!".to_string(),
                "Please enter at least one name.".to_string(),
                "A draw is already in progress.".to_string(),
                "A draw is already in progress.".to_string(),
            ]
        );
        assert_eq!(seen.entrants, vec!["Solo".to_string()]);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        settle().await;
        seen.drain(&mut h.event_rx);
        assert_eq!(seen.winner.as_deref(), Some("Solo"));

        h.cmd_tx.send(UiCommand::Quit).unwrap();
        h.handle.await.unwrap().unwrap();
    }
}
