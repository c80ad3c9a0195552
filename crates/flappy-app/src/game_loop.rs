//! Frame pump. Runs one episode on its own thread and publishes snapshots.
//!
//! The episode is moved into the thread and owned there. Commands arrive
//! over an `mpsc` channel and are drained before every tick; each snapshot
//! is sent on a second channel and stored for synchronous polling. The
//! thread returns the episode report when the episode terminates, hits its
//! tick limit, or is shut down.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::debug;

use flappy_core::state::EpisodeSnapshot;
use flappy_sim::engine::EpisodeReport;
use flappy_sim::{Episode, EpisodeError};

use crate::state::{GameLoopCommand, Pace, SharedSnapshot};

/// Wall-clock duration of one tick at `tick_rate` Hz.
pub fn tick_duration(tick_rate: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(tick_rate.max(1)))
}

/// Handle to a running frame pump.
pub struct GameLoop {
    pub commands: mpsc::Sender<GameLoopCommand>,
    pub snapshots: mpsc::Receiver<EpisodeSnapshot>,
    pub latest_snapshot: SharedSnapshot,
    thread: JoinHandle<Result<EpisodeReport, EpisodeError>>,
}

impl GameLoop {
    /// Wait for the episode to finish.
    pub fn join(self) -> Result<EpisodeReport, EpisodeError> {
        match self.thread.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

/// Spawn the frame pump for `episode`.
pub fn spawn_game_loop(
    episode: Episode,
    pace: Pace,
    max_ticks: Option<u64>,
) -> io::Result<GameLoop> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    let (snap_tx, snap_rx) = mpsc::channel::<EpisodeSnapshot>();
    let latest_snapshot: SharedSnapshot = Arc::new(Mutex::new(None));
    let latest = Arc::clone(&latest_snapshot);

    let thread = std::thread::Builder::new()
        .name("flappy-game-loop".into())
        .spawn(move || run_game_loop(episode, pace, max_ticks, cmd_rx, snap_tx, &latest))?;

    Ok(GameLoop {
        commands: cmd_tx,
        snapshots: snap_rx,
        latest_snapshot,
        thread,
    })
}

/// The loop. Runs until the episode ends, a Shutdown command, or the
/// command channel disconnects.
fn run_game_loop(
    mut episode: Episode,
    pace: Pace,
    max_ticks: Option<u64>,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    snap_tx: mpsc::Sender<EpisodeSnapshot>,
    latest_snapshot: &Mutex<Option<EpisodeSnapshot>>,
) -> Result<EpisodeReport, EpisodeError> {
    let tick = tick_duration(episode.config().tick_rate);
    let mut paused = false;
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain pending commands; block while paused
        loop {
            let command = if paused {
                cmd_rx.recv().ok()
            } else {
                match cmd_rx.try_recv() {
                    Ok(command) => Some(command),
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => None,
                }
            };
            match command {
                Some(GameLoopCommand::Pause) => paused = true,
                Some(GameLoopCommand::Resume) => {
                    if paused {
                        paused = false;
                        next_tick_time = Instant::now();
                    }
                }
                Some(GameLoopCommand::Shutdown) | None => {
                    debug!(tick = episode.time().tick, "game loop shut down");
                    return Ok(episode.finish());
                }
            }
        }

        // 2. Host tick limit
        if max_ticks.is_some_and(|limit| episode.time().tick >= limit) {
            episode.stop();
        }

        // 3. Advance one tick (a terminated episode returns its final state)
        let snapshot = episode.tick()?;

        // 4. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }

        // 5. Publish; nobody listening is fine
        let _ = snap_tx.send(snapshot);

        if episode.is_terminated() {
            return Ok(episode.finish());
        }

        // 6. Sleep until next tick
        if pace == Pace::Realtime {
            next_tick_time += tick;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > tick * 2 {
                // Too far behind; reset to avoid a catch-up spiral
                next_tick_time = now;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flappy_core::config::SimConfig;
    use flappy_core::decision::{BoxedDecision, SensorInputs};
    use flappy_core::enums::{DeathCause, EpisodeState, TerminationReason};
    use flappy_sim::EpisodeSetup;

    fn idle_episode(config: &SimConfig, agents: usize) -> Episode {
        let pilots: Vec<BoxedDecision> = (0..agents)
            .map(|_| Box::new(|_: &SensorInputs| 0.0) as BoxedDecision)
            .collect();
        Episode::new(config, EpisodeSetup::default(), pilots).unwrap()
    }

    /// Idle agents hover in a fixed gap forever.
    fn endless_config() -> SimConfig {
        SimConfig {
            gravity: 0.0,
            gap_top_min: 300,
            gap_top_max: 301,
            score_ceiling: None,
            ..Default::default()
        }
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        tx.send(GameLoopCommand::Pause).unwrap();
        tx.send(GameLoopCommand::Resume).unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<GameLoopCommand> = rx.try_iter().collect();
        assert_eq!(
            commands,
            vec![
                GameLoopCommand::Pause,
                GameLoopCommand::Resume,
                GameLoopCommand::Shutdown
            ]
        );
    }

    #[test]
    fn test_tick_duration() {
        // 100Hz = 10ms per tick
        assert_eq!(tick_duration(100), Duration::from_millis(10));
        assert_eq!(tick_duration(30).as_nanos(), 1_000_000_000u128 / 30);
    }

    #[test]
    fn test_unthrottled_loop_publishes_every_tick() {
        let config = SimConfig::default();
        let game_loop = spawn_game_loop(idle_episode(&config, 2), Pace::Unthrottled, None).unwrap();

        let snapshots: Vec<EpisodeSnapshot> = game_loop.snapshots.iter().collect();
        assert_eq!(snapshots.len(), 24);
        assert_eq!(snapshots.last().map(|s| s.state), Some(EpisodeState::Terminated));
        for (i, snap) in snapshots.iter().enumerate() {
            assert_eq!(snap.time.tick, i as u64 + 1);
        }

        let latest = game_loop.latest_snapshot.lock().unwrap().clone();
        assert_eq!(latest.map(|s| s.time.tick), Some(24));

        let report = game_loop.join().unwrap();
        assert_eq!(report.reason, TerminationReason::Extinction);
        assert_eq!(report.count_by_cause(DeathCause::Floor), 2);
    }

    #[test]
    fn test_tick_limit_stops_the_loop() {
        let config = endless_config();
        let game_loop =
            spawn_game_loop(idle_episode(&config, 1), Pace::Unthrottled, Some(50)).unwrap();
        let report = game_loop.join().unwrap();
        assert_eq!(report.ticks, 50);
        assert_eq!(report.reason, TerminationReason::TickLimit);
        assert_eq!(report.outcomes[0].cause, DeathCause::TickLimit);
    }

    #[test]
    fn test_pause_then_shutdown() {
        let config = endless_config();
        let game_loop = spawn_game_loop(idle_episode(&config, 3), Pace::Realtime, None).unwrap();

        game_loop.commands.send(GameLoopCommand::Pause).unwrap();
        game_loop.commands.send(GameLoopCommand::Shutdown).unwrap();
        let report = game_loop.join().unwrap();

        assert_eq!(report.reason, TerminationReason::TickLimit);
        assert_eq!(report.count_by_cause(DeathCause::TickLimit), 3);
    }

    #[test]
    fn test_dropped_sender_ends_the_loop() {
        let config = endless_config();
        let GameLoop {
            commands, thread, ..
        } = spawn_game_loop(idle_episode(&config, 1), Pace::Realtime, None).unwrap();
        drop(commands);

        let report = thread.join().unwrap().unwrap();
        assert_eq!(report.reason, TerminationReason::TickLimit);
    }
}
