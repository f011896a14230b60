//! Phase controller
//!
//! Owns the grid, timer, spawner and timeline for one page lifetime and is
//! the only thing allowed to start or stop their scheduling. Every command
//! is misuse-tolerant: invalid calls are logged no-ops, never errors.

use super::schedule::{Scheduled, Scheduler, SessionHandle, Task};
use super::scorer::{self, Resolution};
use super::spawner::Spawner;
use super::state::{CellKind, GameEvent, GamePhase, Grid, Session, Snapshot};
use super::timer::{Timer, TimerTick};
use crate::consts::TIMER_TICK_MS;
use crate::settings::Tuning;

#[derive(Debug)]
pub struct Engine {
    tuning: Tuning,
    /// Base seed; session `n` spawns from `seed + n`
    seed: u64,
    sessions_started: u64,
    session: Session,
    grid: Grid,
    timer: Timer,
    spawner: Spawner,
    scheduler: Scheduler,
    /// Present only while PLAYING
    active: Option<SessionHandle>,
    events: Vec<GameEvent>,
}

impl Engine {
    /// Create an idle engine. Invalid tuning falls back to defaults.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Tuning::default()
            }
        };

        Self {
            session: Session::new(tuning.session_secs, tuning.spawn_interval_ms(0)),
            timer: Timer::new(tuning.session_secs),
            spawner: Spawner::new(seed),
            grid: Grid::new(),
            scheduler: Scheduler::new(),
            active: None,
            events: Vec::new(),
            sessions_started: 0,
            seed,
            tuning,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    /// Current virtual time (ms since the engine was created)
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Scheduled activities still waiting on the timeline
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.session.phase,
            score: self.session.score,
            combo: self.session.combo,
            time_remaining_secs: self.session.time_remaining_secs,
            spawn_interval_ms: self.session.spawn_interval_ms,
            shaking: self.now_ms() < self.session.shake_until_ms,
            cells: *self.grid.cells(),
        }
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin a fresh session. Valid from IDLE or a terminal phase; returns
    /// false (and changes nothing) while already playing.
    pub fn start(&mut self) -> bool {
        if self.session.phase == GamePhase::Playing {
            log::debug!("start ignored: session already playing");
            return false;
        }

        let from = self.session.phase;
        self.sessions_started += 1;
        self.spawner.reseed(self.seed.wrapping_add(self.sessions_started));
        self.grid.reset();
        // First spawn is armed with no delay
        self.session = Session::new(self.tuning.session_secs, 0);
        self.session.phase = GamePhase::Playing;
        self.timer.restart();

        self.active = Some(self.scheduler.open_session());
        self.arm(TIMER_TICK_MS, Task::TimerTick);
        self.arm(0, Task::SpawnTick);

        log::info!(
            "Session {} started (seed {}, {}s, win at {})",
            self.sessions_started,
            self.seed,
            self.tuning.session_secs,
            self.tuning.win_score
        );
        self.events.push(GameEvent::SessionStarted {
            session: self.sessions_started,
        });
        self.events.push(GameEvent::PhaseChanged {
            from,
            to: GamePhase::Playing,
        });
        true
    }

    /// End the session. Halts the timer and cancels every scheduled
    /// activity; a no-op unless currently playing.
    pub fn stop(&mut self, won: bool) {
        if self.session.phase != GamePhase::Playing {
            return;
        }

        let to = if won {
            GamePhase::EndedWin
        } else {
            GamePhase::EndedLoss
        };
        self.session.phase = to;
        self.timer.cancel();
        self.scheduler.cancel_all();
        self.active = None;

        log::info!(
            "Session {} ended: {:?} (score {})",
            self.sessions_started,
            to,
            self.session.score
        );
        self.events.push(GameEvent::PhaseChanged {
            from: GamePhase::Playing,
            to,
        });
    }

    /// Handle a click on `cell_id`. Ignored unless playing.
    pub fn resolve(&mut self, cell_id: usize) -> Resolution {
        if self.session.phase != GamePhase::Playing {
            log::debug!("resolve({cell_id}) ignored in {:?}", self.session.phase);
            return Resolution::Ignored;
        }

        let combo_before = self.session.combo;
        let resolution = scorer::resolve(&mut self.session, &mut self.grid, cell_id, &self.tuning);
        log::debug!("resolve({cell_id}) at combo {combo_before}: {resolution:?}");

        match resolution {
            Resolution::Ignored => {}
            Resolution::Hit { points } => self.events.push(GameEvent::Hit {
                cell: cell_id,
                points,
                combo: self.session.combo,
            }),
            Resolution::Bonus {
                points,
                extend_secs,
            } => {
                self.events.push(GameEvent::BonusHit {
                    cell: cell_id,
                    points,
                    combo: self.session.combo,
                });
                let added = self.timer.extend(extend_secs);
                self.session.time_remaining_secs = self.timer.remaining();
                self.events.push(GameEvent::TimeExtended {
                    secs: added,
                    remaining: self.session.time_remaining_secs,
                });
            }
            Resolution::Hazard { penalty } => {
                self.session.shake_until_ms = self.now_ms().saturating_add(self.tuning.shake_ms);
                self.events.push(GameEvent::HazardHit {
                    cell: cell_id,
                    penalty,
                });
            }
            Resolution::Miss => self.events.push(GameEvent::Miss { cell: cell_id }),
        }

        if resolution.awarded() && self.session.score >= self.tuning.win_score {
            self.stop(true);
        }

        resolution
    }

    /// Activate a specific EMPTY cell with the same expiry a spawn tick
    /// would arm. Returns false if not playing or the cell is not EMPTY.
    pub fn activate_cell(&mut self, cell_id: usize, kind: CellKind) -> bool {
        if self.session.phase != GamePhase::Playing {
            return false;
        }
        let Some(generation) = self.grid.activate(cell_id, kind) else {
            return false;
        };
        self.arm(
            self.tuning.cell_lifetime_ms,
            Task::Expire {
                cell: cell_id,
                generation,
            },
        );
        self.events.push(GameEvent::CellSpawned {
            cell: cell_id,
            kind,
        });
        true
    }

    /// Run everything due within the next `elapsed_ms` of virtual time
    pub fn advance(&mut self, elapsed_ms: u64) {
        let target = self.now_ms().saturating_add(elapsed_ms);
        while let Some(scheduled) = self.scheduler.pop_due(target) {
            self.dispatch(scheduled);
        }
        self.scheduler.advance_clock(target);
    }

    fn arm(&mut self, delay_ms: u64, task: Task) {
        if let Some(handle) = &self.active {
            self.scheduler.schedule(handle, delay_ms, task);
        }
    }

    fn is_live(&self, epoch: u64) -> bool {
        self.session.phase == GamePhase::Playing
            && self.active.as_ref().is_some_and(|h| h.epoch() == epoch)
    }

    fn dispatch(&mut self, scheduled: Scheduled) {
        if !self.is_live(scheduled.epoch) {
            log::debug!("dropping stale {:?}", scheduled.task);
            return;
        }

        match scheduled.task {
            Task::TimerTick => match self.timer.tick() {
                TimerTick::Running(remaining) => {
                    self.session.time_remaining_secs = remaining;
                    self.events.push(GameEvent::TimerTick { remaining });
                    self.arm(TIMER_TICK_MS, Task::TimerTick);
                }
                TimerTick::Expired => {
                    self.session.time_remaining_secs = 0;
                    self.events.push(GameEvent::TimerTick { remaining: 0 });
                    self.stop(false);
                }
                TimerTick::Stopped => {}
            },
            Task::SpawnTick => {
                if let Some((cell, kind, generation)) = self.spawner.spawn(&mut self.grid, &self.tuning) {
                    log::debug!("spawned {kind:?} at cell {cell}");
                    self.arm(self.tuning.cell_lifetime_ms, Task::Expire { cell, generation });
                    self.events.push(GameEvent::CellSpawned { cell, kind });
                }
                let interval = self.tuning.spawn_interval_ms(self.session.score);
                self.session.spawn_interval_ms = interval;
                self.arm(interval, Task::SpawnTick);
            }
            Task::Expire { cell, generation } => {
                if let Some(kind) = self.grid.expire(cell, generation) {
                    let combo_broken = kind.is_target();
                    if combo_broken {
                        self.session.combo = 0;
                    }
                    log::debug!("cell {cell} expired ({kind:?})");
                    self.events.push(GameEvent::CellExpired {
                        cell,
                        kind,
                        combo_broken,
                    });
                }
            }
        }
    }
}
