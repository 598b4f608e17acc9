//! Game state module - the controller state machine
//!
//! This module ties together the board, piece queue, rotation, scoring and
//! level progression. It owns no clock: [`GameState::tick`] advances the
//! drop, lock and spawn phases by the elapsed time it is handed, and every
//! command runs synchronously (a hard drop locks, scores, collapses rows and
//! may end the game before it returns).
//!
//! Mode transitions:
//!
//! ```text
//! drop ──(can't fall)──▶ lockDelay ──(500ms)──▶ spawnDelay ──(200ms)──▶ drop
//!   ▲                        │                                  │
//!   └────(can fall again)────┘                                  └──▶ gameOver
//! ```
//!
//! `paused`, `settings` and `stats` are overlays that remember the mode they
//! interrupted and restore it on exit.

use log::{debug, info};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::events::{GameEvent, LockResult, NetEvent};
use crate::garbage::{Attack, GarbageQueue};
use crate::level::LevelProgression;
use crate::pieces::PieceState;
use crate::rng::{PieceQueue, SimpleRng};
use crate::rotation::try_rotate;
use crate::scoring::{classify, Score};
use crate::snapshot::GameSnapshot;
use crate::stats::SessionStats;
use crate::types::{GameAction, GameMode, PieceKind, RotateDirection, BOARD_WIDTH};

/// Mixed into the seed so blank columns don't track the piece sequence
const ATTACK_SEED_SALT: u32 = 0x5bd1_e995;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: EngineConfig,
    board: Board,
    active: Option<PieceState>,
    hold: Option<PieceKind>,
    queue: PieceQueue,
    score: Score,
    levels: LevelProgression,
    stats: SessionStats,
    garbage: GarbageQueue,
    attack_rng: SimpleRng,
    mode: GameMode,
    /// Elapsed time in the current drop/lock/spawn phase
    mode_timer_ms: u32,
    pause_return: Option<GameMode>,
    settings_return: Option<GameMode>,
    stats_return: Option<GameMode>,
    started: bool,
    can_hold: bool,
    last_move_rotate: bool,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Monotonic id for spawned pieces within an episode.
    piece_id: u32,
    last_lock: Option<LockResult>,
    events: Vec<GameEvent>,
    net_events: Vec<NetEvent>,
}

impl GameState {
    /// Create a new game with the default rules and the given seed
    pub fn new(seed: u32) -> Self {
        Self::build(EngineConfig::with_seed(seed))
    }

    /// Create a new game from a validated config
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            board: Board::new(),
            active: None,
            hold: None,
            queue: PieceQueue::new(config.seed, config.next_depth),
            score: Score::new(),
            levels: LevelProgression::new(&config),
            stats: SessionStats::new(),
            garbage: GarbageQueue::new(),
            attack_rng: SimpleRng::new(config.seed ^ ATTACK_SEED_SALT),
            mode: GameMode::Drop,
            mode_timer_ms: 0,
            pause_return: None,
            settings_return: None,
            stats_return: None,
            started: false,
            can_hold: true,
            last_move_rotate: false,
            episode_id: 0,
            piece_id: 0,
            last_lock: None,
            events: Vec::new(),
            net_events: Vec::new(),
            config,
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.levels.reset();
        self.push_level_changed();
        self.spawn_piece();
    }

    /// Reset board, queue, score, level and stats, then start again
    pub fn restart(&mut self) {
        info!("restart (episode {})", self.episode_id.wrapping_add(1));
        let seed = self.config.seed;
        self.board.clear();
        self.active = None;
        self.hold = None;
        self.queue.reset(seed);
        self.score.reset();
        self.levels.reset();
        self.stats.reset();
        self.garbage.clear();
        self.attack_rng = SimpleRng::new(seed ^ ATTACK_SEED_SALT);
        self.mode = GameMode::Drop;
        self.mode_timer_ms = 0;
        self.pause_return = None;
        self.settings_return = None;
        self.stats_return = None;
        self.can_hold = true;
        self.last_move_rotate = false;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.piece_id = 0;
        self.last_lock = None;
        self.started = false;
        self.events.push(GameEvent::Reset);
        self.start();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn is_game_over(&self) -> bool {
        self.mode == GameMode::GameOver
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<PieceState> {
        self.active
    }

    /// Replace the active piece for a puzzle setup
    ///
    /// Only accepted in drop or lock delay, and only where the piece fits.
    pub fn set_active_piece(&mut self, piece: PieceState) -> bool {
        if !self.mode.accepts_movement() || !self.board.can_place(&piece) {
            return false;
        }
        self.active = Some(piece);
        self.last_move_rotate = false;
        self.events.push(GameEvent::PieceMoved { piece });
        true
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn next_queue(&self) -> Vec<PieceKind> {
        self.queue.preview()
    }

    pub fn score(&self) -> u64 {
        self.score.total()
    }

    pub fn score_state(&self) -> &Score {
        &self.score
    }

    pub fn combo(&self) -> u32 {
        self.score.combo()
    }

    pub fn level(&self) -> u32 {
        self.levels.level()
    }

    /// Cumulative line-clear value
    pub fn lines(&self) -> u32 {
        self.levels.lines()
    }

    pub fn levels(&self) -> &LevelProgression {
        &self.levels
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.levels.drop_interval_ms()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn last_lock(&self) -> Option<&LockResult> {
        self.last_lock.as_ref()
    }

    pub fn pending_garbage(&self) -> &GarbageQueue {
        &self.garbage
    }

    pub fn mode_timer_ms(&self) -> u32 {
        self.mode_timer_ms
    }

    pub fn last_move_rotate(&self) -> bool {
        self.last_move_rotate
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    /// Take buffered presentation events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take buffered network events
    pub fn drain_net_events(&mut self) -> Vec<NetEvent> {
        std::mem::take(&mut self.net_events)
    }

    /// Jump to a level; returns false (and changes nothing) when out of range
    pub fn set_level(&mut self, level: u32) -> bool {
        if !self.levels.set_level(level) {
            return false;
        }
        self.push_level_changed();
        true
    }

    fn push_level_changed(&mut self) {
        self.events.push(GameEvent::LevelChanged {
            level: self.levels.level(),
            to_next: self.levels.to_next(),
            total: self.levels.lines(),
        });
    }

    fn enter(&mut self, mode: GameMode) {
        self.mode = mode;
        self.mode_timer_ms = 0;
    }

    fn game_over(&mut self) {
        info!(
            "game over: score {}, level {}, {} pieces",
            self.score.total(),
            self.levels.level(),
            self.stats.pieces
        );
        self.mode = GameMode::GameOver;
        self.events.push(GameEvent::GameOver);
        self.net_events.push(NetEvent::GameOver);
    }

    fn can_fall(&self, piece: &PieceState) -> bool {
        self.board.can_place(&piece.shifted(0, 1))
    }

    fn push_score_changed(&mut self, delta: u32, label: String, leveled_up: bool) {
        self.events.push(GameEvent::ScoreChanged {
            total: self.score.total(),
            delta,
            label,
            combo: self.score.combo(),
            leveled_up,
        });
    }

    /// Spawn the next piece from the queue
    ///
    /// Pending garbage lands first. Returns false if the spawned piece
    /// overlaps the stack, which ends the game.
    pub fn spawn_piece(&mut self) -> bool {
        for attack in self.garbage.drain_all() {
            self.apply_garbage(attack.garbage_rows(), attack.blank_column);
        }

        let kind = self.queue.advance();
        let piece = PieceState::spawn(kind);
        self.active = Some(piece);
        self.piece_id = self.piece_id.wrapping_add(1);
        self.can_hold = true;
        self.last_move_rotate = false;
        self.stats.pieces += 1;
        self.enter(GameMode::Drop);

        debug!("spawn #{} {}", self.piece_id, kind.label());
        self.events.push(GameEvent::PieceSpawned { piece });
        self.net_events.push(NetEvent::PieceSync {
            current: kind,
            next: self.queue.preview(),
            hold: self.hold,
        });

        if !self.board.can_place(&piece) {
            self.game_over();
            return false;
        }
        true
    }

    fn apply_garbage(&mut self, rows: usize, blank_column: u8) {
        if rows == 0 {
            return;
        }
        let blank_column = self.board.insert_garbage_rows(rows, blank_column as usize) as u8;
        self.stats.garbage_rows_received += rows as u32;
        self.events.push(GameEvent::GarbageInserted { rows, blank_column });
    }

    /// Queue an incoming attack for the next spawn
    pub fn queue_attack(&mut self, attack: Attack) {
        debug!(
            "queued {} ({} rows, blank {})",
            attack.label,
            attack.garbage_rows(),
            attack.blank_column
        );
        self.garbage.push(attack);
    }

    /// Push garbage rows in immediately
    ///
    /// An active piece that now overlaps the stack is lifted by `count` rows;
    /// if it still doesn't fit the game ends. Ignored before start and after
    /// game over.
    pub fn insert_garbage_rows(&mut self, count: usize, empty_column: u8) -> bool {
        if !self.started || self.is_game_over() || count == 0 {
            return false;
        }
        self.apply_garbage(count, empty_column);

        if let Some(piece) = self.active {
            if !self.board.can_place(&piece) {
                let lifted = piece.shifted(0, -(count.min(i8::MAX as usize) as i8));
                if self.board.can_place(&lifted) {
                    self.active = Some(lifted);
                    self.events.push(GameEvent::PieceMoved { piece: lifted });
                } else {
                    self.game_over();
                }
            }
        }
        true
    }

    /// Where the active piece would land
    pub fn ghost(&self) -> Option<PieceState> {
        let piece = self.active?;
        let rows = self.drop_distance(&piece);
        Some(piece.shifted(0, rows as i8))
    }

    fn drop_distance(&self, piece: &PieceState) -> u32 {
        let mut rows = 0;
        while self.board.can_place(&piece.shifted(0, rows as i8 + 1)) {
            rows += 1;
        }
        rows
    }

    /// Advance time by `elapsed_ms`
    ///
    /// Returns whether anything visible changed (a gravity step, lock or spawn).
    pub fn tick(&mut self, elapsed_ms: u32) -> EngineResult<bool> {
        if !self.started || !self.mode.is_running() {
            return Ok(false);
        }
        self.stats.active_ms += elapsed_ms as u64;

        match self.mode {
            GameMode::Drop => {
                let Some(mut piece) = self.active else {
                    return Ok(false);
                };
                let interval = self.levels.drop_interval_ms().max(1);
                self.mode_timer_ms = self.mode_timer_ms.saturating_add(elapsed_ms);
                let mut changed = false;
                while self.mode_timer_ms >= interval {
                    if self.can_fall(&piece) {
                        piece = piece.shifted(0, 1);
                        self.active = Some(piece);
                        self.last_move_rotate = false;
                        self.mode_timer_ms -= interval;
                        self.events.push(GameEvent::PieceMoved { piece });
                        changed = true;
                    } else {
                        self.enter(GameMode::LockDelay);
                        break;
                    }
                }
                Ok(changed)
            }
            GameMode::LockDelay => {
                let Some(piece) = self.active else {
                    return Ok(false);
                };
                if self.can_fall(&piece) {
                    self.enter(GameMode::Drop);
                    return Ok(false);
                }
                self.mode_timer_ms = self.mode_timer_ms.saturating_add(elapsed_ms);
                if self.mode_timer_ms >= self.config.lock_wait_ms {
                    self.lock_piece()?;
                    return Ok(true);
                }
                Ok(false)
            }
            GameMode::SpawnDelay => {
                self.mode_timer_ms = self.mode_timer_ms.saturating_add(elapsed_ms);
                if self.mode_timer_ms >= self.config.spawn_wait_ms {
                    self.spawn_piece();
                    return Ok(true);
                }
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    /// Commit the active piece, clear rows, score, and enter spawn delay
    pub fn lock_piece(&mut self) -> EngineResult<Option<LockResult>> {
        let Some(piece) = self.active else {
            return Ok(None);
        };
        // Nothing changes if the seal is already broken
        self.score.verify()?;

        let rows = self.board.rows_completed_by(&piece);
        let classification = classify(&self.board, &piece, self.last_move_rotate, rows);

        self.board.commit(&piece);
        let cleared = self.board.clear_full_rows();
        self.active = None;
        self.last_move_rotate = false;

        let score = self
            .score
            .resolve(classification, cleared.len(), self.levels.level())?;
        let leveled_up = self.levels.adjust_lines(score.line_clear_value);
        self.stats.record_lock(&score, self.score.total());
        let topped_out = self.board.is_topout_condition();

        for &label in &score.attacks {
            let blank_column = self.attack_rng.next_range(BOARD_WIDTH as u32) as u8;
            self.net_events.push(NetEvent::Attack {
                attack: Attack::new(label, blank_column),
            });
        }

        let result = LockResult {
            piece,
            cleared_rows: cleared.to_vec(),
            score,
            leveled_up,
            topped_out,
        };

        if !cleared.is_empty() {
            self.events.push(GameEvent::LinesCleared {
                rows: cleared.to_vec(),
            });
        }
        self.events.push(GameEvent::PieceLocked {
            result: result.clone(),
        });
        if result.score.total > 0 {
            self.push_score_changed(result.score.total, result.score.name.clone(), leveled_up);
        }
        if result.score.line_clear_value > 0 {
            self.push_level_changed();
        }
        self.net_events.push(NetEvent::BoardSync {
            grid: self.board.to_u8_grid(),
        });

        self.last_lock = Some(result.clone());
        self.enter(GameMode::SpawnDelay);
        if topped_out {
            self.game_over();
        }
        Ok(Some(result))
    }

    fn slide(&mut self, dx: i8) -> bool {
        if !self.mode.accepts_movement() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        let moved = piece.shifted(dx, 0);
        if !self.board.can_place(&moved) {
            return false;
        }
        self.active = Some(moved);
        self.last_move_rotate = false;
        if self.mode == GameMode::LockDelay {
            self.mode_timer_ms = 0;
        }
        self.events.push(GameEvent::PieceMoved { piece: moved });
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.slide(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.slide(1)
    }

    /// Rotate with wall kicks; a blocked rotation changes nothing
    pub fn rotate(&mut self, direction: RotateDirection) -> bool {
        if !self.mode.accepts_movement() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        let Some(rotated) = try_rotate(&self.board, &piece, direction) else {
            return false;
        };
        self.active = Some(rotated);
        self.last_move_rotate = true;
        self.stats.rotations += 1;
        if self.mode == GameMode::LockDelay {
            self.mode_timer_ms = 0;
        }
        self.events.push(GameEvent::PieceMoved { piece: rotated });
        true
    }

    /// Move down one row for a point; in lock delay a grounded piece locks
    pub fn soft_drop(&mut self) -> EngineResult<bool> {
        if !self.mode.accepts_movement() {
            return Ok(false);
        }
        let Some(piece) = self.active else {
            return Ok(false);
        };
        self.stats.soft_drops += 1;

        if self.can_fall(&piece) {
            let moved = piece.shifted(0, 1);
            let delta = self.score.add_soft_drop_bonus()?;
            self.active = Some(moved);
            self.last_move_rotate = false;
            if self.mode == GameMode::LockDelay {
                self.enter(GameMode::Drop);
            }
            self.events.push(GameEvent::PieceMoved { piece: moved });
            self.push_score_changed(delta, String::new(), false);
            return Ok(true);
        }

        match self.mode {
            GameMode::Drop => {
                self.enter(GameMode::LockDelay);
                Ok(true)
            }
            GameMode::LockDelay if self.config.soft_drop_locks => {
                self.lock_piece()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Drop to the landing row and lock at once (drop mode only)
    pub fn hard_drop(&mut self) -> EngineResult<Option<LockResult>> {
        if self.mode != GameMode::Drop {
            return Ok(None);
        }
        let Some(piece) = self.active else {
            return Ok(None);
        };
        let rows = self.drop_distance(&piece);
        let delta = self.score.add_hard_drop_bonus(rows)?;
        let landed = piece.shifted(0, rows as i8);
        self.active = Some(landed);
        // A hard drop is the last input before the lock
        self.last_move_rotate = false;
        if rows > 0 {
            self.events.push(GameEvent::PieceMoved { piece: landed });
        }
        self.stats.hard_drops += 1;
        if delta > 0 {
            self.push_score_changed(delta, String::new(), false);
        }
        self.lock_piece()
    }

    /// Swap the active piece with the hold slot, once per spawn
    ///
    /// The incoming piece restarts at its spawn position in rotation 0. The
    /// first hold of a game takes the next piece from the queue.
    pub fn hold_swap(&mut self) -> bool {
        if !self.mode.accepts_movement() || !self.can_hold {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        let incoming = match self.hold {
            Some(kind) => kind,
            None => self.queue.advance(),
        };
        self.hold = Some(piece.kind);
        let swapped = PieceState::spawn(incoming);
        self.active = Some(swapped);
        self.can_hold = false;
        self.last_move_rotate = false;
        self.stats.holds += 1;
        self.enter(GameMode::Drop);

        self.events.push(GameEvent::PieceSpawned { piece: swapped });
        self.net_events.push(NetEvent::PieceSync {
            current: incoming,
            next: self.queue.preview(),
            hold: self.hold,
        });

        if !self.board.can_place(&swapped) {
            self.game_over();
        }
        true
    }

    /// Overlays open over a started game, never over stats or game over
    fn overlay_allowed(&self) -> bool {
        self.started && !matches!(self.mode, GameMode::Stats | GameMode::GameOver)
    }

    /// Pause over the current mode
    ///
    /// Each overlay appears at most once in the chain, so a pause already
    /// open beneath a settings screen refuses to open again.
    pub fn pause(&mut self) -> bool {
        if !self.overlay_allowed() || self.pause_return.is_some() {
            return false;
        }
        self.pause_return = Some(self.mode);
        self.mode = GameMode::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.mode != GameMode::Paused {
            return false;
        }
        self.mode = self.pause_return.take().unwrap_or(GameMode::Drop);
        true
    }

    pub fn open_settings(&mut self) -> bool {
        if !self.overlay_allowed() || self.settings_return.is_some() {
            return false;
        }
        self.settings_return = Some(self.mode);
        self.mode = GameMode::Settings;
        true
    }

    pub fn close_settings(&mut self) -> bool {
        if self.mode != GameMode::Settings {
            return false;
        }
        self.mode = self.settings_return.take().unwrap_or(GameMode::Drop);
        true
    }

    pub fn open_stats(&mut self) -> bool {
        if !self.overlay_allowed() {
            return false;
        }
        self.stats_return = Some(self.mode);
        self.mode = GameMode::Stats;
        true
    }

    pub fn close_stats(&mut self) -> bool {
        if self.mode != GameMode::Stats {
            return false;
        }
        self.mode = self.stats_return.take().unwrap_or(GameMode::Drop);
        true
    }

    /// Apply a game action
    ///
    /// Returns whether the action was accepted.
    pub fn apply_action(&mut self, action: GameAction) -> EngineResult<bool> {
        let accepted = match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => self.soft_drop()?,
            GameAction::HardDrop => self.hard_drop()?.is_some(),
            GameAction::RotateCw => self.rotate(RotateDirection::Clockwise),
            GameAction::RotateCcw => self.rotate(RotateDirection::CounterClockwise),
            GameAction::Hold => self.hold_swap(),
            GameAction::Pause => self.pause(),
            GameAction::Resume => self.resume(),
            GameAction::OpenSettings => self.open_settings(),
            GameAction::CloseSettings => self.close_settings(),
            GameAction::OpenStats => self.open_stats(),
            GameAction::CloseStats => self.close_stats(),
            GameAction::Restart => {
                self.restart();
                true
            }
        };
        Ok(accepted)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        out.active = self.active;
        out.ghost = self.ghost();
        out.hold = self.hold;
        out.next_queue = self.queue.preview();
        out.can_hold = self.can_hold;
        out.mode = self.mode;
        out.episode_id = self.episode_id;
        out.piece_id = self.piece_id;
        out.score = self.score.total();
        out.combo = self.score.combo();
        out.level = self.levels.level();
        out.lines = self.levels.lines();
        out.to_next = self.levels.to_next();
        out.drop_interval_ms = self.levels.drop_interval_ms();
        out.mode_timer_ms = self.mode_timer_ms;
        out.pending_garbage_rows = self.garbage.total_pending();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
