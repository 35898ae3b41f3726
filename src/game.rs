//! Core game state: piece control, locking, and chain resolution
//!
//! Chain resolution is a polled state machine rather than a chain of
//! callbacks: each phase carries its deadline and `update` advances the
//! phase once the deadline passes. Resetting a game drops the whole
//! machine, so a restart can never observe a stale resolution step.

use std::time::{Duration, Instant};

use crate::board::{Board, BOARD_COLS};
use crate::gem::{Gem, GemKind};
use crate::matcher;
use crate::piece::FallingPiece;
use crate::score::{self, Score};
use crate::spawner::Spawner;

/// Delay between a lock and the first match scan
pub const LOCK_SETTLE: Duration = Duration::from_millis(50);
/// How long matched gems stay visible in their clearing state
pub const CLEAR_FLASH: Duration = Duration::from_millis(550);
/// Pause between gravity compaction and the cascade re-scan
pub const CASCADE_SETTLE: Duration = Duration::from_millis(100);

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    GameOver,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    HardDrop,
    Pause,
    Quit,
}

/// Phases of the deferred resolution sequence
#[derive(Debug, Clone)]
enum ResolvePhase {
    /// No resolution in flight
    Idle,
    /// A scan is scheduled (after a lock, or a cascade re-check)
    Detecting { at: Instant },
    /// Matched gems are flashing; removed when the deadline passes
    Clearing {
        until: Instant,
        cells: Vec<(usize, usize)>,
    },
    /// Gravity has run; settling before the next scan
    Compacting { until: Instant },
}

/// Accumulated totals for the resolution triggered by one lock
#[derive(Debug, Clone)]
struct Resolution {
    phase: ResolvePhase,
    chain: u32,
    cleared: u32,
    raw_points: u64,
}

impl Resolution {
    fn idle() -> Self {
        Self {
            phase: ResolvePhase::Idle,
            chain: 0,
            cleared: 0,
            raw_points: 0,
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self.phase, ResolvePhase::Idle)
    }
}

/// The main game struct
pub struct Game {
    /// The game board
    pub board: Board,
    /// Current falling piece (None while a resolution runs)
    pub current_piece: Option<FallingPiece>,
    /// Preview of the upcoming triple
    next_triple: [GemKind; 3],
    /// Piece source and bonus-threshold bookkeeping
    spawner: Spawner,
    /// Score tracking
    pub score: Score,
    /// Current game state
    pub state: GameState,
    /// In-flight chain resolution
    resolution: Resolution,
    /// Last auto-descent tick
    last_fall: Instant,
    /// Gem id source for this game
    next_gem_id: u32,
    /// One-line feedback for the HUD and sound effects
    pub last_action: Option<String>,
}

impl Game {
    /// Create a new game with a random seed
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a new game with a fixed seed (deterministic piece sequence)
    pub fn with_seed(seed: u64) -> Self {
        let mut spawner = Spawner::with_seed(seed);
        let first = spawner.triple();
        let next = spawner.triple();
        Self {
            board: Board::new(),
            current_piece: Some(FallingPiece::spawn(first)),
            next_triple: next,
            spawner,
            score: Score::new(),
            state: GameState::Playing,
            resolution: Resolution::idle(),
            last_fall: Instant::now(),
            next_gem_id: 0,
            last_action: None,
        }
    }

    /// The upcoming triple, for the preview panel
    pub fn preview(&self) -> [GemKind; 3] {
        self.next_triple
    }

    /// Whether a chain resolution is currently in flight
    pub fn is_resolving(&self) -> bool {
        self.resolution.is_active()
    }

    /// Process an action
    pub fn process_action(&mut self, action: Action) {
        match self.state {
            GameState::GameOver => {}
            GameState::Paused => {
                if action == Action::Pause {
                    self.state = GameState::Playing;
                    self.last_fall = Instant::now();
                }
            }
            GameState::Playing => match action {
                Action::Pause => {
                    self.state = GameState::Paused;
                }
                Action::Quit => {
                    self.state = GameState::GameOver;
                    self.current_piece = None;
                }
                // Piece control is a no-op while gems are resolving
                _ if self.resolution.is_active() => {}
                Action::MoveLeft => {
                    if let Some(piece) = &mut self.current_piece {
                        piece.move_left(&self.board);
                    }
                }
                Action::MoveRight => {
                    if let Some(piece) = &mut self.current_piece {
                        piece.move_right(&self.board);
                    }
                }
                Action::Rotate => {
                    if let Some(piece) = &mut self.current_piece {
                        piece.rotate();
                    }
                }
                Action::SoftDrop => self.tick(Instant::now()),
                Action::HardDrop => self.hard_drop(Instant::now()),
            },
        }
    }

    /// Update game state (call every frame)
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// Update against an explicit clock, so tests can drive time
    pub fn update_at(&mut self, now: Instant) {
        if self.state == GameState::GameOver {
            return;
        }

        // The resolution sequence keeps running while paused; it is the
        // auto-drop timer that pause stops.
        self.resolution_tick(now);

        if self.state != GameState::Playing || self.resolution.is_active() {
            return;
        }
        if self.current_piece.is_none() {
            return;
        }

        if now.duration_since(self.last_fall) >= self.score.drop_interval() {
            self.tick(now);
        }
    }

    /// One gravity step: descend if possible, otherwise lock
    fn tick(&mut self, now: Instant) {
        if self.resolution.is_active() {
            return;
        }
        let Some(piece) = &mut self.current_piece else {
            return;
        };
        if piece.can_descend(&self.board) {
            piece.descend();
            self.last_fall = now;
        } else {
            self.lock_piece(now);
        }
    }

    /// Drop the piece to its resting row and lock immediately
    fn hard_drop(&mut self, now: Instant) {
        if self.resolution.is_active() {
            return;
        }
        let Some(piece) = &mut self.current_piece else {
            return;
        };
        piece.row = piece.drop_row(&self.board);
        self.lock_piece(now);
    }

    /// Merge the falling piece into the board and begin resolution
    fn lock_piece(&mut self, now: Instant) {
        let Some(piece) = self.current_piece.take() else {
            return;
        };
        let gems = piece.gems.map(|kind| {
            self.next_gem_id += 1;
            Gem::new(kind, self.next_gem_id)
        });
        self.board.lock_triple(piece.row, piece.col, gems);
        self.begin_resolution(now);
    }

    /// Start the resolution sequence for the freshly locked board.
    /// Starting a second sequence while one is active is silently ignored.
    fn begin_resolution(&mut self, now: Instant) {
        if self.resolution.is_active() {
            return;
        }
        self.resolution = Resolution {
            phase: ResolvePhase::Detecting {
                at: now + LOCK_SETTLE,
            },
            chain: 0,
            cleared: 0,
            raw_points: 0,
        };
    }

    /// Advance the resolution state machine past any expired deadline
    fn resolution_tick(&mut self, now: Instant) {
        match self.resolution.phase.clone() {
            ResolvePhase::Idle => {}
            ResolvePhase::Detecting { at } if now >= at => self.detect_step(now),
            ResolvePhase::Clearing { until, cells } if now >= until => {
                self.board.remove(&cells);
                self.board = self.board.apply_gravity();
                self.resolution.phase = ResolvePhase::Compacting {
                    until: now + CASCADE_SETTLE,
                };
            }
            ResolvePhase::Compacting { until } if now >= until => self.detect_step(now),
            _ => {}
        }
    }

    /// Scan the board; either mark the next wave of gems as clearing or
    /// finish the sequence
    fn detect_step(&mut self, now: Instant) {
        let scan = matcher::find_matches(&self.board);
        if scan.is_empty() {
            self.finish_resolution(now);
            return;
        }

        self.resolution.chain += 1;
        let chain = self.resolution.chain;
        let matched = scan.len() as u32;
        self.resolution.cleared += matched;
        self.resolution.raw_points +=
            u64::from(matched) * score::BASE_CLEAR * score::chain_multiplier(chain);

        self.last_action = Some(if chain > 1 {
            format!("{}x Chain!", chain)
        } else if let Some(color) = scan.wild_extended.iter().next() {
            format!("Bonus {}!", color.name())
        } else {
            format!("{} Gems", matched)
        });

        let cells = scan.cell_list();
        self.board.mark_clearing(&cells);
        self.resolution.phase = ResolvePhase::Clearing {
            until: now + CLEAR_FLASH,
            cells,
        };
    }

    /// Terminal step: settle the score, check for game over, spawn the
    /// next piece
    fn finish_resolution(&mut self, now: Instant) {
        let (chain, cleared, raw_points) = (
            self.resolution.chain,
            self.resolution.cleared,
            self.resolution.raw_points,
        );
        self.resolution = Resolution::idle();

        if chain == 0 {
            self.last_action = None;
        }

        let level_before = self.score.level;
        self.score.settle_resolution(cleared, raw_points, chain);
        self.spawner.note_score(self.score.points);
        if self.score.level > level_before {
            self.last_action = Some(format!("Level {}", self.score.level));
        }
        if chain > 0 && self.board.is_empty() {
            self.last_action = Some("All Clear!".to_string());
        }

        if self.board.top_row_occupied() || self.spawn_blocked() {
            self.state = GameState::GameOver;
            self.current_piece = None;
            return;
        }
        self.spawn_next(now);
    }

    /// A spawn is blocked when the three spawn cells aren't all free
    fn spawn_blocked(&self) -> bool {
        let col = (BOARD_COLS / 2) as i32;
        !(0..3).all(|row| self.board.is_free(row, col))
    }

    /// Promote the preview to the falling piece and draw a new preview
    fn spawn_next(&mut self, now: Instant) {
        let gems = self.spawner.finalize(self.next_triple);
        self.current_piece = Some(FallingPiece::spawn(gems));
        self.next_triple = self.spawner.triple();
        self.last_fall = now;
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BOARD_ROWS;

    /// A playing game over a prepared board with no falling piece
    fn game_with_board(rows: &[&str]) -> Game {
        let mut game = Game::with_seed(1);
        game.board = Board::from_grid(rows);
        game.current_piece = None;
        game
    }

    fn set_piece(game: &mut Game, gems: [GemKind; 3], col: i32) {
        game.current_piece = Some(FallingPiece {
            gems,
            row: 0,
            col,
        });
    }

    /// Drive the clock forward until the in-flight resolution ends
    fn settle(game: &mut Game) {
        let mut now = Instant::now();
        for _ in 0..400 {
            now += Duration::from_millis(300);
            game.update_at(now);
            if !game.is_resolving() {
                return;
            }
        }
        panic!("resolution did not terminate");
    }

    #[test]
    fn test_auto_drop_advances_piece() {
        let mut game = Game::with_seed(5);
        let start_row = game.current_piece.unwrap().row;
        let now = Instant::now() + game.score.drop_interval();
        game.update_at(now);
        assert_eq!(game.current_piece.unwrap().row, start_row + 1);
    }

    #[test]
    fn test_pause_stops_the_drop_timer() {
        let mut game = Game::with_seed(5);
        game.process_action(Action::Pause);
        assert_eq!(game.state, GameState::Paused);
        game.update_at(Instant::now() + Duration::from_secs(10));
        assert_eq!(game.current_piece.unwrap().row, 0);

        game.process_action(Action::Pause);
        assert_eq!(game.state, GameState::Playing);
        game.update_at(Instant::now() + Duration::from_secs(10));
        assert_eq!(game.current_piece.unwrap().row, 1);
    }

    #[test]
    fn test_move_left_stops_at_wall() {
        let mut game = Game::with_seed(5);
        for _ in 0..BOARD_COLS + 2 {
            game.process_action(Action::MoveLeft);
        }
        assert_eq!(game.current_piece.unwrap().col, 0);
    }

    #[test]
    fn test_hard_drop_rests_on_floor() {
        let mut game = game_with_board(&["......"]);
        set_piece(
            &mut game,
            [GemKind::Energy, GemKind::Data, GemKind::Circuit],
            3,
        );
        game.process_action(Action::HardDrop);
        assert!(game.current_piece.is_none());
        assert!(game.is_resolving());

        settle(&mut game);
        let bottom = BOARD_ROWS as i32 - 1;
        assert_eq!(game.board.gem_count(), 3);
        assert_eq!(
            game.board.get(bottom - 2, 3).unwrap().unwrap().kind,
            GemKind::Energy
        );
        assert_eq!(
            game.board.get(bottom, 3).unwrap().unwrap().kind,
            GemKind::Circuit
        );
        // Next piece spawned once the (matchless) resolution finished
        assert!(game.current_piece.is_some());
        assert_eq!(game.score.points, 0);
    }

    #[test]
    fn test_vertical_run_of_five_clears() {
        // Two Quantum gems already in the column, piece adds three more:
        // one 5-long vertical run, all cleared
        let mut game = game_with_board(&[
            "...Q..", //
            "...Q..", //
        ]);
        set_piece(&mut game, [GemKind::Quantum; 3], 3);
        game.process_action(Action::HardDrop);
        settle(&mut game);

        assert!(game.board.is_empty());
        assert_eq!(game.score.gems_cleared, 5);
        assert_eq!(game.score.best_chain, 1);
        // 5 gems * 10 * chain 1 = 50 raw, * 1.05 speed bonus = 52.5 -> 53
        assert_eq!(game.score.points, 53);
    }

    #[test]
    fn test_two_deep_cascade_scores_both_waves() {
        // The locked C completes a C row; the D gems above it fall and
        // complete a D row for a second wave
        let mut game = game_with_board(&[
            "CC.DD.", //
        ]);
        set_piece(
            &mut game,
            [GemKind::Data, GemKind::Data, GemKind::Circuit],
            2,
        );
        game.process_action(Action::HardDrop);
        settle(&mut game);

        assert_eq!(game.score.best_chain, 2);
        assert_eq!(game.score.gems_cleared, 6);
        // 3*10*1 + 3*10*2 = 90 raw, * 1.05 = 94.5 -> 95
        assert_eq!(game.score.points, 95);
        // One D gem survives
        assert_eq!(game.board.gem_count(), 1);
    }

    #[test]
    fn test_input_is_noop_during_resolution() {
        let mut game = game_with_board(&["EE...."]);
        set_piece(
            &mut game,
            [GemKind::Data, GemKind::Circuit, GemKind::Energy],
            2,
        );
        game.process_action(Action::HardDrop);
        assert!(game.is_resolving());

        let snapshot = game.board.clone();
        game.process_action(Action::MoveLeft);
        game.process_action(Action::Rotate);
        game.process_action(Action::SoftDrop);
        game.process_action(Action::HardDrop);
        assert_eq!(game.board, snapshot);
        assert!(game.is_resolving());
    }

    #[test]
    fn test_resolution_terminates_on_full_board() {
        let rows = vec!["EEEEEE"; BOARD_ROWS];
        let mut game = game_with_board(&rows);
        let now = Instant::now();
        game.begin_resolution(now);
        settle(&mut game);

        assert!(game.board.is_empty());
        assert_eq!(game.score.gems_cleared, (BOARD_ROWS * BOARD_COLS) as u32);
        assert!(!game.is_resolving());
    }

    #[test]
    fn test_game_over_when_stack_reaches_top() {
        // A tall mixed column: the locked piece tops out the well
        let mut rows = vec!["...E..", "...D.."];
        for _ in 0..4 {
            rows.push("...E..");
            rows.push("...D..");
        }
        let mut game = game_with_board(&rows);
        set_piece(
            &mut game,
            [GemKind::Circuit, GemKind::Quantum, GemKind::Circuit],
            3,
        );
        game.process_action(Action::HardDrop);
        settle(&mut game);

        assert_eq!(game.state, GameState::GameOver);
        assert!(game.current_piece.is_none());
    }

    #[test]
    fn test_bonus_threshold_arms_next_spawn() {
        // Score 480; clearing three Energy gems awards 32 points, crossing
        // the 500 threshold: the piece spawned right after carries exactly
        // one wildcard
        let mut game = game_with_board(&["EE...."]);
        game.score.points = 480;
        set_piece(
            &mut game,
            [GemKind::Data, GemKind::Data, GemKind::Energy],
            2,
        );
        game.process_action(Action::HardDrop);
        settle(&mut game);

        assert_eq!(game.score.points, 512);
        let gems = game.current_piece.unwrap().gems;
        assert_eq!(gems.iter().filter(|kind| kind.is_wild()).count(), 1);

        // Dropping that piece doesn't reach the next threshold, so the
        // following spawn is wildcard-free
        game.process_action(Action::HardDrop);
        settle(&mut game);
        if game.state == GameState::Playing {
            let gems = game.current_piece.unwrap().gems;
            assert!(!gems.iter().any(|kind| kind.is_wild()));
        }
    }

    #[test]
    fn test_quit_ends_the_game() {
        let mut game = Game::with_seed(9);
        game.process_action(Action::Quit);
        assert_eq!(game.state, GameState::GameOver);
        assert!(game.current_piece.is_none());
        // Further input is ignored
        game.process_action(Action::HardDrop);
        assert_eq!(game.state, GameState::GameOver);
    }
}
