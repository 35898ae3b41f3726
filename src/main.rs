//! GEMFALL - a neon falling-gem puzzle for the terminal
//!
//! Match 3 gems in any direction, chain the cascades.

mod audio;
mod board;
mod game;
mod gem;
mod input;
mod matcher;
mod menu;
mod piece;
mod score;
mod settings;
mod spawner;
mod ui;

use audio::{AudioManager, BgmTrack, Sfx};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::{Action, Game, GameState};
use input::InputHandler;
use menu::{Menu, MenuAction, MenuScreen};
use ratatui::{backend::CrosstermBackend, Terminal};
use score::Score;
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Input delay after game over to prevent accidental menu return
const GAME_OVER_INPUT_DELAY: Duration = Duration::from_millis(800);

/// Application state
enum AppState {
    Menu(Menu),
    Playing(Game, InputHandler),
}

/// Get the gemfall temp directory, creating it if needed
fn gemfall_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("gemfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    // Setup log directory
    let log_dir = gemfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file (the terminal belongs to the TUI)
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gemfall=debug".parse().unwrap()),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "GEMFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    // Load settings
    let mut settings = Settings::load();

    // Initialize audio (optional - game works without audio)
    let mut audio = AudioManager::new();
    if let Some(ref mut a) = audio {
        a.set_bgm_volume(settings.audio.bgm_volume as f32 / 100.0);
        a.set_sfx_volume(settings.audio.sfx_volume as f32 / 100.0);
    }

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app and capture result
    let result = run_app(&mut terminal, &mut settings, &mut audio);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    // Save settings (including any new high scores)
    if let Err(e) = settings.save() {
        eprintln!("Warning: Could not save settings: {}", e);
    }

    // Print final message
    match &result {
        Ok(Some(score)) => {
            println!("\n💎 Thanks for playing GEMFALL! 💎");
            println!("Final Score: {}", score.points);
            println!(
                "Level: {} | Gems: {} | Best Chain: {}x",
                score.level, score.gems_cleared, score.best_chain
            );
        }
        Ok(None) => {
            println!("\n💎 Thanks for playing GEMFALL! 💎");
        }
        Err(_) => {}
    }

    result.map(|_| ())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &mut Settings,
    audio: &mut Option<AudioManager>,
) -> io::Result<Option<Score>> {
    let mut state = AppState::Menu(Menu::new());
    let mut last_score: Option<Score> = None;
    let mut last_action_text: Option<String> = None;
    let mut game_over_time: Option<Instant> = None;

    loop {
        // Render
        terminal.draw(|frame| match &state {
            AppState::Menu(menu) => ui::render_menu(frame, menu),
            AppState::Playing(game, _) => ui::render_game(frame, game, settings),
        })?;

        // Handle input
        if event::poll(FRAME_DURATION)? {
            let event = event::read()?;

            if let Event::Key(key) = event {
                if key.kind != KeyEventKind::Press {
                    if key.kind == KeyEventKind::Release {
                        if let AppState::Playing(_, input) = &mut state {
                            input.key_up(key);
                        }
                    }
                    continue;
                }

                match &mut state {
                    AppState::Menu(menu) => match key.code {
                        KeyCode::Up => {
                            menu.move_up();
                            if let Some(audio) = audio {
                                audio.play_sfx(Sfx::SelectMove);
                            }
                        }
                        KeyCode::Down => {
                            menu.move_down();
                            if let Some(audio) = audio {
                                audio.play_sfx(Sfx::SelectMove);
                            }
                        }
                        KeyCode::Left => menu.adjust_left(settings),
                        KeyCode::Right => menu.adjust_right(settings),
                        KeyCode::Enter => {
                            if let Some(action) = menu.select().cloned() {
                                if let Some(audio) = audio {
                                    audio.play_sfx(Sfx::SelectConfirm);
                                }
                                match action {
                                    MenuAction::StartGame => {
                                        state = start_game(settings, audio);
                                    }
                                    MenuAction::GoToScreen(screen) => {
                                        menu.go_to(screen, settings);
                                    }
                                    MenuAction::Back => {
                                        if let Some(audio) = audio {
                                            audio.play_sfx(Sfx::SelectBack);
                                        }
                                        menu.go_back(settings);
                                    }
                                    MenuAction::SaveSettings => {
                                        if let Err(e) = settings.save() {
                                            tracing::warn!("settings save failed: {}", e);
                                        }
                                    }
                                    MenuAction::Quit => {
                                        return Ok(last_score);
                                    }
                                }
                            }
                        }
                        KeyCode::Char('q') | KeyCode::Esc => {
                            if menu.screen == MenuScreen::Main {
                                return Ok(last_score);
                            } else {
                                if let Some(audio) = audio {
                                    audio.play_sfx(Sfx::SelectBack);
                                }
                                menu.go_back(settings);
                            }
                        }
                        _ => {}
                    },
                    AppState::Playing(game, input) => {
                        if game.state == GameState::GameOver {
                            // Track handled in the update section; gate input
                            // briefly so the overlay isn't dismissed by accident
                            let ready = game_over_time
                                .map_or(false, |t| t.elapsed() >= GAME_OVER_INPUT_DELAY);
                            if ready {
                                match key.code {
                                    KeyCode::Char('r') | KeyCode::Char('R') => {
                                        state = start_game(settings, audio);
                                        game_over_time = None;
                                    }
                                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                                        state = AppState::Menu(Menu::new());
                                        game_over_time = None;
                                    }
                                    _ => {}
                                }
                            }
                        } else {
                            let actions = input.key_down(key);
                            for action in actions {
                                if action == Action::HardDrop
                                    && game.state == GameState::Playing
                                    && !game.is_resolving()
                                {
                                    if let Some(audio) = audio {
                                        audio.play_sfx(Sfx::Lock);
                                    }
                                }
                                game.process_action(action);
                            }
                        }
                    }
                }
            }
        }

        // Update game state
        if let AppState::Playing(game, input) = &mut state {
            // Process held keys for DAS/ARR
            let held_actions = input.update();
            for action in held_actions {
                game.process_action(action);
            }

            // Update game logic (auto-drop and chain resolution)
            game.update();

            // Play SFX for clears, chains, and level ups
            if game.last_action != last_action_text {
                if let Some(ref action) = game.last_action {
                    if let Some(audio) = audio {
                        let sfx = if action.contains("Chain") {
                            Some(Sfx::Chain)
                        } else if action.starts_with("Level") {
                            Some(Sfx::LevelUp)
                        } else {
                            Some(Sfx::Clear)
                        };
                        if let Some(sfx) = sfx {
                            audio.play_sfx(sfx);
                        }
                    }
                }
                last_action_text = game.last_action.clone();
            }

            match game.state {
                GameState::GameOver => {
                    if game_over_time.is_none() {
                        game_over_time = Some(Instant::now());
                        tracing::info!(
                            "game over: score={} level={} gems={} chain={}",
                            game.score.points,
                            game.score.level,
                            game.score.gems_cleared,
                            game.score.best_chain
                        );
                        settings.add_high_score(
                            game.score.points,
                            game.score.gems_cleared,
                            game.score.level,
                            game.score.best_chain,
                        );
                        last_score = Some(game.score.clone());
                        if let Some(audio) = audio {
                            audio.stop_bgm();
                            audio.play_sfx(Sfx::GameOver);
                        }
                    }
                }
                GameState::Paused => {
                    input.clear();
                    if let Some(audio) = audio {
                        audio.pause_bgm();
                    }
                }
                GameState::Playing => {
                    if let Some(audio) = audio {
                        audio.resume_bgm();
                    }
                }
            }
        }
    }
}

/// Create a fresh game with input and background music
fn start_game(settings: &Settings, audio: &mut Option<AudioManager>) -> AppState {
    let game = Game::new();
    let input = InputHandler::from_settings(settings);
    if let Some(audio) = audio {
        let track = if settings.audio.bgm_track == BgmTrack::Drift.name() {
            BgmTrack::Drift
        } else {
            BgmTrack::Pulse
        };
        audio.play_bgm(track);
    }
    AppState::Playing(game, input)
}
