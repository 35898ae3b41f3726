//! Terminal UI rendering with ratatui

use crate::board::{BOARD_COLS, BOARD_ROWS};
use crate::game::{Game, GameState};
use crate::menu::{Menu, MenuItemType, MenuScreen};
use crate::settings::Settings;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";

/// Total width needed: board(14) + next/stats(18) = 32
const GAME_WIDTH: u16 = 32;
/// Board height plus borders
const GAME_HEIGHT: u16 = BOARD_ROWS as u16 + 2;

/// Render the main menu
pub fn render_menu(frame: &mut Frame, menu: &Menu) {
    let area = frame.area();

    let (menu_width, menu_height) = match menu.screen {
        MenuScreen::Main => (64u16, 20u16),
        MenuScreen::HighScores => (52u16, 20u16),
        _ => (44u16, 14u16),
    };

    let menu_area = center_rect(area, menu_width, menu_height);

    let show_big_title = menu.screen == MenuScreen::Main;
    let title_height = if show_big_title { 7u16 } else { 3u16 };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(title_height), Constraint::Min(6)])
        .split(menu_area);

    if show_big_title {
        let title_lines = vec![
            Line::styled(
                " ██████╗ ███████╗███╗   ███╗███████╗ █████╗ ██╗     ██╗     ",
                Style::default().fg(Color::Magenta),
            ),
            Line::styled(
                "██╔════╝ ██╔════╝████╗ ████║██╔════╝██╔══██╗██║     ██║     ",
                Style::default().fg(Color::Magenta),
            ),
            Line::styled(
                "██║  ███╗█████╗  ██╔████╔██║█████╗  ███████║██║     ██║     ",
                Style::default().fg(Color::Magenta),
            ),
            Line::styled(
                "██║   ██║██╔══╝  ██║╚██╔╝██║██╔══╝  ██╔══██║██║     ██║     ",
                Style::default().fg(Color::Magenta),
            ),
            Line::styled(
                "╚██████╔╝███████╗██║ ╚═╝ ██║██║     ██║  ██║███████╗███████╗",
                Style::default().fg(Color::Magenta),
            ),
            Line::styled(
                " ╚═════╝ ╚══════╝╚═╝     ╚═╝╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝",
                Style::default().fg(Color::Magenta),
            ),
            Line::styled(
                "match 3 · chain cascades · don't top out",
                Style::default().fg(Color::DarkGray),
            ),
        ];
        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        frame.render_widget(title, layout[0]);
    } else {
        let screen_title = match menu.screen {
            MenuScreen::Settings => "SETTINGS",
            MenuScreen::SettingsVisual => "VISUAL SETTINGS",
            MenuScreen::SettingsGameplay => "GAMEPLAY SETTINGS",
            MenuScreen::SettingsAudio => "AUDIO SETTINGS",
            MenuScreen::HighScores => "HIGH SCORES",
            _ => "GEMFALL",
        };
        let title_lines = vec![
            Line::raw(""),
            Line::styled(screen_title, Style::default().fg(Color::Magenta).bold()),
        ];
        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        frame.render_widget(title, layout[0]);
    }

    // Menu items
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);

    let mut lines = Vec::new();
    lines.push(Line::raw("")); // Spacing

    for (i, item) in menu.items.iter().enumerate() {
        let is_selected = i == menu.selected;
        lines.push(render_menu_item(item, is_selected));
        if menu.screen != MenuScreen::HighScores {
            lines.push(Line::raw("")); // Spacing between items
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        get_controls_hint(menu),
        Style::default().fg(Color::DarkGray),
    ));

    let menu_text = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(menu_text, inner);
}

/// Render a single menu item based on its type
fn render_menu_item(item: &crate::menu::MenuItem, is_selected: bool) -> Line<'static> {
    let prefix = if is_selected { "▶ " } else { "  " };

    let base_style = if is_selected {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::White)
    };

    match &item.item_type {
        MenuItemType::Button(_) => Line::styled(format!("{}{}", prefix, item.label), base_style),
        MenuItemType::Toggle { value, .. } => {
            let value_str = if *value { "ON" } else { "OFF" };
            let value_color = if *value { Color::Green } else { Color::Red };
            Line::from(vec![
                Span::styled(format!("{}{}: ", prefix, item.label), base_style),
                Span::styled(
                    format!("< {} >", value_str),
                    Style::default().fg(value_color).bold(),
                ),
            ])
        }
        MenuItemType::Cycle {
            options, current, ..
        } => Line::from(vec![
            Span::styled(format!("{}{}: ", prefix, item.label), base_style),
            Span::styled(
                format!("< {} >", options[*current]),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        MenuItemType::Number { value, .. } => Line::from(vec![
            Span::styled(format!("{}{}: ", prefix, item.label), base_style),
            Span::styled(format!("< {} >", value), Style::default().fg(Color::Cyan)),
        ]),
        MenuItemType::Label { text } => {
            if text.is_empty() {
                Line::styled(format!("  {}", item.label), Style::default().fg(Color::Gray))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("  {}  ", item.label),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(text.clone(), Style::default().fg(Color::Gray)),
                ])
            }
        }
    }
}

/// Get the controls hint based on current menu state
fn get_controls_hint(menu: &Menu) -> String {
    if let Some(item) = menu.items.get(menu.selected) {
        match &item.item_type {
            MenuItemType::Toggle { .. }
            | MenuItemType::Cycle { .. }
            | MenuItemType::Number { .. } => "↑↓ Select  ←→ Adjust  Esc Back".to_string(),
            _ => "↑↓ Select  Enter Confirm  Esc Back".to_string(),
        }
    } else {
        "↑↓ Select  Enter Confirm  Esc Back".to_string()
    }
}

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_COLS as u16 * 2 + 2), // Board
            Constraint::Length(18),                        // Next + stats
        ])
        .split(game_area);

    render_board(frame, main_layout[0], game, settings);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Next preview
            Constraint::Min(8),    // Stats
        ])
        .split(main_layout[1]);

    render_next(frame, right_layout[0], game, settings);
    render_stats(frame, right_layout[1], game);

    // Overlays
    match game.state {
        GameState::Paused => render_pause_overlay(frame, area),
        GameState::GameOver => render_game_over(frame, area, game, settings),
        GameState::Playing => {}
    }
}

/// Render the well with locked gems, the falling piece, and the ghost
fn render_board(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let (block_char, _) = settings.visual.block_chars();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let piece = game.current_piece;
    let ghost_row = piece
        .filter(|_| settings.visual.show_ghost)
        .map(|p| p.drop_row(&game.board));

    let mut lines = Vec::with_capacity(BOARD_ROWS);
    for (row, cells) in game.board.rows().enumerate() {
        let mut spans = Vec::with_capacity(BOARD_COLS);
        for (col, cell) in cells.iter().enumerate() {
            // Falling piece overlays the board cell
            let piece_gem = piece.and_then(|p| {
                let offset = row as i32 - p.row;
                if col as i32 == p.col && (0..3).contains(&offset) {
                    Some(p.gems[offset as usize])
                } else {
                    None
                }
            });

            let span = if let Some(kind) = piece_gem {
                Span::styled(block_char, Style::default().fg(kind.color()).bold())
            } else if let Some(gem) = cell {
                if gem.clearing {
                    // Flash before removal
                    Span::styled(
                        block_char,
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD | Modifier::RAPID_BLINK),
                    )
                } else {
                    Span::styled(block_char, Style::default().fg(gem.kind.color()))
                }
            } else if let (Some(ghost), Some(p)) = (ghost_row, piece) {
                let offset = row as i32 - ghost;
                if col as i32 == p.col && (0..3).contains(&offset) && ghost != p.row {
                    Span::styled(
                        "░░",
                        Style::default().fg(p.gems[offset as usize].color()).dim(),
                    )
                } else {
                    Span::raw(EMPTY)
                }
            } else {
                Span::raw(EMPTY)
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the next-piece preview
fn render_next(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let (block_char, _) = settings.visual.block_chars();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = game
        .preview()
        .iter()
        .map(|kind| {
            Line::from(Span::styled(
                block_char,
                Style::default().fg(kind.color()),
            ))
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        inner,
    );
}

/// Render score, level, and progress stats
fn render_stats(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Stats ")
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Score ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", game.score.points),
                Style::default().fg(Color::White).bold(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Level ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", game.score.level),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            Span::styled("Gems  ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", game.score.gems_cleared),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::styled("Chain ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}x", game.score.best_chain),
                Style::default().fg(Color::Magenta),
            ),
        ]),
    ];

    if let Some(action) = &game.last_action {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            action.clone(),
            Style::default().fg(Color::Yellow).bold(),
        ));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the pause overlay
fn render_pause_overlay(frame: &mut Frame, area: Rect) {
    let overlay = center_rect(area, 22, 5);
    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let text = Paragraph::new(vec![
        Line::raw(""),
        Line::styled("PAUSED", Style::default().fg(Color::Yellow).bold()),
    ])
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(text, overlay);
}

/// Render the game over overlay with final stats
fn render_game_over(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let overlay = center_rect(area, 30, 11);
    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let is_best = settings
        .best_score()
        .map_or(true, |best| game.score.points >= best);

    let mut lines = vec![
        Line::raw(""),
        Line::styled("GAME OVER", Style::default().fg(Color::Red).bold()),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Score ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", game.score.points),
                Style::default().fg(Color::White).bold(),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!(
                    "Lv {}  {} gems  {}x chain",
                    game.score.level, game.score.gems_cleared, game.score.best_chain
                ),
                Style::default().fg(Color::Gray),
            ),
        ]),
    ];
    if is_best && game.score.points > 0 {
        lines.push(Line::styled(
            "New best!",
            Style::default().fg(Color::Yellow).bold(),
        ));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "R Restart · Esc Menu",
        Style::default().fg(Color::DarkGray),
    ));

    let text = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(text, overlay);
}

/// Center a rect of the given size within an area
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
