//! Main menu system with settings configuration

use crate::settings::Settings;

/// Menu screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuScreen {
    Main,
    Settings,
    SettingsVisual,
    SettingsGameplay,
    SettingsAudio,
    HighScores,
}

/// Menu state
#[derive(Debug, Clone)]
pub struct Menu {
    pub screen: MenuScreen,
    pub selected: usize,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub item_type: MenuItemType,
}

#[derive(Debug, Clone)]
pub enum MenuItemType {
    /// Simple button that triggers an action
    Button(MenuAction),
    /// Toggle boolean setting
    Toggle { key: SettingKey, value: bool },
    /// Cycle through options
    Cycle {
        key: SettingKey,
        options: Vec<String>,
        current: usize,
    },
    /// Numeric value with increment/decrement
    Number {
        key: SettingKey,
        value: u64,
        min: u64,
        max: u64,
        step: u64,
    },
    /// Display-only label (not selectable)
    Label { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    StartGame,
    GoToScreen(MenuScreen),
    Back,
    Quit,
    SaveSettings,
}

/// Setting keys for identifying which setting to modify
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingKey {
    ShowGhost,
    BlockStyle,
    DasMs,
    ArrMs,
    BgmVolume,
    SfxVolume,
    BgmTrack,
}

impl Menu {
    pub fn new() -> Self {
        Self::main_menu()
    }

    pub fn main_menu() -> Self {
        Self {
            screen: MenuScreen::Main,
            selected: 0,
            items: vec![
                MenuItem {
                    label: "Play".to_string(),
                    item_type: MenuItemType::Button(MenuAction::StartGame),
                },
                MenuItem {
                    label: "High Scores".to_string(),
                    item_type: MenuItemType::Button(MenuAction::GoToScreen(MenuScreen::HighScores)),
                },
                MenuItem {
                    label: "Settings".to_string(),
                    item_type: MenuItemType::Button(MenuAction::GoToScreen(MenuScreen::Settings)),
                },
                MenuItem {
                    label: "Quit".to_string(),
                    item_type: MenuItemType::Button(MenuAction::Quit),
                },
            ],
        }
    }

    pub fn settings_menu() -> Self {
        Self {
            screen: MenuScreen::Settings,
            selected: 0,
            items: vec![
                MenuItem {
                    label: "Visual".to_string(),
                    item_type: MenuItemType::Button(MenuAction::GoToScreen(
                        MenuScreen::SettingsVisual,
                    )),
                },
                MenuItem {
                    label: "Gameplay".to_string(),
                    item_type: MenuItemType::Button(MenuAction::GoToScreen(
                        MenuScreen::SettingsGameplay,
                    )),
                },
                MenuItem {
                    label: "Audio".to_string(),
                    item_type: MenuItemType::Button(MenuAction::GoToScreen(
                        MenuScreen::SettingsAudio,
                    )),
                },
                MenuItem {
                    label: "Save".to_string(),
                    item_type: MenuItemType::Button(MenuAction::SaveSettings),
                },
                MenuItem {
                    label: "Back".to_string(),
                    item_type: MenuItemType::Button(MenuAction::Back),
                },
            ],
        }
    }

    pub fn settings_visual(settings: &Settings) -> Self {
        let block_styles = vec![
            "solid".to_string(),
            "bracket".to_string(),
            "round".to_string(),
        ];
        let current_style = block_styles
            .iter()
            .position(|s| s == &settings.visual.block_style)
            .unwrap_or(0);

        Self {
            screen: MenuScreen::SettingsVisual,
            selected: 0,
            items: vec![
                MenuItem {
                    label: "Ghost Piece".to_string(),
                    item_type: MenuItemType::Toggle {
                        key: SettingKey::ShowGhost,
                        value: settings.visual.show_ghost,
                    },
                },
                MenuItem {
                    label: "Block Style".to_string(),
                    item_type: MenuItemType::Cycle {
                        key: SettingKey::BlockStyle,
                        options: block_styles,
                        current: current_style,
                    },
                },
                MenuItem {
                    label: "Back".to_string(),
                    item_type: MenuItemType::Button(MenuAction::Back),
                },
            ],
        }
    }

    pub fn settings_gameplay(settings: &Settings) -> Self {
        Self {
            screen: MenuScreen::SettingsGameplay,
            selected: 0,
            items: vec![
                MenuItem {
                    label: "DAS (ms)".to_string(),
                    item_type: MenuItemType::Number {
                        key: SettingKey::DasMs,
                        value: settings.gameplay.das_ms,
                        min: 0,
                        max: 500,
                        step: 10,
                    },
                },
                MenuItem {
                    label: "ARR (ms)".to_string(),
                    item_type: MenuItemType::Number {
                        key: SettingKey::ArrMs,
                        value: settings.gameplay.arr_ms,
                        min: 0,
                        max: 100,
                        step: 5,
                    },
                },
                MenuItem {
                    label: "Back".to_string(),
                    item_type: MenuItemType::Button(MenuAction::Back),
                },
            ],
        }
    }

    pub fn settings_audio(settings: &Settings) -> Self {
        let bgm_tracks = vec!["Pulse".to_string(), "Drift".to_string()];
        let current_track = bgm_tracks
            .iter()
            .position(|s| s == &settings.audio.bgm_track)
            .unwrap_or(0);

        Self {
            screen: MenuScreen::SettingsAudio,
            selected: 0,
            items: vec![
                MenuItem {
                    label: "BGM Volume".to_string(),
                    item_type: MenuItemType::Number {
                        key: SettingKey::BgmVolume,
                        value: settings.audio.bgm_volume as u64,
                        min: 0,
                        max: 100,
                        step: 5,
                    },
                },
                MenuItem {
                    label: "SFX Volume".to_string(),
                    item_type: MenuItemType::Number {
                        key: SettingKey::SfxVolume,
                        value: settings.audio.sfx_volume as u64,
                        min: 0,
                        max: 100,
                        step: 5,
                    },
                },
                MenuItem {
                    label: "BGM Track".to_string(),
                    item_type: MenuItemType::Cycle {
                        key: SettingKey::BgmTrack,
                        options: bgm_tracks,
                        current: current_track,
                    },
                },
                MenuItem {
                    label: "Back".to_string(),
                    item_type: MenuItemType::Button(MenuAction::Back),
                },
            ],
        }
    }

    pub fn high_scores(settings: &Settings) -> Self {
        let mut items = Vec::new();
        if settings.high_scores.is_empty() {
            items.push(MenuItem {
                label: "No games played yet".to_string(),
                item_type: MenuItemType::Label {
                    text: String::new(),
                },
            });
        } else {
            for (i, entry) in settings.high_scores.iter().enumerate() {
                items.push(MenuItem {
                    label: format!("{:2}. {:>8}", i + 1, entry.score),
                    item_type: MenuItemType::Label {
                        text: format!(
                            "Lv {}  {} gems  {}x chain  {}",
                            entry.level, entry.gems, entry.best_chain, entry.date
                        ),
                    },
                });
            }
        }
        items.push(MenuItem {
            label: "Back".to_string(),
            item_type: MenuItemType::Button(MenuAction::Back),
        });

        let selected = items.len() - 1;
        Self {
            screen: MenuScreen::HighScores,
            selected,
            items,
        }
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len().saturating_sub(1);
        }
    }

    pub fn move_down(&mut self) {
        if self.selected < self.items.len() - 1 {
            self.selected += 1;
        } else {
            self.selected = 0;
        }
    }

    /// Handle left/right for cycling options and numbers
    pub fn adjust_left(&mut self, settings: &mut Settings) {
        if let Some(item) = self.items.get_mut(self.selected) {
            match &mut item.item_type {
                MenuItemType::Toggle { key, value } => {
                    *value = !*value;
                    apply_setting(settings, key, &SettingValue::Bool(*value));
                }
                MenuItemType::Cycle {
                    key,
                    options,
                    current,
                } => {
                    *current = if *current == 0 {
                        options.len() - 1
                    } else {
                        *current - 1
                    };
                    apply_setting(settings, key, &SettingValue::String(options[*current].clone()));
                }
                MenuItemType::Number {
                    key,
                    value,
                    min,
                    step,
                    ..
                } => {
                    *value = value.saturating_sub(*step).max(*min);
                    apply_setting(settings, key, &SettingValue::Number(*value));
                }
                _ => {}
            }
        }
    }

    pub fn adjust_right(&mut self, settings: &mut Settings) {
        if let Some(item) = self.items.get_mut(self.selected) {
            match &mut item.item_type {
                MenuItemType::Toggle { key, value } => {
                    *value = !*value;
                    apply_setting(settings, key, &SettingValue::Bool(*value));
                }
                MenuItemType::Cycle {
                    key,
                    options,
                    current,
                } => {
                    *current = (*current + 1) % options.len();
                    apply_setting(settings, key, &SettingValue::String(options[*current].clone()));
                }
                MenuItemType::Number {
                    key,
                    value,
                    max,
                    step,
                    ..
                } => {
                    *value = (*value + *step).min(*max);
                    apply_setting(settings, key, &SettingValue::Number(*value));
                }
                _ => {}
            }
        }
    }

    /// Get the action for the current selection (for Button types)
    pub fn select(&self) -> Option<&MenuAction> {
        if let Some(item) = self.items.get(self.selected) {
            if let MenuItemType::Button(action) = &item.item_type {
                return Some(action);
            }
        }
        None
    }

    pub fn go_to(&mut self, screen: MenuScreen, settings: &Settings) {
        *self = match screen {
            MenuScreen::Main => Self::main_menu(),
            MenuScreen::Settings => Self::settings_menu(),
            MenuScreen::SettingsVisual => Self::settings_visual(settings),
            MenuScreen::SettingsGameplay => Self::settings_gameplay(settings),
            MenuScreen::SettingsAudio => Self::settings_audio(settings),
            MenuScreen::HighScores => Self::high_scores(settings),
        };
    }

    /// Go back to previous screen
    pub fn go_back(&mut self, settings: &Settings) {
        let prev = match self.screen {
            MenuScreen::Main => MenuScreen::Main,
            MenuScreen::Settings => MenuScreen::Main,
            MenuScreen::SettingsVisual => MenuScreen::Settings,
            MenuScreen::SettingsGameplay => MenuScreen::Settings,
            MenuScreen::SettingsAudio => MenuScreen::Settings,
            MenuScreen::HighScores => MenuScreen::Main,
        };
        self.go_to(prev, settings);
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper enum for setting values
enum SettingValue {
    Bool(bool),
    String(String),
    Number(u64),
}

/// Apply a setting change to the Settings struct
fn apply_setting(settings: &mut Settings, key: &SettingKey, value: &SettingValue) {
    match (key, value) {
        (SettingKey::ShowGhost, SettingValue::Bool(v)) => {
            settings.visual.show_ghost = *v;
        }
        (SettingKey::BlockStyle, SettingValue::String(v)) => {
            settings.visual.block_style = v.clone();
        }
        (SettingKey::DasMs, SettingValue::Number(v)) => {
            settings.gameplay.das_ms = *v;
        }
        (SettingKey::ArrMs, SettingValue::Number(v)) => {
            settings.gameplay.arr_ms = *v;
        }
        (SettingKey::BgmVolume, SettingValue::Number(v)) => {
            settings.audio.bgm_volume = *v as u32;
        }
        (SettingKey::SfxVolume, SettingValue::Number(v)) => {
            settings.audio.sfx_volume = *v as u32;
        }
        (SettingKey::BgmTrack, SettingValue::String(v)) => {
            settings.audio.bgm_track = v.clone();
        }
        _ => {}
    }
}
