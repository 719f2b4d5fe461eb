use std::collections::HashMap;

use crate::library::Catalog;

/// How far the scroll offset moves towards the selection on every frame.
pub const SCROLL_DAMPING: f32 = 0.15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
pub enum Screen {
    #[default]
    #[strum(to_string = "iPod")]
    MainMenu,
    Music,
    #[strum(to_string = "Now Playing")]
    NowPlaying,
    #[strum(to_string = "Videos")]
    Video,
    Settings,
    About,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub target: Screen,
}

pub const MAIN_MENU: [MenuItem; 5] = [
    MenuItem { label: "Music", target: Screen::Music },
    MenuItem { label: "Videos", target: Screen::Video },
    MenuItem { label: "Settings", target: Screen::Settings },
    MenuItem { label: "Now Playing", target: Screen::NowPlaying },
    MenuItem { label: "About", target: Screen::About },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsRow {
    AddServer,
    SyncRemote,
    UseLocal,
    InsecureTls,
}

pub const SETTINGS_ROWS: [SettingsRow; 4] = [
    SettingsRow::AddServer,
    SettingsRow::SyncRemote,
    SettingsRow::UseLocal,
    SettingsRow::InsecureTls,
];

/// What confirming the selected item asks the application to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Goto(Screen),
    Play(usize),
    EditServer,
    SyncRemote,
    LoadLocal,
}

/// Per-screen behaviour the navigation core needs, so it never has to know
/// how long another screen's list is.
pub trait ScreenDescriptor {
    fn item_count(&self, catalog: &Catalog) -> usize;
    fn on_confirm(&self, index: usize, catalog: &Catalog) -> Action;
}

struct MainMenuScreen;
struct MusicScreen;
struct SettingsScreen;
/// Screens without a selectable list.
struct StaticScreen;

impl ScreenDescriptor for MainMenuScreen {
    fn item_count(&self, _: &Catalog) -> usize {
        MAIN_MENU.len()
    }

    fn on_confirm(&self, index: usize, _: &Catalog) -> Action {
        MAIN_MENU
            .get(index)
            .map_or(Action::None, |item| Action::Goto(item.target))
    }
}

impl ScreenDescriptor for MusicScreen {
    fn item_count(&self, catalog: &Catalog) -> usize {
        catalog.len()
    }

    fn on_confirm(&self, index: usize, catalog: &Catalog) -> Action {
        if index < catalog.len() {
            Action::Play(index)
        } else {
            Action::None
        }
    }
}

impl ScreenDescriptor for SettingsScreen {
    fn item_count(&self, _: &Catalog) -> usize {
        SETTINGS_ROWS.len()
    }

    fn on_confirm(&self, index: usize, _: &Catalog) -> Action {
        match SETTINGS_ROWS.get(index) {
            Some(SettingsRow::AddServer) => Action::EditServer,
            Some(SettingsRow::SyncRemote) => Action::SyncRemote,
            Some(SettingsRow::UseLocal) => Action::LoadLocal,
            Some(SettingsRow::InsecureTls) | None => Action::None,
        }
    }
}

impl ScreenDescriptor for StaticScreen {
    fn item_count(&self, _: &Catalog) -> usize {
        0
    }

    fn on_confirm(&self, _: usize, _: &Catalog) -> Action {
        Action::None
    }
}

impl Screen {
    pub fn descriptor(self) -> &'static dyn ScreenDescriptor {
        match self {
            Screen::MainMenu => &MainMenuScreen,
            Screen::Music => &MusicScreen,
            Screen::Settings => &SettingsScreen,
            Screen::NowPlaying | Screen::Video | Screen::About => &StaticScreen,
        }
    }
}

/// Active screen, selection and the smoothed scroll position.
///
/// Every screen remembers its last selection: the first visit starts at 0,
/// later visits restore it. Going back always lands on the top of the main
/// menu.
#[derive(Debug, Default)]
pub struct Navigation {
    screen: Screen,
    selected: usize,
    offset: f32,
    remembered: HashMap<Screen, usize>,
}

impl Navigation {
    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn up(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.clamp(count);
        self.selected = (self.selected + count - 1) % count;
    }

    pub fn down(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.clamp(count);
        self.selected = (self.selected + 1) % count;
    }

    /// Switches to `screen`, which currently has `count` items.
    pub fn enter(&mut self, screen: Screen, count: usize) {
        if screen == self.screen {
            self.clamp(count);
            return;
        }
        self.remembered.insert(self.screen, self.selected);
        self.screen = screen;
        self.selected = self.remembered.get(&screen).copied().unwrap_or(0);
        self.clamp(count);
        self.offset = self.selected as f32;
    }

    pub fn back(&mut self) {
        self.remembered.insert(self.screen, self.selected);
        self.screen = Screen::MainMenu;
        self.selected = 0;
        self.offset = 0.0;
    }

    /// Pulls the selection back into `[0, count)` after the list shrank.
    pub fn clamp(&mut self, count: usize) {
        if count == 0 {
            self.selected = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
        }
    }

    /// Moves the scroll offset a step towards the selection. Called once per
    /// rendered frame.
    pub fn tick(&mut self) {
        self.offset += (self.selected as f32 - self.offset) * SCROLL_DAMPING;
    }
}
