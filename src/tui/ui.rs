use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{
    app::{App, CurrentMode},
    navigation::Screen,
    pages::{AboutPage, MenuPage, NowPlayingPage, SettingsPage, SongsPage},
};

pub fn ui(frame: &mut Frame, app: &App) {
    let background = create_background(app);
    let area = background.inner(frame.area());
    frame.render_widget(background, frame.area());

    match app.nav.screen() {
        Screen::MainMenu => frame.render_widget(MenuPage::new(app), area),
        Screen::Music => frame.render_widget(SongsPage::new(app), area),
        Screen::NowPlaying => frame.render_widget(NowPlayingPage::new(app), area),
        Screen::Settings => {
            let page = SettingsPage::new(app);
            frame.render_widget(&page, area);
            page.render_input(frame);
        }
        Screen::About => frame.render_widget(AboutPage, area),
        Screen::Video => frame.render_widget(
            Paragraph::new("No videos")
                .alignment(Alignment::Center)
                .fg(Color::DarkGray),
            area,
        ),
    };
}

fn create_background(app: &App) -> Block {
    let block = Block::default()
        .title_top(Line::from(format!("| {} |", app.nav.screen())).centered().bold())
        .borders(Borders::ALL);

    let status = match &app.status {
        Some(status) => Span::styled(
            format!("| {status} "),
            if app.syncing {
                Style::default().add_modifier(Modifier::ITALIC)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            },
        ),
        None => Span::raw(""),
    };

    let hints = match app.mode() {
        CurrentMode::Normal => "| (enter) select | (backspace) menu | (esc) quit |",
        CurrentMode::Insert => "| (enter) next field | (esc) quit |",
    };

    block
        .title_bottom(Line::from(status))
        .title_bottom(Line::from(hints).right_aligned())
}

/// First list row to draw so that the smoothed `offset` sits in the middle of
/// `visible` rows.
pub fn scroll_top(offset: f32, visible: usize, len: usize) -> usize {
    let max_top = len.saturating_sub(visible);
    let top = (offset - visible as f32 / 2.0).round().max(0.0) as usize;
    top.min(max_top)
}

/// helper function to create a centered rect using up certain percentage of the available rect `r`
// Adapted from https://ratatui.rs/tutorials/json-editor/ui/
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    // Cut the given rectangle into three vertical pieces
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    // Then cut the middle vertical piece into three width-wise pieces
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1] // Return the middle chunk
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        AppConfig,
        library::{Catalog, CatalogSource, Track, TrackSource},
        player::MpvPlayer,
        tui::{input::Message, navigation::SETTINGS_ROWS},
    };

    fn app() -> App {
        let (tx, _rx) = mpsc::channel(1);
        let mut app = App::new(
            AppConfig::default(),
            Box::new(MpvPlayer::with_program("pipod-no-such-player")),
            tx,
        );
        app.replace_catalog(Catalog::new(
            CatalogSource::Remote,
            vec![Track::new(
                "Hey Jude",
                "The Beatles",
                TrackSource::Remote("http://host/Items/1/Download".to_string()),
            )],
        ));
        app
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn menu_and_status_are_drawn() {
        let screen = render(&app());
        assert!(screen.contains("| iPod |"));
        assert!(screen.contains("Music"));
        assert!(screen.contains("Settings"));
        assert!(screen.contains("1 song "));
    }

    #[test]
    fn every_screen_renders() {
        let mut app = app();
        // Music, then play the only song
        app.update(Message::Select);
        app.update(Message::Select);
        assert_eq!(app.nav.screen(), Screen::NowPlaying);

        for (down, expected) in [
            (0, "Hey Jude"),
            (1, "No videos"),
            (2, "Add Remote Server"),
            (3, "The Beatles"),
            (4, "pipod"),
        ] {
            app.update(Message::Back);
            for _ in 0..down {
                app.update(Message::Down);
            }
            app.update(Message::Select);
            assert!(render(&app).contains(expected), "menu item {down}");
        }
    }

    #[test]
    fn password_is_masked() {
        let mut app = app();
        app.nav.enter(Screen::Settings, SETTINGS_ROWS.len());
        app.settings.begin();
        app.settings.advance();
        app.settings.advance();
        for c in "secret".chars() {
            app.update(Message::Character(c));
        }
        let screen = render(&app);
        assert!(screen.contains("Password:"));
        assert!(screen.contains("******"));
        assert!(!screen.contains("secret"));
    }

    #[test]
    fn scroll_top_keeps_selection_centered() {
        assert_eq!(scroll_top(0.0, 10, 100), 0);
        assert_eq!(scroll_top(50.0, 10, 100), 45);
        assert_eq!(scroll_top(99.0, 10, 100), 90);
        assert_eq!(scroll_top(3.0, 10, 4), 0);
    }
}
