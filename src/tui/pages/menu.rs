use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, List, ListState, Paragraph, StatefulWidget, Widget},
};

use crate::tui::{app::App, navigation::MAIN_MENU};

pub struct MenuPage<'a> {
    app: &'a App,
}

impl<'a> MenuPage<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for MenuPage<'_> {
    fn render(self, area: ratatui::prelude::Rect, buf: &mut ratatui::prelude::Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let items: Vec<_> = MAIN_MENU
            .iter()
            .map(|item| Line::from(format!(" {}", item.label)))
            .collect();

        let list = List::new(items)
            .highlight_style(Style::new().bg(Color::Blue).fg(Color::White).bold())
            .highlight_symbol("›");
        let mut list_state = ListState::default().with_selected(Some(self.app.nav.selected()));

        StatefulWidget::render(list, chunks[0], buf, &mut list_state);

        // Right half shows what is playing, like the cover flow panel.
        let block = Block::default().borders(Borders::LEFT);
        let inner_area = block.inner(chunks[1]);
        block.render(chunks[1], buf);

        let lines = match self.app.now_playing() {
            Some(track) => vec![
                Line::from("Now Playing").fg(Color::DarkGray),
                Line::from(""),
                Line::from(track.title.as_str()).bold(),
                Line::from(track.artist.as_str()),
            ],
            None => {
                let songs = self.app.catalog.len();
                vec![
                    Line::from(format!("{songs} song{}", if songs == 1 { "" } else { "s" }))
                        .fg(Color::DarkGray),
                ]
            }
        };
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner_area, buf);
    }
}
