use ratatui::{
    layout::Alignment,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use crate::tui::{app::App, ui::scroll_top};

/// Every song takes a title and an artist row.
const ROWS_PER_SONG: u16 = 2;

pub struct SongsPage<'a> {
    app: &'a App,
}

impl<'a> SongsPage<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for SongsPage<'_> {
    fn render(self, area: ratatui::prelude::Rect, buf: &mut ratatui::prelude::Buffer) {
        let tracks = self.app.catalog.tracks();
        if tracks.is_empty() {
            Paragraph::new("No songs")
                .alignment(Alignment::Center)
                .fg(Color::DarkGray)
                .render(area, buf);
            return;
        }

        let items: Vec<_> = tracks
            .iter()
            .map(|track| {
                let mut title = vec![Span::raw(track.title.as_str())];
                if track.artwork().is_some() {
                    title.push(Span::styled(" ♪", Style::default().fg(Color::Cyan)));
                }
                ListItem::new(vec![
                    Line::from(title),
                    Line::from(Span::styled(
                        track.artist.as_str(),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect();

        let visible = usize::from(area.height / ROWS_PER_SONG);
        let list = List::new(items).highlight_style(Style::new().bg(Color::Blue).fg(Color::White));
        let mut list_state = ListState::default()
            .with_offset(scroll_top(self.app.nav.offset(), visible, tracks.len()))
            .with_selected(Some(self.app.nav.selected()));

        StatefulWidget::render(list, area, buf, &mut list_state);
    }
}
