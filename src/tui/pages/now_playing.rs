use ratatui::{
    layout::Alignment,
    style::{Color, Stylize},
    text::Line,
    widgets::{Paragraph, Widget, Wrap},
};

use crate::tui::app::App;

pub struct NowPlayingPage<'a> {
    app: &'a App,
}

impl<'a> NowPlayingPage<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for NowPlayingPage<'_> {
    fn render(self, area: ratatui::prelude::Rect, buf: &mut ratatui::prelude::Buffer) {
        let Some(track) = self.app.now_playing() else {
            Paragraph::new("Nothing playing")
                .alignment(Alignment::Center)
                .fg(Color::DarkGray)
                .render(area, buf);
            return;
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(track.title.as_str()).bold(),
            Line::from(track.artist.as_str()),
            Line::from(""),
            Line::from(track.source.to_string()).fg(Color::DarkGray),
        ];
        if let Some(artwork) = track.artwork() {
            lines.push(Line::from(format!("Artwork: {}", artwork.path().display())).fg(Color::DarkGray));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
