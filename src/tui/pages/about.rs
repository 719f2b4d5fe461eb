use ratatui::{
    layout::Alignment,
    style::{Color, Stylize},
    text::Line,
    widgets::{Paragraph, Widget},
};

pub struct AboutPage;

impl Widget for AboutPage {
    fn render(self, area: ratatui::prelude::Rect, buf: &mut ratatui::prelude::Buffer) {
        let separator = Line::from("─".repeat(usize::from(area.width.saturating_sub(4))))
            .fg(Color::DarkGray);

        let lines = vec![
            Line::from(""),
            Line::from(format!(
                "{} {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .bold(),
            Line::from("Terminal music player"),
            separator.clone(),
            Line::from("Plays local files and Jellyfin libraries"),
            separator,
            Line::from("All rights reserved."),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
