use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListState, Paragraph, StatefulWidget, Widget},
};

use crate::tui::{
    app::App,
    navigation::{SETTINGS_ROWS, SettingsRow},
    settings::InputMode,
    ui::{centered_rect, scroll_top},
};

pub struct SettingsPage<'a> {
    app: &'a App,
}

impl<'a> SettingsPage<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    fn label(&self, row: SettingsRow) -> String {
        match row {
            SettingsRow::AddServer => "Add Remote Server".to_string(),
            SettingsRow::SyncRemote => "Sync Remote Library".to_string(),
            SettingsRow::UseLocal => "Use Local Library".to_string(),
            SettingsRow::InsecureTls => format!(
                "Insecure TLS: {}",
                if self.app.config().remote.insecure { "On" } else { "Off" }
            ),
        }
    }

    /// Draws the credential form on top of everything while a field is edited.
    pub fn render_input(&self, frame: &mut Frame) {
        let settings = &self.app.settings;
        let Some(value) = settings.field() else {
            return;
        };
        let value = if settings.mode() == InputMode::Password {
            "*".repeat(value.chars().count())
        } else {
            value.to_string()
        };

        let block = Block::default()
            .title_top(Line::from("| Remote Server |").centered().bold())
            .borders(Borders::ALL);
        let area = centered_rect(60, 40, frame.area());
        Clear.render(area, frame.buffer_mut());
        let [label_area, input_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .areas(area.inner(Margin {
            horizontal: 1,
            vertical: 1,
        }));
        block.render(area, frame.buffer_mut());

        Paragraph::new(settings.mode().label()).render(label_area, frame.buffer_mut());
        Paragraph::new(format!("{value}_"))
            .style(Style::default().fg(Color::Blue))
            .block(Block::bordered())
            .render(input_area, frame.buffer_mut());
    }
}

impl Widget for SettingsPage<'_> {
    fn render(self, area: ratatui::prelude::Rect, buf: &mut ratatui::prelude::Buffer) {
        (&self).render(area, buf);
    }
}

impl Widget for &SettingsPage<'_> {
    fn render(self, area: ratatui::prelude::Rect, buf: &mut ratatui::prelude::Buffer) {
        let rows: Vec<_> = SETTINGS_ROWS
            .iter()
            .map(|row| Line::from(format!(" {}", self.label(*row))))
            .collect();

        let list = List::new(rows).highlight_style(Style::new().bg(Color::Blue).fg(Color::White));
        let mut list_state = ListState::default()
            .with_offset(scroll_top(
                self.app.nav.offset(),
                usize::from(area.height),
                SETTINGS_ROWS.len(),
            ))
            .with_selected(Some(self.app.nav.selected()));

        StatefulWidget::render(list, area, buf, &mut list_state);
    }
}
