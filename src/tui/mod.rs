use input::{EventHandler, Message};
use log::debug;
use std::{io, time::Duration};
use tokio::{
    sync::mpsc::{self, Receiver},
    time::MissedTickBehavior,
};
use ui::ui;

use app::App;
use color_eyre::eyre;
use ratatui::{
    Terminal,
    crossterm::{
        event::{DisableBracketedPaste, EnableBracketedPaste},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::{Backend, CrosstermBackend},
};

use crate::{AppConfig, player::MpvPlayer};

mod app;
mod input;
pub mod navigation;
pub mod settings;
mod ui;

mod pages {
    mod about;
    pub use about::AboutPage;
    mod menu;
    pub use menu::MenuPage;
    mod now_playing;
    pub use now_playing::NowPlayingPage;
    mod settings;
    pub use settings::SettingsPage;
    mod songs;
    pub use songs::SongsPage;
}

/// Time between two rendered frames. The scroll animation advances once per
/// frame.
const FRAME: Duration = Duration::from_millis(33);

/// Runs the player UI until the user quits. With `remote` set, the catalog is
/// fetched from the configured server instead of the local music directory.
pub async fn start(config: AppConfig, remote: bool) -> eyre::Result<()> {
    init_panic_hook();

    // Setup terminal
    let mut terminal = init_tui()?;
    terminal.clear()?;

    let (reload_tx, reload_rx) = mpsc::channel(10);

    let mut app = App::new(config, Box::new(MpvPlayer::default()), reload_tx);
    if remote {
        app.sync_remote();
    } else {
        app.load_local();
    }
    let result = run(&mut terminal, &mut app, reload_rx).await;

    //restore terminal
    restore_tui()?;
    terminal.show_cursor()?;

    Ok(result?)
}

/// Overwrits the default panic hook by first
/// trying to restore our terminal
fn init_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Ignore errors, as we are already panicing
        let _ = restore_tui();
        original_hook(panic_info);
    }));
}

fn init_tui() -> io::Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
    Terminal::new(CrosstermBackend::new(io::stdout()))
}

fn restore_tui() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste)?;
    Ok(())
}

async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut reload_rx: Receiver<Message>,
) -> Result<(), std::io::Error> {
    let mut events = EventHandler::new();
    let mut frames = tokio::time::interval(FRAME);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while app.running {
        tokio::select! {
            _ = frames.tick() => {
                app.tick();
                terminal.draw(|f| ui(f, app))?;
            },
            Some(event) = events.next() => {
                let mut msg = Some(match event {
                    input::Event::Key(k) => input::handler(k, app.mode()),
                    input::Event::Paste(text) => Message::Paste(text),
                });
                while let Some(m) = msg {
                    msg = app.update(m);
                }
            },
            Some(msg) = reload_rx.recv() => {
                debug!("background work finished");
                let mut msg = Some(msg);
                while let Some(m) = msg {
                    msg = app.update(m);
                }
            }
        }
    }
    Ok(())
}
