use log::{debug, info, warn};
use tokio::sync::mpsc::Sender;

use crate::{
    AppConfig, AppError,
    library::{Catalog, CatalogSource, FetchParams, RemoteClient, Track, local},
    player::Player,
};

use super::{
    input::Message,
    navigation::{Action, Navigation, Screen},
    settings::{Credentials, Settings},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurrentMode {
    Normal,
    Insert,
}

/// Tracks current state of application
#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub nav: Navigation,
    pub catalog: Catalog,
    pub settings: Settings,
    /// Index into `catalog` of the track that is playing.
    now_playing: Option<usize>,
    /// Last thing worth telling the user, shown in the bottom bar.
    pub status: Option<String>,
    pub syncing: bool,
    /// Bumped whenever a catalog is requested, so a slow fetch cannot
    /// replace a catalog chosen after it started.
    generation: u64,
    config: AppConfig,
    player: Box<dyn Player + Send>,
    reload_tx: Sender<Message>,
}

impl App {
    pub fn new(config: AppConfig, player: Box<dyn Player + Send>, reload_tx: Sender<Message>) -> Self {
        let credentials = Credentials {
            url: config.remote.url.clone(),
            user: config.remote.user_id.clone(),
            password: String::new(),
        };
        App {
            running: true,
            nav: Navigation::default(),
            catalog: Catalog::default(),
            settings: Settings::new(credentials),
            now_playing: None,
            status: None,
            syncing: false,
            generation: 0,
            config,
            player,
            reload_tx,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn mode(&self) -> CurrentMode {
        if self.settings.is_editing() {
            CurrentMode::Insert
        } else {
            CurrentMode::Normal
        }
    }

    pub fn now_playing(&self) -> Option<&Track> {
        self.now_playing.and_then(|index| self.catalog.get(index))
    }

    pub fn item_count(&self) -> usize {
        self.nav.screen().descriptor().item_count(&self.catalog)
    }

    /// Advances per-frame animation.
    pub fn tick(&mut self) {
        self.nav.tick();
    }

    pub fn update(&mut self, msg: Message) -> Option<Message> {
        if self.settings.is_editing() {
            return self.update_input(msg);
        }

        match msg {
            Message::Quit => self.quit(),
            Message::Up => self.nav.up(self.item_count()),
            Message::Down => self.nav.down(self.item_count()),
            Message::Back => self.nav.back(),
            Message::Select => {
                let action = self
                    .nav
                    .screen()
                    .descriptor()
                    .on_confirm(self.nav.selected(), &self.catalog);
                self.perform(action);
            }
            Message::CatalogLoaded { generation, catalog } => {
                self.catalog_loaded(generation, catalog)
            }
            Message::Character(_) | Message::Paste(_) | Message::Backspace | Message::None => {}
        }
        None
    }

    /// Key handling while a credential field is being edited.
    fn update_input(&mut self, msg: Message) -> Option<Message> {
        match msg {
            Message::Quit => self.quit(),
            Message::Character(c) => self.settings.enter_char(c),
            Message::Paste(text) => self.settings.enter_str(&text),
            Message::Backspace => self.settings.delete_char(),
            Message::Select => {
                if self.settings.advance() {
                    self.commit_credentials();
                }
            }
            Message::CatalogLoaded { generation, catalog } => {
                self.catalog_loaded(generation, catalog)
            }
            Message::Up | Message::Down | Message::Back | Message::None => {}
        }
        None
    }

    fn quit(&mut self) {
        self.player.stop();
        self.running = false;
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Goto(screen) => {
                let count = screen.descriptor().item_count(&self.catalog);
                self.nav.enter(screen, count);
            }
            Action::Play(index) => self.play(index),
            Action::EditServer => self.settings.begin(),
            Action::SyncRemote => self.sync_remote(),
            Action::LoadLocal => self.load_local(),
        }
    }

    fn play(&mut self, index: usize) {
        let Some(track) = self.catalog.get(index) else {
            return;
        };
        info!("playing {} - {}", track.artist, track.title);
        self.status = match self.player.load_and_play(&track.source) {
            Ok(()) => None,
            Err(e) => {
                warn!("could not play {}: {e}", track.title);
                Some(format!("Cannot play {}", track.title))
            }
        };
        // Metadata is shown even if playback failed.
        self.now_playing = Some(index);
        self.nav.enter(Screen::NowPlaying, 0);
    }

    fn catalog_loaded(&mut self, generation: u64, catalog: Catalog) {
        if generation != self.generation {
            debug!("dropping outdated {:?} catalog", catalog.source());
            return;
        }
        self.replace_catalog(catalog);
    }

    /// Swaps in a complete catalog. The playing track belonged to the old one,
    /// so playback ends with it.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        if self.now_playing.take().is_some() {
            self.player.stop();
        }
        self.syncing = false;
        self.status = Some(match (catalog.source(), catalog.len()) {
            (CatalogSource::Remote, 0) => "No songs received from server".to_string(),
            (CatalogSource::Local, 0) => {
                format!("No songs in {}", self.config.music_dir.display())
            }
            (_, n) => format!("{n} song{}", if n == 1 { "" } else { "s" }),
        });
        self.catalog = catalog;
        self.nav.clamp(self.item_count());
    }

    pub fn load_local(&mut self) {
        self.generation += 1;
        let tracks = match local::scan(&self.config.music_dir) {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!("failed to scan {}: {e}", self.config.music_dir.display());
                Vec::new()
            }
        };
        self.replace_catalog(Catalog::new(CatalogSource::Local, tracks));
    }

    /// Parameters for the remote fetch: typed credentials win over the config.
    pub fn fetch_params(&self) -> FetchParams {
        let mut params = FetchParams::from(&self.config.remote);
        let credentials = &self.settings.credentials;
        for (typed, field) in [
            (&credentials.url, &mut params.server_url),
            (&credentials.user, &mut params.user_id),
            (&credentials.password, &mut params.api_key),
        ] {
            if !typed.is_empty() {
                field.clone_from(typed);
            }
        }
        params
    }

    /// Fetches the remote catalog in the background. The result arrives as
    /// [`Message::CatalogLoaded`] once it is complete.
    pub fn sync_remote(&mut self) {
        let params = self.fetch_params();
        if params.server_url.is_empty() {
            self.status = Some("No server configured".to_string());
            return;
        }

        let client = match RemoteClient::from_config(&self.config.remote) {
            Ok(client) => client,
            Err(e) => {
                log::error!("failed to create http client: {:?}", e);
                self.status = Some("Cannot connect to server".to_string());
                return;
            }
        };

        self.generation += 1;
        let generation = self.generation;
        self.syncing = true;
        self.status = Some(if client.is_insecure() {
            "Syncing ... (insecure TLS)".to_string()
        } else {
            "Syncing ...".to_string()
        });

        let reload_tx = self.reload_tx.clone();
        tokio::spawn(async move {
            let tracks = client.fetch_tracks(&params).await;
            let catalog = Catalog::new(CatalogSource::Remote, tracks);
            let msg = Message::CatalogLoaded {
                generation,
                catalog,
            };
            if let Err(e) = reload_tx.send(msg).await {
                log::error!("failed to deliver remote catalog: {:?}", e);
            }
        });
    }

    /// Stores the entered server in the config file. Only URL and user are
    /// written, overrides from the command line and the password are not.
    fn commit_credentials(&mut self) {
        self.config.remote.url = self.settings.credentials.url.clone();
        self.config.remote.user_id = self.settings.credentials.user.clone();

        let mut on_disk = match AppConfig::load(self.config.path.clone()) {
            Ok(config) => config,
            Err(AppError::Io(e)) => {
                debug!("starting a new config file: {e}");
                AppConfig {
                    path: self.config.path.clone(),
                    ..AppConfig::default()
                }
            }
            Err(e) => {
                warn!("not touching unreadable config: {e}");
                self.status = Some("Server kept for this session only".to_string());
                return;
            }
        };
        on_disk.remote.url = self.config.remote.url.clone();
        on_disk.remote.user_id = self.config.remote.user_id.clone();

        self.status = Some(match on_disk.save() {
            Ok(()) => "Server saved".to_string(),
            Err(e) => {
                warn!("failed to save config: {e}");
                "Server kept for this session only".to_string()
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        library::TrackSource,
        tui::{
            navigation::{MAIN_MENU, SETTINGS_ROWS},
            settings::InputMode,
        },
    };

    #[derive(Debug, Default, Clone)]
    struct RecordingPlayer {
        played: Arc<Mutex<Vec<TrackSource>>>,
        stops: Arc<Mutex<usize>>,
        fail: bool,
    }

    impl Player for RecordingPlayer {
        fn load_and_play(&mut self, source: &TrackSource) -> Result<(), AppError> {
            self.played.lock().unwrap().push(source.clone());
            if self.fail {
                Err(AppError::Playback("no decoder".to_string()))
            } else {
                Ok(())
            }
        }

        fn stop(&mut self) {
            *self.stops.lock().unwrap() += 1;
        }
    }

    struct Fixture {
        app: App,
        player: RecordingPlayer,
        rx: mpsc::Receiver<Message>,
        _dir: tempfile::TempDir,
    }

    fn fixture(fail: bool) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            music_dir: dir.path().join("music"),
            path: Some(dir.path().join("config.toml")),
            ..AppConfig::default()
        };
        let player = RecordingPlayer {
            fail,
            ..RecordingPlayer::default()
        };
        let (tx, rx) = mpsc::channel(10);
        let app = App::new(config, Box::new(player.clone()), tx);
        Fixture {
            app,
            player,
            rx,
            _dir: dir,
        }
    }

    fn songs(n: usize) -> Catalog {
        Catalog::new(
            CatalogSource::Local,
            (0..n)
                .map(|i| {
                    Track::new(
                        format!("Song {i}"),
                        "Artist",
                        TrackSource::Local(format!("/music/{i}.mp3").into()),
                    )
                })
                .collect(),
        )
    }

    fn goto(app: &mut App, screen: Screen) {
        let index = MAIN_MENU.iter().position(|i| i.target == screen).unwrap();
        app.update(Message::Back);
        for _ in 0..index {
            app.update(Message::Down);
        }
        app.update(Message::Select);
        assert_eq!(app.nav.screen(), screen);
    }

    #[test]
    fn selecting_a_song_plays_it() {
        let mut f = fixture(false);
        f.app.replace_catalog(songs(3));
        goto(&mut f.app, Screen::Music);

        f.app.update(Message::Up);
        f.app.update(Message::Select);

        assert_eq!(f.app.nav.screen(), Screen::NowPlaying);
        assert_eq!(f.app.now_playing().map(|t| t.title.as_str()), Some("Song 2"));
        assert_eq!(
            *f.player.played.lock().unwrap(),
            vec![TrackSource::Local("/music/2.mp3".into())]
        );
        assert_eq!(f.app.status, None);
    }

    #[test]
    fn failed_playback_still_shows_track() {
        let mut f = fixture(true);
        f.app.replace_catalog(songs(2));
        goto(&mut f.app, Screen::Music);
        f.app.update(Message::Select);

        assert_eq!(f.app.nav.screen(), Screen::NowPlaying);
        assert_eq!(f.app.now_playing().map(|t| t.title.as_str()), Some("Song 0"));
        assert!(f.app.status.as_deref().unwrap().starts_with("Cannot play"));
        assert!(f.app.running);
    }

    #[test]
    fn empty_music_list_is_safe() {
        let mut f = fixture(false);
        f.app.load_local();
        assert!(f.app.catalog.is_empty());
        assert!(f.app.status.as_deref().unwrap().starts_with("No songs in"));

        goto(&mut f.app, Screen::Music);
        f.app.update(Message::Up);
        f.app.update(Message::Down);
        f.app.update(Message::Select);
        assert_eq!(f.app.nav.screen(), Screen::Music);
        assert_eq!(f.app.nav.selected(), 0);
        assert!(f.player.played.lock().unwrap().is_empty());
    }

    #[test]
    fn new_catalog_clamps_and_drops_now_playing() {
        let mut f = fixture(false);
        f.app.replace_catalog(songs(5));
        goto(&mut f.app, Screen::Music);
        f.app.update(Message::Up);
        assert_eq!(f.app.nav.selected(), 4);

        f.app.replace_catalog(songs(2));
        assert_eq!(f.app.nav.selected(), 1);

        f.app.update(Message::Select);
        assert!(f.app.now_playing().is_some());
        let stops = *f.player.stops.lock().unwrap();

        f.app.replace_catalog(Catalog::new(CatalogSource::Remote, Vec::new()));
        assert!(f.app.now_playing().is_none());
        assert_eq!(*f.player.stops.lock().unwrap(), stops + 1);
        assert_eq!(
            f.app.status.as_deref(),
            Some("No songs received from server")
        );
    }

    #[test]
    fn credential_entry() {
        let mut f = fixture(false);
        goto(&mut f.app, Screen::Settings);
        assert_eq!(SETTINGS_ROWS.len(), f.app.item_count());
        f.app.update(Message::Select);
        assert_eq!(f.app.mode(), CurrentMode::Insert);
        assert_eq!(f.app.settings.mode(), InputMode::Url);

        for c in "abc".chars() {
            f.app.update(Message::Character(c));
        }
        f.app.update(Message::Backspace);
        assert_eq!(f.app.settings.field(), Some("ab"));
        assert_eq!(f.app.nav.screen(), Screen::Settings);

        f.app.update(Message::Select);
        assert_eq!(f.app.settings.mode(), InputMode::User);
        assert_eq!(f.app.settings.credentials.url, "ab");

        f.app.update(Message::Paste("u1".to_string()));
        f.app.update(Message::Select);
        f.app.update(Message::Character('k'));
        f.app.update(Message::Select);

        assert_eq!(f.app.mode(), CurrentMode::Normal);
        assert_eq!(f.app.status.as_deref(), Some("Server saved"));
        let saved = AppConfig::load(f.app.config().path.clone()).unwrap();
        assert_eq!(saved.remote.url, "ab");
        assert_eq!(saved.remote.user_id, "u1");
        assert!(saved.remote.api_key.is_empty());

        let params = f.app.fetch_params();
        assert_eq!(params.api_key, "k");
        assert_eq!(params.user_id, "u1");
    }

    #[test]
    fn back_returns_to_top_of_menu() {
        let mut f = fixture(false);
        goto(&mut f.app, Screen::About);
        f.app.update(Message::Back);
        assert_eq!(f.app.nav.screen(), Screen::MainMenu);
        assert_eq!(f.app.nav.selected(), 0);
    }

    #[test]
    fn sync_without_server_does_nothing() {
        let mut f = fixture(false);
        f.app.sync_remote();
        assert!(!f.app.syncing);
        assert_eq!(f.app.status.as_deref(), Some("No server configured"));
    }

    #[tokio::test]
    async fn sync_delivers_catalog_through_channel() {
        let mut f = fixture(false);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        f.app.settings.credentials.url = format!("http://{addr}");

        f.app.sync_remote();
        assert!(f.app.syncing);

        let msg = f.rx.recv().await.unwrap();
        assert!(matches!(
            &msg,
            Message::CatalogLoaded { catalog, .. } if catalog.source() == CatalogSource::Remote
        ));
        f.app.update(msg);
        assert!(!f.app.syncing);
        assert!(f.app.catalog.is_empty());
    }

    fn unreachable_server(app: &mut App) {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        app.settings.credentials.url = format!("http://{addr}");
    }

    #[tokio::test]
    async fn outdated_fetch_does_not_replace_local_catalog() {
        let mut f = fixture(false);
        let music_dir = f.app.config().music_dir.clone();
        std::fs::create_dir(&music_dir).unwrap();
        std::fs::write(music_dir.join("song.mp3"), b"").unwrap();
        unreachable_server(&mut f.app);

        f.app.sync_remote();
        f.app.load_local();
        assert!(!f.app.syncing);
        goto(&mut f.app, Screen::Music);
        f.app.update(Message::Select);
        let stops = *f.player.stops.lock().unwrap();

        let msg = f.rx.recv().await.unwrap();
        f.app.update(msg);

        assert_eq!(f.app.catalog.source(), CatalogSource::Local);
        assert_eq!(f.app.catalog.len(), 1);
        assert_eq!(f.app.now_playing().map(|t| t.title.as_str()), Some("song"));
        assert_eq!(*f.player.stops.lock().unwrap(), stops);
    }

    #[tokio::test]
    async fn only_the_latest_sync_is_applied() {
        let mut f = fixture(false);
        f.app.replace_catalog(songs(3));
        unreachable_server(&mut f.app);

        f.app.sync_remote();
        f.app.sync_remote();

        let first = f.rx.recv().await.unwrap();
        let second = f.rx.recv().await.unwrap();
        let generation = |msg: &Message| match msg {
            Message::CatalogLoaded { generation, .. } => *generation,
            other => panic!("unexpected {other:?}"),
        };
        let (older, newer) = if generation(&first) < generation(&second) {
            (first, second)
        } else {
            (second, first)
        };

        f.app.update(older);
        assert!(f.app.syncing);
        assert_eq!(f.app.catalog.len(), 3);

        f.app.update(newer);
        assert!(!f.app.syncing);
        assert_eq!(f.app.catalog.source(), CatalogSource::Remote);
    }

    #[test]
    fn fetch_params_fall_back_to_config() {
        let mut f = fixture(false);
        f.app.config.remote.url = "http://configured".to_string();
        f.app.config.remote.api_key = "configured-key".to_string();
        f.app.config.remote.library_id = "lib".to_string();
        f.app.settings.credentials.url.clear();
        f.app.settings.credentials.user = "typed-user".to_string();

        let params = f.app.fetch_params();
        assert_eq!(params.server_url, "http://configured");
        assert_eq!(params.user_id, "typed-user");
        assert_eq!(params.api_key, "configured-key");
        assert_eq!(params.library_id, "lib");
    }

    #[test]
    fn quit_stops_playback() {
        let mut f = fixture(false);
        f.app.update(Message::Quit);
        assert!(!f.app.running);
        assert_eq!(*f.player.stops.lock().unwrap(), 1);
    }
}
