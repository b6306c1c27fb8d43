//! Weather widget - terminal city weather lookup with saved favorites

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use weather_widget::action::Action;
use weather_widget::api::{OPENWEATHER_API_BASE, SearchOutcome, WeatherClient};
use weather_widget::components::{Component, WeatherDisplay, WeatherDisplayProps};
use weather_widget::effect::{Effect, persist_favorites};
use weather_widget::favorites::Favorites;
use weather_widget::reducer::reducer;
use weather_widget::state::{
    AppState, DEFAULT_CITY, FETCH_ERROR_MESSAGE, Focus, LOADING_ANIM_TICK_MS,
};
use weather_widget::storage::{FileStore, KeyValueStore, MemoryStore};

/// Look up current weather by city and keep a list of favorite cities
#[derive(Parser, Debug)]
#[command(name = "weather-widget")]
#[command(about = "City weather lookup with saved favorites")]
struct Args {
    /// City to search on startup
    #[arg(long, short, default_value = DEFAULT_CITY)]
    city: String,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Base URL of the weather API
    #[arg(long, env = "OPENWEATHER_API_BASE", default_value = OPENWEATHER_API_BASE)]
    api_base: String,

    /// Directory holding saved favorites (defaults to the platform data dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep favorites in memory only
    #[arg(long)]
    no_persist: bool,

    /// Log file (defaults to weather-widget.log in the data dir; none with --no-persist)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

type SharedStore = Arc<Mutex<Box<dyn KeyValueStore + Send>>>;

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum WidgetComponentId {
    Search,
    Favorites,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum WidgetContext {
    Search,
    Favorites,
}

impl EventRoutingState<WidgetComponentId, WidgetContext> for AppState {
    fn focused(&self) -> Option<WidgetComponentId> {
        match self.focus {
            Focus::Search => Some(WidgetComponentId::Search),
            Focus::Favorites => Some(WidgetComponentId::Favorites),
        }
    }

    fn modal(&self) -> Option<WidgetComponentId> {
        None
    }

    fn binding_context(&self, id: WidgetComponentId) -> WidgetContext {
        match id {
            WidgetComponentId::Search => WidgetContext::Search,
            WidgetComponentId::Favorites => WidgetContext::Favorites,
        }
    }

    fn default_context(&self) -> WidgetContext {
        WidgetContext::Search
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        city,
        api_key,
        api_base,
        data_dir,
        no_persist,
        log_file,
        debug: debug_args,
    } = Args::parse();

    let data_dir = data_dir.unwrap_or_else(FileStore::default_dir);
    if let Some(log_file) = log_path(log_file, &data_dir, no_persist) {
        init_logging(&log_file)?;
    }
    tracing::info!(data_dir = %data_dir.display(), no_persist, "starting weather widget");

    let store: Box<dyn KeyValueStore + Send> = if no_persist {
        Box::new(MemoryStore::new())
    } else {
        Box::new(FileStore::new(&data_dir))
    };
    let favorites = Favorites::load_or_default(store.as_ref());
    let store: SharedStore = Arc::new(Mutex::new(store));
    let client = WeatherClient::new(api_key, api_base);

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(city, favorites))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store_fx = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &debug,
        store_fx,
        replay_actions,
        client,
        store,
    )
    .await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    tracing::info!("weather widget stopped");
    Ok(())
}

/// An explicit `--log-file` always wins. Otherwise `--no-persist` leaves
/// the disk untouched.
fn log_path(explicit: Option<PathBuf>, data_dir: &Path, no_persist: bool) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path),
        None if no_persist => None,
        None => Some(data_dir.join("weather-widget.log")),
    }
}

/// Route `tracing` output to `path`; the terminal belongs to the UI.
fn init_logging(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

struct WidgetUi {
    display: WeatherDisplay,
}

impl WidgetUi {
    fn new() -> Self {
        Self {
            display: WeatherDisplay::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<WidgetComponentId>,
    ) {
        event_ctx.set_component_area(WidgetComponentId::Search, area);
        event_ctx.set_component_area(WidgetComponentId::Favorites, area);

        let props = WeatherDisplayProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.display.render(frame, area, props);
    }

    fn handle_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = WeatherDisplayProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .display
            .handle_event(event, props)
            .into_iter()
            .collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store_fx: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    client: WeatherClient,
    store: SharedStore,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(WidgetUi::new()));
    let mut bus: EventBus<AppState, Action, WidgetComponentId, WidgetContext> = EventBus::new();
    let keybindings: Keybindings<WidgetContext> = Keybindings::new();

    let ui_search = Rc::clone(&ui);
    bus.register(WidgetComponentId::Search, move |event, state| {
        ui_search.borrow_mut().handle_event(&event.kind, state)
    });

    let ui_favorites = Rc::clone(&ui);
    bus.register(WidgetComponentId::Favorites, move |event, state| {
        ui_favorites.borrow_mut().handle_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store_fx,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::SearchSubmit),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &client, &store),
        )
        .await
}

/// Run effects: weather fetches as tasks, favorites writes inline
fn handle_effect(
    effect: Effect,
    ctx: &mut EffectContext<Action>,
    client: &WeatherClient,
    store: &SharedStore,
) {
    match effect {
        Effect::FetchWeather { request_id, query } => {
            let client = client.clone();
            ctx.tasks().spawn("weather", async move {
                match client.current_weather(&query).await {
                    Ok(SearchOutcome::Found(result)) => {
                        tracing::info!(request_id, city = %result.city, "weather loaded");
                        Action::SearchDidLoad { request_id, result }
                    }
                    Ok(SearchOutcome::NotFound) => {
                        tracing::info!(request_id, %query, "city not found");
                        Action::SearchDidMiss { request_id }
                    }
                    Err(error) => {
                        tracing::error!(request_id, %query, %error, "weather fetch failed");
                        Action::SearchDidError {
                            request_id,
                            message: FETCH_ERROR_MESSAGE.to_string(),
                        }
                    }
                }
            });
        }
        Effect::PersistFavorites(favorites) => {
            let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(notice) = persist_favorites(&favorites, guard.as_mut()) {
                ctx.tasks()
                    .spawn("favorites_notice", async move { notice });
            }
        }
    }
}
