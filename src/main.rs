//! Weather dashboard - daily temperatures for a place and date range

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::{info, warn};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_components::centered_rect;
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use weather_dashboard::action::Action;
use weather_dashboard::api::ForecastClient;
use weather_dashboard::components::{
    AlertModal, AlertModalProps, Component, Dashboard, DashboardProps,
};
use weather_dashboard::effect::Effect;
use weather_dashboard::logging;
use weather_dashboard::reducer::reducer;
use weather_dashboard::state::{AppState, DEFAULT_ENDPOINT, FormInputs, LOADING_ANIM_TICK_MS};

const FORECAST_TASK: &str = "forecast";

/// Daily max/min/mean temperatures for a location and date range
#[derive(Parser, Debug)]
#[command(name = "weather-dashboard")]
#[command(about = "Chart and tabulate Open-Meteo daily temperatures in the terminal")]
struct Args {
    /// Prefill latitude
    #[arg(long, allow_hyphen_values = true)]
    latitude: Option<String>,

    /// Prefill longitude
    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<String>,

    /// Prefill start date (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,

    /// Prefill end date (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<String>,

    /// Forecast endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum DashboardComponentId {
    Dashboard,
    Alert,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum DashboardContext {
    Main,
    Alert,
}

impl EventRoutingState<DashboardComponentId, DashboardContext> for AppState {
    fn focused(&self) -> Option<DashboardComponentId> {
        if self.alert_open() {
            Some(DashboardComponentId::Alert)
        } else {
            Some(DashboardComponentId::Dashboard)
        }
    }

    fn modal(&self) -> Option<DashboardComponentId> {
        if self.alert_open() {
            Some(DashboardComponentId::Alert)
        } else {
            None
        }
    }

    fn binding_context(&self, id: DashboardComponentId) -> DashboardContext {
        match id {
            DashboardComponentId::Dashboard => DashboardContext::Main,
            DashboardComponentId::Alert => DashboardContext::Alert,
        }
    }

    fn default_context(&self) -> DashboardContext {
        DashboardContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        latitude,
        longitude,
        start_date,
        end_date,
        endpoint,
        log_file,
        debug: debug_args,
    } = Args::parse();

    logging::init(log_file.as_deref())?;

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let form = FormInputs {
        latitude: latitude.unwrap_or_default(),
        longitude: longitude.unwrap_or_default(),
        start_date: start_date.unwrap_or_default(),
        end_date: end_date.unwrap_or_default(),
    };
    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(form, endpoint))
        })
        .await
        .map_err(debug_error)?;

    // Submit once on startup when every field came prefilled
    let init_action = state.form.is_ready().then_some(Action::FormSubmit);
    info!(endpoint = %state.endpoint, autosubmit = init_action.is_some(), "Starting dashboard");

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, init_action, replay_actions).await;

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

    Ok(())
}

struct DashboardUi {
    dashboard: Dashboard,
    alert: AlertModal,
}

impl DashboardUi {
    fn new() -> Self {
        Self {
            dashboard: Dashboard::new(),
            alert: AlertModal::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<DashboardComponentId>,
    ) {
        event_ctx.set_component_area(DashboardComponentId::Dashboard, area);

        let props = DashboardProps {
            state,
            is_focused: render_ctx.is_focused() && !state.alert_open(),
        };
        self.dashboard.render(frame, area, props);

        if let Some(message) = state.alert.as_deref() {
            let modal_area = centered_rect(50, 9, area);
            event_ctx.set_component_area(DashboardComponentId::Alert, modal_area);
            let props = AlertModalProps {
                message,
                is_focused: render_ctx.is_focused(),
            };
            self.alert.render(frame, area, props);
        } else {
            event_ctx
                .component_areas
                .remove(&DashboardComponentId::Alert);
        }
    }

    fn handle_dashboard_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = DashboardProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .dashboard
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

    fn handle_alert_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = AlertModalProps {
            message: state.alert.as_deref().unwrap_or_default(),
            is_focused: true,
        };
        let actions: Vec<_> = self.alert.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    init_action: Option<Action>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(DashboardUi::new()));
    let mut bus: EventBus<AppState, Action, DashboardComponentId, DashboardContext> =
        EventBus::new();
    let keybindings: Keybindings<DashboardContext> = Keybindings::new();

    let ui_dashboard = Rc::clone(&ui);
    bus.register(DashboardComponentId::Dashboard, move |event, state| {
        ui_dashboard
            .borrow_mut()
            .handle_dashboard_event(&event.kind, state)
    });

    let ui_alert = Rc::clone(&ui);
    bus.register(DashboardComponentId::Alert, move |event, state| {
        ui_alert.borrow_mut().handle_alert_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            init_action,
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
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::FetchForecast {
            request_id,
            endpoint,
            query,
        } => {
            // Cancel-and-replace: only the latest submission keeps running
            let key = TaskKey::new(FORECAST_TASK);
            ctx.tasks().cancel(&key);
            ctx.tasks().spawn(key, async move {
                let client = ForecastClient::new(endpoint);
                match client.fetch_daily_series(&query).await {
                    Ok(series) => {
                        info!(request_id, days = series.len(), "Forecast loaded");
                        Action::ForecastDidLoad(request_id, series)
                    }
                    Err(e) => {
                        warn!(request_id, error = %e, "Forecast failed");
                        Action::ForecastDidError(request_id, e)
                    }
                }
            });
        }
    }
}
