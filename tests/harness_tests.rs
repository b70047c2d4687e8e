//! Store, component and render tests combined through EffectStoreTestHarness

use pretty_assertions::assert_eq;
use tui_dispatch::NumericComponentId;
use tui_dispatch::testing::*;
use weather_dashboard::{
    action::Action,
    api::FetchError,
    components::{Component, Dashboard, DashboardProps},
    effect::Effect,
    reducer::reducer,
    state::{AppState, DailySeries, FAILURE_MESSAGE, FetchStatus, Focus, FormInputs},
};

fn filled_form() -> FormInputs {
    FormInputs {
        latitude: "52.52".into(),
        longitude: "13.41".into(),
        start_date: "2024-01-01".into(),
        end_date: "2024-01-02".into(),
    }
}

fn ready_state() -> AppState {
    AppState::new(filled_form(), "http://localhost/v1/forecast")
}

fn two_days() -> DailySeries {
    DailySeries {
        time: vec!["2024-01-01".into(), "2024-01-02".into()],
        temperature_2m_max: vec![Some(10.0), Some(12.0)],
        temperature_2m_min: vec![Some(2.0), Some(3.0)],
        temperature_2m_mean: vec![Some(6.0), Some(7.5)],
    }
}

fn three_days() -> DailySeries {
    DailySeries {
        time: vec![
            "2024-03-01".into(),
            "2024-03-02".into(),
            "2024-03-03".into(),
        ],
        temperature_2m_max: vec![Some(14.0), Some(15.5), Some(13.0)],
        temperature_2m_min: vec![Some(4.0), None, Some(5.0)],
        temperature_2m_mean: vec![Some(9.0), Some(10.0), Some(9.5)],
    }
}

fn transport_error() -> FetchError {
    FetchError::Transport("connection refused".into())
}

// ============================================================================
// Fetch lifecycle
// ============================================================================

#[test]
fn test_submit_then_load_flow() {
    let mut harness = EffectStoreTestHarness::new(ready_state(), reducer);

    harness.dispatch_collect(Action::FormSubmit);
    harness.assert_state(|s| s.loading && s.status == FetchStatus::Loading);

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::FetchForecast { request_id: 1, .. }));

    harness.complete_action(Action::ForecastDidLoad(1, two_days()));
    let (changed, total) = harness.process_emitted();

    assert_eq!(total, 1, "Should have processed 1 action");
    assert_eq!(changed, 1, "Action should have changed state");

    harness.assert_state(|s| !s.loading);
    harness.assert_state(|s| s.status == FetchStatus::Displayed);
    harness.assert_state(|s| s.series.as_ref().map(DailySeries::len) == Some(2));
}

#[test]
fn test_error_keeps_previous_series() {
    let mut harness = EffectStoreTestHarness::new(ready_state(), reducer);

    harness.dispatch_collect(Action::FormSubmit);
    harness.complete_action(Action::ForecastDidLoad(1, two_days()));
    harness.process_emitted();

    harness.dispatch_collect(Action::FormSubmit);
    harness.assert_state(|s| s.loading);
    harness.complete_action(Action::ForecastDidError(2, transport_error()));
    harness.process_emitted();

    harness.assert_state(|s| !s.loading);
    harness.assert_state(|s| s.status == FetchStatus::Failed);
    harness.assert_state(|s| s.series.as_ref() == Some(&two_days()));
    harness.assert_state(|s| s.alert.as_deref() == Some(FAILURE_MESSAGE));
    harness.assert_state(|s| s.last_error == Some(transport_error()));
}

#[test]
fn test_alert_dismiss_returns_to_dashboard() {
    let mut harness = EffectStoreTestHarness::new(ready_state(), reducer);

    harness.dispatch_collect(Action::FormSubmit);
    harness.complete_action(Action::ForecastDidError(1, transport_error()));
    harness.process_emitted();
    harness.assert_state(|s| s.alert_open());

    harness.dispatch_collect(Action::AlertDismiss);
    harness.assert_state(|s| !s.alert_open());
    harness.assert_state(|s| s.status == FetchStatus::Failed);
}

#[test]
fn test_superseded_result_is_dropped() {
    let mut harness = EffectStoreTestHarness::new(ready_state(), reducer);

    // Two submits in a row; only the second may land
    harness.dispatch_collect(Action::FormSubmit);
    harness.dispatch_collect(Action::FormSubmit);
    let effects = harness.drain_effects();
    effects.effects_count(2);

    // Responses arrive out of order
    harness.complete_action(Action::ForecastDidLoad(2, three_days()));
    harness.complete_action(Action::ForecastDidLoad(1, two_days()));
    let (changed, total) = harness.process_emitted();

    assert_eq!(total, 2);
    assert_eq!(changed, 1, "Stale response should not change state");
    harness.assert_state(|s| s.series.as_ref() == Some(&three_days()));
    harness.assert_state(|s| s.series_revision == 1);
}

#[test]
fn test_superseded_error_raises_no_alert() {
    let mut harness = EffectStoreTestHarness::new(ready_state(), reducer);

    harness.dispatch_collect(Action::FormSubmit);
    harness.dispatch_collect(Action::FormSubmit);
    harness.complete_action(Action::ForecastDidError(1, transport_error()));
    harness.process_emitted();

    harness.assert_state(|s| !s.alert_open());
    harness.assert_state(|s| s.loading);
}

#[test]
fn test_resubmit_same_inputs_reloads_same_series() {
    let mut harness = EffectStoreTestHarness::new(ready_state(), reducer);

    for request_id in 1..=2 {
        harness.dispatch_collect(Action::FormSubmit);
        harness.complete_action(Action::ForecastDidLoad(request_id, two_days()));
        harness.process_emitted();
    }

    harness.assert_state(|s| s.series.as_ref() == Some(&two_days()));
    harness.assert_state(|s| s.series_revision == 2);
    harness.assert_state(|s| s.status == FetchStatus::Displayed);
}

#[test]
fn test_blank_submit_emits_nothing() {
    let mut form = filled_form();
    form.latitude = "  ".into();
    let mut harness = EffectStoreTestHarness::new(AppState::new(form, "http://localhost"), reducer);

    harness.dispatch_collect(Action::FormSubmit);

    let effects = harness.drain_effects();
    effects.effects_empty();
    harness.assert_state(|s| !s.loading && s.status == FetchStatus::Idle);
    harness.assert_state(|s| s.focus == Focus::Latitude && s.form_notice.is_some());
}

// ============================================================================
// Component + store integration
// ============================================================================

#[test]
fn test_typing_then_enter_fetches() {
    let mut form = filled_form();
    form.latitude.clear();
    form.longitude.clear();
    let mut harness = EffectStoreTestHarness::new(AppState::new(form, "http://localhost"), reducer);
    let mut component = Dashboard::new();

    // Type one digit into each coordinate, tabbing between them
    let actions = harness.send_keys::<NumericComponentId, _, _>("7", |state, event| {
        let props = DashboardProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_first(Action::FormLatitudeChange("7".into()));
    for action in actions {
        harness.dispatch_collect(action);
    }

    harness.dispatch_collect(Action::FocusNext);
    let actions = harness.send_keys::<NumericComponentId, _, _>("8", |state, event| {
        let props = DashboardProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    for action in actions {
        harness.dispatch_collect(action);
    }
    harness.assert_state(|s| s.form.latitude == "7" && s.form.longitude == "8");

    let actions = harness.send_keys::<NumericComponentId, _, _>("enter", |state, event| {
        let props = DashboardProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_first(Action::FormSubmit);
    harness.dispatch_collect(Action::FormSubmit);

    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| {
        matches!(e, Effect::FetchForecast { query, .. }
            if query.longitude == "8" && query.start_date == "2024-01-01")
    });
}

#[test]
fn test_arrow_keys_move_day_cursor() {
    let mut harness = EffectStoreTestHarness::new(
        AppState {
            series: Some(three_days()),
            series_revision: 1,
            focus: Focus::Results,
            ..ready_state()
        },
        reducer,
    );
    let mut component = Dashboard::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>(
        "right right right left",
        |state, event| {
            let props = DashboardProps {
                state,
                is_focused: true,
            };
            component
                .handle_event(&event.kind, props)
                .into_iter()
                .collect::<Vec<_>>()
        },
    );
    for action in actions {
        harness.dispatch_collect(action);
    }

    // Clamped at the last day, then back one
    harness.assert_state(|s| s.selected_day == 1);
}

// ============================================================================
// Render
// ============================================================================

#[test]
fn test_render_loading_state() {
    let mut harness = EffectStoreTestHarness::new(ready_state(), reducer);
    let mut component = Dashboard::new();

    harness.dispatch_collect(Action::FormSubmit);

    let output = harness.render_plain(100, 40, |frame, area, state| {
        let props = DashboardProps {
            state,
            is_focused: true,
        };
        component.render(frame, area, props);
    });

    assert!(
        output.contains("Loading..."),
        "Loading hint should be visible in output:\n{}",
        output
    );
}

#[test]
fn test_render_after_load() {
    let mut harness = EffectStoreTestHarness::new(ready_state(), reducer);
    let mut component = Dashboard::new();

    harness.dispatch_collect(Action::FormSubmit);
    harness.complete_action(Action::ForecastDidLoad(1, two_days()));
    harness.process_emitted();

    let output = harness.render_plain(100, 40, |frame, area, state| {
        let props = DashboardProps {
            state,
            is_focused: true,
        };
        component.render(frame, area, props);
    });

    assert!(output.contains("2024-01-02"), "Table row missing:\n{}", output);
    assert!(output.contains("7.5"), "Mean value missing:\n{}", output);
    assert!(!output.contains("Loading..."), "Loading hint should be gone");
    assert_eq!(component.chart_slot().created(), 1);
}

#[test]
fn test_chart_replaced_once_per_load() {
    let mut harness = EffectStoreTestHarness::new(ready_state(), reducer);
    let mut component = Dashboard::new();

    for (request_id, series) in [(1, two_days()), (2, three_days())] {
        harness.dispatch_collect(Action::FormSubmit);
        harness.complete_action(Action::ForecastDidLoad(request_id, series));
        harness.process_emitted();
        harness.render_plain(100, 40, |frame, area, state| {
            let props = DashboardProps {
                state,
                is_focused: true,
            };
            component.render(frame, area, props);
        });
    }

    let slot = component.chart_slot();
    assert_eq!(slot.created(), 2);
    assert_eq!(slot.destroyed(), 1);
    assert_eq!(slot.live_count(), 1);
}
