//! Reducer - pure function: (state, action) -> DispatchResult

use chrono::Local;
use tracing::debug;
use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::api::ForecastQuery;
use crate::effect::Effect;
use crate::state::{
    AppState, FAILURE_MESSAGE, FetchStatus, Focus, FormField, INCOMPLETE_FORM_NOTICE,
    LOADING_ANIM_CYCLE_TICKS,
};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Form actions =====
        Action::FormLatitudeChange(value) => set_field(state, FormField::Latitude, value),
        Action::FormLongitudeChange(value) => set_field(state, FormField::Longitude, value),
        Action::FormStartDateChange(value) => set_field(state, FormField::StartDate, value),
        Action::FormEndDateChange(value) => set_field(state, FormField::EndDate, value),

        Action::FormDateStep(days) => {
            let Some(field) = state.focus.field() else {
                return DispatchResult::unchanged();
            };
            let today = Local::now().date_naive();
            if state.form.step_date(field, days, today) {
                state.form_notice = None;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::FormSubmit => {
            let Some(query) = ForecastQuery::from_form(&state.form) else {
                if let Some(missing) = state.form.first_missing() {
                    state.focus = missing.into();
                }
                state.form_notice = Some(INCOMPLETE_FORM_NOTICE.to_string());
                return DispatchResult::changed();
            };

            // A newer submit replaces whatever is still in flight.
            state.request_seq += 1;
            let request_id = state.request_seq;
            state.in_flight = Some(request_id);
            state.loading = true;
            state.status = FetchStatus::Loading;
            state.form_notice = None;
            state.tick_count = 0;
            state.loading_anim_ticks_remaining = 0;
            DispatchResult::changed_with(Effect::FetchForecast {
                request_id,
                endpoint: state.endpoint.clone(),
                query,
            })
        }

        // ===== Focus actions =====
        Action::FocusNext => {
            state.focus = state.focus.next();
            DispatchResult::changed()
        }

        Action::FocusPrev => {
            state.focus = state.focus.prev();
            DispatchResult::changed()
        }

        Action::FocusSet(focus) => {
            if state.focus == focus {
                DispatchResult::unchanged()
            } else {
                state.focus = focus;
                DispatchResult::changed()
            }
        }

        // ===== Forecast actions =====
        Action::ForecastDidLoad(request_id, series) => {
            if state.in_flight != Some(request_id) {
                debug!(request_id, "Dropping superseded forecast result");
                return DispatchResult::unchanged();
            }
            settle(state);
            state.selected_day = state.selected_day.min(series.len().saturating_sub(1));
            state.series = Some(series);
            state.series_revision += 1;
            state.status = FetchStatus::Displayed;
            state.last_error = None;
            DispatchResult::changed()
        }

        Action::ForecastDidError(request_id, error) => {
            if state.in_flight != Some(request_id) {
                debug!(request_id, %error, "Dropping superseded forecast error");
                return DispatchResult::unchanged();
            }
            settle(state);
            state.status = FetchStatus::Failed;
            state.last_error = Some(error);
            state.alert = Some(FAILURE_MESSAGE.to_string());
            DispatchResult::changed()
        }

        // ===== Chart actions =====
        Action::ChartStep(delta) => {
            let Some(series) = &state.series else {
                return DispatchResult::unchanged();
            };
            let last = series.len().saturating_sub(1) as i64;
            let next = (state.selected_day as i64).saturating_add(delta).clamp(0, last) as usize;
            select_day(state, next)
        }

        Action::ChartSelectDay(index) => {
            let Some(series) = &state.series else {
                return DispatchResult::unchanged();
            };
            let index = index.min(series.len().saturating_sub(1));
            select_day(state, index)
        }

        // ===== Alert actions =====
        Action::AlertDismiss => {
            if state.alert.take().is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            let animating = state.loading_anim_active();
            if animating {
                state.tick_count = state.tick_count.wrapping_add(1);
                if state.loading_anim_ticks_remaining > 0 {
                    state.loading_anim_ticks_remaining -= 1;
                }
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn set_field(state: &mut AppState, field: FormField, value: String) -> DispatchResult<Effect> {
    *state.form.value_mut(field) = value;
    state.form_notice = None;
    state.focus = Focus::from(field);
    DispatchResult::changed()
}

fn select_day(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    if state.selected_day == index {
        DispatchResult::unchanged()
    } else {
        state.selected_day = index;
        DispatchResult::changed()
    }
}

/// Clear the in-flight request and let the title animation finish its cycle.
fn settle(state: &mut AppState) {
    state.in_flight = None;
    state.loading = false;
    state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
}

fn ticks_to_phase_zero(tick_count: u32) -> u32 {
    let cycle = LOADING_ANIM_CYCLE_TICKS.max(1);
    if tick_count == 0 {
        return cycle;
    }
    let remainder = tick_count % cycle;
    if remainder == 0 { 0 } else { cycle - remainder }
}
