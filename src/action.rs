//! Actions: user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::api::FetchError;
use crate::state::{DailySeries, Focus};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Form category =====
    FormLatitudeChange(String),
    FormLongitudeChange(String),
    FormStartDateChange(String),
    FormEndDateChange(String),

    /// Step the focused date field by N days
    FormDateStep(i64),

    /// Intent: submit the form (triggers async task when every field is filled)
    FormSubmit,

    // ===== Focus category =====
    FocusNext,
    FocusPrev,
    FocusSet(Focus),

    // ===== Forecast category =====
    /// Result: daily series decoded for request id
    ForecastDidLoad(u64, DailySeries),

    /// Result: request id failed
    ForecastDidError(u64, FetchError),

    // ===== Chart category =====
    /// Move the day cursor by N days
    ChartStep(i64),

    /// Put the day cursor on an index
    ChartSelectDay(usize),

    // ===== Alert category =====
    AlertDismiss,

    // ===== Uncategorized (global) =====
    /// Force a re-render (for cursor movement, etc.)
    Render,

    /// Periodic tick for loading animation
    Tick,

    /// Exit the application
    Quit,
}
