//! Application state - single source of truth

use chrono::{Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::api::FetchError;

/// Default provider endpoint (Open-Meteo forecast API)
pub const DEFAULT_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";

/// The one message a user ever sees when a fetch fails.
pub const FAILURE_MESSAGE: &str = "Failed to fetch weather data. Please check inputs.";

/// Shown under the form when a submit is attempted with blank fields.
pub const INCOMPLETE_FORM_NOTICE: &str = "Please fill out every field";

/// Date format used by the provider and the date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Animation timing for the title gradient seam.
pub const LOADING_ANIM_TICK_MS: u64 = 15;
pub const LOADING_ANIM_CYCLE_TICKS: u32 = 60;

/// One of the four form inputs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum FormField {
    Latitude,
    Longitude,
    StartDate,
    EndDate,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Latitude,
        FormField::Longitude,
        FormField::StartDate,
        FormField::EndDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Latitude => "Latitude",
            FormField::Longitude => "Longitude",
            FormField::StartDate => "Start Date",
            FormField::EndDate => "End Date",
        }
    }

    pub fn is_date(self) -> bool {
        matches!(self, FormField::StartDate | FormField::EndDate)
    }
}

/// Raw text of the four form inputs. Nothing is coerced before submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormInputs {
    pub latitude: String,
    pub longitude: String,
    pub start_date: String,
    pub end_date: String,
}

impl FormInputs {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Latitude => &self.latitude,
            FormField::Longitude => &self.longitude,
            FormField::StartDate => &self.start_date,
            FormField::EndDate => &self.end_date,
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Latitude => &mut self.latitude,
            FormField::Longitude => &mut self.longitude,
            FormField::StartDate => &mut self.start_date,
            FormField::EndDate => &mut self.end_date,
        }
    }

    /// First field that would block submission, in form order.
    pub fn first_missing(&self) -> Option<FormField> {
        FormField::ALL
            .into_iter()
            .find(|field| self.value(*field).trim().is_empty())
    }

    /// Submission is allowed only when every field is non-blank.
    pub fn is_ready(&self) -> bool {
        self.first_missing().is_none()
    }

    /// Move a date field by `days`. Blank fields start from `today`;
    /// text that is not a date is left alone.
    pub fn step_date(&mut self, field: FormField, days: i64, today: NaiveDate) -> bool {
        if !field.is_date() {
            return false;
        }
        let current = self.value(field).trim();
        let next = if current.is_empty() {
            Some(today)
        } else {
            let Ok(base) = NaiveDate::parse_from_str(current, DATE_FORMAT) else {
                return false;
            };
            let delta = Days::new(days.unsigned_abs());
            if days >= 0 {
                base.checked_add_days(delta)
            } else {
                base.checked_sub_days(delta)
            }
        };
        let Some(next) = next else {
            return false;
        };
        *self.value_mut(field) = next.format(DATE_FORMAT).to_string();
        true
    }
}

/// Which part of the dashboard receives keys
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Focus {
    #[default]
    Latitude,
    Longitude,
    StartDate,
    EndDate,
    Results,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::Latitude,
        Focus::Longitude,
        Focus::StartDate,
        Focus::EndDate,
        Focus::Results,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn field(self) -> Option<FormField> {
        match self {
            Focus::Latitude => Some(FormField::Latitude),
            Focus::Longitude => Some(FormField::Longitude),
            Focus::StartDate => Some(FormField::StartDate),
            Focus::EndDate => Some(FormField::EndDate),
            Focus::Results => None,
        }
    }
}

impl From<FormField> for Focus {
    fn from(field: FormField) -> Self {
        match field {
            FormField::Latitude => Focus::Latitude,
            FormField::Longitude => Focus::Longitude,
            FormField::StartDate => Focus::StartDate,
            FormField::EndDate => Focus::EndDate,
        }
    }
}

/// Per-day temperature aggregates, aligned by index to `time`.
///
/// A `None` value is a day the provider returned `null` for.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub temperature_2m_mean: Vec<Option<f64>>,
}

/// One row of a [`DailySeries`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayRow<'a> {
    pub date: &'a str,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub mean: Option<f64>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn day(&self, index: usize) -> Option<DayRow<'_>> {
        let date = self.time.get(index)?;
        Some(DayRow {
            date,
            max: self.temperature_2m_max.get(index).copied().flatten(),
            min: self.temperature_2m_min.get(index).copied().flatten(),
            mean: self.temperature_2m_mean.get(index).copied().flatten(),
        })
    }

    pub fn days(&self) -> impl Iterator<Item = DayRow<'_>> {
        (0..self.len()).filter_map(|i| self.day(i))
    }
}

/// Print a temperature the way the provider sent it (`10`, `7.5`); absent is blank.
pub fn format_temperature(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Request lifecycle: Idle → Loading → Displayed/Failed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Displayed,
    Failed,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Form ---
    #[debug(section = "Form", label = "Inputs", debug_fmt)]
    pub form: FormInputs,

    /// Notice shown after a blocked submit
    #[debug(section = "Form", label = "Notice", debug_fmt)]
    pub form_notice: Option<String>,

    #[debug(section = "Form", label = "Focus", debug_fmt)]
    pub focus: Focus,

    // --- Request ---
    #[debug(section = "Request", label = "Endpoint")]
    pub endpoint: String,

    #[debug(section = "Request", label = "Status", debug_fmt)]
    pub status: FetchStatus,

    /// True exactly while `in_flight` is set
    #[debug(section = "Request", label = "Loading")]
    pub loading: bool,

    /// Id of the request whose result will be accepted
    #[debug(section = "Request", label = "In flight", debug_fmt)]
    pub in_flight: Option<u64>,

    /// Last id handed out
    #[debug(section = "Request", label = "Sequence")]
    pub request_seq: u64,

    /// Concrete reason of the last failure (never shown to the user)
    #[debug(section = "Request", label = "Last error", debug_fmt)]
    pub last_error: Option<FetchError>,

    // --- Results ---
    #[debug(section = "Results", label = "Series", debug_fmt)]
    pub series: Option<DailySeries>,

    /// Bumped on every accepted series; the chart is rebuilt when it changes
    #[debug(section = "Results", label = "Revision")]
    pub series_revision: u64,

    /// Day under the chart/table cursor
    #[debug(section = "Results", label = "Selected day")]
    pub selected_day: usize,

    /// Open failure alert
    #[debug(section = "Results", label = "Alert", debug_fmt)]
    pub alert: Option<String>,

    // --- Animation internals (skipped) ---
    #[debug(skip)]
    pub tick_count: u32,

    /// Remaining ticks to finish the current animation cycle after loading
    #[debug(skip)]
    pub loading_anim_ticks_remaining: u32,
}

impl AppState {
    pub fn new(form: FormInputs, endpoint: impl Into<String>) -> Self {
        Self {
            form,
            form_notice: None,
            focus: Focus::default(),
            endpoint: endpoint.into(),
            status: FetchStatus::Idle,
            loading: false,
            in_flight: None,
            request_seq: 0,
            last_error: None,
            series: None,
            series_revision: 0,
            selected_day: 0,
            alert: None,
            tick_count: 0,
            loading_anim_ticks_remaining: 0,
        }
    }

    pub fn loading_anim_active(&self) -> bool {
        self.loading || self.loading_anim_ticks_remaining > 0
    }

    pub fn alert_open(&self) -> bool {
        self.alert.is_some()
    }

    pub fn selected_row(&self) -> Option<DayRow<'_>> {
        self.series.as_ref()?.day(self.selected_day)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(FormInputs::default(), DEFAULT_ENDPOINT)
    }
}
