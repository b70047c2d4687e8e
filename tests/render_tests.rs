//! Render snapshot tests using RenderHarness

use tui_dispatch::testing::*;
use weather_dashboard::{
    chart::ChartSpec,
    components::{
        AlertModal, AlertModalProps, Component, Dashboard, DashboardProps, SeriesTable,
        SeriesTableProps, TemperatureChart, TemperatureChartProps,
    },
    state::{AppState, DailySeries, FAILURE_MESSAGE, Focus},
};

fn two_days() -> DailySeries {
    DailySeries {
        time: vec!["2024-01-01".into(), "2024-01-02".into()],
        temperature_2m_max: vec![Some(10.0), Some(12.0)],
        temperature_2m_min: vec![Some(2.0), Some(3.0)],
        temperature_2m_mean: vec![Some(6.0), Some(7.5)],
    }
}

fn render_dashboard(width: u16, height: u16, state: &AppState) -> String {
    let mut render = RenderHarness::new(width, height);
    let mut component = Dashboard::new();

    render.render_to_string_plain(|frame| {
        let props = DashboardProps {
            state,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    })
}

#[test]
fn test_render_table_rows() {
    let mut render = RenderHarness::new(80, 10);
    let mut component = SeriesTable;
    let series = two_days();

    let output = render.render_to_string_plain(|frame| {
        let props = SeriesTableProps {
            series: &series,
            selected: 0,
            is_focused: false,
        };
        component.render(frame, frame.area(), props);
    });

    assert!(output.contains("Max Temp (°C)"), "Header missing:\n{output}");
    assert!(output.contains("Mean Temp (°C)"), "Header missing:\n{output}");

    let rows: Vec<_> = output
        .lines()
        .filter(|line| line.contains("2024-01-0"))
        .collect();
    assert_eq!(rows.len(), 2, "Expected one row per day:\n{output}");
    assert!(rows[0].contains("10") && rows[0].contains("6"));
    assert!(rows[1].contains("12") && rows[1].contains("7.5"));
}

#[test]
fn test_render_null_temperature_as_blank() {
    let mut render = RenderHarness::new(80, 10);
    let mut component = SeriesTable;
    let series = DailySeries {
        time: vec!["2024-01-01".into()],
        temperature_2m_max: vec![None],
        temperature_2m_min: vec![Some(-4.5)],
        temperature_2m_mean: vec![None],
    };

    let output = render.render_to_string_plain(|frame| {
        let props = SeriesTableProps {
            series: &series,
            selected: 0,
            is_focused: false,
        };
        component.render(frame, frame.area(), props);
    });

    assert!(output.contains("-4.5"));
    assert!(!output.contains("null"), "Missing values render blank:\n{output}");
}

#[test]
fn test_render_chart_legend_and_title() {
    let mut render = RenderHarness::new(90, 24);
    let mut component = TemperatureChart;
    let series = two_days();
    let spec = ChartSpec::from_series(&series);

    let output = render.render_to_string_plain(|frame| {
        let props = TemperatureChartProps {
            spec: &spec,
            series: &series,
            selected: 1,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    });

    assert!(output.contains("Daily Temperature"), "Title missing:\n{output}");
    for label in ["Max Temp", "Min Temp", "Mean Temp"] {
        assert!(output.contains(label), "Legend missing {label}:\n{output}");
    }
    // Cursor readout for the selected day
    assert!(output.contains("2024-01-02"));
}

#[test]
fn test_render_alert() {
    let mut render = RenderHarness::new(80, 24);
    let mut component = AlertModal::new();

    let output = render.render_to_string_plain(|frame| {
        let props = AlertModalProps {
            message: FAILURE_MESSAGE,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    });

    assert!(output.contains("Error"), "Should show error label");
    assert!(
        output.contains("Please check inputs"),
        "Should show failure message:\n{output}"
    );
}

#[test]
fn test_render_initial_state() {
    let output = render_dashboard(100, 40, &AppState::default());

    assert!(output.contains("Latitude"));
    assert!(output.contains("End Date"));
    assert!(
        output.contains("to fetch weather"),
        "Should show fetch prompt:\n{output}"
    );
}

#[test]
fn test_render_loading_hint() {
    let state = AppState {
        loading: true,
        ..Default::default()
    };
    let output = render_dashboard(100, 40, &state);

    assert!(output.contains("Loading..."), "Should show loading hint");
}

#[test]
fn test_render_empty_range() {
    let state = AppState {
        series: Some(DailySeries::default()),
        series_revision: 1,
        ..Default::default()
    };
    let output = render_dashboard(100, 40, &state);

    assert!(output.contains("No days in the selected range"));
}

#[test]
fn test_render_help_bar() {
    let state = AppState {
        series: Some(two_days()),
        series_revision: 1,
        focus: Focus::Results,
        ..Default::default()
    };
    let output = render_dashboard(100, 40, &state);

    assert!(output.contains("refresh"), "Should show refresh hint");
    assert!(output.contains("edit"), "Should show edit hint");
    assert!(output.contains("quit"), "Should show quit hint");
}

#[test]
fn test_render_form_help_bar() {
    let output = render_dashboard(100, 40, &AppState::default());

    assert!(output.contains("fetch"), "Should show fetch hint");
    assert!(output.contains("next field"), "Should show tab hint");
}
