pub mod alert_modal;
pub mod dashboard;
pub mod input_form;
pub mod series_table;
pub mod temperature_chart;
pub mod title_banner;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use alert_modal::{AlertModal, AlertModalProps, ERROR_ICON};
pub use dashboard::{Dashboard, DashboardProps};
pub use input_form::{InputForm, InputFormProps};
pub use series_table::{SeriesTable, SeriesTableProps};
pub use temperature_chart::{TemperatureChart, TemperatureChartProps};
pub use title_banner::{TitleBanner, TitleBannerProps};
