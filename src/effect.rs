//! Effects - side effects declared by the reducer

use crate::api::ForecastQuery;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch the daily series; supersedes any request still in flight
    FetchForecast {
        request_id: u64,
        endpoint: String,
        query: ForecastQuery,
    },
}
