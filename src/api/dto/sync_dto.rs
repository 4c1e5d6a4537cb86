//! DTOs for the channel-manager sync endpoint.

use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for `POST /sync/run`.
///
/// Defaults cover today through one year out, which is the window the
/// external channels actually sell.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SyncParams {
    /// Start of the feed window (`YYYY-MM-DD`). Defaults to today.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// End of the feed window (`YYYY-MM-DD`). Defaults to one year out.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl SyncParams {
    /// Resolves the window, applying defaults.
    #[must_use]
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        let today = Utc::now().date_naive();
        let from = self.from.unwrap_or(today);
        let to = self.to.unwrap_or(from + Duration::days(365));
        (from, to)
    }
}
