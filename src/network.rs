//! Network defaults for the simulated exchange backend.

use std::time::Duration;

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// How often each category's price channel is re-opened.
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(60);

/// Timeout applied to REST requests (not to the push channel).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable overriding [`DEFAULT_API_URL`].
pub const ENV_API_URL: &str = "SIMEX_API_URL";

/// Environment variable overriding [`DEFAULT_REFRESH_PERIOD`], in seconds.
pub const ENV_REFRESH_SECS: &str = "SIMEX_REFRESH_SECS";

/// Environment variable selecting the chart theme (`light` / `dark`).
pub const ENV_THEME: &str = "SIMEX_THEME";
