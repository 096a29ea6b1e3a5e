//! Shared constants.

/// Name of the configuration scope used when no site access matched.
pub const DEFAULT_SCOPE: &str = "default";

/// Configuration parameter holding the active binary storage prefix.
pub const STORAGE_PREFIX_PARAMETER: &str = "io.storage_prefix";

/// Default port written back by the port matcher for https requests.
pub const HTTPS_DEFAULT_PORT: u16 = 443;

/// Default port written back by the port matcher for plain http requests.
pub const HTTP_DEFAULT_PORT: u16 = 80;
