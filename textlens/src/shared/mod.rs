mod config_load;
mod logging;
mod notify;

pub(crate) use config_load::resolve_relative;

pub const API_URL_ENV: &str = "TEXTLENS_API_URL";
pub const CONFIG_FILE_ENV: &str = "TEXTLENS_CONFIG_FILE";
pub const RUN_ID_ENV_VAR: &str = "TEXTLENS_RUN_ID";
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

pub mod prelude {
    pub use super::config_load::{ConfigFile, ConfigOptions, FoundConfig, TimeoutSettings};
    pub use super::logging::{
        ConfiguredLogger, LoggingOpts, LoggingProgress, STDOUT_WRITER, upload_spinner,
    };
    pub use super::notify::{
        MockNotifier, NoOpNotifier, Notification, NotificationKind, Notifier, TracingNotifier,
    };
    pub use super::{API_URL_ENV, CONFIG_FILE_ENV, DEFAULT_API_URL, RUN_ID_ENV_VAR};
}
