//! Logging macros shared by the router.
//!
//! The macros forward to `log` (default feature) or `tracing` (feature
//! `tracing`). Enable one of them; with neither enabled the macros expand to
//! nothing and arguments are not evaluated.
//!
//! Levels used by the crate:
//!
//! - `trace` - dispatch passes and per-subscriber evaluation
//! - `debug` - navigation, registration and startup
//! - `warn` - navigation requests rejected while a dispatch pass is running
//!
//! ```ignore
//! use path_navigator::{debug_log, warn_log};
//!
//! debug_log!("navigating to {}", path);
//! warn_log!("go({}) ignored: dispatch in progress", path);
//! ```

/// Trace-level logging
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
    };
}

/// Info-level logging
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
    };
}

/// Warn-level logging
///
/// Used for recoverable misuse, such as navigating from inside a subscriber
/// callback.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
    };
}

/// Error-level logging
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
    };
}
