//! Logging macros that can be silenced per module.
//!
//! A module opts in by declaring `const ENABLE_LOGS: bool` and importing the
//! macros from the crate root:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//! use crate::{log_info, log_warn};
//!
//! log_info!("booking refresh started");
//! ```
//!
//! With the flag set to `false` the calls compile to nothing at the `log`
//! level, whatever `RUST_LOG` says.

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Errors go through the same switch; keep `ENABLE_LOGS` on in modules whose
/// failures are otherwise invisible (spawned tasks).
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
