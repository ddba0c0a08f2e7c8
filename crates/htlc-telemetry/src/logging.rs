//! Structured logging helpers.
//!
//! Log lines carry consistent fields so they can be filtered downstream:
//! - `component`: emitting component (engine, host, token, ...)
//! - `agreement_id`: swap agreement the line refers to, when any
//! - additional context fields

/// Helper to create structured log entries with consistent formatting.
#[macro_export]
macro_rules! log_event {
    (info, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (error, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log an agreement lifecycle event with standard fields.
#[macro_export]
macro_rules! log_agreement_event {
    ($level:ident, $component:expr, $msg:expr, $agreement_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            agreement_id = %$agreement_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a token-ledger event with standard fields.
#[macro_export]
macro_rules! log_ledger_event {
    ($level:ident, $component:expr, $msg:expr, $ledger:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            ledger = %$ledger,
            $($($field)*,)?
            $msg
        )
    };
}
