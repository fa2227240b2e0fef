//! Logging macros over an explicit `LoggingService`
//!
//! Every macro takes the service as its first argument. Context values may
//! be any `Display` type.

/// Log error with Code type
#[macro_export]
macro_rules! log_error {
    ($log:expr, $code:expr, $message:expr) => {
        $log.log_error($code, $message)
    };

    ($log:expr, $code:expr, $message:expr, span = $span:expr) => {
        $log.log_error_with_span($code, $message, $span)
    };

    ($log:expr, $code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $log.log_error_with_context($code, $message, context_refs)
        }
    };

    ($log:expr, $code:expr, $message:expr, span = $span:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut event = $crate::logging::LogEvent::error($code, $message).with_span($span);
            $(
                event = event.with_context($key, &format!("{}", $value));
            )+
            $log.log_event(event)
        }
    };
}

/// Log success with Code type
#[macro_export]
macro_rules! log_success {
    ($log:expr, $code:expr, $message:expr) => {
        $log.log_success($code, $message)
    };

    ($log:expr, $code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $log.log_success_with_context($code, $message, context_refs)
        }
    };
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($log:expr, $message:expr) => {
        $log.log_info($message)
    };

    ($log:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut event = $crate::logging::LogEvent::info($message);
            $(
                event = event.with_context($key, &format!("{}", $value));
            )+
            $log.log_event(event)
        }
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warning {
    ($log:expr, $message:expr) => {
        $log.log_warning($message)
    };

    ($log:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut event = $crate::logging::LogEvent::warning($message);
            $(
                event = event.with_context($key, &format!("{}", $value));
            )+
            $log.log_event(event)
        }
    };
}

/// Log debug message; context is only formatted when debug is enabled
#[macro_export]
macro_rules! log_debug {
    ($log:expr, $message:expr) => {
        $log.log_debug($message)
    };

    ($log:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            if $log.should_log($crate::logging::LogLevel::Debug) {
                let mut event = $crate::logging::LogEvent::debug($message);
                $(
                    event = event.with_context($key, &format!("{}", $value));
                )+
                $log.log_event(event)
            }
        }
    };
}
