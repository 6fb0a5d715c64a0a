/// Standardized logging macros for consistent field names and message patterns across the service
///
/// These macros ensure:
/// - Consistent field naming (`operation`, `request_id`, `unit_id`, `filename`)
/// - Appropriate logging levels for different scenarios
/// - Structured logging with context

// ============================================================================
// API Operation Logging Macros
// ============================================================================

/// Log the start of an API operation with consistent fields
#[macro_export]
macro_rules! log_api_start {
    ($operation:expr, request_id = $request_id:expr, unit_id = $unit_id:expr) => {
        tracing::debug!(
            operation = $operation,
            request_id = %$request_id,
            unit_id = %$unit_id,
            "API operation started"
        );
    };
    ($operation:expr, filename = $filename:expr) => {
        tracing::debug!(
            operation = $operation,
            filename = %$filename,
            "API operation started"
        );
    };
    ($operation:expr) => {
        tracing::debug!(
            operation = $operation,
            "API operation started"
        );
    };
}

/// Log successful completion of an API operation
#[macro_export]
macro_rules! log_api_success {
    ($operation:expr, request_id = $request_id:expr, source = $source:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            request_id = %$request_id,
            source = $source,
            "API operation completed: {}", $msg
        );
    };
    ($operation:expr, filename = $filename:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            filename = %$filename,
            "API operation completed: {}", $msg
        );
    };
    ($operation:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            "API operation completed: {}", $msg
        );
    };
}

/// Log API operation errors with consistent structure
#[macro_export]
macro_rules! log_api_error {
    ($operation:expr, request_id = $request_id:expr, error = $error:expr, $msg:expr) => {
        tracing::error!(
            operation = $operation,
            request_id = %$request_id,
            error = %$error,
            "API operation failed: {}", $msg
        );
    };
    ($operation:expr, filename = $filename:expr, error = $error:expr, $msg:expr) => {
        tracing::error!(
            operation = $operation,
            filename = %$filename,
            error = %$error,
            "API operation failed: {}", $msg
        );
    };
    ($operation:expr, error = $error:expr, $msg:expr) => {
        tracing::error!(
            operation = $operation,
            error = %$error,
            "API operation failed: {}", $msg
        );
    };
}

/// Log API warnings with context
#[macro_export]
macro_rules! log_api_warn {
    ($operation:expr, filename = $filename:expr, $msg:expr) => {
        tracing::warn!(
            operation = $operation,
            filename = %$filename,
            "API operation warning: {}", $msg
        );
    };
    ($operation:expr, $msg:expr) => {
        tracing::warn!(
            operation = $operation,
            "API operation warning: {}", $msg
        );
    };
}

// ============================================================================
// Generation Logging Macros
// ============================================================================

/// Log generation backend operations with provider context
#[macro_export]
macro_rules! log_generation {
    (start, provider = $provider:expr, model = $model:expr, prompt_length = $len:expr) => {
        tracing::info!(
            component = "generation",
            provider = %$provider,
            model = %$model,
            prompt_length = $len,
            "Generation request started"
        );
    };
    (success, provider = $provider:expr, duration_ms = $duration:expr, question_count = $count:expr) => {
        tracing::info!(
            component = "generation",
            provider = %$provider,
            duration_ms = $duration,
            question_count = $count,
            "Generation completed successfully"
        );
    };
    (fallback, request_id = $request_id:expr, kind = $kind:expr, error = $error:expr) => {
        tracing::warn!(
            component = "generation",
            request_id = %$request_id,
            failure_kind = $kind,
            error = %$error,
            "Generation backend failed, using fallback"
        );
    };
    (error, provider = $provider:expr, error = $error:expr) => {
        tracing::error!(
            component = "generation",
            provider = %$provider,
            error = %$error,
            "Generation backend request failed"
        );
    };
}

// ============================================================================
// System Event Logging Macros
// ============================================================================

/// Log system startup and shutdown events
#[macro_export]
macro_rules! log_system_event {
    (startup, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "startup",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (shutdown, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "shutdown",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (config, $msg:expr) => {
        tracing::info!(event_type = "configuration", "System event: {}", $msg);
    };
}

// ============================================================================
// Validation Logging Macros
// ============================================================================

/// Log validation results consistently
#[macro_export]
macro_rules! log_validation {
    (success, $component:expr, $msg:expr) => {
        tracing::debug!(
            event_type = "validation",
            component = $component,
            result = "success",
            "Validation completed: {}", $msg
        );
    };
    (failure, $component:expr, error = $error:expr) => {
        tracing::warn!(
            event_type = "validation",
            component = $component,
            result = "failure",
            error = %$error,
            "Validation failed"
        );
    };
}
