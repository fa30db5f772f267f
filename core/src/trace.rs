//! Tracing helpers for emission observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level event for one emitted object.
///
/// ```ignore
/// gpdump_trace_object!("TABLE", &table.fqn());
/// ```
#[macro_export]
macro_rules! gpdump_trace_object {
    ($kind:expr, $fqn:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(kind = %$kind, object = %$fqn, "gpdump.emit");
    };
}

/// Emit an info-level event when a section finishes.
///
/// ```ignore
/// gpdump_trace_section!("predata", toc.predata.len(), writer.byte_count());
/// ```
#[macro_export]
macro_rules! gpdump_trace_section {
    ($section:expr, $entries:expr, $bytes:expr) => {
        #[cfg(feature = "tracing")]
        tracing::info!(section = %$section, entries = $entries, bytes = $bytes, "gpdump.section");
    };
}

/// Emit a warn-level event for an object left out of the output. Without a
/// reason the catalog returned no definition for it.
#[macro_export]
macro_rules! gpdump_trace_skip {
    ($kind:expr, $fqn:expr) => {
        $crate::gpdump_trace_skip!($kind, $fqn, "null definition");
    };
    ($kind:expr, $fqn:expr, $reason:expr) => {
        #[cfg(feature = "tracing")]
        tracing::warn!(kind = %$kind, object = %$fqn, reason = %$reason, "gpdump.skip");
    };
}
