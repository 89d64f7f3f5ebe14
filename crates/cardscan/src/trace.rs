use tracing_log::LogTracer;

/// Route `log` records into `tracing`, then install the subscriber from
/// [`cardscan_core::init_tracing`].
///
/// The `log` macros used throughout the pipeline show up as events inside the
/// stage spans. Safe to call more than once.
pub fn init_tracing(json: bool) {
    let _ = LogTracer::init();
    cardscan_core::init_tracing(json);
}
