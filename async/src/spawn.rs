/// Spawns a task on a [`TaskPool`](crate::TaskPool), optionally wrapped in a
/// tracing span.
///
/// When the calling crate enables its `instrument` feature the task runs in a
/// detached `trace_span` that follows from the current span.
///
/// # Syntax
///
/// ```text
/// // Simple case (no fields):
/// storefront_async::spawn!(pool, "task_name", async { ... })
///
/// // With span fields (wrapped in parentheses):
/// storefront_async::spawn!(pool, "task_name", (?field1, field2 = value), async { ... })
/// ```
#[macro_export]
macro_rules! spawn {
    ($pool:expr, $name:literal, async $($rest:tt)*) => {{
        #[cfg(feature = "instrument")]
        {
            let task = async $($rest)*;
            let span = tracing::trace_span!(parent: None, $name);
            span.follows_from(tracing::Span::current());
            $pool.spawn(tracing::Instrument::instrument(task, span))
        }
        #[cfg(not(feature = "instrument"))]
        {
            $pool.spawn(async $($rest)*)
        }
    }};

    ($pool:expr, $name:literal, ($($field:tt)*), async $($rest:tt)*) => {{
        #[cfg(feature = "instrument")]
        {
            let task = async $($rest)*;
            let span = tracing::trace_span!(parent: None, $name, $($field)*);
            span.follows_from(tracing::Span::current());
            $pool.spawn(tracing::Instrument::instrument(task, span))
        }
        #[cfg(not(feature = "instrument"))]
        {
            $pool.spawn(async $($rest)*)
        }
    }};
}
