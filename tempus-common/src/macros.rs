#[macro_export]
macro_rules! ok_or_break {
    ($expression:expr) => {
        match $expression {
            Ok(v) => v,
            Err(_) => break,
        }
    };
}

#[macro_export]
macro_rules! ok_or_continue {
    ($expression:expr) => {
        match $expression {
            Ok(v) => v,
            Err(_) => continue,
        }
    };
}

/// Installs the global `fmt` subscriber. `RUST_LOG` takes precedence over the given filter directive.
#[macro_export]
macro_rules! tracing_init {
    ($filter:expr) => {{
        use $crate::tracing_subscriber::fmt::time::UtcTime;
        use $crate::tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new($filter));

        $crate::tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_timer(UtcTime::rfc_3339())
            .init();
    }};
}
