use tracing_subscriber::{fmt, EnvFilter};

/// Install the stderr subscriber used by the binaries. `RUST_LOG` overrides the default filter.
pub fn init(default_filter: &str) {
    let env =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
pub(crate) fn init_test_logging() {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,catalogcheck=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
