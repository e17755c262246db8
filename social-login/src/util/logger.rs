use social_login_config::{Config, Verbosity};
use tracing::{debug, subscriber::set_global_default, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;

pub struct TracingLogger {
    _guard: WorkerGuard, // Keeps the background worker alive
}

impl TracingLogger {
    fn new(level: Level) -> Self {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());

        let subscriber = tracing_subscriber::fmt()
            .with_writer(non_blocking)
            .with_max_level(level)
            .with_span_events(FmtSpan::CLOSE)
            .finish();

        if let Err(e) = set_global_default(subscriber) {
            eprintln!("Failed to set global default logger: {}", e);
        }

        TracingLogger { _guard: guard }
    }

    pub fn from_config(config: &Config) -> Self {
        let verbosity = config.logger.verbosity;
        let logger = TracingLogger::new(level_for(verbosity));
        debug!("Logger initialized with verbosity: {}", verbosity);
        logger
    }
}

const fn level_for(verbosity: Verbosity) -> Level {
    match verbosity {
        Verbosity::Trace => Level::TRACE,
        Verbosity::Debug => Level::DEBUG,
        Verbosity::Info => Level::INFO,
        Verbosity::Warn => Level::WARN,
        Verbosity::Error => Level::ERROR,
    }
}
