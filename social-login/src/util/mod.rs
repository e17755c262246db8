#[cfg(any(feature = "browser", test))]
mod console;
mod logger;

#[cfg(feature = "browser")]
pub use console::install_console_logger;
pub use logger::TracingLogger;
