use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Receives one formatted log line together with the level it was logged at.
pub type ConsoleSink = fn(Level, &str);

/// Hands the fmt layer a writer per event. Each writer collects the formatted
/// line and passes it to the sink when dropped.
#[derive(Debug, Clone, Copy)]
pub struct MakeConsoleWriter {
    sink: ConsoleSink,
}

impl MakeConsoleWriter {
    pub fn new(sink: ConsoleSink) -> Self {
        Self { sink }
    }
}

pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
    sink: ConsoleSink,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if !line.is_empty() {
            (self.sink)(self.level, line);
        }
    }
}

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buffer: Vec::new(),
            sink: self.sink,
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
            sink: self.sink,
        }
    }
}

/// Writes to the browser console, keeping warnings and errors on the
/// console's own warn and error channels.
#[cfg(feature = "browser")]
pub fn browser_console(level: Level, line: &str) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let line = JsValue::from_str(line);
    match level {
        Level::ERROR => console::error_1(&line),
        Level::WARN => console::warn_1(&line),
        Level::INFO => console::info_1(&line),
        _ => console::debug_1(&line),
    }
}

/// Installs a subscriber logging to the browser console. The wasm target has
/// no system clock, so lines carry no timestamp.
#[cfg(feature = "browser")]
pub fn install_console_logger(level: Level) {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(MakeConsoleWriter::new(browser_console))
        .with_max_level(level)
        .with_ansi(false)
        .without_time()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        browser_console(Level::ERROR, &format!("Failed to set global default logger: {}", e));
    }
}
