use std::io::Write;

use env_logger::{Builder, Env};
use log::LevelFilter;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

pub use log::{debug, error, info, trace, warn};

pub const DEFAULT_LOG_FILTER: &str = "glload=info,launcher=info";

/// Installs the colored `[LEVEL][module] message` logger.
///
/// `RUST_LOG` overrides [`DEFAULT_LOG_FILTER`]. Graphics back end chatter is
/// capped at warnings. Calling this more than once is harmless.
pub fn init_logger() {
    init_logger_with(DEFAULT_LOG_FILTER);
}

pub fn init_logger_with(default_filter: &str) {
    let mut builder =
        Builder::from_env(Env::default().default_filter_or(default_filter));

    for module in ["wgpu_core", "wgpu_hal", "wgpu", "naga"] {
        builder.filter_module(module, LevelFilter::Warn);
    }

    builder.format(|_buf, record| {
        let writer = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = writer.buffer();
        let mut spec = ColorSpec::new();

        spec.set_fg(Some(level_color(record.level())));
        if record.level() == log::Level::Error {
            spec.set_bold(true);
        }

        buffer.set_color(&spec)?;
        write!(
            buffer,
            "[{}][{}]",
            record.level(),
            record.module_path().unwrap_or("<unknown>")
        )?;
        buffer.reset()?;
        writeln!(buffer, " {}", record.args())?;
        writer.print(&buffer)
    });

    let _ = builder.try_init();
}

fn level_color(level: log::Level) -> Color {
    match level {
        log::Level::Trace => Color::Cyan,
        log::Level::Debug => Color::Blue,
        log::Level::Info => Color::Green,
        log::Level::Warn => Color::Yellow,
        log::Level::Error => Color::Red,
    }
}
