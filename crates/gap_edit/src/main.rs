mod script;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use gap_buffer::GapBuffer;

use crate::script::{Script, ScriptError};

fn main() -> Result<(), DriverError> {
    let args = Cli::parse();

    init_logging(&args.log_file, args.log_level.into())?;

    let source = match &args.script {
        Some(path) => std::fs::read_to_string(path).map_err(|source| DriverError::ReadScript {
            path: path.clone(),
            source,
        })?,
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            source
        }
    };

    let script = Script::parse(&source)?;
    log::info!("parsed {} commands", script.len());

    let mut buf = GapBuffer::with_capacity(args.text.len());
    buf.insert_str(&args.text);

    let mut stdout = io::stdout().lock();
    script.run(&mut buf, &mut stdout)?;
    writeln!(stdout, "{buf}")?;

    log::info!(
        "finished with {} chars (capacity {})",
        buf.len(),
        buf.capacity()
    );

    Ok(())
}

#[derive(thiserror::Error, Debug)]
enum DriverError {
    #[error(transparent)]
    Logger(#[from] fern::InitError),

    #[error("couldn't read script {path:?}")]
    ReadScript {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn init_logging(log_file: &Path, level: log::LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            let now = chrono::Local::now();

            out.finish(format_args!(
                "[{} {} {}] {}",
                now.format("%Y/%m/%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(fern::log_file(log_file)?)
        .apply()?;

    Ok(())
}

/// Replay an edit script against a gap buffer and print the result.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Script to run. Read from stdin if not given.
    script: Option<PathBuf>,

    /// Text the buffer starts with. The cursor starts at its end.
    #[arg(short, long, default_value = "")]
    text: String,

    #[arg(long, env = "GAP_EDIT_LOG", default_value = "gap_edit.log")]
    log_file: PathBuf,

    #[arg(long, env = "GAP_EDIT_LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}
