mod app;
mod help;
mod hitmap;
mod picker;
mod theme;
use crate::app::App;
use crate::picker::{CalendarWidget, DateKey, NavigationCursor};
use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    ExecutableCommand,
};
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::io;
use std::path::{Path, PathBuf};
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, OffsetDateTime,
    UtcOffset,
};

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
    "debug"
} else {
    "info"
};

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        month: Option<NavigationCursor>,
        selected: Vec<DateKey>,
        log_file: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut month = None;
        let mut selected = Vec::new();
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('s') | Arg::Long("select") => {
                    selected.push(parser.value()?.parse::<DateKey>()?);
                }
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if month.is_none() => {
                    let value = value.string()?;
                    match parse_month(&value) {
                        Ok(cursor) => month = Some(cursor),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            month,
            selected,
            log_file,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                month,
                selected,
                log_file,
            } => {
                // Look up the local offset before the logger can start any
                // threads
                let offset = UtcOffset::current_local_offset()
                    .context("failed to determine local time zone offset")?;
                let today = OffsetDateTime::now_utc().to_offset(offset).date();
                let _logger = log_file.as_deref().map(init_logging).transpose()?;
                let mut calendar = CalendarWidget::new(today);
                if let Some(cursor) = month {
                    calendar = calendar.start_month(cursor);
                }
                for key in selected {
                    calendar.select(key);
                }
                log::info!("Starting date picker on {}", calendar.cursor());
                let calendar = with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(calendar, offset)
                        .run(terminal)
                        .context("failed to run date picker")
                })?;
                log::info!("Exiting with {} dates selected", calendar.selection_len());
                for key in calendar.selected() {
                    println!("{key}");
                }
                Ok(())
            }
            Command::Help => {
                println!("Usage: datepick [OPTIONS] [YYYY-MM]");
                println!();
                println!("Pick dates from a terminal calendar and print them on exit");
                println!();
                println!("Options:");
                println!("  -s, --select <Y-M-D>   Start with the given date selected");
                println!("      --log-file <PATH>  Write log messages to the given file");
                println!("  -h, --help             Display this help message and exit");
                println!("  -V, --version          Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

/// Parses a `YYYY-MM` month
fn parse_month(s: &str) -> Result<NavigationCursor, time::error::Parse> {
    Date::parse(&format!("{s}-01"), &YMD_FMT).map(NavigationCursor::containing)
}

fn init_logging(path: &Path) -> anyhow::Result<LoggerHandle> {
    Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)
        .context("invalid log specification")?
        .log_to_file(FileSpec::try_from(path).context("invalid log file path")?)
        .start()
        .context("failed to start logger")
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = io::stdout()
        .execute(EnableMouseCapture)
        .context("failed to enable mouse capture")
        .and_then(|_| func(terminal));
    if let Err(e) = io::stdout().execute(DisableMouseCapture) {
        log::warn!("Failed to disable mouse capture: {e}");
    }
    ratatui::restore();
    r
}
