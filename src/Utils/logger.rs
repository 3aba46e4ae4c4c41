use chrono::Local;
use csv::Writer;
use log::info;
use simplelog::*;
use std::fs::File;
use std::io::{self, Write};

/// "debug" | "info" | "warn" | "error" | "off"
pub fn level_from_str(level: &str) -> Result<LevelFilter, String> {
    match level.trim().to_lowercase().as_str() {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" => Ok(LevelFilter::Off),
        other => Err(format!(
            "loglevel must be debug, info, warn, error or off, got '{}'",
            other
        )),
    }
}

/// name of a log file stamped with the current date and time
pub fn default_log_name() -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("log_{}.txt", date_and_time)
}

/// Initialize terminal logging and, if `log_file` is given, logging into that file
/// (an empty name means a file named after the current date and time).
/// A logger that is already installed stays in place.
pub fn init_logger(level: &str, log_file: Option<&str>) -> Result<(), String> {
    let level = level_from_str(level)?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(name) = log_file {
        let name = if name.trim().is_empty() {
            default_log_name()
        } else {
            name.trim().to_string()
        };
        let file = File::create(&name).map_err(|e| format!("cannot create log file {}: {}", name, e))?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    if CombinedLogger::init(loggers).is_ok() {
        info!("logger initialized at level {}", level);
    }
    Ok(())
}

/// writes exactly `text` into `filename`
pub fn save_text(text: &str, filename: &str) -> io::Result<()> {
    let mut file = File::create(filename)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

/// writes the records (header first) as csv
pub fn save_table_csv(records: &[Vec<String>], filename: &str) -> csv::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);
    for record in records {
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}
