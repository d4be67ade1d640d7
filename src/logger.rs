use std::{fs, io};

const LOG_FILE: &str = "streamgraph.log";

pub fn setup(is_debug: bool) -> Result<(), fern::InitError> {
    let level = if is_debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let log_path = data::data_path(Some(LOG_FILE));
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Warn)
        .level_for("llm_streamgraph", level)
        .level_for("llm_streamgraph_data", level)
        .chain(io::stdout())
        .chain(fern::log_file(&log_path)?)
        .apply()?;

    log::info!("Logging to {}", log_path.display());
    Ok(())
}
