/// Initializes console logging for the process. Call once, early; the
/// crate-level `init` does this for you.
///
/// # Errors
/// Returns an error if a logger is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    use log::LevelFilter;
    use log4rs::append::console::ConsoleAppender;
    use log4rs::config::{Appender, Config, Root};
    use log4rs::encode::pattern::PatternEncoder;
    let encoder = Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}"));
    let console = ConsoleAppender::builder().encoder(encoder).build();
    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .build(Root::builder().appender("console").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}

/// Initializes logging to a catalog-scoped folder in the working directory:
/// `{name}_logs/{name}.log`.
///
/// # Errors
/// Returns an error if the directory cannot be created or the logger fails
/// to initialize.
pub fn init_for_catalog(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    init_for_catalog_in(std::path::Path::new("."), name)
}

/// Initializes logging under a specific base directory, creating
/// `{base}/{name}_logs/{name}.log`.
///
/// # Errors
/// Returns an error if the directory cannot be created or the logger fails
/// to initialize.
pub fn init_for_catalog_in(
    base_dir: &std::path::Path,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    use log::LevelFilter;
    use log4rs::append::file::FileAppender;
    use log4rs::config::{Appender, Config, Root};
    use log4rs::encode::pattern::PatternEncoder;
    use std::fs;
    let dir = base_dir.join(format!("{name}_logs"));
    fs::create_dir_all(&dir)?;
    let logfile = dir.join(format!("{name}.log"));
    let encoder = Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}"));
    let file_appender = FileAppender::builder().encoder(encoder).build(logfile)?;
    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(Root::builder().appender("file").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}
