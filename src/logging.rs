/// Initialize the logger with the specified verbosity level
///
/// # Arguments
/// * `verbose` - Verbosity level (0=warn, 1=info, 2=debug, 3+=trace)
pub fn setup_logger(verbose: u8) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter_for(verbose)))
        .format_timestamp_millis()
        .format_module_path(false)
        .format_target(false)
        .init();
}

/// The daemon logs accepted requests at info, so `run` bumps verbosity to at least 1.
pub fn filter_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "modeswitch=warn",
        1 => "modeswitch=info",
        2 => "modeswitch=debug",
        _ => "modeswitch=trace",
    }
}
