use color_eyre::Result;
use tracing::error;

/// Install the `color_eyre` report hook and a panic hook
///
/// The panic hook puts the terminal back into cooked mode before anything
/// is printed, then logs the report with ANSI codes stripped.
pub fn init() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section("This is a bug. Please report it together with datascout.log.")
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(err) = crate::terminal::restore() {
            error!("Unable to restore terminal: {err:?}");
        }

        let msg = format!("{}", panic_hook.panic_report(panic_info));
        error!("Error: {}", strip_ansi_escapes::strip_str(msg));

        #[cfg(debug_assertions)]
        {
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }

        #[cfg(not(debug_assertions))]
        eprintln!("{}", panic_hook.panic_report(panic_info));

        std::process::exit(1);
    }));

    Ok(())
}
