use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "trigon_engine=debug,wgpu_core=info").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// The wgpu stack logs a lot at `info`; these are capped at `warn` unless the
/// filter string names them.
const NOISY_TARGETS: [&str; 4] = ["wgpu_core", "wgpu_hal", "naga", "winit"];

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Resolution order: `config.env_filter`, then
/// `RUST_LOG`, then `info`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        let filter = config.env_filter.or_else(|| std::env::var("RUST_LOG").ok());

        builder.filter_level(log::LevelFilter::Info);
        for target in quiet_targets(filter.as_deref()) {
            builder.filter_module(target, log::LevelFilter::Warn);
        }
        if let Some(filter) = &filter {
            builder.parse_filters(filter);
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}

/// Targets from [`NOISY_TARGETS`] that the user filter leaves unmentioned.
///
/// Module directives match by prefix, as in `env_logger`: `wgpu=debug` names
/// both `wgpu_core` and `wgpu_hal`.
fn quiet_targets(filter: Option<&str>) -> impl Iterator<Item = &'static str> + '_ {
    NOISY_TARGETS.into_iter().filter(move |target| {
        !filter.is_some_and(|f| {
            f.split(',').any(|directive| {
                let (name, level) = match directive.split_once('=') {
                    Some((name, level)) => (name.trim(), Some(level)),
                    None => (directive.trim(), None),
                };
                // A lone token that parses as a level is the global level, not a module.
                let is_module = level.is_some() || name.parse::<log::LevelFilter>().is_err();
                is_module && !name.is_empty() && target.starts_with(name)
            })
        })
    })
}
