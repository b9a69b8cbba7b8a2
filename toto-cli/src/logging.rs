use tracing_subscriber::EnvFilter;

/// Priorité : RUST_LOG > --debug > niveau de la configuration.
pub fn filter_directive(env: Option<&str>, debug_flag: bool, config_level: &str) -> String {
    match env {
        Some(directive) if !directive.trim().is_empty() => directive.to_string(),
        _ if debug_flag => "debug".to_string(),
        _ => config_level.to_string(),
    }
}

/// À appeler une seule fois, au démarrage. Les journaux vont sur stderr.
pub fn init(debug_flag: bool, config_level: &str) {
    let env = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(env.as_deref(), debug_flag, config_level);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        filter = %directive,
        "Journalisation initialisée"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_priority() {
        assert_eq!(filter_directive(Some("trace"), true, "warn"), "trace");
        assert_eq!(filter_directive(None, true, "warn"), "debug");
        assert_eq!(filter_directive(Some(" "), false, "info"), "info");
        assert_eq!(filter_directive(None, false, "warn"), "warn");
    }
}
