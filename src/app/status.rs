use crate::config::Config;

/// Show the first and last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}

pub fn render_config(config: &Config) -> String {
    let api_key = config
        .resolve_api_key()
        .map_or_else(|| "(not set)".to_string(), |key| mask_secret(&key));

    [
        "◆ psychsim configuration".to_string(),
        String::new(),
        format!("Version      {}", env!("CARGO_PKG_VERSION")),
        format!("Config       {}", config.config_path.display()),
        String::new(),
        format!("  API key    {api_key}"),
        format!("  Model      {}", config.model),
        format!("  Temp       {:.2}", config.temperature),
        format!("  Base URL   {}", config.base_url),
        format!("  Timeout    {}s", config.request_timeout_secs),
        String::new(),
        format!(
            "  Progress   tick {}ms, ceiling {:.0}%, settle {}ms",
            config.progress.tick_ms, config.progress.ceiling, config.progress.settle_ms
        ),
    ]
    .join("\n")
}
