use std::time::Duration;

use anyhow::{Context, Result, bail};
use journey_api_client::{BackendConfig, HttpClientFactory};
use journey_client::{FileSessionStore, Session};
use journey_paths::JourneyPaths;
use journey_runtime_config::{
    ANON_KEY_ENV, BACKEND_URL_ENV, JourneyConfig, apply_env_overrides, load_from, needs_setup,
    save_to,
};

pub fn resolve_paths() -> Result<JourneyPaths> {
    JourneyPaths::resolve().context("Could not determine config directory")
}

/// Config file plus environment overrides.
pub fn load_config(paths: &JourneyPaths) -> Result<JourneyConfig> {
    let mut config = load_from(&paths.config_path())?;
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Build the HTTP client factory and pick up the stored key.
pub fn open_session(
    paths: &JourneyPaths,
    config: &JourneyConfig,
) -> Result<Session<HttpClientFactory>> {
    if needs_setup(config) {
        bail!(
            "backend is not configured (run `journey config --url <URL> --anon-key <KEY>` \
             or set {BACKEND_URL_ENV} and {ANON_KEY_ENV})"
        );
    }
    let backend = BackendConfig::new(
        &config.backend.url,
        &config.backend.anon_key,
        Duration::from_secs(config.backend.timeout_secs),
    );
    let factory = HttpClientFactory::new(backend).context("Failed to create HTTP client")?;
    let store = FileSessionStore::new(paths.session_path());
    Session::open(factory, Box::new(store)).context("Failed to open session")
}

/// Print the current config (anon key truncated).
pub fn show_config(paths: &JourneyPaths) -> Result<()> {
    let path = paths.config_path();
    let config = load_config(paths)?;

    println!("Config: {}", path.display());
    if !path.exists() {
        println!("  (file not found, showing defaults)");
    }
    println!();
    println!("[backend]");
    println!("  url          = {}", display_or_unset(&config.backend.url));
    println!(
        "  anon_key     = {}",
        display_or_unset(&mask_secret(&config.backend.anon_key))
    );
    println!("  timeout_secs = {}", config.backend.timeout_secs);
    println!("[ui]");
    println!("  confirm_sign_out = {}", config.ui.confirm_sign_out);
    println!("  date_format      = {}", config.ui.date_format);
    println!();
    println!("Session: {}", paths.session_path().display());

    for var in [BACKEND_URL_ENV, ANON_KEY_ENV] {
        if std::env::var(var).is_ok_and(|v| !v.trim().is_empty()) {
            println!("Note: {var} is set and overrides the file.");
        }
    }
    if needs_setup(&config) {
        println!();
        println!("Run `journey config --url <URL> --anon-key <KEY>` to finish setup.");
    }
    Ok(())
}

/// Update the config file. Environment overrides are not written back.
pub fn set_config(
    paths: &JourneyPaths,
    url: Option<String>,
    anon_key: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let path = paths.config_path();
    let mut config = load_from(&path)?;

    if let Some(url) = url {
        let url = url.trim().trim_end_matches('/').to_string();
        if url.is_empty() {
            bail!("--url cannot be empty");
        }
        config.backend.url = url;
        println!("Backend URL set to: {}", config.backend.url);
    }
    if let Some(key) = anon_key {
        let key = key.trim().to_string();
        if key.is_empty() {
            bail!("--anon-key cannot be empty");
        }
        config.backend.anon_key = key;
        println!("Anon key set to: {}", mask_secret(&config.backend.anon_key));
    }
    if let Some(secs) = timeout_secs {
        if secs == 0 {
            bail!("--timeout-secs must be at least 1");
        }
        config.backend.timeout_secs = secs;
        println!("Timeout set to: {secs}s");
    }

    save_to(&path, &config)?;
    println!("Config saved to {}", path.display());
    Ok(())
}

/// First few characters of a secret, enough to tell two apart.
pub fn mask_secret(secret: &str) -> String {
    const SHOWN: usize = 6;
    if secret.chars().count() <= SHOWN {
        return "*".repeat(secret.chars().count());
    }
    let head: String = secret.chars().take(SHOWN).collect();
    format!("{head}...")
}

fn display_or_unset(value: &str) -> &str {
    if value.trim().is_empty() {
        "(not set)"
    } else {
        value
    }
}
