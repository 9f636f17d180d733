//! `strategos status` — Show resolved configuration.

use strategos_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("⚔️  Strategos Status");
    println!("==================");
    println!("  Config dir:      {}", AppConfig::config_dir().display());
    println!("  Model:           {}", config.model);
    println!("  Base URL:        {}", config.base_url);
    println!("  Temperature:     {}", config.temperature);
    println!("  Max tokens:      {}", config.max_tokens);
    println!("  Max iterations:  {}", config.max_iterations);
    println!("  History limit:   {} messages", config.max_history_messages);
    println!("  Knowledge:       {}", config.knowledge.path.display());
    println!(
        "  Web search:      {}",
        if config.search.api_key.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );
    println!(
        "  Caches:          knowledge={} entries, search={} entries",
        config.cache.knowledge_capacity, config.cache.search_capacity
    );
    println!(
        "  API key:         {}",
        if config.has_api_key() {
            "configured"
        } else {
            "missing"
        }
    );

    // Check config file existence
    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `strategos onboard` first");
    }

    Ok(())
}
