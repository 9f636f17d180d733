//! `strategos onboard` — First-time setup.

use strategos_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    let config = AppConfig::default();
    let knowledge_dir = config.knowledge.path.clone();

    println!("⚔️  Strategos — First-Time Setup");
    println!("================================\n");

    // Create directories
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if !knowledge_dir.exists() {
        for sub in ["mechanics", "strategy", "nations", "resources"] {
            std::fs::create_dir_all(knowledge_dir.join(sub))?;
        }
        println!(
            "✅ Created knowledge directory: {}",
            knowledge_dir.display()
        );
        println!("   Drop your markdown knowledge files into its subdirectories.");
    } else {
        println!("  Knowledge directory exists: {}", knowledge_dir.display());
    }

    // Create config file
    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        let default_toml = AppConfig::default_toml();
        std::fs::write(&config_path, &default_toml)?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Set OPENAI_API_KEY (or add api_key to config.toml)");
        println!("   2. Optionally set TAVILY_API_KEY for web search fallback");
        println!("   3. Run: strategos chat\n");
    }

    println!("🎉 Setup complete! Run `strategos chat` to ask your first question.\n");

    Ok(())
}
