//! `strategos doctor` — Diagnose setup problems.

use strategos_config::AppConfig;
use strategos_core::Provider;
use strategos_knowledge::Category;
use strategos_providers::OpenAiCompatProvider;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Strategos Doctor — Setup Diagnostics");
    println!("=======================================\n");

    let mut issues = 0;

    // Check config
    let config_path = AppConfig::config_dir().join("config.toml");
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");
                Some(config)
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
                None
            }
        }
    } else {
        println!("  ❌ No config file — run `strategos onboard`");
        issues += 1;
        None
    };

    if let Some(config) = config {
        // Check API key and provider reachability
        if let Some(api_key) = &config.api_key {
            println!("  ✅ API key configured");
            match OpenAiCompatProvider::new("openai", &config.base_url, api_key, 10) {
                Ok(provider) => match provider.health_check().await {
                    Ok(true) => println!("  ✅ Provider reachable at {}", config.base_url),
                    Ok(false) => {
                        println!("  ⚠️  Provider rejected the request at {}", config.base_url);
                        issues += 1;
                    }
                    Err(e) => {
                        println!("  ⚠️  Could not reach provider: {e}");
                        issues += 1;
                    }
                },
                Err(e) => {
                    println!("  ⚠️  Could not build HTTP client: {e}");
                    issues += 1;
                }
            }
        } else {
            println!("  ⚠️  No API key — set OPENAI_API_KEY or add api_key to config.toml");
            issues += 1;
        }

        // Check web search
        if config.search.api_key.is_some() {
            println!("  ✅ Web search configured");
        } else {
            println!("  ⚠️  Web search disabled — set TAVILY_API_KEY to enable the fallback");
        }

        // Check knowledge base contents against the category map
        if config.knowledge.path.is_dir() {
            let mut present = 0;
            let mut total = 0;
            for category in Category::ALL {
                for (_, file) in category.entries() {
                    total += 1;
                    if config.knowledge.path.join(file).exists() {
                        present += 1;
                    }
                }
            }
            if present == total {
                println!("  ✅ Knowledge base complete ({present}/{total} files)");
            } else if present > 0 {
                println!("  ⚠️  Knowledge base partial ({present}/{total} files present)");
            } else {
                println!(
                    "  ⚠️  Knowledge directory is empty: {}",
                    config.knowledge.path.display()
                );
                issues += 1;
            }
        } else {
            println!(
                "  ❌ Knowledge directory missing: {} — run `strategos onboard`",
                config.knowledge.path.display()
            );
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
