//! `strategos chat` — Interactive advisor or single-question mode.

use std::sync::Arc;

use strategos_agent::{AgentLoop, TurnOutcome};
use strategos_config::AppConfig;
use strategos_core::message::Conversation;
use strategos_core::{LruCache, SearchBackend, SearchOutcome};
use strategos_knowledge::KnowledgeBase;
use strategos_providers::OpenAiCompatProvider;
use strategos_search::{CachedSearch, HttpSearchClient};

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early — give a clear error
    let Some(api_key) = config.api_key.clone() else {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    export OPENAI_API_KEY='sk-...'");
        eprintln!("    export STRATEGOS_API_KEY='sk-...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!(
            "    {}",
            AppConfig::config_dir().join("config.toml").display()
        );
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    };

    // Build the knowledge base with its shared read-through cache
    let knowledge_cache = Arc::new(LruCache::new(config.cache.knowledge_capacity));
    let knowledge = Arc::new(
        KnowledgeBase::new(&config.knowledge.path, Arc::clone(&knowledge_cache)).map_err(
            |e| format!("{e}. Run `strategos onboard` to create the knowledge directory."),
        )?,
    );

    // Build the search backend behind its own cache
    let search_cache: Arc<LruCache<SearchOutcome>> =
        Arc::new(LruCache::new(config.cache.search_capacity));
    let search_client = HttpSearchClient::new(
        &config.search.endpoint,
        config.search.api_key.clone(),
        config.search.timeout_secs,
    )?;
    let search: Arc<dyn SearchBackend> =
        Arc::new(CachedSearch::new(search_client, search_cache));

    let tools = Arc::new(strategos_tools::advisor_registry(
        Arc::clone(&knowledge),
        Arc::clone(&search),
        config.search.max_results,
    ));

    let provider = Arc::new(OpenAiCompatProvider::new(
        "openai",
        &config.base_url,
        api_key,
        config.request_timeout_secs,
    )?);

    let agent = AgentLoop::new(provider, &config.model, tools)
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
        .with_max_iterations(config.max_iterations)
        .with_max_history(config.max_history_messages);

    if let Some(msg) = message {
        // Single question mode
        let mut conv = Conversation::new();

        eprint!("  Thinking...");
        let outcome = agent.process(&mut conv, &msg).await?;
        eprint!("\r              \r");
        println!("{}", render(outcome));
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║     Strategos — EU5 Strategy Advisor         ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:      {}", config.model);
    println!("  Knowledge:  {}", knowledge.root().display());
    println!(
        "  Web search: {}",
        if config.search.api_key.is_some() {
            "enabled"
        } else {
            "disabled (no TAVILY_API_KEY)"
        }
    );
    println!();
    println!("  Type your question and press Enter.");
    println!("  Type 'reset' to start a fresh conversation, 'exit' to quit.");
    println!();

    let mut conv = Conversation::new();
    let stdin = std::io::stdin();

    loop {
        use std::io::Write;
        print!("  You > ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => continue,
            "exit" | "quit" => break,
            "reset" => {
                conv = Conversation::new();
                println!("  (conversation reset)");
                println!();
                continue;
            }
            _ => {}
        }

        eprint!("  ...");
        match agent.process(&mut conv, line).await {
            Ok(outcome) => {
                eprint!("\r     \r");
                println!();
                for out_line in render(outcome).lines() {
                    println!("  Advisor > {out_line}");
                }
                println!();
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  [Error] {e}");
                println!();
            }
        }
    }

    let stats = knowledge_cache.stats();
    tracing::debug!(
        hits = stats.hits,
        misses = stats.misses,
        transcript_tokens = conv.estimated_tokens(),
        "Session finished"
    );

    println!();
    println!("  Good luck out there! ⚔️");
    println!();

    Ok(())
}

fn render(outcome: TurnOutcome) -> String {
    match outcome {
        TurnOutcome::Answer(text) => text,
        TurnOutcome::Aborted { reason } => reason,
    }
}
