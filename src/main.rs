use anyhow::Context;
use relay::{
    api::routes::build_app,
    cli::{output::Output, Cli, Commands},
    tools::ToolRegistry,
    utils::toml_config::{LogFormat, RelayConfig},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let out = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let mut config = RelayConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    config
        .apply_env_overrides()
        .context("Invalid environment override")?;

    init_tracing(&config, cli.verbose);

    match cli.command() {
        Commands::Serve => serve(config, &out).await,
        Commands::Ask { query } => ask(config, &query.join(" "), &out).await,
        Commands::Tools => list_tools(&config, &out),
        Commands::Config { validate } => show_config(&config, *validate, &out),
    }
}

fn init_tracing(config: &RelayConfig, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("relay={0},relay_server={0},tower_http={0}", default_level)));

    let registry = tracing_subscriber::registry().with(filter);
    match config.server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve(config: RelayConfig, out: &Output) -> anyhow::Result<()> {
    let addr = config.bind_address();
    let state = match AppState::from_config(config) {
        Ok(state) => state,
        Err(e) => {
            out.error(&e.to_string());
            out.hint("Set the key in your environment or a .env file, then restart.");
            return Err(e.into());
        }
    };

    out.banner();
    out.kv("model", state.llm.model_name());
    out.kv("tools", &state.registry.tool_names().join(", "));
    out.kv("listening", &format!("http://{}", addr));

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(%addr, "Relay server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

async fn ask(config: RelayConfig, query: &str, out: &Output) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let answer = state.orchestrator.orchestrate(query, &[]).await;
    out.answer(&answer.query, &answer.result);
    Ok(())
}

fn list_tools(config: &RelayConfig, out: &Output) -> anyhow::Result<()> {
    let registry = ToolRegistry::with_default_tools(&config.tools)?;

    out.header("Tools");
    for def in registry.get_tool_definitions() {
        out.tool(&def.name, &def.description, &def.parameters.to_string());
    }
    out.info("Queries that fit no tool are answered conversationally (the 'fallback' route).");
    Ok(())
}

fn show_config(config: &RelayConfig, validate_only: bool, out: &Output) -> anyhow::Result<()> {
    config.validate()?;
    if validate_only {
        out.success("Configuration is valid");
        return Ok(());
    }

    out.header("Server");
    out.kv("address", &config.bind_address());
    out.kv("log_level", &config.server.log_level);

    out.header("LLM");
    out.kv("api_base", &config.llm.api_base);
    out.kv("model", &config.llm.model);
    out.kv("timeout_secs", &config.llm.timeout_secs.to_string());
    let key_state = if config.llm_api_key().is_ok() { "set" } else { "NOT SET" };
    out.kv(&config.llm.api_key_env, key_state);

    out.header("Tools");
    out.kv("timeout_secs", &config.tools.timeout_secs.to_string());
    for env in [&config.tools.news.api_key_env, &config.tools.stock.api_key_env] {
        if config.resolve_env(env).is_some() {
            out.kv(env, "set");
        } else {
            out.warning(&format!("{} is not set; that tool will report it when called", env));
        }
    }
    out.kv("weather cache", &format!("{}s", config.tools.weather.cache_ttl_secs));
    out.kv("wikipedia sentences", &config.tools.wikipedia.sentences.to_string());
    Ok(())
}
