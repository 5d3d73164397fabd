use anyhow::{Context, Result};
use std::sync::Arc;
use ticket_pipeline::{
    agent::{AgentExecutor, AssistantClient},
    classifier::{classify_or_fallback, AgentClassifier},
    cli::{
        commands::{ClassifyCommand, FastCommand, SmartCommand, StepCommand, ValidateCommand},
        output::*,
        Cli, Command,
    },
    core::{config::AppConfig, CancelSignal, Classification, Complexity, LayerScope, StepContext, TicketType},
    execution::{NoopObserver, PipelineExecutor, PipelineObserver, StepRegistry},
    steps::builtin_registry_with,
};
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Shared state for a command invocation
struct App {
    agent: Arc<dyn AgentExecutor>,
    registry: Arc<StepRegistry>,
    cancel: CancelSignal,
}

impl App {
    fn executor(&self, quiet: bool) -> PipelineExecutor {
        let observer: Arc<dyn PipelineObserver> = if quiet {
            Arc::new(NoopObserver)
        } else {
            Arc::new(ConsoleObserver::new(self.registry.clone()))
        };
        PipelineExecutor::new(self.registry.clone()).with_observer(observer)
    }

    fn classifier(&self) -> AgentClassifier {
        AgentClassifier::new(self.agent.clone(), &self.registry)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let agent: Arc<dyn AgentExecutor> = Arc::new(AssistantClient::new(config.assistant.into()));
    let registry = Arc::new(builtin_registry_with(agent.clone(), config.validate));

    let cancel = CancelSignal::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling the running step");
            on_interrupt.cancel();
        }
    });

    let app = App {
        agent,
        registry,
        cancel,
    };

    // Execute command
    let success = match &cli.command {
        Command::Smart(cmd) => smart(&app, cmd).await?,
        Command::Classify(cmd) => classify(&app, cmd).await?,
        Command::Fast(cmd) => fast(&app, cmd).await,
        Command::Validate(cmd) => validate(&app, cmd).await,
        Command::Step(cmd) => step(&app, cmd).await,
        Command::ListSteps => {
            println!("{}", format_step_list(&app.registry));
            true
        }
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

async fn smart(app: &App, cmd: &SmartCommand) -> Result<bool> {
    let mut ctx = StepContext::new(&cmd.ticket);
    if !cmd.json {
        println!("{} Classifying ticket...", SPINNER);
    }

    let classification = classify_or_fallback(&app.classifier(), &mut ctx, &app.cancel).await;
    if !cmd.json {
        println!("\n{}", format_classification(&classification));
    }

    let executor = app.executor(cmd.json);
    let planned = if cmd.dry_run {
        executor.dry_run(&classification)
    } else {
        executor.execute(&classification, &mut ctx, &app.cancel).await
    };
    let result = planned.context("Could not plan the pipeline")?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if cmd.dry_run {
        println!("\n{} {}", WARN, style("Dry run: no changes were made").yellow());
    }

    if let Some(err) = &result.error {
        error!("{}", err);
    }
    Ok(result.success)
}

async fn classify(app: &App, cmd: &ClassifyCommand) -> Result<bool> {
    let mut ctx = StepContext::new(&cmd.ticket);
    let classification = classify_or_fallback(&app.classifier(), &mut ctx, &app.cancel).await;

    if !cmd.json {
        println!("\n{}", format_classification(&classification));
    }
    let result = app
        .executor(cmd.json)
        .dry_run(&classification)
        .context("Could not plan the pipeline")?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(true)
}

async fn fast(app: &App, cmd: &FastCommand) -> bool {
    let mut ctx = StepContext::new(&cmd.ticket);
    ctx.apply_classification(Classification {
        ticket_type: TicketType::Enhancement,
        scope: LayerScope::FRONTEND,
        complexity: Complexity::Simple,
        steps: Vec::new(),
        summary: "Fast mode: direct implementation".to_string(),
        tasks: vec![cmd.ticket.clone()],
    });

    println!("{} {}", ROCKET, style("Fast mode").bold());
    run_single(app, "fast-implement", &mut ctx).await
}

async fn validate(app: &App, cmd: &ValidateCommand) -> bool {
    let description = cmd
        .description
        .clone()
        .unwrap_or_else(|| "Check that the application starts and the latest changes are visible".to_string());
    let mut ctx = StepContext::new(description);

    run_single(app, "validate", &mut ctx).await
}

async fn step(app: &App, cmd: &StepCommand) -> bool {
    if !app.registry.contains(&cmd.name) {
        println!("{} Step '{}' not found", CROSS, style(&cmd.name).red());
        println!("{}", format_step_list(&app.registry));
        return false;
    }

    let mut ctx = StepContext::new(&cmd.ticket);
    run_single(app, &cmd.name, &mut ctx).await
}

async fn run_single(app: &App, step_id: &str, ctx: &mut StepContext) -> bool {
    match app.executor(false).execute_step(step_id, ctx, &app.cancel).await {
        Some(result) => result.success,
        None => {
            println!("{} Step '{}' is not registered", CROSS, step_id);
            false
        }
    }
}
