//! Operator CLI over a local `Core` instance: submit code, query and
//! resolve patterns, trigger healing, and inspect store state.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use remembrance_assistant::NoopAssistant;
use remembrance_core::{Core, HealTarget, RemembranceConfig, SubmissionMetadata};
use remembrance_domain::value_objects::{Language, PatternId};
use remembrance_events::BroadcastEventBus;
use remembrance_language::LanguageRegistry;
use remembrance_ranking::Query;
use remembrance_safety::SafetyGate;
use remembrance_sandbox::Sandbox;
use remembrance_store::SqliteStore;

/// Remembrance: content-addressed code-pattern memory.
#[derive(Parser)]
#[command(name = "remembrance")]
#[command(about = "Submit, rank, heal, and inspect code patterns")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to a TOML configuration file layered over the built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory the local store's database lives under, overriding
    /// configuration.
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a source file as a candidate pattern.
    Submit {
        /// Path to the source file.
        file: PathBuf,
        /// Source language.
        #[arg(long)]
        language: Language,
        /// Unique name within `(name, language)`.
        #[arg(long)]
        name: String,
        /// Free-text description used by ranking.
        #[arg(long, default_value = "")]
        description: String,
        /// Comma-separated tags.
        #[arg(long, value_delimiter = ',', default_value = "")]
        tags: Vec<String>,
        /// Optional path to test code run in the sandbox before admission.
        #[arg(long)]
        test_file: Option<PathBuf>,
        /// Coarse classification, e.g. "algorithm" or "idiom".
        #[arg(long, default_value = "idiom")]
        pattern_type: String,
        /// Self-reported complexity label.
        #[arg(long, default_value = "unspecified")]
        complexity: String,
        /// Submitting author tag.
        #[arg(long, default_value = "cli")]
        author: String,
    },

    /// Rank stored patterns against a free-text query.
    Query {
        /// Free-text description matched against name/description.
        description: String,
        /// Restrict to one language.
        #[arg(long)]
        language: Option<Language>,
        /// Comma-separated tags.
        #[arg(long, value_delimiter = ',', default_value = "")]
        tags: Vec<String>,
        /// Maximum results returned.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Resolve the PULL/EVOLVE/GENERATE decision for a query.
    Resolve {
        /// Free-text description matched against name/description.
        description: String,
        /// Restrict to one language.
        #[arg(long)]
        language: Option<Language>,
        /// Comma-separated tags.
        #[arg(long, value_delimiter = ',', default_value = "")]
        tags: Vec<String>,
    },

    /// Run a healing attempt against a specific pattern.
    Heal {
        /// Identifier of the pattern to heal.
        pattern_id: PatternId,
    },

    /// Run a full healing pass over every eligible proven pattern.
    HealAll,

    /// Show a pattern's full stored record.
    Inspect {
        /// Identifier of the pattern to inspect.
        pattern_id: PatternId,
    },

    /// Record usage feedback against a pattern.
    Feedback {
        /// Identifier of the pattern.
        pattern_id: PatternId,
        /// Whether the usage succeeded.
        #[arg(long)]
        succeeded: bool,
    },

    /// Print aggregate store statistics.
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = RemembranceConfig::load(cli.config.as_ref().and_then(|p| p.to_str())).context("loading configuration")?;
    if let Some(base_dir) = cli.base_dir {
        config.base_dir = base_dir.display().to_string();
    }

    let db_path = PathBuf::from(&config.base_dir).join("patterns.db");
    let store: Arc<dyn remembrance_domain::ports::store::PatternStorePort> =
        Arc::new(SqliteStore::file(&db_path).await.with_context(|| format!("opening store at {}", db_path.display()))?);

    let core = Core::new(
        config,
        Arc::new(SafetyGate::with_defaults()),
        Arc::new(LanguageRegistry::new()),
        Arc::new(Sandbox::with_defaults()),
        store,
        Arc::new(BroadcastEventBus::new()),
        Arc::new(NoopAssistant),
        Vec::new(),
    );

    match cli.command {
        Commands::Submit {
            file,
            language,
            name,
            description,
            tags,
            test_file,
            pattern_type,
            complexity,
            author,
        } => submit(&core, file, language, name, description, tags, test_file, pattern_type, complexity, author).await,
        Commands::Query { description, language, tags, limit } => query(&core, description, language, tags, limit).await,
        Commands::Resolve { description, language, tags } => resolve(&core, description, language, tags).await,
        Commands::Heal { pattern_id } => heal(&core, pattern_id).await,
        Commands::HealAll => heal_all(&core).await,
        Commands::Inspect { pattern_id } => inspect(&core, pattern_id).await,
        Commands::Feedback { pattern_id, succeeded } => feedback(&core, pattern_id, succeeded).await,
        Commands::Stats => stats(&core).await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn submit(
    core: &Core,
    file: PathBuf,
    language: Language,
    name: String,
    description: String,
    tags: Vec<String>,
    test_file: Option<PathBuf>,
    pattern_type: String,
    complexity: String,
    author: String,
) -> Result<()> {
    let code = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
    let test_code = test_file
        .map(|path| std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display())))
        .transpose()?;
    let tags = tags.into_iter().filter(|t| !t.is_empty()).collect();

    let metadata = SubmissionMetadata {
        name,
        test_code,
        description,
        tags,
        pattern_type,
        complexity,
        author,
        parent_pattern_id: None,
    };

    let result = core.submit(code, language, metadata).await?;
    println!("{result:#?}");
    Ok(())
}

async fn query(core: &Core, description: String, language: Option<Language>, tags: Vec<String>, limit: usize) -> Result<()> {
    let query = Query {
        description,
        tags: tags.into_iter().filter(|t| !t.is_empty()).collect(),
        language,
    };
    let ranked = core.query(query, limit).await?;
    for scored in ranked {
        println!(
            "{}  {:<32}  composite={:.3}  relevance={:.3}",
            scored.pattern.id, scored.pattern.name, scored.composite, scored.relevance
        );
    }
    Ok(())
}

async fn resolve(core: &Core, description: String, language: Option<Language>, tags: Vec<String>) -> Result<()> {
    let query = Query {
        description,
        tags: tags.into_iter().filter(|t| !t.is_empty()).collect(),
        language,
    };
    let result = core.resolve(query).await?;
    println!("{result:#?}");
    Ok(())
}

async fn heal(core: &Core, pattern_id: PatternId) -> Result<()> {
    let report = core.heal(HealTarget::Pattern(pattern_id)).await?;
    println!("{report:#?}");
    Ok(())
}

async fn heal_all(core: &Core) -> Result<()> {
    let report = core.run_healing_pass().await?;
    println!("healed {} pattern(s)", report.outcomes.len());
    for outcome in report.outcomes {
        println!(
            "{}  before={:.3} after={:.3} improved={} promoted={}",
            outcome.pattern_id, outcome.before, outcome.after, outcome.improved, outcome.promoted
        );
    }
    Ok(())
}

async fn inspect(core: &Core, pattern_id: PatternId) -> Result<()> {
    match core.inspect(pattern_id).await? {
        Some(pattern) => println!("{pattern:#?}"),
        None => println!("no pattern with id {pattern_id}"),
    }
    Ok(())
}

async fn feedback(core: &Core, pattern_id: PatternId, succeeded: bool) -> Result<()> {
    let update = core.feedback(pattern_id, succeeded).await?;
    println!(
        "{}  usage={} success={} reliability={:.3}",
        update.pattern_id, update.usage_count, update.success_count, update.reliability
    );
    Ok(())
}

async fn stats(core: &Core) -> Result<()> {
    let summary = core.stats().await?;
    println!("{summary:#?}");
    Ok(())
}
