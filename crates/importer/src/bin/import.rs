use clap::{Parser, Subcommand};
use importer::{
    BenefitResolution, BulkImporter, ImportFile, ImportOptions, LogProgress, PgBookStore,
    RelationPolicy,
    pipeline::read_batch,
    validator::BatchValidator,
};
use std::path::PathBuf;
use storage::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "book-import")]
#[command(about = "Bulk importer for the children's book directory", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a JSON array of books
    Books {
        file: Option<PathBuf>,

        /// How benefit entries are matched: pass-through (IDs) or name-lookup
        #[arg(long, default_value_t = BenefitResolution::PassThrough)]
        benefits: BenefitResolution,

        /// Remove a book again when its benefits or image cannot be stored
        #[arg(long)]
        strict: bool,
    },
    /// Check a file without writing anything
    Validate {
        file: PathBuf,

        #[arg(long, default_value_t = BenefitResolution::PassThrough)]
        benefits: BenefitResolution,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("book_import={},importer={},storage={}", log_level, log_level, log_level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Books {
            file,
            benefits,
            strict,
        } => {
            let database_url = cli
                .database_url
                .ok_or("DATABASE_URL must be set to import books")?;
            let options = ImportOptions {
                benefit_resolution: benefits,
                relation_policy: if strict {
                    RelationPolicy::Strict
                } else {
                    RelationPolicy::BestEffort
                },
            };
            handle_import(file, options, &database_url).await?;
        }
        Commands::Validate { file, benefits } => {
            handle_validate(file, benefits).await?;
        }
    }

    Ok(())
}

async fn handle_import(
    file: Option<PathBuf>,
    options: ImportOptions,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Connecting to database...");
    let db = Database::new(database_url).await?;

    tracing::info!(
        "Benefit resolution: {}, relation policy: {:?}",
        options.benefit_resolution,
        options.relation_policy
    );

    let file = file.map(ImportFile::Path);
    let importer = BulkImporter::new(PgBookStore::new(db.pool().clone())).with_options(options);
    let outcome = importer.run(file.as_ref(), &LogProgress).await?;

    if outcome.failed > 0 {
        return Err(format!("{} book(s) failed to import", outcome.failed).into());
    }

    Ok(())
}

async fn handle_validate(
    file: PathBuf,
    benefits: BenefitResolution,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Validating {}", file.display());

    let records = read_batch(&ImportFile::Path(file)).await?;
    let report = BatchValidator::validate(&records, benefits);
    report.log_warnings();

    tracing::info!(
        "{} of {} book(s) can be imported, {} warning(s)",
        report.valid,
        report.total,
        report.warnings.len()
    );

    report.into_result()?;
    tracing::info!("✓ Validation successful!");

    Ok(())
}
