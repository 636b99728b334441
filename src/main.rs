use anyhow::Result;
use clap::{Parser, Subcommand};
use datainit::infra::load_settings;
use datainit::{ContainerDatabase, DataInitOrchestrator, DockerAdapter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "datainit",
    version,
    about = "Sobe os serviços auxiliares, roda os data-inits e derruba tudo"
)]
struct Cli {
    /// Raiz do projeto contendo data-inits/ (default: diretório atual)
    #[arg(long, env = "DATAINIT_ROOT")]
    root: Option<String>,

    /// Arquivo de configuração (default: <root>/datainit.toml, se existir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log detalhado (RUST_LOG tem precedência)
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ciclo completo: serviços, data-inits e teardown (padrão)
    Run,
    /// Lista os data-inits encontrados e as tags de imagem
    Discover,
    /// Para e remove os serviços auxiliares deixados para trás
    Teardown,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let root = match cli.root {
        Some(root) => PathBuf::from(shellexpand::tilde(&root).into_owned()),
        None => std::env::current_dir()?,
    };

    let settings = load_settings(&root, cli.config.as_deref())?;
    let runtime = Arc::new(DockerAdapter::with_engine(&settings.engine));
    let database = Arc::new(ContainerDatabase::new(runtime.clone(), &settings));
    let orchestrator = DataInitOrchestrator::new(runtime, database, &settings);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => orchestrator.run_data_init(),
        Commands::Discover => {
            for definition in orchestrator.discover()? {
                println!(
                    "{:<30} {}",
                    definition.relative_path().display().to_string(),
                    definition.image_tag(&settings.image_repo)
                );
            }
            Ok(())
        }
        Commands::Teardown => {
            orchestrator.teardown();
            Ok(())
        }
    }
}
