use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use secure_keygen::cli;
use secure_keygen::cli::generate::GenerateArgs;
use secure_keygen::Result;

#[derive(Parser)]
#[command(name = "secure-keygen")]
#[command(author = "Oleg")]
#[command(version = "0.1.0")]
#[command(about = "Генерация SSH-ключей с защитой закрытого ключа по PBES2", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Сгенерировать пару SSH-ключей
    Generate(GenerateArgs),

    /// Показать параметры по умолчанию в JSON
    Defaults,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Ошибка:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate(args) => cli::generate::run(args),
        Commands::Defaults => cli::defaults::run(),
    }
}
