use ark_cli::utils::{logger, validation::Validate};
use ark_cli::{app, ArkPaths, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting ark CLI");
    if cli.verbose {
        tracing::debug!("CLI arguments: {:?}", cli);
    }

    // 驗證參數
    if let Err(e) = cli.validate() {
        tracing::error!("❌ Argument validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let paths = ArkPaths::resolve()?;
    paths.ensure_ark_home()?;

    let app_id = ark_cli::config::load_or_create_app_id(&paths)?;
    tracing::debug!("App id: {}", app_id);

    match app::commands::dispatch(&paths, cli.command).await {
        Ok(()) => {
            tracing::info!("✅ Command completed successfully");
        }
        Err(e) => {
            tracing::error!("❌ Command failed: {} (Severity: {:?})", e, e.severity());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ark_cli::utils::error::ErrorSeverity::Low => 0,
                ark_cli::utils::error::ErrorSeverity::Medium => 2,
                ark_cli::utils::error::ErrorSeverity::High => 1,
                ark_cli::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
