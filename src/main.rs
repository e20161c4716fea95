use clap::Parser;
use pom_inventory::config::API_TOKEN_ENV;
use pom_inventory::core::ConfigProvider;
use pom_inventory::utils::error::ErrorSeverity;
use pom_inventory::utils::{logger, validation::Validate};
use pom_inventory::{
    CliConfig, Delivery, GitMaterializer, InventoryEngine, InventoryError, InventoryPipeline,
    LocalStorage, ManifestStatus, RunReport, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting pom-inventory");
    tracing::debug!("CLI config: {:?}", cli);

    let exit_code = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => {
                tracing::info!("Loaded configuration from {}", path.display());
                let config = config.with_fallback_token(cli.api_token.clone());
                let monitor = cli.monitor || config.monitoring_enabled();
                run(config, monitor).await
            }
            Err(e) => report_failure(&e),
        },
        None => run(cli.clone(), cli.monitor).await,
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run<C>(config: C, monitor_enabled: bool) -> i32
where
    C: ConfigProvider + Validate + 'static,
{
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return report_failure(&e);
    }

    if config.api_token().is_some() {
        tracing::info!("🔑 API token is set");
    } else {
        tracing::warn!("⚠️  API token is not set (export {} to authorize)", API_TOKEN_ENV);
    }

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.destination());
    let pipeline = InventoryPipeline::new(GitMaterializer::new(), storage, config);
    let engine = InventoryEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            print_summary(&report);
            0
        }
        Err(e) => report_failure(&e),
    }
}

fn print_summary(report: &RunReport) {
    let elapsed = report.finished_at - report.started_at;
    tracing::info!(
        "🏁 Run finished in {}ms (working copy: {})",
        elapsed.num_milliseconds(),
        report.location.path.display()
    );

    if let ManifestStatus::Partial { error } = &report.manifest {
        eprintln!("⚠️  Manifest was only partially parsed: {}", error);
    }

    match &report.delivery {
        Delivery::NotAttempted if report.manifest == ManifestStatus::Missing => {
            println!("📭 Manifest not found, nothing was reported");
        }
        Delivery::NotAttempted => {
            println!(
                "📭 No reportable dependencies ({} skipped), nothing was reported",
                report.skipped
            );
        }
        Delivery::Accepted(_) => {
            println!(
                "✅ Reported {} dependencies ({} skipped)",
                report.submitted, report.skipped
            );
        }
        Delivery::Rejected { status, body } => {
            println!("❌ API request failed with status code: {}", status);
            println!("{}", body);
        }
        Delivery::Failed(message) => {
            eprintln!("❌ Error occurred: {}", message);
        }
    }
}

fn report_failure(e: &InventoryError) -> i32 {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
