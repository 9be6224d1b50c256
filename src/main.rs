use anyhow::Context;
use clap::Parser;
use nonogram_fetch::config::Command;
use nonogram_fetch::utils::error::{ErrorSeverity, NonogramError};
use nonogram_fetch::utils::{logger, validation::Validate};
use nonogram_fetch::{
    download_file_name, AppConfig, Cli, LocalStorage, NonogramsOrgSource, PuzzleEngine,
    WebDriverRenderer, WebpbnSource,
};
use std::io::Write;

fn build_engine(config: &AppConfig) -> PuzzleEngine<LocalStorage> {
    let storage = LocalStorage::new(config.output.path.clone());
    let renderer = WebDriverRenderer::new(&config.nonograms_org.webdriver_url)
        .headless(config.nonograms_org.headless);

    PuzzleEngine::new(storage)
        .with_source(WebpbnSource::new(&config.webpbn.base_url, config.webpbn_timeout()))
        .with_source(
            NonogramsOrgSource::new(renderer)
                .with_base_url(&config.nonograms_org.base_url)
                .with_wait_timeout(config.wait_timeout())
                .with_diagnostics_dir(&config.output.path),
        )
}

fn report_failure(e: &NonogramError) -> ! {
    tracing::error!(
        "❌ Puzzle download failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,      // 警告，但成功
        ErrorSeverity::Medium => 2,   // 網路或頁面問題，可重試
        ErrorSeverity::High => 1,     // 內容或配置錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI arguments: {:?}", cli);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            AppConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?
        }
        None => AppConfig::default(),
    };

    let args = cli.command.args();
    args.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        report_failure(&e);
    }

    let engine = build_engine(&config);
    let request = args.request();

    match &cli.command {
        Command::Download(_) => match engine.download(&request).await {
            Ok(artifact) => {
                tracing::info!(
                    "✅ Downloaded {} ({} bytes)",
                    download_file_name(&request),
                    artifact.size
                );
                println!("{}", artifact.path);
            }
            Err(e) => report_failure(&e),
        },
        Command::Content(_) => match engine.produce(&request).await {
            Ok(data) => {
                tracing::debug!(
                    "Writing {} ({}) to stdout",
                    download_file_name(&request),
                    request.format.media_type()
                );
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&data)?;
                stdout.flush()?;
            }
            Err(e) => report_failure(&e),
        },
    }

    Ok(())
}
