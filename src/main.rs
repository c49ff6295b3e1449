use clap::Parser;
use subway_lines::core::ConfigProvider;
use subway_lines::core::server::shutdown_signal;
use subway_lines::utils::error::ErrorSeverity;
use subway_lines::utils::logger;
use subway_lines::{CliConfig, LineServer, ServerSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入配置 (配置檔 + 命令列覆蓋)
    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(Some(config.log_level()));
    } else {
        logger::init_cli_logger(cli.verbose, Some(config.log_level()));
    }

    tracing::info!("Starting subway-lines server");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    let settings = match ServerSettings::from_provider(&config) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    tracing::info!(
        "📄 Pagination: default size {}, max size {}",
        settings.pagination.default_size,
        settings.pagination.max_size
    );

    let server = LineServer::in_memory(settings);
    if let Err(e) = server.run(shutdown_signal()).await {
        tracing::error!(
            "❌ Server failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());

        let exit_code = match e.severity() {
            ErrorSeverity::Critical => 3,
            _ => 1,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}
