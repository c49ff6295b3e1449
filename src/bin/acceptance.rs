use clap::Parser;
use std::net::SocketAddr;
use subway_lines::utils::logger;
use subway_lines::{AcceptanceSuite, LineServer, Scenario, ServerSettings, SubwayClient};

#[derive(Parser)]
#[command(name = "acceptance")]
#[command(about = "Runs the line API acceptance scenarios over HTTP")]
struct Args {
    /// Server to test. When omitted, an in-memory server is started on an ephemeral port.
    #[arg(long)]
    base_url: Option<String>,

    /// Run only the named scenarios (comma separated)
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose, None);

    let selected: Vec<Scenario> = if args.only.is_empty() {
        Scenario::ALL.to_vec()
    } else {
        let mut selected = Vec::new();
        for name in &args.only {
            match Scenario::ALL.iter().find(|s| s.name() == name.as_str()) {
                Some(scenario) => selected.push(*scenario),
                None => anyhow::bail!("unknown scenario: {}", name),
            }
        }
        selected
    };

    // 未指定伺服器時啟動內建伺服器
    let (base_url, embedded) = match args.base_url.clone() {
        Some(url) => (url, None),
        None => {
            let settings = ServerSettings {
                bind: SocketAddr::from(([127, 0, 0, 1], 0)),
                ..ServerSettings::default()
            };
            let server = LineServer::in_memory(settings).spawn().await?;
            (server.base_url(), Some(server))
        }
    };

    println!("🚀 Running {} scenario(s) against {}", selected.len(), base_url);

    let suite = AcceptanceSuite::new(SubwayClient::new(&base_url)?);
    let mut results = Vec::with_capacity(selected.len());
    for scenario in selected {
        results.push(suite.run(scenario).await);
    }

    for result in &results {
        match &result.error {
            None => println!("  ✅ {} ({:?})", result.scenario.name(), result.duration),
            Some(error) => println!("  ❌ {} ({:?}): {}", result.scenario.name(), result.duration, error),
        }
    }
    let summary = AcceptanceSuite::summarize(&results);
    println!("📈 {} passed, {} failed", summary.passed, summary.failed);

    if let Some(server) = embedded {
        server.shutdown().await?;
    }

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
