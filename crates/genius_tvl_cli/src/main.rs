//! genius-tvl CLI: tvl, staking, snapshot, verify, methodology.

use clap::{Parser, Subcommand};
use genius_tvl::chain::{Chain, EndpointConfig, RpcClient};
use genius_tvl::report::ReportData;
use genius_tvl::verify::{read_bundle, reproducibility_hash, verify_bundle_hash, SnapshotBundle};
use genius_tvl::{staking, tvl, METHODOLOGY};
use genius_tvl_report::render_report;
use std::path::{Path, PathBuf};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    match cli.command {
        Command::Tvl(args) => run_tvl(args),
        Command::Staking(args) => run_staking(args),
        Command::Snapshot(args) => run_snapshot(args),
        Command::Verify(args) => run_verify(args),
        Command::Methodology => {
            print!("{}", METHODOLOGY);
            Ok(())
        }
    }
}

#[derive(Parser)]
#[command(name = "genius-tvl")]
#[command(author = "gorusys <goru.connector@outlook.com>")]
#[command(about = "TVL and staking reporter for the Genius protocol")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print stability pool TVL for one chain.
    Tvl(ChainArgs),
    /// Print GENI locked in miners and the stability pool for one chain.
    Staking(ChainArgs),
    /// Run both metrics and write bundle, hash, and HTML report.
    Snapshot(SnapshotArgs),
    /// Verify a bundle's reproducibility hash.
    Verify(VerifyArgs),
    /// Print how the metrics are computed.
    Methodology,
}

#[derive(Parser)]
struct ChainArgs {
    /// ethereum, bsc, polygon or avax
    #[arg(long)]
    chain: Chain,
    /// Overrides config file and GENIUS_RPC_<CHAIN>.
    #[arg(long)]
    rpc_url: Option<String>,
}

#[derive(Parser)]
struct SnapshotArgs {
    #[command(flatten)]
    chain: ChainArgs,
    #[arg(long, default_value = "./reports")]
    reports_dir: PathBuf,
}

#[derive(Parser)]
struct VerifyArgs {
    #[arg(long)]
    bundle: PathBuf,
}

fn client_for(args: &ChainArgs) -> Result<RpcClient, Box<dyn std::error::Error>> {
    let endpoints = EndpointConfig::load()?;
    let mut config = endpoints.rpc_config(args.chain);
    if let Some(url) = &args.rpc_url {
        config.url = url.clone();
    }
    info!(chain = %args.chain, url = %config.url, "rpc endpoint");
    Ok(RpcClient::new(config)?)
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build()
}

fn run_tvl(args: ChainArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = client_for(&args)?;
    let balances = runtime()?.block_on(tvl(&client))?;
    println!("{}", serde_json::to_string_pretty(&balances)?);
    Ok(())
}

fn run_staking(args: ChainArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = client_for(&args)?;
    let balances = runtime()?.block_on(staking(&client))?;
    println!("{}", serde_json::to_string_pretty(&balances)?);
    Ok(())
}

fn run_snapshot(args: SnapshotArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = client_for(&args.chain)?;
    let rt = runtime()?;
    let tvl_balances = rt.block_on(tvl(&client))?;
    let staking_balances = rt.block_on(staking(&client))?;
    let bundle = SnapshotBundle::new(
        args.chain.chain.to_string(),
        tvl_balances,
        staking_balances,
        client.request_count(),
    );
    let reproducibility_hash_sha256 = reproducibility_hash(&bundle)?;
    let data = ReportData {
        bundle,
        reproducibility_hash_sha256: reproducibility_hash_sha256.clone(),
    };

    std::fs::create_dir_all(&args.reports_dir)?;
    let stem = args.chain.chain.as_str();
    let bundle_path = args.reports_dir.join(format!("{}.bundle.json", stem));
    let hash_path = args.reports_dir.join(format!("{}.bundle.sha256", stem));
    let html_path = args.reports_dir.join(format!("{}.html", stem));
    std::fs::write(&bundle_path, serde_json::to_string_pretty(&data.bundle)?)?;
    std::fs::write(&hash_path, format!("{}\n", reproducibility_hash_sha256))?;
    render_report(&data, &html_path)?;
    info!(?bundle_path, ?hash_path, ?html_path, "snapshot complete");
    println!("{}", reproducibility_hash_sha256);
    Ok(())
}

fn run_verify(args: VerifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let bundle = read_bundle(&args.bundle)?;
    let sha256_path = args
        .bundle
        .parent()
        .unwrap_or(Path::new("."))
        .join(format!(
            "{}.sha256",
            args.bundle
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
        ));
    let expected = std::fs::read_to_string(&sha256_path).ok();
    let result = match expected {
        Some(exp) => verify_bundle_hash(&bundle, &exp)?,
        None => genius_tvl::VerificationResult {
            bundle_hash: reproducibility_hash(&bundle)?,
            expected_hash: None,
            matches: false,
        },
    };
    if result.matches {
        println!("OK\t{}", result.bundle_hash);
    } else {
        eprintln!(
            "MISMATCH\tcomputed={}\texpected={:?}",
            result.bundle_hash, result.expected_hash
        );
        std::process::exit(1);
    }
    Ok(())
}
