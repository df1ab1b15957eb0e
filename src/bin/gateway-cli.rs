use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Probe a running resilient gateway", long_about = None)]
struct Cli {
    /// Gateway base URL.
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    /// Prometheus exporter base URL.
    #[arg(short, long, default_value = "http://localhost:9090")]
    metrics_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call the health endpoint
    Health,
    /// Call the gateway endpoint once (or repeatedly)
    Consul {
        #[arg(short, long, default_value_t = 1)]
        count: u32,
    },
    /// Show the gateway's breaker and cache counters
    Metrics,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Consul { count } => {
            for _ in 0..count {
                let res = client.get(format!("{}/api/v1/consul", cli.url)).send().await?;
                print_response(res).await?;
            }
        }
        Commands::Metrics => {
            let text = client
                .get(format!("{}/metrics", cli.metrics_url))
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;
            text.lines()
                .filter(|line| {
                    line.starts_with("circuit_breaker_activations")
                        || line.starts_with("redis_cache_hits")
                        || line.starts_with("gateway_requests_total")
                })
                .for_each(|line| println!("{}", line));
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;
    println!("{} {}", status, serde_json::to_string_pretty(&json)?);
    Ok(())
}
