use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Query a running storage gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the health of every storage service
    Status,
    /// Fetch data through the gateway
    Data {
        /// Number of requests to send (shows round-robin rotation)
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{base}/status")).send().await?;
            print_response(res).await?;
        }
        Commands::Data { count } => {
            for _ in 0..count {
                let res = client.get(format!("{base}/data")).send().await?;
                if let Some(origin) = res.headers().get("x-served-by") {
                    eprintln!("served by {}", origin.to_str().unwrap_or("?"));
                }
                print_response(res).await?;
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
