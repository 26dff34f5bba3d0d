use clap::{Parser, Subcommand};
use reqwest::Method;

use role_servant::servant::RoleProtocol;

#[derive(Parser)]
#[command(name = "servant-cli")]
#[command(about = "Discover and call a role servant", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(long, default_value = "/protocol")]
    protocol_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the role protocol document
    Protocol,
    /// Call a handler
    Call {
        /// HTTP method, sent exactly as given
        method: String,
        /// Request path, e.g. /say
        path: String,
        /// Request body
        #[arg(short, long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Protocol => {
            let res = client
                .get(format!("{}{}", base, cli.protocol_path))
                .send()
                .await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: servant returned status {}", status);
                if let Ok(text) = res.text().await {
                    eprintln!("Response: {}", text);
                }
                return Ok(());
            }

            let protocol: RoleProtocol = res.json().await?;
            print_protocol(&protocol);
            println!("{}", serde_json::to_string_pretty(&protocol)?);
        }
        Commands::Call { method, path, data } => {
            let method = Method::from_bytes(method.as_bytes())?;
            let res = client
                .request(method, format!("{}{}", base, path))
                .body(data.unwrap_or_default())
                .send()
                .await?;
            let status = res.status();
            let text = res.text().await?;
            println!("{}", status);
            if !text.is_empty() {
                println!("{}", text);
            }
        }
    }

    Ok(())
}

fn print_protocol(protocol: &RoleProtocol) {
    for role in &protocol.roles {
        println!("role {}", role.role_url);
        for handler in &role.handlers {
            if handler.body_template.is_empty() {
                println!("  {:<7} {}  ({})", handler.method, handler.path_template, handler.name);
            } else {
                println!(
                    "  {:<7} {}  data: {}  ({})",
                    handler.method, handler.path_template, handler.body_template, handler.name
                );
            }
        }
    }
}
