use clap::{Parser, Subcommand};
use serde_json::Value;

use api_relay::relay::spec::{AuthSpec, BodySpec, NameValue, RequestSpec};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Exercise a running api-relay from the command line", long_about = None)]
struct Cli {
    /// Base URL of the relay server.
    #[arg(short, long, default_value = "http://localhost:8080")]
    relay: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the relay is alive
    Ping,
    /// Send one request through the relay and print the normalized response
    Send {
        /// HTTP method for the outbound request
        method: String,

        /// Target URL
        url: String,

        /// Header as "Name: value"; repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Query parameter as "name=value"; repeatable
        #[arg(short = 'q', long = "query")]
        queries: Vec<String>,

        /// Inline JSON body
        #[arg(long, conflicts_with = "raw")]
        json: Option<String>,

        /// Raw text body
        #[arg(long)]
        raw: Option<String>,

        /// Content type for --raw
        #[arg(long, requires = "raw")]
        content_type: Option<String>,

        /// Bearer token auth
        #[arg(long, conflicts_with = "basic")]
        bearer: Option<String>,

        /// Basic auth as "user:password"
        #[arg(long)]
        basic: Option<String>,

        /// Skip certificate validation on the outbound call
        #[arg(long)]
        insecure: bool,

        /// Whole-call timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Ping => {
            let res = client.get(format!("{}/api/ping", cli.relay)).send().await?;
            println!("{}", res.text().await?);
        }
        Commands::Send {
            method,
            url,
            headers,
            queries,
            json,
            raw,
            content_type,
            bearer,
            basic,
            insecure,
            timeout_ms,
        } => {
            let mut spec = RequestSpec {
                url,
                method,
                ..RequestSpec::default()
            };

            for header in headers {
                let (name, value) = header
                    .split_once(':')
                    .ok_or(r#"--header expects "Name: value""#)?;
                spec.headers.push(NameValue::new(name.trim(), value.trim()));
            }
            for query in queries {
                let (name, value) = query
                    .split_once('=')
                    .ok_or(r#"--query expects "name=value""#)?;
                spec.query_params.push(NameValue::new(name, value));
            }

            if let Some(document) = json {
                spec.body = BodySpec::Json {
                    json: serde_json::from_str(&document)?,
                };
            } else if let Some(text) = raw {
                spec.body = BodySpec::Raw {
                    raw: Some(text),
                    raw_content_type: content_type,
                };
            }

            if let Some(token) = bearer {
                spec.auth = AuthSpec::Bearer { token: Some(token) };
            } else if let Some(credentials) = basic {
                let (username, password) = credentials
                    .split_once(':')
                    .ok_or(r#"--basic expects "user:password""#)?;
                spec.auth = AuthSpec::Basic {
                    username: Some(username.to_string()),
                    password: Some(password.to_string()),
                };
            }

            if insecure {
                spec.validate_ssl = false;
            }
            if let Some(ms) = timeout_ms {
                spec.timeout_ms = ms;
            }

            let res = client
                .post(format!("{}/api/send", cli.relay))
                .json(&spec)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
