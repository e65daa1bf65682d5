//! Command-line front end for a running desk server.
//!
//! deskctl todos                     # list todos
//! deskctl passengers --flight BR0101 --limit 10
//! deskctl stats                     # stat cards
//! deskctl import passengers.csv
//! deskctl call GET_PASSENGERS '{"status":"confirmed"}'

use airdesk::DeskClient;
use airdesk::client::render;
use airdesk::tools::ToolName;
use airdesk::types::tools::PassengerFilters;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "deskctl")]
#[command(about = "Call airdesk tools and print the results")]
#[command(version)]
struct Cli {
    /// Base URL of the desk server
    #[arg(long, env = "DESK_URL", default_value = "http://127.0.0.1:8000/")]
    url: Url,

    /// Service key
    #[arg(long, env = "DESK_KEY")]
    key: String,

    /// Identity context forwarded as `x-user-context`
    #[arg(long, env = "DESK_USER_CONTEXT")]
    user_context: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the authenticated caller
    Whoami,
    /// List todos
    Todos,
    /// Create a todo with a generated title
    Generate,
    /// Flip a todo's completed flag
    Toggle { id: i64 },
    /// Delete a todo
    Delete { id: i64 },
    /// List passengers
    Passengers {
        #[arg(long)]
        flight: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        class: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Passenger statistics
    Stats,
    /// Import passengers from a CSV file
    Import { file: PathBuf },
    /// Delete every passenger
    Clear,
    /// Load the sample dataset into an empty table
    Populate,
    /// List tool names
    Tools,
    /// Invoke any tool with raw JSON input and print the JSON output
    Call {
        tool: String,
        #[arg(default_value = "{}")]
        input: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut client = DeskClient::new(reqwest::Client::new(), cli.url, cli.key);
    if let Some(ctx) = cli.user_context {
        client = client.with_user_context(ctx);
    }

    let output = match cli.command {
        Commands::Whoami => render::render_user(&client.get_user().await?),
        Commands::Todos => render::render_todos(&client.list_todos().await?),
        Commands::Generate => render::render_todos(&[client.generate_todo().await?]),
        Commands::Toggle { id } => render::render_todos(&[client.toggle_todo(id).await?]),
        Commands::Delete { id } => {
            let result = client.delete_todo(id).await?;
            format!("Deleted todo #{}", result.deleted_id)
        }
        Commands::Passengers {
            flight,
            from,
            to,
            class,
            status,
            limit,
        } => {
            let filters = PassengerFilters {
                flight_number: flight,
                departure_city: from,
                arrival_city: to,
                ticket_class: class,
                status,
                limit,
            };
            render::render_passengers(&client.get_passengers(&filters).await?)
        }
        Commands::Stats => render::render_stats(&client.get_passenger_stats().await?),
        Commands::Import { file } => {
            let csv = std::fs::read_to_string(&file)?;
            client.import_passengers_from_csv(csv).await?.message
        }
        Commands::Clear => client.clear_database().await?.message,
        Commands::Populate => client.populate_test_data().await?.message,
        Commands::Tools => ToolName::ALL
            .iter()
            .map(|t| format!("{:<28} {}", t.as_str(), t.description()))
            .collect::<Vec<_>>()
            .join("\n"),
        Commands::Call { tool, input } => {
            let tool: ToolName = tool.parse()?;
            let input: serde_json::Value = serde_json::from_str(&input)?;
            serde_json::to_string_pretty(&client.call_raw(tool, &input).await?)?
        }
    };
    println!("{}", output.trim_end());
    Ok(())
}
