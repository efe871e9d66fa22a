use clap::{Parser, Subcommand};
use serde::Serialize;
use students_sdk::{ClientError, StudentInput, StudentsClient};

#[derive(Parser)]
#[command(name = "students-cli")]
#[command(about = "Command-line client for the students API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8082")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a student
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        age: i32,
    },
    /// Show one student
    Get { id: i64 },
    /// List every student
    List,
    /// Overwrite a student's fields
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        age: i32,
    },
    /// Delete a student
    Delete { id: i64 },
    /// Check service health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = StudentsClient::new(&cli.url);

    let result = match cli.command {
        Commands::Create { name, email, age } => {
            let input = StudentInput { name, email, age };
            print_json(client.create_student(&input).await)
        }
        Commands::Get { id } => print_json(client.get_student(id).await),
        Commands::List => print_json(client.list_students().await),
        Commands::Update { id, name, email, age } => {
            let input = StudentInput { name, email, age };
            print_json(client.update_student(id, &input).await)
        }
        Commands::Delete { id } => print_json(client.delete_student(id).await),
        Commands::Health => print_json(client.health().await),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn print_json<T: Serialize>(result: Result<T, ClientError>) -> Result<(), Box<dyn std::error::Error>> {
    let value = result?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
