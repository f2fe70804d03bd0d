use ai_detector_backend::{
    config::{Config, DatabaseConfig},
    database::Database,
    repositories::{AnalysisHistoryRepository, UserRepository},
};
use anyhow::Context;
use clap::Parser;
use std::path::Path;

/// 查看用户表与分析历史
#[derive(Parser, Debug)]
#[command(name = "view_database")]
#[command(author, version, about = "Print users and analysis history from the detector database")]
struct Args {
    /// SQLite URL, defaults to the configured database
    #[arg(long)]
    database: Option<String>,
}

fn sqlite_file(url: &str) -> Option<&str> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);
    (!path.is_empty() && !path.contains(":memory:")).then_some(path)
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let url = match args.database {
        Some(url) => url,
        None => Config::load_if_exists("config.toml")
            .context("invalid config.toml")?
            .unwrap_or_default()
            .database
            .url,
    };

    if let Some(path) = sqlite_file(&url) {
        if !Path::new(path).exists() {
            println!("❌ Database not found at: {}", path);
            return Ok(());
        }
    }

    let database = Database::new(&DatabaseConfig {
        url,
        max_connections: 1,
    })
    .await?;

    let rule = "=".repeat(100);

    println!("\n{}", rule);
    println!("👤 USERS TABLE");
    println!("{}", rule);

    match UserRepository::new(database.clone()).list_all().await {
        Ok(users) if users.is_empty() => println!("No users found."),
        Ok(users) => {
            println!("{:<5} {:<20} {:<30} {}", "ID", "Name", "Email", "Created At");
            println!("{}", "-".repeat(100));
            for user in users {
                println!(
                    "{:<5} {:<20} {:<30} {}",
                    user.id, user.name, user.email, user.created_at
                );
            }
        }
        Err(e) => println!("❌ Users table error: {}", e),
    }

    println!("\n{}", rule);
    println!("📊 ANALYSIS HISTORY");
    println!("{}", rule);

    match AnalysisHistoryRepository::new(database.clone()).list_all().await {
        Ok(records) if records.is_empty() => println!("No analysis records found."),
        Ok(records) => {
            println!(
                "{:<5} {:<6} {:<28} {:<10} {:<22} {:<7} {}",
                "ID", "User", "File", "Type", "Verdict", "Conf%", "Date"
            );
            println!("{}", "-".repeat(100));
            for record in &records {
                let user = record
                    .user_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<5} {:<6} {:<28} {:<10} {:<22} {:<7.1} {}",
                    record.id,
                    user,
                    truncate(&record.file_name, 26),
                    record.file_type.as_deref().unwrap_or("-"),
                    record.verdict.as_deref().unwrap_or("-"),
                    record.confidence.unwrap_or_default(),
                    record.timestamp
                );
            }
            println!("\nTotal Analyses: {}", records.len());
        }
        Err(e) => println!("❌ Analysis history error: {}", e),
    }

    database.close().await;
    println!("{}\n", rule);

    Ok(())
}
