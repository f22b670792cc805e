//! # Seed Data Generator
//!
//! Populates the database with sample scheduled reports for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./backroom_dev.db (or $BACKROOM_DB_PATH)
//! cargo run -p backroom-db --bin seed
//!
//! # Specify database path
//! cargo run -p backroom-db --bin seed -- --db ./data/backroom.db
//! ```
//!
//! ## Generated Reports
//! One report per frequency and delivery method, so the dispatcher has
//! something to pick up in every branch:
//! - Daily sales summary by email
//! - Weekly low-stock list to a webhook
//! - Monthly inventory valuation over FTP
//! - Quarterly tax summary and yearly stock-take by email

use backroom_core::schedule::upcoming_schedule;
use backroom_core::{DeliveryConfig, FtpConfig, ScheduleConfig};
use backroom_db::{Database, DbConfig, NewScheduledReport};
use chrono::Utc;
use std::env;

fn sample_reports() -> Vec<NewScheduledReport> {
    vec![
        NewScheduledReport::new(
            "Daily sales summary",
            "sales_summary",
            ScheduleConfig::daily("21:30", "America/New_York"),
            DeliveryConfig::email(["owner@example.com", "manager@example.com"]),
            "seed",
        )
        .with_parameter("storeId", "store-001"),
        NewScheduledReport::new(
            "Weekly low stock",
            "low_stock",
            ScheduleConfig::weekly(1, "06:00", "America/Chicago"),
            DeliveryConfig::webhook("https://hooks.example.com/backroom/low-stock"),
            "seed",
        )
        .with_parameter("threshold", 5),
        NewScheduledReport::new(
            "Monthly inventory valuation",
            "inventory_valuation",
            ScheduleConfig::monthly(1, "02:00", "UTC"),
            DeliveryConfig::ftp(FtpConfig {
                host: "ftp.example.com".to_string(),
                port: 21,
                username: "backroom".to_string(),
                password: None,
                directory: Some("/reports/inventory".to_string()),
            }),
            "seed",
        ),
        NewScheduledReport::new(
            "Quarterly tax summary",
            "tax_summary",
            ScheduleConfig::quarterly(5, "08:00", "Europe/London"),
            DeliveryConfig::email(["accounts@example.com"]),
            "seed",
        ),
        NewScheduledReport::new(
            "Annual stock-take",
            "stock_take",
            ScheduleConfig::yearly(12, 31, "18:00", "Australia/Sydney"),
            DeliveryConfig::email(["owner@example.com"]),
            "seed",
        ),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = env::var("BACKROOM_DB_PATH").unwrap_or_else(|_| String::from("./backroom_dev.db"));

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Backroom POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./backroom_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Backroom POS Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.reports().list(true).await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} scheduled reports", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();
    for new in sample_reports() {
        match db.reports().create(new, now).await {
            Ok(report) => {
                println!();
                println!("✓ {} ({})", report.name, report.schedule.frequency);
                for run in upcoming_schedule(&report, 3, now)? {
                    println!("    next: {}", run.to_rfc3339());
                }
            }
            Err(e) => eprintln!("Failed to create report: {}", e),
        }
    }

    println!();
    println!("✓ {} active reports", db.reports().count_active().await?);

    db.close().await;
    Ok(())
}
