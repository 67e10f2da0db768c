//! Seed tool: populates a database with realistic pharmacy stock.
//!
//! Usage:
//!   seed [--db <path>] [--count <n>]
//!
//! Skips seeding when the medicines table already has rows, so it is safe
//! to run against an existing database.

use medipos_core::NewMedicine;
use medipos_store::{Database, DbConfig, StockLedger};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SEED_ACTOR: &str = "seed";

// Name, base price in cents, shelf-life offset in days from today.
// Negative offsets produce already-expired stock so the expiry alerts have
// something to show on a fresh database.
const MEDICINES: &[(&str, i64, i64)] = &[
    ("Paracetamol 500mg", 150, 400),
    ("Ibuprofen 200mg", 220, 320),
    ("Aspirin 75mg", 100, 500),
    ("Amoxicillin 250mg", 300, 45),
    ("Azithromycin 500mg", 650, 90),
    ("Cetirizine 10mg", 90, 700),
    ("Loratadine 10mg", 120, 30),
    ("Omeprazole 20mg", 280, 55),
    ("Metformin 500mg", 180, 600),
    ("Amlodipine 5mg", 240, 365),
    ("Atorvastatin 10mg", 420, 15),
    ("Losartan 50mg", 350, 250),
    ("Salbutamol Inhaler", 950, 60),
    ("Insulin Glargine", 2500, 40),
    ("Vitamin D3 1000IU", 200, 800),
    ("Folic Acid 5mg", 80, -20),
    ("ORS Sachet", 50, 180),
    ("Zinc Sulphate 20mg", 70, -70),
    ("Dextromethorphan Syrup", 310, 25),
    ("Chlorpheniramine 4mg", 60, 450),
];

fn print_usage() {
    println!("Usage: seed [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>     Database file (default: medipos.db)");
    println!("  -c, --count <N>     Number of medicines to insert (default: all)");
    println!("  -h, --help          Print this help");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut db_path = "medipos.db".to_string();
    let mut count = MEDICINES.len();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-d" | "--db" => {
                db_path = args.next().ok_or("--db requires a value")?;
            }
            "-c" | "--count" => {
                count = args
                    .next()
                    .ok_or("--count requires a value")?
                    .parse()
                    .map_err(|_| "--count must be a number")?;
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let ledger = StockLedger::new(&db).await?;

    if !ledger.list().await?.is_empty() {
        info!(db = %db_path, "Database already has stock, nothing to do");
        return Ok(());
    }

    let today = chrono::Utc::now().date_naive();
    let count = count.min(MEDICINES.len());

    for (i, (name, price_cents, expiry_offset)) in MEDICINES.iter().take(count).enumerate() {
        // Spread quantities deterministically so the listing includes both
        // low-stock (≤ 10) and comfortably stocked rows.
        let quantity = ((i as i64 * 7) % 40) + 2;

        let id = ledger
            .create(
                NewMedicine {
                    name: name.to_string(),
                    quantity,
                    price_cents: *price_cents,
                    expiry_date: Some(today + chrono::Duration::days(*expiry_offset)),
                },
                SEED_ACTOR,
            )
            .await?;
        info!(id = %id, name = %name, quantity = %quantity, "Seeded");
    }

    info!(count = %count, db = %db_path, "Seed complete");
    db.close().await;
    Ok(())
}
