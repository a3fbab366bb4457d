//! # Sample Catalog Seeder
//!
//! Fills an empty catalog database with sample products for local
//! development.
//!
//! ## Usage
//! ```bash
//! # Insert 60 products (default)
//! cargo run -p catalog-db --bin seed
//!
//! # Insert a custom amount
//! cargo run -p catalog-db --bin seed -- --count 200
//!
//! # Specify database
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! Names combine a material with a base item ("Leather Wallet", "Red
//! Shoe"), so keyword searches such as `Red` or `Wool` return a mix of
//! name and description matches.

use std::env;

use catalog_core::validation::validate_price_range;
use catalog_core::{Money, NewProduct};
use catalog_db::{Database, DbConfig};

/// Base items with their starting price in cents.
const ITEMS: &[(&str, i64)] = &[
    ("Shoe", 4999),
    ("Hat", 1999),
    ("Scarf", 1500),
    ("Wallet", 2500),
    ("Mug", 900),
    ("Notebook", 450),
    ("Pen", 150),
    ("Backpack", 5999),
    ("Lamp", 3200),
    ("Blanket", 4200),
];

/// Materials and colours, used as name prefix and in the description.
const VARIANTS: &[&str] = &["Red", "Blue", "Leather", "Wool", "Cotton", "Bamboo"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = ITEMS.len() * VARIANTS.len();
    let mut db_url = String::from("sqlite://catalog.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(count);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_url = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to insert (default: 60)");
                println!("  -d, --db <URL>     Database URL or path (default: catalog.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Catalog Seeder");
    println!("==============");
    println!("Database: {}", db_url);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_url)).await?;
    println!("✓ Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products, skipping", existing);
        return Ok(());
    }

    let repo = db.products();
    let mut inserted = 0;

    for (seq, product) in sample_products().take(count).enumerate() {
        match repo.insert(&product).await {
            Ok(_) => inserted += 1,
            Err(e) => eprintln!("Failed to insert #{} {}: {}", seq, product.name, e),
        }
    }

    println!("✓ Inserted {} products", inserted);

    let hits = repo.search("Red").await?;
    println!("  Search 'Red': {} results", hits.len());

    db.close().await;
    Ok(())
}

/// Cycles through variant × item pairs, bumping the price on each lap.
fn sample_products() -> impl Iterator<Item = NewProduct> {
    (0..).map(|seq: usize| {
        let (item, base_cents) = ITEMS[seq % ITEMS.len()];
        let variant = VARIANTS[(seq / ITEMS.len()) % VARIANTS.len()];
        let lap = (seq / (ITEMS.len() * VARIANTS.len())) as i64;

        let price = validate_price_range(Money::from_cents(base_cents + lap * 100))
            .unwrap_or(Money::from_cents(base_cents));

        NewProduct {
            name: format!("{} {}", variant, item),
            description: format!("{} {}, sample item #{}", item, variant.to_lowercase(), seq + 1),
            price,
            image_url: (seq % 3 == 0).then(|| format!("https://img.example/{}.png", seq + 1)),
        }
    })
}
