//! # Seed Data Generator
//!
//! Populates the catalog with sample products for manual testing.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p shop-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p shop-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p shop-db --bin seed -- --db ./data/shop.db
//! ```
//!
//! Products are named `{Audience} {Colour} {Garment}` (e.g. "Men Red Shirt")
//! with the category `{Audience} {Garment}s`.

use shop_core::NewProduct;
use shop_db::{Database, DbConfig};
use std::env;

const AUDIENCES: &[&str] = &["Men", "Women", "Kids"];

const COLOURS: &[&str] = &[
    "Red", "Blue", "Green", "Black", "White", "Grey", "Navy", "Beige",
];

/// Garment and its base price in cents.
const GARMENTS: &[(&str, i64)] = &[
    ("Shirt", 1999),
    ("T-Shirt", 999),
    ("Jacket", 5999),
    ("Hoodie", 3499),
    ("Jeans", 4499),
    ("Cap", 1299),
    ("Scarf", 1599),
    ("Sweater", 3999),
    ("Shorts", 1799),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./data/shop.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shopfront Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./data/shop.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Shopfront Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let repo = db.products();
    let mut generated = 0;

    for seed in 0..count {
        let product = generate_product(seed);
        if let Err(e) = repo.create(product.clone()).await {
            eprintln!("Failed to insert {}: {}", product.name, e);
            continue;
        }
        generated += 1;

        if generated % 50 == 0 {
            println!("  Generated {} products...", generated);
        }
    }

    println!();
    println!("✓ Generated {} products in {:?}", generated, start.elapsed());

    db.close().await;
    Ok(())
}

/// Generates one product deterministically from its index.
fn generate_product(seed: usize) -> NewProduct {
    let audience = AUDIENCES[seed % AUDIENCES.len()];
    let colour = COLOURS[(seed / AUDIENCES.len()) % COLOURS.len()];
    let (garment, base_price) = GARMENTS[(seed / (AUDIENCES.len() * COLOURS.len())) % GARMENTS.len()];

    // Repeats past one full cycle get a numbered edition
    let cycle = seed / (AUDIENCES.len() * COLOURS.len() * GARMENTS.len());
    let name = if cycle == 0 {
        format!("{} {} {}", audience, colour, garment)
    } else {
        format!("{} {} {} #{}", audience, colour, garment, cycle + 1)
    };

    NewProduct {
        name,
        category: format!("{} {}s", audience, garment),
        quantity: ((seed * 37) % 1000) as i64,
        price_cents: base_price + ((seed * 13) % 500) as i64,
    }
}
