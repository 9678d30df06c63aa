//! # Cart Inspector
//!
//! Opens the file-backed cart the way the page would and prints what a
//! visitor would see: lines, totals and the WhatsApp order link.
//!
//! ## Usage
//! ```bash
//! # Inspect the cart in the platform data directory
//! cargo run -p panzo-store --bin cart-inspect
//!
//! # Use a specific config file and storage directory
//! cargo run -p panzo-store --bin cart-inspect -- --config ./cart.toml --dir ./data
//!
//! # Add a sandwich and a drink first (development)
//! cargo run -p panzo-store --bin cart-inspect -- --demo
//!
//! # Empty the stored cart
//! cargo run -p panzo-store --bin cart-inspect -- --clear
//! ```

use std::env;
use std::path::PathBuf;

use panzo_core::{Beverage, Cart, Catalog, ItemKind, Money, Product, Variant, VariantSelection};
use panzo_store::{CartStore, PanzoConfig, SystemClock};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut dir_override: Option<PathBuf> = None;
    let mut clear = false;
    let mut demo = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--dir" | "-d" => {
                if i + 1 < args.len() {
                    dir_override = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--clear" => clear = true,
            "--demo" => demo = true,
            "--help" | "-h" => {
                println!("Panzo Cart Inspector");
                println!();
                println!("Usage: cart-inspect [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: platform config dir)");
                println!("  -d, --dir <PATH>     Cart storage directory");
                println!("      --demo           Add a sample sandwich and drink");
                println!("      --clear          Empty the stored cart");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let mut config = PanzoConfig::load(config_path)?;
    if let Some(dir) = dir_override {
        config.store.storage_dir = Some(dir);
    }

    let storage = config.store.file_storage()?;
    println!("Panzo Cart Inspector");
    println!("====================");
    println!("Storage: {}", storage.dir().display());
    println!("Key:     {}", config.store.storage_key);
    println!();

    let mut store = CartStore::open(storage, SystemClock, &config.store);
    println!("Loaded: {:?}", store.load_outcome());

    store.subscribe(|cart: &Cart| {
        let totals = cart.totals();
        println!(
            "  -> {} line(s), {} item(s), {}",
            totals.line_count, totals.total_items, totals.total
        );
    });

    if demo {
        add_demo_items(&mut store);
    }

    if clear {
        store.clear_cart();
        println!("Cart cleared.");
        return Ok(());
    }

    println!();
    if store.is_empty() {
        println!("Cart is empty.");
        return Ok(());
    }

    for line in store.items() {
        println!(
            "{:<24} {:<16} {:>3} x {:>9} = {:>9}  (criolla: {})",
            line.product_name,
            line.variant_type,
            line.quantity,
            line.price.to_string(),
            line.line_total().to_string(),
            line.condiment_qty
        );
    }

    let totals = store.totals();
    println!();
    println!("Items: {}", totals.total_items);
    println!("Total: {}", totals.total);

    if let Some(message) = store.order_message(&config.order) {
        println!();
        println!("{}", message);
    }
    if let Some(url) = store.whatsapp_url(&config.order)? {
        println!();
        println!("{}", url);
    }

    Ok(())
}

/// A two-item menu, enough to exercise variants and beverages.
fn add_demo_items(store: &mut CartStore) {
    let catalog = Catalog::new(
        vec![Product {
            id: 1,
            name: "Milanesa".to_string(),
            image: Some("img/milanesa.webp".to_string()),
            variants: vec![
                Variant::new("Pan Francés", Money::from_units(450)),
                Variant::new("Pan Árabe", Money::from_units(500)),
            ],
        }],
        vec![Beverage {
            id: 9,
            name: "Coca-Cola 500ml".to_string(),
            image: None,
            price: Money::from_units(1300),
        }],
    );

    let mut selection = VariantSelection::new();
    selection.select(1, 1);

    if let Some(key) = store.add_from_catalog(&catalog, ItemKind::Product, 1, &selection) {
        store.update_condiment_qty(&key, 1);
    }
    store.add_from_catalog(&catalog, ItemKind::Beverage, 9, &selection);
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=panzo=trace` - Show trace for panzo crates only
/// - Default: `info,panzo=debug`
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,panzo=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
