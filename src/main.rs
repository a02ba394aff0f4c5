use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use storefront::{Cart, Catalog, FilterState, SortKey, Source, ALL};

#[derive(Debug, Parser)]
struct Cli {
    /// Catalog document, a file path or http(s) URL.
    #[arg(long, default_value = "roftu_product_data.json")]
    catalog: Source,

    /// Cart slot file.
    #[arg(long, default_value = "data/cart.json")]
    cart: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Show the product grid.
    List {
        #[arg(long, default_value = ALL)]
        main: String,
        #[arg(long, default_value = ALL)]
        sub: String,
        /// Full category label ("Main - Sub"), overrides --main/--sub.
        #[arg(long, conflicts_with_all = ["main", "sub"])]
        category: Option<String>,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_enum, default_value_t = SortKey::Original)]
        sort: SortKey,
    },
    /// Show the category index.
    Categories,
    /// Add a product to the cart.
    Add {
        id: u32,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product from the cart.
    Remove { id: u32 },
    /// Show the cart contents and totals.
    Cart,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::List {
            main,
            sub,
            category,
            search,
            sort,
        } => {
            let catalog = match Catalog::load(&cli.catalog) {
                Ok(x) => x,
                Err(e) => {
                    log::error!("{e:#}");
                    println!("Error loading products");
                    println!("Please check the catalog source and try again.");
                    return Ok(());
                }
            };

            let mut state = FilterState {
                main_category: main,
                sub_category: sub,
                search,
                sort,
            };
            if let Some(label) = category {
                state.select_category(&label);
            }

            let visible = state.apply(&catalog.products);
            if visible.is_empty() {
                println!("No products found");
                println!("Try adjusting your search or filter criteria.");
            } else {
                for product in &visible {
                    println!(
                        "#{:<4} {:<32} {:<24} ${:.2}",
                        product.id,
                        product.name,
                        product.full_category,
                        product.price.get()
                    );
                }
            }
            println!("{}", state.summary(visible.len()));
        }
        Command::Categories => {
            let catalog = Catalog::load(&cli.catalog)?;
            for main in &catalog.index.main_categories {
                println!("{main}");
                for sub in catalog.index.sub_categories(main) {
                    println!("  {main} - {sub}");
                }
            }
        }
        Command::Add { id, quantity } => {
            let catalog = Catalog::load(&cli.catalog)?;
            let product = catalog
                .product(id)
                .with_context(|| format!("No product with id {id}"))?;

            let mut cart = Cart::load(cli.cart);
            cart.add(product, quantity)?;
            println!("{} added to cart!", product.name);
        }
        Command::Remove { id } => {
            let mut cart = Cart::load(cli.cart);
            cart.remove(id)?;
        }
        Command::Cart => {
            let cart = Cart::load(cli.cart);
            if cart.entries().is_empty() {
                println!("Your cart is empty");
            } else {
                for entry in cart.entries() {
                    println!(
                        "{:<32} ${:.2} x {}",
                        entry.product.name,
                        entry.product.price.get(),
                        entry.quantity
                    );
                }
            }

            let totals = cart.totals();
            println!("Total: ${:.2} ({} items)", totals.price, totals.items);
        }
    }

    Ok(())
}
