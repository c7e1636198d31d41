use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use farm_bill::bill::{parse_month, MONTHS};
use farm_bill::config::{config_dir, load_config, resolve_output_dir, CONFIG_TEMPLATE};
use farm_bill::error::{BillError, Result};
use farm_bill::export::open_path;
use farm_bill::render::{format_money, Block, RenderedDocument, FARM};
use farm_bill::{
    compute_totals, render_document, BillDraft, ExportService, FileAssets, FileDelivery,
    LineField, Product, TypstRasterizer,
};

#[derive(Parser)]
#[command(name = "bill")]
#[command(version, about = "Bill generator for Kanha's Milk & Goat Farm", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.bill or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config.toml template into the config directory
    Init,

    /// List products that can be billed
    Products,

    /// List accepted billing month names
    Months,

    /// Print the bill as text without rasterizing it
    Preview {
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Render the bill and save it as bill.jpg
    Generate {
        #[command(flatten)]
        draft: DraftArgs,

        /// Directory to save bill.jpg in (default: export.output_dir or Downloads)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the saved image with the system default viewer
        #[arg(long)]
        open: bool,
    },
}

#[derive(Args)]
struct DraftArgs {
    /// Customer name printed under BILL TO
    #[arg(short, long, default_value = "")]
    customer: String,

    /// Invoice date (YYYY-MM-DD)
    #[arg(short, long)]
    date: Option<String>,

    /// Billing month (e.g., March)
    #[arg(short, long)]
    month: Option<String>,

    /// Products in format "product[:quantity[:price]]" (can be repeated)
    #[arg(short, long, value_name = "PRODUCT:QTY:PRICE")]
    item: Vec<String>,

    /// Discount percentage, clamped to 0-100
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    discount: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Products => cmd_products(),
        Commands::Months => cmd_months(),
        Commands::Preview { draft } => cmd_preview(&draft),
        Commands::Generate {
            draft,
            output,
            open,
        } => cmd_generate(&cfg_dir, &draft, output, open).await,
    }
}

/// Write config.toml into the config directory
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    let config_path = cfg_dir.join("config.toml");
    if config_path.exists() {
        return Err(BillError::AlreadyInitialized(config_path));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;

    println!("Initialized bill config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point the header logos at your image files:  $EDITOR {}",
        config_path.display()
    );
    println!("  2. Make sure typst is installed:                typst --version");
    println!();
    println!("Then generate your first bill:");
    println!("  bill generate --customer <name> --month <month> --item milk:<qty>:<price>");

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: &'static str,
    #[tabled(rename = "PRODUCT")]
    label: &'static str,
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "PRODUCT")]
    product: String,
    #[tabled(rename = "QUANTITY")]
    quantity: String,
    #[tabled(rename = "PRICE (₹)")]
    price: String,
    #[tabled(rename = "TOTAL (₹)")]
    total: String,
}

/// List the product catalog
fn cmd_products() -> Result<()> {
    let rows: Vec<ProductRow> = Product::ALL
        .iter()
        .map(|p| ProductRow {
            id: p.id(),
            label: p.label(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// List accepted month names
fn cmd_months() -> Result<()> {
    for month in MONTHS {
        println!("{}", month.name());
    }
    Ok(())
}

/// Parse item input like "milk:10:50" into (product, quantity, price)
fn parse_item_input(input: &str) -> Result<(Product, Option<&str>, Option<&str>)> {
    let mut parts = input.split(':');
    let name = parts.next().unwrap_or_default();
    let quantity = parts.next();
    let price = parts.next();

    if name.trim().is_empty() || parts.next().is_some() {
        return Err(BillError::InvalidItemFormat(input.to_string()));
    }

    Ok((name.parse()?, quantity, price))
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| BillError::InvalidDate(input.to_string()))
}

/// Apply command-line flags to a fresh draft
fn build_draft(args: &DraftArgs) -> Result<BillDraft> {
    let mut draft = BillDraft::new();
    draft.set_customer_name(args.customer.as_str());

    if let Some(date) = &args.date {
        draft.set_invoice_date(parse_date(date)?);
    }
    if let Some(month) = &args.month {
        draft.set_billing_month(parse_month(month)?);
    }

    for input in &args.item {
        let (product, quantity, price) = parse_item_input(input)?;

        // Naming a product twice edits it rather than deselecting it
        if !draft.is_selected(product) {
            draft.toggle_product(product);
        }
        if let Some(quantity) = quantity {
            draft.set_line_item_field(product, LineField::Quantity, quantity);
        }
        if let Some(price) = price {
            draft.set_line_item_field(product, LineField::Price, price);
        }
    }

    draft.set_discount(&args.discount);
    Ok(draft)
}

fn print_document(document: &RenderedDocument) {
    for block in &document.blocks {
        match block {
            Block::Header { identity, .. } => {
                println!("{}", identity.name);
                for line in identity.address {
                    println!("{line}");
                }
                println!("Mobile : {}", identity.mobile);
                println!("Email : {}", identity.email);
                println!();
            }
            Block::MetaBand {
                invoice_date,
                billing_month,
            } => {
                println!("Invoice Date : {invoice_date}    Bill of Month : {billing_month}");
                println!();
            }
            Block::Customer { name } => {
                println!("BILL TO");
                println!("{name}");
                println!();
            }
            Block::LineTable { rows } => {
                let rows: Vec<LineRow> = rows
                    .iter()
                    .map(|row| LineRow {
                        product: row.product.clone(),
                        quantity: row.quantity.clone(),
                        price: row.price.clone(),
                        total: row.total.clone(),
                    })
                    .collect();
                let table = Table::new(rows).with(Style::rounded()).to_string();
                println!("{table}");
            }
            Block::GrandTotal { amount } => println!("Total Amount : ₹{amount}"),
            Block::Discount { percent } => println!("Discount : {percent}%"),
        }
    }
}

/// Print the bill as text
fn cmd_preview(args: &DraftArgs) -> Result<()> {
    let draft = build_draft(args)?;
    let totals = compute_totals(&draft);
    let document = render_document(&draft, &totals);

    print_document(&document);

    // Printed under the bill; not part of the captured document
    println!();
    println!("Customer Care : {}    Instagram : {}", FARM.customer_care, FARM.instagram);
    Ok(())
}

/// Render, rasterize and save the bill
async fn cmd_generate(
    cfg_dir: &Path,
    args: &DraftArgs,
    output: Option<PathBuf>,
    open: bool,
) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let draft = build_draft(args)?;
    let totals = compute_totals(&draft);
    let document = render_document(&draft, &totals);

    let service = ExportService::new(
        FileAssets::from_config(&config.assets),
        TypstRasterizer::from_config(&config.export),
    );
    let delivery =
        FileDelivery::new(output.unwrap_or_else(|| resolve_output_dir(&config.export)));

    let path = service.download(Some(&document), &delivery).await?;

    println!("Generated bill");
    println!("  Customer: {}", draft.customer_name());
    println!("  Total:    ₹{}", format_money(totals.grand_total));
    println!("  Saved:    {}", path.display());

    if open {
        open_path(&path)?;
    }
    Ok(())
}
