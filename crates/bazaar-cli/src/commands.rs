use std::sync::Arc;

use anyhow::Context;
use bazaar_ledger::{
    InMemoryMarketplace, InMemorySettlement, ItemRecord, MarketConfig, MarketReader,
    MarketWriter, Settlement,
};
use bazaar_types::{AccountId, Amount};
use colored::Colorize;
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Deploy(args) => cmd_deploy(&args, &cli.format),
        Command::Demo(args) => cmd_demo(&args, &cli.format),
        Command::Config(args) => cmd_config(&args, &cli.format),
    }
}

fn resolve_config(args: &MarketArgs) -> anyhow::Result<MarketConfig> {
    let mut config = match &args.config {
        Some(path) => MarketConfig::load(path)?,
        None => MarketConfig::default(),
    };
    if let Some(fee) = &args.fee {
        config.listing_fee = Amount::parse(fee).context("invalid --fee")?;
    }
    if let Some(label) = &args.operator {
        config.operator = AccountId::from_label(label.as_str());
    }
    tracing::debug!(
        operator = %config.operator,
        listing_fee = %config.listing_fee,
        from_file = args.config.is_some(),
        "resolved marketplace config"
    );
    Ok(config)
}

fn cmd_deploy(args: &MarketArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = resolve_config(args)?;
    let market = InMemoryMarketplace::new(config, Arc::new(InMemorySettlement::new()));
    let fee = market.listing_fee()?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "operator": market.operator(), "listing_fee": fee })
        ),
        OutputFormat::Text => {
            println!("{} Marketplace opened", "✓".green().bold());
            println!("  Operator: {}", market.operator().to_hex().cyan());
            println!("  Listing fee: {}", fee.to_string().yellow());
        }
    }
    Ok(())
}

/// Outcome of the scripted walkthrough.
pub struct DemoReport {
    pub steps: Vec<String>,
    pub catalog: Vec<ItemRecord>,
    pub seller_balance: Amount,
    pub operator_balance: Amount,
}

pub fn run_demo(config: MarketConfig) -> anyhow::Result<DemoReport> {
    let book = Arc::new(InMemorySettlement::new());
    let fee = config.listing_fee;
    let market = InMemoryMarketplace::new(config, book.clone());

    let seller = AccountId::from_label("seller");
    let buyer = AccountId::from_label("buyer1");
    let price = Amount::units(1);
    let resale = Amount::units(2);
    let mut steps = Vec::new();
    let mut step = |line: String| {
        tracing::debug!(step = steps.len() + 1, "{line}");
        steps.push(line);
    };

    let id = market.create_and_list(&seller, "https://example.com/token-uri", price, fee)?;
    step(format!("{seller} listed {id} at {price}"));

    market.buy(&buyer, id, price)?;
    step(format!("{buyer} bought {id} for {price}"));
    let owned = market.fetch_owned_by(&buyer)?;
    step(format!("{buyer} owns {} item(s)", owned.len()));

    market.resell(&buyer, id, resale, fee)?;
    step(format!("{buyer} relisted {id} at {resale}"));

    let report = market.validate()?;
    anyhow::ensure!(report.is_valid(), "ledger invariants violated: {:?}", report.violations);

    Ok(DemoReport {
        steps,
        catalog: market.fetch_unsold()?,
        seller_balance: book.balance_of(&seller),
        operator_balance: market.operator_balance()?,
    })
}

fn cmd_demo(args: &MarketArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let report = run_demo(resolve_config(args)?)?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "steps": report.steps,
                "unsold": report.catalog,
                "seller_balance": report.seller_balance,
                "operator_balance": report.operator_balance,
            }))?
        ),
        OutputFormat::Text => {
            for step in &report.steps {
                println!("{} {}", "✓".green(), step);
            }
            println!("\nUnsold items:");
            for record in &report.catalog {
                print_record(record);
            }
            println!("Seller balance: {}", report.seller_balance.to_string().yellow());
            println!("Operator fees: {}", report.operator_balance.to_string().yellow());
        }
    }
    Ok(())
}

fn print_record(record: &ItemRecord) {
    let seller = record
        .seller
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".into());
    let status = if record.sold {
        "sold".red()
    } else {
        "listed".green()
    };
    println!(
        "  {}  {}  seller {}  owner {}  {}",
        record.id.to_string().yellow().bold(),
        record.price,
        seller,
        record.owner,
        status
    );
}

fn render_config(config: &MarketConfig, format: &OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(config)? + "\n",
        OutputFormat::Text => config.to_toml_string()?,
    })
}

fn cmd_config(args: &MarketArgs, format: &OutputFormat) -> anyhow::Result<()> {
    print!("{}", render_config(&resolve_config(args)?, format)?);
    Ok(())
}
