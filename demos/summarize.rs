use finpal::{DEFAULT_CATEGORY_FILE, DEFAULT_TOP_MERCHANTS, Direction, ImportBuilder, Session};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();

    let Some(statement) = args.get(1) else {
        eprintln!("usage: summarize <statement.csv> [categories.json]");
        return Ok(());
    };
    let categories = args.get(2).map(String::as_str).unwrap_or(DEFAULT_CATEGORY_FILE);

    let mut session = Session::open(categories)?;
    let skipped = session.import(ImportBuilder::new().filename(statement))?;

    for error in skipped {
        println!("Skipped {}", error);
    }

    let aggregator = session.aggregator();
    let totals = aggregator.total_by_direction();

    println!("Found {} transactions\n", session.transactions().len());
    println!("Total expenses (Debit):  {:.2} CAD", totals.debit);
    println!("Total payments (Credit): {:.2} CAD", totals.credit);
    println!("Net cash flow:           {:.2} CAD\n", totals.net_cash_flow());

    println!("Expenses by category:");
    for total in aggregator.totals_by_category(Direction::Debit) {
        println!("  {:<24} {:>12.2}", total.category, total.amount);
    }

    println!("\nTop {} expense merchants:", DEFAULT_TOP_MERCHANTS);
    for merchant in aggregator.top_merchants(DEFAULT_TOP_MERCHANTS, Direction::Debit) {
        println!("  {:<40} {:>12.2}", merchant.details, merchant.amount);
    }

    println!("\nMonthly expenses:");
    for (month, amount) in aggregator.monthly_series(Direction::Debit) {
        println!("  {}  {:>12.2}", month, amount);
    }

    Ok(())
}
