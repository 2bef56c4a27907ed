use std::fs::File;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::application::{LedgerService, PeriodView};
use crate::domain::{
    Category, Granularity, Period, TransactionKind, ValidationError, format_cents, parse_cents,
};
use crate::io::Exporter;
use crate::storage::CsvWorkbook;

/// Duit - Personal Budget Tracker
#[derive(Parser)]
#[command(name = "duit")]
#[command(about = "A spreadsheet-backed personal budget tracker for the command line")]
#[command(version)]
pub struct Cli {
    /// Workbook directory path
    #[arg(short, long, default_value = "budget_data")]
    pub workbook: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the workbook with its category sheets
    Init,

    /// Record an income entry
    Income {
        /// Income source (e.g. "Salary", "Freelance")
        source: String,

        /// Amount (e.g. "3000.00" or "3000")
        amount: String,

        /// Date of the entry (ISO 8601 format: YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Record an expense entry
    Expense {
        /// Description (e.g. "Lunch", "Fuel")
        description: String,

        /// Category: food, transport, utilities, shopping, housing, other
        category: String,

        /// Amount (e.g. "12.50" or "12")
        amount: String,

        /// Date of the entry (ISO 8601 format: YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List entries of one kind with their current positions
    List {
        /// Entry kind: income or expense
        kind: String,
    },

    /// Delete an entry by its current position
    ///
    /// Positions come from `list` and shift after every delete, so list
    /// again before deleting again.
    Delete {
        /// Entry kind: income or expense
        kind: String,

        /// Zero-based position from the latest `list`
        position: usize,
    },

    /// List the periods that have data, most recent first
    Periods {
        /// Granularity: month or year
        #[arg(short, long, default_value = "month")]
        granularity: String,
    },

    /// Show totals, balance and entries for one period
    View {
        /// Period to show (YYYY-MM or YYYY, defaults to the most recent)
        period: Option<String>,

        /// Granularity used when no period is given: month or year
        #[arg(short, long, default_value = "month")]
        granularity: String,

        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Export entries of one kind as CSV
    Export {
        /// Entry kind: income or expense
        kind: String,

        /// Restrict to a period (YYYY-MM or YYYY, omit for all entries)
        period: Option<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    fn service(&self) -> Result<LedgerService<CsvWorkbook>> {
        let workbook = CsvWorkbook::open(&self.workbook)?;
        Ok(LedgerService::new(workbook))
    }

    pub async fn run(self) -> Result<()> {
        match &self.command {
            Commands::Init => {
                CsvWorkbook::init(&self.workbook)?;
                println!("Workbook initialized: {}", self.workbook);
            }

            Commands::Income {
                source,
                amount,
                date,
            } => {
                let service = self.service()?;
                let amount_cents =
                    parse_cents(amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let date = parse_date_arg(date.as_deref())?;

                let position = service.record_income(date, source, amount_cents).await?;
                println!(
                    "Saved income: {} from {} ({}, position {})",
                    format_cents(amount_cents),
                    source,
                    date,
                    position
                );
            }

            Commands::Expense {
                description,
                category,
                amount,
                date,
            } => {
                let service = self.service()?;
                let category = Category::from_str(category)
                    .ok_or_else(|| ValidationError::UnknownCategory(category.clone()))?;
                let amount_cents =
                    parse_cents(amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let date = parse_date_arg(date.as_deref())?;

                let position = service
                    .record_expense(date, description, category, amount_cents)
                    .await?;
                println!(
                    "Saved expense: {} ({}, {}, position {})",
                    description,
                    format_cents(amount_cents),
                    category,
                    position
                );
            }

            Commands::List { kind } => {
                let service = self.service()?;
                let kind = parse_kind(kind)?;
                run_list_command(&service, kind).await?;
            }

            Commands::Delete { kind, position } => {
                let service = self.service()?;
                let kind = parse_kind(kind)?;
                service.remove_transaction(kind, *position).await?;
                println!("Deleted {} entry at position {}", kind, position);
            }

            Commands::Periods { granularity } => {
                let service = self.service()?;
                let granularity = parse_granularity(granularity)?;
                let periods = service.list_periods(granularity).await?;
                if periods.is_empty() {
                    println!("No data available yet. Add some entries!");
                }
                for period in periods {
                    println!("{period}");
                }
            }

            Commands::View {
                period,
                granularity,
                json,
            } => {
                let service = self.service()?;
                let granularity = parse_granularity(granularity)?;
                let period = match period {
                    Some(raw) => raw
                        .parse::<Period>()
                        .with_context(|| format!("Invalid period '{raw}'"))?,
                    None => match service.list_periods(granularity).await?.into_iter().next() {
                        Some(latest) => latest,
                        None => {
                            println!("No data available yet. Add some entries!");
                            return Ok(());
                        }
                    },
                };

                let view = service.get_view(period).await?;
                if *json {
                    println!("{}", serde_json::to_string_pretty(&view)?);
                } else {
                    print_view(&view);
                }
            }

            Commands::Export {
                kind,
                period,
                output,
            } => {
                let service = self.service()?;
                let kind = parse_kind(kind)?;
                let period = period
                    .as_deref()
                    .map(|raw| {
                        raw.parse::<Period>()
                            .with_context(|| format!("Invalid period '{raw}'"))
                    })
                    .transpose()?;

                let exporter = Exporter::new(&service);
                match output {
                    Some(path) => {
                        let file = File::create(path)
                            .with_context(|| format!("Cannot create '{path}'"))?;
                        let count = exporter.export_csv(kind, period, file).await?;
                        println!("Exported {count} {kind} entries to {path}");
                    }
                    None => {
                        let stdout = std::io::stdout();
                        exporter.export_csv(kind, period, stdout.lock()).await?;
                    }
                }
            }
        }

        Ok(())
    }
}

async fn run_list_command(
    service: &LedgerService<CsvWorkbook>,
    kind: TransactionKind,
) -> Result<()> {
    let (expenses, incomes) = service.transactions().await?;
    match kind {
        TransactionKind::Expense => {
            if expenses.is_empty() {
                println!("No expenses recorded.");
            }
            for (position, entry) in expenses.iter().enumerate() {
                println!(
                    "[{position}] {} | {} | {} | {}",
                    date_label(entry.date),
                    entry.category,
                    entry.description,
                    format_cents(entry.amount_cents)
                );
            }
        }
        TransactionKind::Income => {
            if incomes.is_empty() {
                println!("No income recorded.");
            }
            for (position, entry) in incomes.iter().enumerate() {
                println!(
                    "[{position}] {} | {} | {}",
                    date_label(entry.date),
                    entry.source,
                    format_cents(entry.amount_cents)
                );
            }
        }
    }
    Ok(())
}

fn print_view(view: &PeriodView) {
    println!("Period: {}", view.period);
    println!("  Total income:   {}", format_cents(view.total_income));
    println!("  Total expenses: {}", format_cents(view.total_expense));
    println!("  Balance:        {}", format_cents(view.balance));

    if !view.category_breakdown.is_empty() {
        println!("\nBy category:");
        for entry in &view.category_breakdown {
            println!("  {:<10} {}", entry.category, format_cents(entry.total_cents));
        }
    }

    println!("\nExpenses:");
    if view.expenses.is_empty() {
        println!("  No expenses found for this period.");
    }
    for entry in &view.expenses {
        println!(
            "  {} | {} | {} | {}",
            date_label(entry.date),
            entry.category,
            entry.description,
            format_cents(entry.amount_cents)
        );
    }

    println!("\nIncome:");
    if view.incomes.is_empty() {
        println!("  No income found for this period.");
    }
    for entry in &view.incomes {
        println!(
            "  {} | {} | {}",
            date_label(entry.date),
            entry.source,
            format_cents(entry.amount_cents)
        );
    }
}

fn date_label(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "no date".to_string())
}

fn parse_date_arg(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid date format '{raw}'. Use YYYY-MM-DD")),
        None => Ok(Local::now().date_naive()),
    }
}

fn parse_kind(raw: &str) -> Result<TransactionKind> {
    TransactionKind::from_str(raw)
        .with_context(|| format!("Unknown kind '{raw}'. Use 'income' or 'expense'"))
}

fn parse_granularity(raw: &str) -> Result<Granularity> {
    Granularity::from_str(raw)
        .with_context(|| format!("Unknown granularity '{raw}'. Use 'month' or 'year'"))
}
