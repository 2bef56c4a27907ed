use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;

use crate::application::LedgerService;
use crate::domain::{Period, TransactionKind, filter_by_period, format_cents};
use crate::storage::RowStore;

/// Exporter for serializing ledger slices to CSV.
pub struct Exporter<'a, S> {
    service: &'a LedgerService<S>,
}

impl<'a, S: RowStore> Exporter<'a, S> {
    pub fn new(service: &'a LedgerService<S>) -> Self {
        Self { service }
    }

    /// Export one kind's transactions to CSV, optionally restricted to a
    /// period. The header matches the kind's sheet schema and rows keep
    /// their stored order. Returns the number of data rows written.
    pub async fn export_csv<W: Write>(
        &self,
        kind: TransactionKind,
        period: Option<Period>,
        writer: W,
    ) -> Result<usize> {
        let (expenses, incomes) = self.service.transactions().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(kind.header())?;

        let mut count = 0;
        match kind {
            TransactionKind::Expense => {
                let rows = match period {
                    Some(period) => filter_by_period(&expenses, period),
                    None => expenses,
                };
                for entry in &rows {
                    csv_writer.write_record(&[
                        date_cell(entry.date),
                        entry.description.clone(),
                        entry.category.as_str().to_string(),
                        format_cents(entry.amount_cents),
                    ])?;
                    count += 1;
                }
            }
            TransactionKind::Income => {
                let rows = match period {
                    Some(period) => filter_by_period(&incomes, period),
                    None => incomes,
                };
                for entry in &rows {
                    csv_writer.write_record(&[
                        date_cell(entry.date),
                        entry.source.clone(),
                        format_cents(entry.amount_cents),
                    ])?;
                    count += 1;
                }
            }
        }

        csv_writer.flush()?;
        Ok(count)
    }
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}
