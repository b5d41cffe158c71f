use crate::config::OutputFormat;
use crate::core::engine::CardEngine;
use crate::core::keystroke::UNKNOWN_NETWORK;
use crate::domain::model::CardCheck;
use crate::domain::ports::Clock;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use serde::Serialize;
use std::io::{Read, Write};

/// CSV layout of a batch input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSettings {
    pub delimiter: u8,
    pub has_headers: bool,
    pub number_column: String,
    pub expiry_column: Option<String>,
    pub cvc_column: Option<String>,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            number_column: "number".to_string(),
            expiry_column: Some("expiry".to_string()),
            cvc_column: Some("cvc".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    pub line: u64,
    pub number: String,
    pub expiry: Option<String>,
    pub cvc: Option<String>,
}

/// One report line. Carries the last four digits only, never the number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRecord {
    pub line: u64,
    pub network: String,
    pub last_four: String,
    pub number_valid: bool,
    pub expiry: Option<String>,
    pub expiry_valid: Option<bool>,
    pub cvc_valid: Option<bool>,
    pub valid: bool,
}

impl BatchRecord {
    fn from_check(line: u64, check: CardCheck) -> Self {
        let valid = check.is_valid();
        Self {
            line,
            network: check.network.unwrap_or_else(|| UNKNOWN_NETWORK.to_string()),
            last_four: check.last_four,
            number_valid: check.number_valid,
            expiry: check.formatted_expiry,
            expiry_valid: check.expiry_valid,
            cvc_valid: check.cvc_valid,
            valid,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub rows: usize,
    pub valid: usize,
    pub invalid: usize,
}

struct ColumnIndexes {
    number: usize,
    expiry: Option<usize>,
    cvc: Option<usize>,
}

pub struct BatchChecker<C: Clock> {
    engine: CardEngine<C>,
    settings: BatchSettings,
}

impl<C: Clock> BatchChecker<C> {
    pub fn new(engine: CardEngine<C>, settings: BatchSettings) -> Self {
        Self { engine, settings }
    }

    /// Reads rows; extra columns are ignored and short rows leave the
    /// missing fields empty.
    pub fn read_rows<R: Read>(&self, reader: R) -> Result<Vec<BatchRow>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.settings.delimiter)
            .has_headers(self.settings.has_headers)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = self.resolve_columns(&mut csv_reader)?;
        let mut rows = Vec::new();

        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map_or(index as u64 + 1, |position| position.line());
            let field = |column: Option<usize>| {
                column
                    .and_then(|i| record.get(i))
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            };

            rows.push(BatchRow {
                line,
                number: record.get(columns.number).unwrap_or_default().to_string(),
                expiry: field(columns.expiry),
                cvc: field(columns.cvc),
            });
        }

        tracing::debug!("Read {} rows from batch input", rows.len());
        Ok(rows)
    }

    pub fn check_rows(&self, rows: &[BatchRow]) -> Vec<BatchRecord> {
        rows.iter()
            .map(|row| {
                let check =
                    self.engine
                        .check(&row.number, row.expiry.as_deref(), row.cvc.as_deref());
                BatchRecord::from_check(row.line, check)
            })
            .collect()
    }

    /// Writes the report as CSV (text) or a JSON array.
    pub fn write_report<W: Write>(
        &self,
        records: &[BatchRecord],
        format: OutputFormat,
        mut writer: W,
    ) -> Result<()> {
        match format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, records)?;
                writeln!(writer)?;
                writer.flush()?;
            }
            OutputFormat::Text => {
                let mut csv_writer = csv::WriterBuilder::new()
                    .delimiter(self.settings.delimiter)
                    .from_writer(writer);
                for record in records {
                    csv_writer.serialize(record)?;
                }
                csv_writer.flush()?;
            }
        }
        Ok(())
    }

    pub fn run<R: Read, W: Write>(
        &self,
        reader: R,
        writer: W,
        format: OutputFormat,
    ) -> Result<BatchSummary> {
        // 讀取 -> 檢查 -> 輸出
        let rows = self.read_rows(reader)?;
        let records = self.check_rows(&rows);
        self.write_report(&records, format, writer)?;

        let valid = records.iter().filter(|r| r.valid).count();
        let summary = BatchSummary {
            rows: records.len(),
            valid,
            invalid: records.len() - valid,
        };

        tracing::info!(
            "✅ Checked {} rows: {} valid, {} invalid",
            summary.rows,
            summary.valid,
            summary.invalid
        );
        if summary.invalid > 0 {
            tracing::warn!("⚠️ {} rows failed validation", summary.invalid);
        }

        Ok(summary)
    }

    fn resolve_columns<R: Read>(&self, reader: &mut csv::Reader<R>) -> Result<ColumnIndexes> {
        if !self.settings.has_headers {
            // 無標題列時依序為 number, expiry, cvc
            return Ok(ColumnIndexes {
                number: 0,
                expiry: Some(1),
                cvc: Some(2),
            });
        }

        let headers = reader.headers()?.clone();
        let position = |name: &str| headers.iter().position(|header| header == name);

        let number = position(self.settings.number_column.as_str());
        let number = *validate_required_field(
            &format!("batch.number_column ({})", self.settings.number_column),
            &number,
        )?;

        Ok(ColumnIndexes {
            number,
            expiry: self.settings.expiry_column.as_deref().and_then(position),
            cvc: self.settings.cvc_column.as_deref().and_then(position),
        })
    }
}
