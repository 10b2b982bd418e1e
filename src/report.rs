/*!
 * Reporting functionality for tokemon
 *
 * Renders token counts and model lists as console tables using the tabled
 * library, or as JSON.
 */

use serde_json::json;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::cache::CacheStats;
use crate::error::TokemonResult;
use crate::model::{Provider, TokenizerResponse};

/// Format of the report output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
    /// Pretty-printed JSON
    Json,
}

impl ReportFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            ReportFormat::Json
        } else {
            ReportFormat::ConsoleTable
        }
    }
}

/// Model listing to report
#[derive(Debug, Clone)]
pub struct ModelsReport<'a> {
    pub provider: Provider,
    pub models: &'a [String],
    pub cache: CacheStats,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    key: String,

    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "#")]
    index: usize,

    #[tabled(rename = "Model")]
    model: String,
}

/// Report generator for counts and model lists
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    fn style(table: &mut Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    /// Render a token count
    pub fn count_report(&self, response: &TokenizerResponse) -> TokemonResult<String> {
        match self.format {
            ReportFormat::Json => Ok(serde_json::to_string_pretty(response)?),
            ReportFormat::ConsoleTable => {
                let tokens = match response.input_tokens {
                    Some(tokens) if tokens >= 1_000 => {
                        format!("{} ({})", self.format_number(tokens), tokens)
                    }
                    Some(tokens) => tokens.to_string(),
                    None => "unknown".to_string(),
                };

                let rows = vec![
                    SummaryRow {
                        key: "Provider".to_string(),
                        value: response.provider.to_string(),
                    },
                    SummaryRow {
                        key: "Model".to_string(),
                        value: response.model.clone(),
                    },
                    SummaryRow {
                        key: "Input Tokens".to_string(),
                        value: tokens,
                    },
                ];

                Ok(Self::style(&mut Table::new(rows)))
            }
        }
    }

    /// Render a model listing
    pub fn models_report(&self, report: &ModelsReport<'_>) -> TokemonResult<String> {
        match self.format {
            ReportFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "provider": report.provider,
                "models": report.models,
            }))?),
            ReportFormat::ConsoleTable => {
                let rows: Vec<ModelRow> = report
                    .models
                    .iter()
                    .enumerate()
                    .map(|(i, model)| ModelRow {
                        index: i + 1,
                        model: model.clone(),
                    })
                    .collect();

                let models_table = Self::style(&mut Table::new(rows));
                let summary_table = Self::style(&mut Table::new(self.models_summary(report)));

                Ok(format!(
                    "{} MODELS\n{}\n\n{}",
                    report.provider.as_str().to_uppercase(),
                    models_table,
                    summary_table
                ))
            }
        }
    }

    fn models_summary(&self, report: &ModelsReport<'_>) -> Vec<SummaryRow> {
        let mut rows = vec![SummaryRow {
            key: "Models".to_string(),
            value: self.format_number(report.models.len()),
        }];

        let total = report.cache.hits + report.cache.misses;
        if total > 0 {
            rows.push(SummaryRow {
                key: "Cache Hit Rate".to_string(),
                value: format!(
                    "{:.1}% ({} hits / {} total)",
                    (report.cache.hits as f64 / total as f64) * 100.0,
                    report.cache.hits,
                    total
                ),
            });
        }

        rows
    }
}
