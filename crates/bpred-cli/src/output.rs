//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use bpred_domain::{FeatureVector, PredictionOutcome};
use bpred_gatekeeper::{PredictionService, StructureCheck, StructureDescription};
use colored::{Color, Colorize};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Result of predicting one structure.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRow {
    /// Structure as given
    pub smiles: String,
    /// Prediction or rejection
    #[serde(flatten)]
    pub result: PredictionResult,
}

/// Prediction or rejection for one structure.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionResult {
    /// Boiling point predicted
    Predicted {
        /// Rounded Kelvin
        bp_pred: i64,
        /// Degrees Celsius
        bp_pred_celsius: f64,
        /// Caveats in evaluation order
        warnings: Vec<WarningRow>,
    },
    /// Input rejected
    Rejected {
        /// Reason code
        reason: &'static str,
        /// User-facing message
        message: String,
    },
}

/// One prediction caveat.
#[derive(Debug, Clone, Serialize)]
pub struct WarningRow {
    /// Warning code
    pub code: &'static str,
    /// User-facing explanation
    pub message: &'static str,
}

impl PredictionRow {
    /// Build a row from a service outcome.
    pub fn new(smiles: &str, outcome: &PredictionOutcome, service: &PredictionService) -> Self {
        let result = match outcome {
            PredictionOutcome::Success(report) => PredictionResult::Predicted {
                bp_pred: report.prediction.kelvin(),
                bp_pred_celsius: report.prediction.celsius(),
                warnings: report
                    .warnings
                    .iter()
                    .map(|w| WarningRow {
                        code: w.code.as_str(),
                        message: w.message,
                    })
                    .collect(),
            },
            PredictionOutcome::Rejected(reason) => PredictionResult::Rejected {
                reason: reason.as_str(),
                message: service.rejection_message(*reason),
            },
        };
        Self {
            smiles: smiles.to_string(),
            result,
        }
    }
}

/// Descriptors of one structure.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptionRow {
    /// Structure as given
    pub smiles: String,
    /// Molecular formula
    pub formula: String,
    /// Heavy atom count
    pub heavy_atoms: usize,
    /// Distinct elements
    pub elements: Vec<&'static str>,
    /// Elements outside the allowlist
    pub disallowed: Vec<&'static str>,
    /// Model features; `null` branch fraction means no carbon
    pub features: FeatureRow,
}

/// Model features with JSON-safe values.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureRow {
    /// Branch carbon fraction
    pub branch_fraction: Option<f64>,
    /// Hydrogen bond donors
    pub h_bond_donors: u32,
    /// Exact molecular weight
    pub mol_wt: f64,
    /// Aromatic rings
    pub rings_aromatic: u32,
}

impl From<&FeatureVector> for FeatureRow {
    fn from(features: &FeatureVector) -> Self {
        Self {
            branch_fraction: Some(features.branch_fraction).filter(|v| v.is_finite()),
            h_bond_donors: features.h_bond_donors,
            mol_wt: features.mol_wt,
            rings_aromatic: features.rings_aromatic,
        }
    }
}

impl DescriptionRow {
    /// Build a row from a structure description.
    pub fn new(smiles: &str, description: &StructureDescription) -> Self {
        Self {
            smiles: smiles.to_string(),
            formula: description.formula.clone(),
            heavy_atoms: description.heavy_atoms,
            elements: description.elements.clone(),
            disallowed: description.disallowed.clone(),
            features: FeatureRow::from(&description.features),
        }
    }
}

/// Parse and allowlist status of one structure.
#[derive(Debug, Clone, Serialize)]
pub struct CheckRow {
    /// Structure as given
    pub smiles: String,
    /// Parses as a valid molecule
    pub parses: bool,
    /// Passes the allowlist
    pub allowed: bool,
    /// Parser error or offending elements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckRow {
    /// Build a row from a structure check.
    pub fn new(smiles: &str, check: StructureCheck) -> Self {
        let detail = match (check.parse_error, check.disallowed.is_empty()) {
            (Some(error), _) => Some(error),
            (None, false) => Some(format!("disallowed: {}", check.disallowed.join(", "))),
            (None, true) => None,
        };
        Self {
            smiles: smiles.to_string(),
            parses: check.parses,
            allowed: check.allowed,
            detail,
        }
    }
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format prediction results.
    pub fn format_predictions(&self, rows: &[PredictionRow]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
            OutputFormat::Table => Ok(self.format_predictions_table(rows)),
        }
    }

    fn format_predictions_table(&self, rows: &[PredictionRow]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["SMILES", "Boiling point (K)", "(°C)", "Status"]);

        let mut notes = Vec::new();
        for row in rows {
            match &row.result {
                PredictionResult::Predicted {
                    bp_pred,
                    bp_pred_celsius,
                    warnings,
                } => {
                    let status = if warnings.is_empty() {
                        "ok".to_string()
                    } else {
                        format!("{} warning(s)", warnings.len())
                    };
                    builder.push_record([
                        row.smiles.clone(),
                        bp_pred.to_string(),
                        format!("{:.1}", bp_pred_celsius),
                        status,
                    ]);
                    for warning in warnings {
                        notes.push(self.warning(&format!("{}: {}", row.smiles, warning.message)));
                    }
                }
                PredictionResult::Rejected { reason, message } => {
                    builder.push_record([
                        row.smiles.clone(),
                        "-".to_string(),
                        "-".to_string(),
                        reason.to_string(),
                    ]);
                    notes.push(self.error(&format!("{}: {}", row.smiles, message)));
                }
            }
        }

        let mut output = self.render(builder);
        for note in notes {
            output.push('\n');
            output.push_str(&note);
        }
        output
    }

    /// Format a structure description.
    pub fn format_description(&self, row: &DescriptionRow) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(row)?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Property", "Value"]);
                let branch_fraction = row
                    .features
                    .branch_fraction
                    .map_or_else(|| "n/a".to_string(), |v| format!("{:.4}", v));
                let records = [
                    ("SMILES", row.smiles.clone()),
                    ("Formula", row.formula.clone()),
                    ("Heavy atoms", row.heavy_atoms.to_string()),
                    ("Elements", row.elements.join(", ")),
                    ("Branch fraction", branch_fraction),
                    ("H-bond donors", row.features.h_bond_donors.to_string()),
                    ("Exact mol. weight", format!("{:.4}", row.features.mol_wt)),
                    ("Aromatic rings", row.features.rings_aromatic.to_string()),
                ];
                for (name, value) in records {
                    builder.push_record([name.to_string(), value]);
                }

                let mut output = self.render(builder);
                if !row.disallowed.is_empty() {
                    output.push('\n');
                    output.push_str(&self.warning(&format!(
                        "Outside the allowlist: {}",
                        row.disallowed.join(", ")
                    )));
                }
                Ok(output)
            }
        }
    }

    /// Format structure checks.
    pub fn format_checks(&self, rows: &[CheckRow]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["SMILES", "Parses", "Allowed", "Detail"]);
                for row in rows {
                    builder.push_record([
                        row.smiles.clone(),
                        self.yes_no(row.parses),
                        self.yes_no(row.allowed),
                        row.detail.clone().unwrap_or_default(),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), Color::Red)
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), Color::Yellow)
    }

    fn yes_no(&self, value: bool) -> String {
        if value {
            self.colorize("yes", Color::Green)
        } else {
            self.colorize("no", Color::Red)
        }
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: Color) -> String {
        if self.color_enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}
