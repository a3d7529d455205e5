//! Process command - run one invoice through the matching pipeline.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use apmatch_core::{ApMatchConfig, Pipeline, PipelineState};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    #[command(flatten)]
    sources: SourceArgs,
}

/// Data source overrides shared by `process` and `batch`.
#[derive(Args)]
pub struct SourceArgs {
    /// Fixture table of recorded invoices, used instead of reading documents
    #[arg(long)]
    fixtures: Option<PathBuf>,

    /// Purchase orders JSON file
    #[arg(short, long)]
    purchase_orders: Option<PathBuf>,
}

impl SourceArgs {
    /// Apply the overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut ApMatchConfig) {
        if let Some(fixtures) = &self.fixtures {
            config.extraction.fixtures = Some(fixtures.clone());
        }
        if let Some(path) = &self.purchase_orders {
            config.purchase_orders.path = path.clone();
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.sources.apply(&mut config);

    // Fixture tables are keyed by name, so the document need not exist
    if config.extraction.fixtures.is_none() && !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pipeline = Pipeline::from_config(&config)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Matching {}...", args.input.display()));

    let state = pipeline.run(&args.input);
    pb.finish_and_clear();
    let state = state?;

    let output = format_state(&state, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a pipeline result in the requested format.
pub fn format_state(state: &PipelineState, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(state.to_json()?),
        OutputFormat::Csv => format_csv(state),
        OutputFormat::Text => Ok(format_text(state)),
    }
}

fn format_csv(state: &PipelineState) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "source",
        "invoice_number",
        "supplier",
        "invoice_total",
        "currency",
        "matched_po",
        "match_method",
        "match_confidence",
        "extraction_confidence",
        "discrepancies",
        "variance_percentage",
        "recommended_action",
        "reasoning",
    ])?;

    let invoice = state.extracted_invoice.as_ref();
    let variance = state
        .discrepancies
        .iter()
        .find_map(|d| d.variance_percentage)
        .map(|v| v.to_string())
        .unwrap_or_default();
    let method = state
        .match_method
        .and_then(|m| serde_json::to_value(m).ok())
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();

    wtr.write_record([
        state.source.as_str(),
        invoice.map(|i| i.invoice_number.as_str()).unwrap_or_default(),
        invoice.map(|i| i.supplier.as_str()).unwrap_or_default(),
        &invoice.map(|i| i.total.to_string()).unwrap_or_default(),
        invoice.map(|i| i.currency.as_str()).unwrap_or_default(),
        state.matched_po.as_ref().map(|po| po.label()).unwrap_or_default(),
        &method,
        &format!("{:.2}", state.po_match_confidence),
        &format!("{:.2}", state.extraction_confidence),
        &discrepancy_list(state),
        &variance,
        state
            .recommended_action
            .map(|a| a.as_str())
            .unwrap_or_default(),
        state.agent_reasoning.as_deref().unwrap_or_default(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(state: &PipelineState) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", state.source));

    if let Some(invoice) = &state.extracted_invoice {
        output.push_str(&format!("Invoice: {}\n", invoice.invoice_number));
        output.push_str(&format!("Supplier: {}\n", invoice.supplier));
        if let Some(date) = invoice.invoice_date {
            output.push_str(&format!("Date: {}\n", date));
        }
        output.push_str(&format!("Total: {} {}\n", invoice.total, invoice.currency));
        output.push_str(&format!(
            "Extraction confidence: {:.1}%\n",
            state.extraction_confidence * 100.0
        ));
    }
    if let Some(reasoning) = &state.extraction_reasoning {
        output.push_str(&format!("Extraction: {}\n", reasoning));
    }
    for warning in &state.extraction_warnings {
        output.push_str(&format!("  ! {}\n", warning));
    }
    output.push('\n');

    match &state.matched_po {
        Some(po) => output.push_str(&format!(
            "Matched PO: {} (total {}, confidence {:.2})\n",
            po.label(),
            po.total,
            state.po_match_confidence
        )),
        None => output.push_str("Matched PO: none\n"),
    }

    if state.discrepancies.is_empty() {
        output.push_str("Discrepancies: none\n");
    } else {
        output.push_str("Discrepancies:\n");
        for d in &state.discrepancies {
            output.push_str(&format!("  - [{:?}] {}: {}", d.severity, d.kind.as_str(), d.details));
            if let Some(variance) = d.variance_percentage {
                output.push_str(&format!(" ({}%)", variance));
            }
            output.push('\n');
        }
    }
    output.push('\n');

    if let Some(action) = state.recommended_action {
        output.push_str(&format!("Recommended action: {}\n", action.as_str()));
    }
    if let Some(reasoning) = &state.agent_reasoning {
        output.push_str(&format!("Reasoning: {}\n", reasoning));
    }

    output
}

/// Discrepancy kinds joined with `;`.
pub fn discrepancy_list(state: &PipelineState) -> String {
    state
        .discrepancies
        .iter()
        .map(|d| d.kind.as_str())
        .collect::<Vec<_>>()
        .join(";")
}
