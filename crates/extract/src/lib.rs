// Dataset/state reconciliation
//
// One linear pipeline: load the project archive, join labeling state onto
// the original dataset, attach the last model snapshot columns, optionally
// sort, and serialize. Everything non-trivial the archive contains
// (classifier output, rankings, probabilities) was computed by the review
// tool; this crate only reconciles it into one table.

mod error;
mod format;

pub use error::ExtractError;
pub use format::OutputFormat;

use std::path::{Path, PathBuf};

use revstate_io::{csv, dataset, xlsx};
use revstate_project::{ProjectArchive, StateStore};
use revstate_table::{Table, Value};

/// Strategy identifier columns dropped from the ranking snapshot before the
/// join. They describe the model iteration, not the record, and collide
/// with the labeling table's columns of the same name.
const RANKING_DROP: &[&str] = &[
    "classifier",
    "query_strategy",
    "balance_strategy",
    "feature_extraction",
    "time",
];

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Where to write the merged table; `None` returns it in memory only.
    pub output: Option<PathBuf>,
    /// Explicit output format; inferred from the output extension when
    /// absent, falling back to xlsx.
    pub format: Option<OutputFormat>,
    /// Surface training-set rows before unlabeled/held-out rows.
    pub sort_by_training: bool,
    /// Suppress progress lines on stdout.
    pub quiet: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DescribeOptions {
    pub output: Option<PathBuf>,
    /// Inferred from the output extension when absent, falling back to csv.
    pub format: Option<OutputFormat>,
    pub quiet: bool,
}

/// Merge a project archive's labeling state with its original dataset.
///
/// Left-joins on `record_id` in sequence: dataset, labeling table (with a
/// positional `labeling_order` column), last probabilities, last ranking.
/// Every dataset row survives; records never touched by the review come out
/// with Null state columns. The archive is read-only and all extraction
/// scratch space is removed on every exit path.
pub fn extract(project_path: &Path, options: &ExtractOptions) -> Result<Table, ExtractError> {
    // Resolve the format before any heavy work so a bad request fails
    // without touching the archive
    let format = resolve_format(options.format, options.output.as_deref(), OutputFormat::Xlsx);

    let archive = ProjectArchive::open(project_path)?;

    let dataset_path = archive.dataset_path();
    if !dataset_path.exists() {
        return Err(ExtractError::DatasetMissing(
            dataset_path.display().to_string(),
        ));
    }
    let dataset = dataset::load(&dataset_path).map_err(ExtractError::DatasetUnreadable)?;

    let state = StateStore::open(&archive.state_path()?)?;
    let mut labeling = state.labeling_table()?;
    let probabilities = state.last_probabilities()?;
    let mut ranking = state.last_ranking()?;

    // Row position in the labeling table is the order labels were applied
    labeling.add_index_column("labeling_order");
    labeling.drop_columns(&["notes"]);
    ranking.drop_columns(RANKING_DROP);

    let merged = dataset.left_join(&labeling, "record_id")?;
    let merged = merged.left_join(&probabilities, "record_id")?;
    let mut merged = merged.left_join(&ranking, "record_id")?;

    if options.sort_by_training {
        merged.sort_flagged_first("training_set");
    }

    if !options.quiet {
        println!("The state contains {} records.", labeling.n_rows());
        print!("{}", merged.preview(5));
        println!("The merged dataset contains {} records.", merged.n_rows());
    }

    if let Some(output) = &options.output {
        write_output(&merged, output, format)?;
    }

    Ok(merged)
}

/// Flatten project configuration plus model-settings metadata into a
/// two-column `(key, value)` table. Settings keys overlay config keys on
/// collision; nested values render as pretty JSON text.
pub fn describe(project_path: &Path, options: &DescribeOptions) -> Result<Table, ExtractError> {
    let format = resolve_format(options.format, options.output.as_deref(), OutputFormat::Csv);

    let archive = ProjectArchive::open(project_path)?;

    let mut combined = archive.config().as_map();
    for (key, value) in archive.settings_metadata()? {
        combined.insert(key, value);
    }

    let mut table = Table::new(vec!["key".into(), "value".into()]);
    for (key, value) in &combined {
        let rendered = flatten_value(value);
        if !options.quiet {
            println!("{key}: {rendered}");
        }
        table.push_row(vec![Value::Text(key.clone()), rendered])?;
    }

    if let Some(output) = &options.output {
        write_output(&table, output, format)?;
    }

    Ok(table)
}

fn resolve_format(
    explicit: Option<OutputFormat>,
    output: Option<&Path>,
    fallback: OutputFormat,
) -> OutputFormat {
    explicit
        .or_else(|| output.and_then(OutputFormat::from_extension))
        .unwrap_or(fallback)
}

fn write_output(table: &Table, path: &Path, format: OutputFormat) -> Result<(), ExtractError> {
    let result = match format {
        OutputFormat::Csv => csv::write(table, path),
        OutputFormat::Xlsx => xlsx::write(table, path),
    };
    result.map_err(|message| ExtractError::WriteFailure {
        path: path.display().to_string(),
        message,
    })
}

fn flatten_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                n.as_f64().map(Value::Float).unwrap_or(Value::Null)
            }
        }
        serde_json::Value::String(s) => Value::Text(s.clone()),
        nested => Value::Text(serde_json::to_string_pretty(nested).unwrap_or_default()),
    }
}
