//! Parquet report writer

use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray, TimestampMicrosecondArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::parlay::ParlayResult;
use crate::pricing::{BinaryPricing, LinePricing, Note};
use crate::risk::SidePricing;

fn timestamp_field() -> Field {
    Field::new(
        "timestamp",
        DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
        false,
    )
}

fn key_fields() -> Vec<Field> {
    vec![
        timestamp_field(),
        Field::new("run_id", DataType::Utf8, false),
        Field::new("game_id", DataType::Utf8, false),
        Field::new("player", DataType::Utf8, false),
        Field::new("team", DataType::Utf8, false),
        Field::new("market", DataType::Utf8, false),
        Field::new("book", DataType::Utf8, true),
    ]
}

/// Continuous-line evaluation schema
pub fn line_eval_schema() -> Schema {
    let mut fields = key_fields();
    fields.extend([
        Field::new("line", DataType::Float64, false),
        Field::new("line_kind", DataType::Utf8, false),
        Field::new("adjusted_mean", DataType::Float64, false),
        Field::new("adjusted_sd", DataType::Float64, false),
    ]);
    for side in ["over", "under"] {
        fields.extend([
            Field::new(format!("price_{}", side), DataType::Float64, true),
            Field::new(format!("p_{}", side), DataType::Float64, false),
            Field::new(format!("fair_{}", side), DataType::Int32, false),
            Field::new(format!("implied_{}", side), DataType::Float64, true),
            Field::new(format!("edge_pct_{}", side), DataType::Float64, true),
            Field::new(format!("ev_{}", side), DataType::Float64, true),
            Field::new(format!("kelly_{}", side), DataType::Float64, false),
        ]);
    }
    fields.extend([
        Field::new("no_vig_over", DataType::Float64, true),
        Field::new("pick", DataType::Utf8, true),
        // Decimal stake as text to keep exact cents
        Field::new("stake", DataType::Utf8, true),
        Field::new("recommendation", DataType::Utf8, false),
        Field::new("bet", DataType::Utf8, false),
        Field::new("notes", DataType::Utf8, false),
    ]);
    Schema::new(fields)
}

/// Anytime touchdown evaluation schema
pub fn td_eval_schema() -> Schema {
    let mut fields = key_fields();
    fields.extend([
        Field::new("team_td_rate", DataType::Float64, false),
        Field::new("player_share", DataType::Float64, false),
        Field::new("p_yes", DataType::Float64, false),
        Field::new("fair_yes", DataType::Int32, false),
        Field::new("price_yes", DataType::Float64, true),
        Field::new("implied_yes", DataType::Float64, true),
        Field::new("edge_pct", DataType::Float64, true),
        Field::new("ev", DataType::Float64, true),
        Field::new("kelly", DataType::Float64, false),
        Field::new("stake", DataType::Utf8, true),
        Field::new("recommendation", DataType::Utf8, false),
        Field::new("bet", DataType::Utf8, false),
        Field::new("notes", DataType::Utf8, false),
    ]);
    Schema::new(fields)
}

/// Parlay result schema
pub fn parlay_schema() -> Schema {
    Schema::new(vec![
        timestamp_field(),
        Field::new("run_id", DataType::Utf8, false),
        Field::new("bucket", DataType::Utf8, false),
        Field::new("legs", DataType::UInt32, false),
        Field::new("description", DataType::Utf8, false),
        Field::new("probability", DataType::Float64, false),
        Field::new("decimal_odds", DataType::Float64, false),
        Field::new("ev", DataType::Float64, false),
    ])
}

fn strings<T: AsRef<str>>(values: impl IntoIterator<Item = T>) -> ArrayRef {
    let values: Vec<String> = values.into_iter().map(|v| v.as_ref().to_string()).collect();
    Arc::new(StringArray::from(values))
}

fn optional_strings(values: impl IntoIterator<Item = Option<String>>) -> ArrayRef {
    Arc::new(StringArray::from(values.into_iter().collect::<Vec<_>>()))
}

fn floats(values: impl IntoIterator<Item = f64>) -> ArrayRef {
    Arc::new(Float64Array::from(values.into_iter().collect::<Vec<_>>()))
}

fn optional_floats(values: impl IntoIterator<Item = Option<f64>>) -> ArrayRef {
    Arc::new(Float64Array::from(values.into_iter().collect::<Vec<_>>()))
}

fn ints(values: impl IntoIterator<Item = i32>) -> ArrayRef {
    Arc::new(Int32Array::from(values.into_iter().collect::<Vec<_>>()))
}

fn side_columns(sides: &[&SidePricing]) -> [ArrayRef; 7] {
    [
        optional_floats(sides.iter().map(|s| s.price)),
        floats(sides.iter().map(|s| s.probability)),
        ints(sides.iter().map(|s| s.fair_odds)),
        optional_floats(sides.iter().map(|s| s.implied)),
        optional_floats(sides.iter().map(|s| s.edge_pct())),
        optional_floats(sides.iter().map(|s| s.ev)),
        floats(sides.iter().map(|s| s.kelly)),
    ]
}

/// Writes one run's tables into the output folder.
///
/// Every file carries the run timestamp in its name, and every table is
/// written even when it has no rows so downstream readers always find it.
pub struct ReportWriter {
    output_dir: PathBuf,
    run_id: Uuid,
    generated_at: DateTime<Utc>,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>, run_id: Uuid, generated_at: DateTime<Utc>) -> Self {
        Self {
            output_dir: output_dir.into(),
            run_id,
            generated_at,
        }
    }

    /// Ensure output directory exists
    pub fn ensure_dir(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Path for `<prefix>_<YYYYmmdd_HHMMSS>_<run8>.<ext>`, where `run8` is
    /// the first eight hex digits of the run id
    pub fn file_path(&self, prefix: &str, ext: &str) -> PathBuf {
        let run = self.run_id.simple().to_string();
        let filename = format!(
            "{}_{}_{}.{}",
            prefix,
            self.generated_at.format("%Y%m%d_%H%M%S"),
            &run[..8],
            ext
        );
        self.output_dir.join(filename)
    }

    fn run_columns(&self, rows: usize) -> Vec<ArrayRef> {
        let ts = self.generated_at.timestamp_micros();
        vec![
            Arc::new(TimestampMicrosecondArray::from(vec![ts; rows]).with_timezone("UTC")) as ArrayRef,
            strings(std::iter::repeat(self.run_id.to_string()).take(rows)),
        ]
    }

    fn write_batch(&self, path: &Path, schema: Arc<Schema>, columns: Vec<ArrayRef>) -> anyhow::Result<()> {
        self.ensure_dir()?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        let batch = RecordBatch::try_new(schema, columns)?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }

    /// Write priced over/under lines to `line_eval_<ts>.parquet`
    pub fn write_lines(&self, lines: &[&LinePricing]) -> anyhow::Result<PathBuf> {
        let path = self.file_path("line_eval", "parquet");
        let mut columns = self.run_columns(lines.len());

        columns.extend([
            strings(lines.iter().map(|l| &l.key.game_id)),
            strings(lines.iter().map(|l| &l.key.player)),
            strings(lines.iter().map(|l| &l.key.team)),
            strings(lines.iter().map(|l| l.key.market.as_str())),
            optional_strings(lines.iter().map(|l| l.key.book.clone())),
            floats(lines.iter().map(|l| l.line)),
            strings(lines.iter().map(|l| l.line_kind.as_str())),
            floats(lines.iter().map(|l| l.adjusted_mean)),
            floats(lines.iter().map(|l| l.adjusted_sd)),
        ]);
        let overs: Vec<&SidePricing> = lines.iter().map(|l| &l.over).collect();
        let unders: Vec<&SidePricing> = lines.iter().map(|l| &l.under).collect();
        columns.extend(side_columns(&overs));
        columns.extend(side_columns(&unders));
        columns.extend([
            optional_floats(lines.iter().map(|l| l.no_vig_over)),
            optional_strings(lines.iter().map(|l| l.pick.map(|s| s.to_string()))),
            optional_strings(
                lines
                    .iter()
                    .map(|l| l.picked().and_then(|s| s.stake).map(|d| d.to_string())),
            ),
            strings(lines.iter().map(|l| l.recommendation.as_str())),
            strings(lines.iter().map(|l| l.bet_label())),
            strings(lines.iter().map(|l| Note::join(&l.notes))),
        ]);

        self.write_batch(&path, Arc::new(line_eval_schema()), columns)?;
        tracing::debug!(path = ?path, count = lines.len(), "Wrote line evaluations to Parquet");
        Ok(path)
    }

    /// Write priced anytime touchdowns to `td_eval_<ts>.parquet`
    pub fn write_touchdowns(&self, rows: &[&BinaryPricing]) -> anyhow::Result<PathBuf> {
        let path = self.file_path("td_eval", "parquet");
        let mut columns = self.run_columns(rows.len());

        columns.extend([
            strings(rows.iter().map(|r| &r.key.game_id)),
            strings(rows.iter().map(|r| &r.key.player)),
            strings(rows.iter().map(|r| &r.key.team)),
            strings(rows.iter().map(|r| r.key.market.as_str())),
            optional_strings(rows.iter().map(|r| r.key.book.clone())),
            floats(rows.iter().map(|r| r.team_td_rate)),
            floats(rows.iter().map(|r| r.player_share)),
            floats(rows.iter().map(|r| r.p_yes)),
            ints(rows.iter().map(|r| r.yes.fair_odds)),
            optional_floats(rows.iter().map(|r| r.yes.price)),
            optional_floats(rows.iter().map(|r| r.yes.implied)),
            optional_floats(rows.iter().map(|r| r.yes.edge_pct())),
            optional_floats(rows.iter().map(|r| r.yes.ev)),
            floats(rows.iter().map(|r| r.yes.kelly)),
            optional_strings(rows.iter().map(|r| r.yes.stake.map(|d| d.to_string()))),
            strings(rows.iter().map(|r| r.recommendation.as_str())),
            strings(rows.iter().map(|r| r.bet_label())),
            strings(rows.iter().map(|r| Note::join(&r.notes))),
        ]);

        self.write_batch(&path, Arc::new(td_eval_schema()), columns)?;
        tracing::debug!(path = ?path, count = rows.len(), "Wrote touchdown evaluations to Parquet");
        Ok(path)
    }

    /// Write parlay results to `parlays_<ts>.parquet`
    pub fn write_parlays(&self, parlays: &[ParlayResult]) -> anyhow::Result<PathBuf> {
        let path = self.file_path("parlays", "parquet");
        let mut columns = self.run_columns(parlays.len());

        columns.extend([
            strings(parlays.iter().map(|p| &p.bucket)),
            Arc::new(UInt32Array::from(
                parlays.iter().map(|p| p.legs.len() as u32).collect::<Vec<_>>(),
            )) as ArrayRef,
            strings(parlays.iter().map(|p| p.describe())),
            floats(parlays.iter().map(|p| p.probability)),
            floats(parlays.iter().map(|p| p.decimal_odds)),
            floats(parlays.iter().map(|p| p.ev)),
        ]);

        self.write_batch(&path, Arc::new(parlay_schema()), columns)?;
        tracing::debug!(path = ?path, count = parlays.len(), "Wrote parlays to Parquet");
        Ok(path)
    }
}
