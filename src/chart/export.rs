#[cfg(test)]
#[path = "export_test.rs"]
mod tests;

use std::path::Path;

use eyre::{Context, Result};
use serde_json::Value;

use crate::models::QueryResult;

pub const EXPORT_FILE_NAME: &str = "query_results.csv";

/// Renders the result as CSV: one header line with the column names, then one
/// line per row.
pub fn to_csv(result: &QueryResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    write_result(&mut writer, result)?;
    let bytes = writer
        .into_inner()
        .map_err(|err| eyre::eyre!("flushing csv output: {}", err.error()))?;
    String::from_utf8(bytes).wrap_err("csv output is not valid utf-8")
}

pub fn write_csv(result: &QueryResult, path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).wrap_err(format!("creating {}", path.display()))?;
    write_result(&mut writer, result)?;
    writer.flush().wrap_err(format!("writing {}", path.display()))
}

fn write_result<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    result: &QueryResult,
) -> Result<()> {
    writer
        .write_record(result.columns())
        .wrap_err("writing csv header")?;
    for row in result.rows() {
        writer
            .write_record(row.iter().map(field))
            .wrap_err("writing csv row")?;
    }
    Ok(())
}

fn field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
