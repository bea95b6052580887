use std::path::Path;

use anyhow::Context;
use jobmap_core::ImportTable;

/// Read an import table, choosing the format by file extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid table.
pub(crate) fn read_import_table(path: &Path) -> anyhow::Result<ImportTable> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_import_table(path, &raw)
}

pub(crate) fn parse_import_table(path: &Path, raw: &str) -> anyhow::Result<ImportTable> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        ImportTable::from_json_str(raw).with_context(|| format!("parsing {}", path.display()))
    } else {
        Ok(ImportTable::from_tsv_str(raw))
    }
}
