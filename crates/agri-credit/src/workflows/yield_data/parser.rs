use super::normalizer::normalize_header;
use super::schema::{ColumnRole, ResolvedSchema, SchemaMapping};
use super::{LoadError, YieldRecord};
use std::io::Read;

pub(crate) struct ParsedTable {
    pub(crate) columns: Vec<String>,
    pub(crate) schema: ResolvedSchema,
    pub(crate) records: Vec<YieldRecord>,
    pub(crate) skipped_rows: usize,
}

pub(crate) fn parse_table<R: Read>(
    reader: R,
    mapping: &SchemaMapping,
) -> Result<ParsedTable, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let schema = mapping
        .resolve(&columns)
        .map_err(|err| LoadError::MissingColumn {
            role: err.role,
            headers: err.headers,
        })?;

    let region_at = column_index(&schema, ColumnRole::Region);
    let crop_at = column_index(&schema, ColumnRole::Crop);
    let yield_at = column_index(&schema, ColumnRole::Yield);

    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for row in csv_reader.records() {
        let row = row?;
        let Some(yield_value) = row.get(yield_at).and_then(parse_yield) else {
            skipped_rows += 1;
            continue;
        };

        records.push(YieldRecord {
            region: row.get(region_at).unwrap_or_default().to_string(),
            crop: row.get(crop_at).unwrap_or_default().to_string(),
            yield_value,
        });
    }

    Ok(ParsedTable {
        columns,
        schema,
        records,
        skipped_rows,
    })
}

fn column_index(schema: &ResolvedSchema, role: ColumnRole) -> usize {
    // resolve() guarantees every standard role is present
    schema.column(role).map(|column| column.index).unwrap_or(usize::MAX)
}

fn parse_yield(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}
