// 📥 Registry Ingestion - National address-point export (CSV) → AddressRegistry
//
// One file per municipality, `;` separated, Windows-1250 as published
// (UTF-8 selectable). Columns used:
//
//   0 Kód ADM   1 Kód obce   2 Název obce   7 Kód části obce   8 Název části obce
//   9 Kód ulice   10 Název ulice   11 Typ SO   12 Číslo domovní
//   13 Číslo orientační   16 Souřadnice Y   17 Souřadnice X

use crate::error::IngestError;
use crate::model::GeoPoint;
use crate::registry::AddressRegistry;
use crate::slug::slugify;
use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1250};
use encoding_rs_io::DecodeReaderBytesBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

const FIELDS_COUNT: usize = 19;
const COL_ADM_CODE: usize = 0;
const COL_CITY_CODE: usize = 1;
const COL_CITY_NAME: usize = 2;
const COL_AREA_CODE: usize = 7;
const COL_AREA_NAME: usize = 8;
const COL_STREET_CODE: usize = 9;
const COL_STREET_NAME: usize = 10;
const COL_BUILDING_TYPE: usize = 11;
const COL_DESCRIPTIVE_NUMBER: usize = 12;
const COL_ORIENTATION_NUMBER: usize = 13;
const COL_AXIS_Y: usize = 16;
const COL_AXIS_X: usize = 17;

/// Streets of city parts without named streets get a code above this offset
pub const AREA_STREET_OFFSET: u32 = 1_000_000_000;

/// Expected slugified headers
const REQUIRED_HEADERS: [(usize, &str); 4] = [
    (COL_ADM_CODE, "kod-adm"),
    (COL_CITY_CODE, "kod-obce"),
    (COL_AXIS_Y, "souradnice-y"),
    (COL_AXIS_X, "souradnice-x"),
];

// ============================================================================
// ENCODING
// ============================================================================

/// Character encoding of an export file. A byte-order mark overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum SourceEncoding {
    #[default]
    #[serde(rename = "windows-1250")]
    #[value(name = "windows-1250")]
    Windows1250,
    #[serde(rename = "utf-8")]
    #[value(name = "utf-8")]
    Utf8,
}

impl SourceEncoding {
    fn encoding(&self) -> &'static Encoding {
        match self {
            SourceEncoding::Windows1250 => WINDOWS_1250,
            SourceEncoding::Utf8 => UTF_8,
        }
    }
}

// ============================================================================
// PROJECTION
// ============================================================================

/// Converts source grid coordinates to (latitude, longitude)
pub trait Projection: Send + Sync {
    fn to_lat_lng(&self, x: f64, y: f64) -> (f64, f64);
}

/// For exports whose X/Y columns already hold latitude/longitude
pub struct Geographic;

impl Projection for Geographic {
    fn to_lat_lng(&self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }
}

// ============================================================================
// LOADER
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub rows: usize,
    pub new_streets: usize,
    pub points: usize,
    pub skipped: usize,
}

/// Load an export file into the registry
pub fn load_file(
    path: &Path,
    encoding: SourceEncoding,
    registry: &AddressRegistry,
    projection: &dyn Projection,
) -> Result<IngestReport> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let report = load_address_points(file, encoding, registry, projection)
        .with_context(|| format!("Failed to load address points from {}", path.display()))?;

    info!(
        file = %path.display(),
        rows = report.rows,
        new_streets = report.new_streets,
        points = report.points,
        skipped = report.skipped,
        "address points loaded"
    );
    Ok(report)
}

/// Build a registry from several export files
pub fn load_registry<P: AsRef<Path>>(
    files: &[P],
    encoding: SourceEncoding,
    projection: &dyn Projection,
) -> Result<AddressRegistry> {
    let registry = AddressRegistry::new();
    for file in files {
        load_file(file.as_ref(), encoding, &registry, projection)?;
    }
    info!(
        cities = registry.city_count(),
        streets = registry.street_count(),
        points = registry.point_count(),
        "registry ready"
    );
    Ok(registry)
}

/// Read address points from any reader
pub fn load_address_points<R: Read>(
    source: R,
    encoding: SourceEncoding,
    registry: &AddressRegistry,
    projection: &dyn Projection,
) -> Result<IngestReport, IngestError> {
    let decoded = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding.encoding()))
        .bom_override(true)
        .strip_bom(true)
        .build(source);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .comment(Some(b'#'))
        .has_headers(true)
        .flexible(true)
        .from_reader(decoded);

    check_headers(reader.headers()?)?;

    let mut report = IngestReport::default();

    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let row = index + 2;

        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != FIELDS_COUNT {
            return Err(IngestError::RowWidth {
                row,
                expected: FIELDS_COUNT,
                found: record.len(),
            });
        }
        report.rows += 1;

        let (street_code, street_name) = if record[COL_STREET_CODE].is_empty() {
            if record[COL_AREA_CODE].is_empty() {
                report.skipped += 1;
                continue;
            }
            let area_code: u32 = parse_code(&record, COL_AREA_CODE, row, "area code")?;
            let code = area_code
                .checked_add(AREA_STREET_OFFSET)
                .ok_or_else(|| invalid(&record, COL_AREA_CODE, row, "area code"))?;
            (code, &record[COL_AREA_NAME])
        } else {
            let code: u32 = parse_code(&record, COL_STREET_CODE, row, "street code")?;
            (code, &record[COL_STREET_NAME])
        };

        let Some(point) = make_point(&record, street_name, projection) else {
            warn!(row, "skipping address point without coordinates");
            report.skipped += 1;
            continue;
        };

        let city_code: u32 = parse_code(&record, COL_CITY_CODE, row, "city code")?;
        let address_code: u64 = parse_code(&record, COL_ADM_CODE, row, "address code")?;

        registry.insert_city(city_code, &record[COL_CITY_NAME]);
        if registry.insert_street(city_code, street_code, street_name) {
            report.new_streets += 1;
        }
        registry.insert_point(street_code, address_code, point);
        report.points += 1;
    }

    Ok(report)
}

fn check_headers(headers: &csv::StringRecord) -> Result<(), IngestError> {
    if headers.len() != FIELDS_COUNT {
        return Err(IngestError::HeaderCount {
            expected: FIELDS_COUNT,
            found: headers.len(),
        });
    }

    for (column, expected) in REQUIRED_HEADERS {
        let found = slugify(&headers[column]);
        if found != expected {
            return Err(IngestError::HeaderName {
                column,
                expected,
                found,
            });
        }
    }
    Ok(())
}

fn parse_code<T: FromStr>(
    record: &csv::StringRecord,
    column: usize,
    row: usize,
    field: &'static str,
) -> Result<T, IngestError> {
    record[column]
        .trim()
        .parse()
        .map_err(|_| invalid(record, column, row, field))
}

fn invalid(record: &csv::StringRecord, column: usize, row: usize, field: &'static str) -> IngestError {
    IngestError::InvalidCode {
        row,
        field,
        value: record[column].to_string(),
    }
}

fn parse_coordinate(text: &str) -> Option<f64> {
    text.trim().replace(',', ".").parse().ok()
}

fn make_point(record: &csv::StringRecord, street_name: &str, projection: &dyn Projection) -> Option<GeoPoint> {
    let x = parse_coordinate(&record[COL_AXIS_X])?;
    let y = parse_coordinate(&record[COL_AXIS_Y])?;
    let (lat, lng) = projection.to_lat_lng(x, y);

    let building_type = &record[COL_BUILDING_TYPE];
    let descriptive = &record[COL_DESCRIPTIVE_NUMBER];
    let orientation = &record[COL_ORIENTATION_NUMBER];

    let mut address = street_name.to_string();
    if !building_type.is_empty() {
        address.push(' ');
        address.push_str(building_type);
    }
    match (descriptive.is_empty(), orientation.is_empty()) {
        (false, false) => address.push_str(&format!(" {}/{}", descriptive, orientation)),
        (false, true) => address.push_str(&format!(" {}", descriptive)),
        (true, false) => address.push_str(&format!(" {}", orientation)),
        (true, true) => {}
    }

    Some(GeoPoint {
        address,
        lat,
        lng,
        orientation_number: orientation.trim().parse().unwrap_or(0),
        descriptive_number: descriptive.trim().parse().unwrap_or(0),
    })
}

// ============================================================================
// TESTS
// ============================================================================
