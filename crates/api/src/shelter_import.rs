// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Normalization of public shelter datasets for bulk import.
//!
//! The national evacuation-site extracts arrive in whatever encoding the
//! publishing municipality used (usually Shift_JIS or UTF-8 with a BOM), with
//! Japanese column headers that sometimes contain embedded line breaks. This
//! module turns such a file into a list of shelters ready to insert, without
//! touching the database.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use chardetng::EncodingDetector;
use csv::StringRecord;
use encoding_rs::{Encoding, SHIFT_JIS};
use hinanjo_domain::{
    Coordinates, HazardFlag, HazardFlags, HazardKind, Shelter, extract_capacity,
    validate_shelter_fields,
};
use tracing::{debug, info};

use crate::error::ApiError;

pub const COLUMN_NAME: &str = "名称";
pub const COLUMN_ADDRESS: &str = "住所";
pub const COLUMN_LATITUDE: &str = "緯度";
pub const COLUMN_LONGITUDE: &str = "経度";
pub const COLUMN_ALTITUDE: &str = "標高";
pub const COLUMN_FACILITY_TYPE: &str = "施設種別呼称";
/// Capacity columns, in order of preference.
pub const CAPACITY_COLUMNS: [&str; 2] = ["想定収容人数", "収容可能人数（人）"];

const REQUIRED_HEADERS: &[&str] = &[COLUMN_NAME, COLUMN_LATITUDE, COLUMN_LONGITUDE];

/// Cell values read as an explicit hazard designation.
const YES_VALUES: &[&str] = &["1", "○", "◯", "〇", "true", "yes", "有", "y"];
/// Cell values read as an explicit non-designation.
const NO_VALUES: &[&str] = &["0", "×", "✕", "false", "no", "無", "n"];

/// Text decoded from an upload, with the encoding that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedUpload {
    pub text: String,
    pub encoding: &'static str,
    /// True when the detected encoding failed and Shift_JIS was used instead.
    pub used_fallback: bool,
}

/// A data row that could not become a shelter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data row number, excluding the header.
    pub row_number: usize,
    pub reason: String,
}

/// What a file would import.
#[derive(Debug, Clone, PartialEq)]
pub struct ShelterImportPlan {
    /// Shelters to insert, in file order.
    pub accepted: Vec<Shelter>,
    /// Names skipped because they already exist, in the store or earlier in
    /// the same file.
    pub rejected_existing: Vec<String>,
    /// Rows without a usable name or coordinates.
    pub skipped_rows: Vec<SkippedRow>,
    pub encoding: &'static str,
    pub used_fallback: bool,
}

/// Decodes an uploaded file.
///
/// A byte order mark wins. Otherwise the encoding is guessed statistically.
/// Decoding is strict; if it fails under the chosen encoding it is retried
/// under Shift_JIS.
///
/// # Errors
///
/// Returns `InvalidCsvFormat` if no attempt decodes cleanly.
pub fn decode_upload(raw: &[u8]) -> Result<DecodedUpload, ApiError> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(raw) {
        debug!(encoding = encoding.name(), "Byte order mark found");
        return decode_with(&raw[bom_length..], encoding);
    }

    let mut detector: EncodingDetector = EncodingDetector::new();
    detector.feed(raw, true);
    let guessed: &'static Encoding = detector.guess(None, true);
    debug!(encoding = guessed.name(), "Encoding guessed");

    decode_with(raw, guessed)
}

/// Strictly decodes `raw` as `detected`, falling back to Shift_JIS.
///
/// # Errors
///
/// Returns `InvalidCsvFormat` if both attempts contain malformed sequences.
pub fn decode_with(raw: &[u8], detected: &'static Encoding) -> Result<DecodedUpload, ApiError> {
    if let Some(text) = strict_decode(raw, detected) {
        return Ok(DecodedUpload {
            text,
            encoding: detected.name(),
            used_fallback: false,
        });
    }

    if detected != SHIFT_JIS
        && let Some(text) = strict_decode(raw, SHIFT_JIS)
    {
        info!(
            detected = detected.name(),
            "Detected encoding failed; decoded as Shift_JIS"
        );
        return Ok(DecodedUpload {
            text,
            encoding: SHIFT_JIS.name(),
            used_fallback: true,
        });
    }

    Err(ApiError::InvalidCsvFormat {
        reason: format!(
            "file could not be decoded as {} or {}",
            detected.name(),
            SHIFT_JIS.name()
        ),
    })
}

fn strict_decode(raw: &[u8], encoding: &'static Encoding) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(raw)
        .map(Cow::into_owned)
}

/// Removes line breaks, stray byte order marks and surrounding whitespace
/// from a header cell.
fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\u{feff}'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_blank_record(record: &StringRecord) -> bool {
    record.iter().all(|cell| cell.trim().is_empty())
}

/// Builds the header map over the columns that hold at least one value.
///
/// Entirely empty columns are dropped, so a header whose column is blank in
/// every row is treated as absent. Repeated headers resolve to their first
/// occurrence.
fn build_header_map(
    headers: &StringRecord,
    rows: &[StringRecord],
) -> Result<HashMap<String, usize>, ApiError> {
    let mut header_map: HashMap<String, usize> = HashMap::new();

    for (idx, header) in headers.iter().enumerate() {
        let normalized: String = normalize_header(header);
        if normalized.is_empty() {
            continue;
        }
        let has_data: bool = rows
            .iter()
            .any(|row| row.get(idx).is_some_and(|cell| !cell.trim().is_empty()));
        if !has_data {
            debug!(column = %normalized, "Dropping empty column");
            continue;
        }
        header_map.entry(normalized).or_insert(idx);
    }

    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|required| !header_map.contains_key(*required))
        .collect();

    if !missing.is_empty() {
        return Err(ApiError::InvalidCsvFormat {
            reason: format!("missing required columns: {}", missing.join(", ")),
        });
    }

    Ok(header_map)
}

/// Reads one hazard cell from a column present in the file.
///
/// A blank cell means "unknown".
fn hazard_flag(cell: Option<&str>) -> HazardFlag {
    let value: String = cell.map(str::trim).unwrap_or_default().to_lowercase();
    if value.is_empty() {
        HazardFlag::Unknown
    } else if YES_VALUES.contains(&value.as_str()) {
        HazardFlag::Yes
    } else if NO_VALUES.contains(&value.as_str()) {
        HazardFlag::No
    } else {
        debug!(value = %value, "Unrecognized hazard cell");
        HazardFlag::Unknown
    }
}

/// Turns one data row into a shelter.
fn parse_shelter_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<Shelter, String> {
    let get_field = |name: &str| -> Option<String> {
        header_map
            .get(name)
            .and_then(|&idx| record.get(idx))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let name: String = get_field(COLUMN_NAME).ok_or_else(|| String::from("name is empty"))?;
    let address: String = get_field(COLUMN_ADDRESS).unwrap_or_default();

    let parse_axis = |column: &str| -> Result<f64, String> {
        let raw: String = get_field(column).ok_or_else(|| format!("{column} is empty"))?;
        raw.parse::<f64>()
            .map_err(|_| format!("{column} is not a number: '{raw}'"))
    };
    let location: Coordinates = Coordinates::new(
        parse_axis(COLUMN_LATITUDE)?,
        parse_axis(COLUMN_LONGITUDE)?,
    )
    .map_err(|e| e.to_string())?;

    let mut shelter: Shelter = Shelter::new(&name, &address, location);

    shelter.capacity = CAPACITY_COLUMNS
        .iter()
        .find_map(|column| get_field(*column))
        .and_then(|cell| extract_capacity(&cell));

    // A hazard column absent from the file means "not designated".
    let mut hazards: HazardFlags = HazardFlags::uniform(HazardFlag::No);
    for kind in HazardKind::ALL {
        if let Some(&idx) = header_map.get(kind.source_column()) {
            hazards.set(kind, hazard_flag(record.get(idx)));
        }
    }
    shelter.hazards = hazards;

    shelter.altitude = get_field(COLUMN_ALTITUDE)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|altitude| altitude.is_finite());
    shelter.note = get_field(COLUMN_FACILITY_TYPE).unwrap_or_default();

    validate_shelter_fields(&shelter).map_err(|e| e.to_string())?;
    Ok(shelter)
}

struct SortedRows {
    accepted: Vec<Shelter>,
    rejected_existing: Vec<String>,
    skipped_rows: Vec<SkippedRow>,
}

/// Parses decoded text and sorts its rows into accepted, rejected and skipped.
fn sort_rows(text: &str, existing_names: &HashSet<String>) -> Result<SortedRows, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records: Vec<StringRecord> = Vec::new();
    for result in reader.records() {
        let record: StringRecord = result.map_err(|e| ApiError::InvalidCsvFormat {
            reason: format!("malformed row: {e}"),
        })?;
        records.push(record);
    }

    let mut records = records.into_iter();
    let headers: StringRecord = records.next().ok_or_else(|| ApiError::InvalidCsvFormat {
        reason: String::from("file is empty"),
    })?;
    let rows: Vec<StringRecord> = records.filter(|r| !is_blank_record(r)).collect();

    if rows.is_empty() {
        debug!("Shelter file has a header but no data rows");
        return Ok(SortedRows {
            accepted: Vec::new(),
            rejected_existing: Vec::new(),
            skipped_rows: Vec::new(),
        });
    }

    let header_map: HashMap<String, usize> = build_header_map(&headers, &rows)?;

    let mut accepted: Vec<Shelter> = Vec::new();
    let mut rejected_existing: Vec<String> = Vec::new();
    let mut skipped_rows: Vec<SkippedRow> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (idx, record) in rows.iter().enumerate() {
        let shelter: Shelter = match parse_shelter_row(record, &header_map) {
            Ok(shelter) => shelter,
            Err(reason) => {
                skipped_rows.push(SkippedRow {
                    row_number: idx + 1,
                    reason,
                });
                continue;
            }
        };

        if existing_names.contains(&shelter.name) || seen.contains(&shelter.name) {
            rejected_existing.push(shelter.name);
            continue;
        }

        seen.insert(shelter.name.clone());
        accepted.push(shelter);
    }

    Ok(SortedRows {
        accepted,
        rejected_existing,
        skipped_rows,
    })
}

/// Decodes and normalizes an uploaded shelter file.
///
/// Rows whose name is already in `existing_names`, or appeared on an earlier
/// accepted row of this file, are rejected and reported by name.
///
/// # Errors
///
/// Returns `InvalidCsvFormat` if the file cannot be decoded or parsed.
pub fn normalize_shelter_import(
    raw: &[u8],
    existing_names: &HashSet<String>,
) -> Result<ShelterImportPlan, ApiError> {
    let decoded: DecodedUpload = decode_upload(raw)?;
    let rows: SortedRows = sort_rows(&decoded.text, existing_names)?;

    info!(
        accepted = rows.accepted.len(),
        rejected = rows.rejected_existing.len(),
        skipped = rows.skipped_rows.len(),
        encoding = decoded.encoding,
        "Shelter file normalized"
    );

    Ok(ShelterImportPlan {
        accepted: rows.accepted,
        rejected_existing: rows.rejected_existing,
        skipped_rows: rows.skipped_rows,
        encoding: decoded.encoding,
        used_fallback: decoded.used_fallback,
    })
}
