//! Remote record source interface.
//!
//! The transport itself lives outside this crate. What lives here is the
//! shape of one request per grid cell (OpenCellID `getInArea` style), the
//! parsing of a response body into records, and the loop that fetches every
//! cell while skipping failures.

use crate::error::{CellpathError, Result};
use cellpath_types::bbox::GridCell;
use cellpath_types::record::CandidateRecord;
use cellpath_types::stats::FetchStats;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// OpenCellID area query endpoint.
pub const OPENCELLID_AREA_URL: &str = "https://opencellid.org/cell/getInArea";

/// Radio access technology filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Radio {
    Gsm,
    Umts,
    Cdma,
    #[default]
    Lte,
    Nr,
}

impl Radio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Radio::Gsm => "GSM",
            Radio::Umts => "UMTS",
            Radio::Cdma => "CDMA",
            Radio::Lte => "LTE",
            Radio::Nr => "NR",
        }
    }
}

impl fmt::Display for Radio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Radio {
    type Err = CellpathError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GSM" => Ok(Radio::Gsm),
            "UMTS" => Ok(Radio::Umts),
            "CDMA" => Ok(Radio::Cdma),
            "LTE" => Ok(Radio::Lte),
            "NR" => Ok(Radio::Nr),
            other => Err(CellpathError::InvalidInput(format!(
                "Unknown radio type: {}",
                other
            ))),
        }
    }
}

/// Operator and technology filters sent with every cell request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellQuery {
    /// Mobile country code
    pub mcc: u16,
    /// Mobile network code
    pub mnc: u16,
    #[serde(default)]
    pub radio: Radio,
}

impl CellQuery {
    pub fn new(mcc: u16, mnc: u16) -> Self {
        Self {
            mcc,
            mnc,
            radio: Radio::default(),
        }
    }

    pub fn with_radio(mut self, radio: Radio) -> Self {
        self.radio = radio;
        self
    }

    /// `min_lat,min_lon,max_lat,max_lon`; the remote API is latitude first.
    pub fn bbox_param(cell: &GridCell) -> String {
        let b = &cell.bbox;
        format!(
            "{},{},{},{}",
            b.min_lat(),
            b.min_lon(),
            b.max_lat(),
            b.max_lon()
        )
    }

    /// Query parameters for one cell, without credentials.
    pub fn request_params(&self, cell: &GridCell) -> Vec<(&'static str, String)> {
        vec![
            ("BBOX", Self::bbox_param(cell)),
            ("mcc", self.mcc.to_string()),
            ("mnc", self.mnc.to_string()),
            ("radio", self.radio.to_string()),
            ("format", "json".to_string()),
        ]
    }

    /// Full request URL for one cell.
    pub fn request_url(&self, base_url: &str, api_key: &str, cell: &GridCell) -> String {
        let mut url = format!("{}?key={}", base_url, api_key);
        for (name, value) in self.request_params(cell) {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&value);
        }
        url
    }
}

/// A `{"cells": [...]}` document, as returned per cell and as written out
/// after ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default)]
    pub cells: Vec<CandidateRecord>,
}

impl CellsDocument {
    pub fn new(cells: Vec<CandidateRecord>) -> Self {
        Self { count: None, cells }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            CellpathError::Serialization(format!("Failed to parse cells document: {}", e))
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            CellpathError::Serialization(format!("Failed to serialize cells document: {}", e))
        })
    }
}

/// Parses one response body. A body without `cells` yields no records.
pub fn parse_cells_response(body: &str) -> Result<Vec<CandidateRecord>> {
    let doc: CellsDocument = serde_json::from_str(body)
        .map_err(|e| CellpathError::Source(format!("Malformed cells response: {}", e)))?;
    Ok(doc.cells)
}

/// Something that can return the records inside one grid cell.
pub trait RecordSource {
    fn fetch(&mut self, cell: &GridCell) -> Result<Vec<CandidateRecord>>;
}

impl<F> RecordSource for F
where
    F: FnMut(&GridCell) -> Result<Vec<CandidateRecord>>,
{
    fn fetch(&mut self, cell: &GridCell) -> Result<Vec<CandidateRecord>> {
        self(cell)
    }
}

/// Fetch every cell once, skipping failed cells and duplicate records.
///
/// Neighbouring cells share their edges, so a record sitting exactly on an
/// edge can come back twice; only its first occurrence is kept. Failures are
/// logged and counted, never retried.
pub fn collect_records<S>(
    source: &mut S,
    cells: &[GridCell],
) -> (Vec<CandidateRecord>, FetchStats)
where
    S: RecordSource + ?Sized,
{
    let mut stats = FetchStats::new();
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for (idx, cell) in cells.iter().enumerate() {
        log::debug!("Fetching cell {}/{}", idx + 1, cells.len());
        match source.fetch(cell) {
            Ok(batch) => {
                stats.record_success(batch.len());
                for record in batch {
                    if seen.insert(record.payload().to_string()) {
                        records.push(record);
                    } else {
                        stats.duplicates += 1;
                    }
                }
            }
            Err(e) => {
                log::warn!(
                    "Skipping cell {} ({}): {}",
                    idx + 1,
                    CellQuery::bbox_param(cell),
                    e
                );
                stats.record_failure();
            }
        }
    }

    (records, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellpath_types::bbox::BoundingBox;
    use serde_json::json;

    fn cell() -> GridCell {
        GridCell::from(BoundingBox::new(77.5, 12.9, 77.52, 12.92))
    }

    #[test]
    fn test_bbox_param_is_lat_first() {
        assert_eq!(CellQuery::bbox_param(&cell()), "12.9,77.5,12.92,77.52");
    }

    #[test]
    fn test_request_url() {
        let query = CellQuery::new(404, 45);
        let url = query.request_url(OPENCELLID_AREA_URL, "secret", &cell());
        assert_eq!(
            url,
            "https://opencellid.org/cell/getInArea?key=secret&BBOX=12.9,77.5,12.92,77.52&mcc=404&mnc=45&radio=LTE&format=json"
        );
    }

    #[test]
    fn test_radio_parse_and_display() {
        assert_eq!("lte".parse::<Radio>().unwrap(), Radio::Lte);
        assert_eq!("GSM".parse::<Radio>().unwrap(), Radio::Gsm);
        assert!("wifi".parse::<Radio>().is_err());
        assert_eq!(Radio::Umts.to_string(), "UMTS");
        assert_eq!(serde_json::to_value(Radio::Nr).unwrap(), json!("NR"));
    }

    #[test]
    fn test_parse_cells_response() {
        let body = r#"{"count": 2, "cells": [
            {"lat": 12.91, "lon": 77.51, "mcc": 404, "mnc": 45, "cellid": 1},
            {"mcc": 404, "mnc": 45, "cellid": 2}
        ]}"#;
        let records = parse_cells_response(body).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].position().is_some());
        assert!(records[1].position().is_none());
    }

    #[test]
    fn test_parse_response_without_cells() {
        let records = parse_cells_response(r#"{"code": 1, "error": "API key invalid"}"#).unwrap();
        assert!(records.is_empty());
        assert!(parse_cells_response("<html>").is_err());
    }

    #[test]
    fn test_collect_records_skips_failures_and_duplicates() {
        let cells = vec![cell(), cell(), cell()];
        let mut calls = 0;
        let mut source = |_: &GridCell| -> Result<Vec<CandidateRecord>> {
            calls += 1;
            match calls {
                1 => Ok(vec![
                    CandidateRecord::from_value(json!({"lat": 1.0, "lon": 1.0, "cellid": 1})),
                    CandidateRecord::from_value(json!({"lat": 2.0, "lon": 2.0, "cellid": 2})),
                ]),
                2 => Err(CellpathError::Source("status 503".to_string())),
                _ => Ok(vec![
                    CandidateRecord::from_value(json!({"lat": 2.0, "lon": 2.0, "cellid": 2})),
                    CandidateRecord::from_value(json!({"lat": 3.0, "lon": 3.0, "cellid": 3})),
                ]),
            }
        };

        let (records, stats) = collect_records(&mut source, &cells);

        assert_eq!(records.len(), 3);
        assert_eq!(stats.requested, 3);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.records, 4);
        assert_eq!(stats.duplicates, 1);
    }

    #[test]
    fn test_cells_document_roundtrip_keeps_payload() {
        let json = r#"{"cells":[{"lat":1.0,"lon":2.0,"range":500}]}"#;
        let doc = CellsDocument::from_json(json).unwrap();
        assert_eq!(doc.cells.len(), 1);
        let out: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(out, json!({"cells": [{"lat": 1.0, "lon": 2.0, "range": 500}]}));
    }
}
