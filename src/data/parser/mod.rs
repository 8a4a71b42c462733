//! Reading drug parameter tables
//!
//! The drug table is kept outside of this crate (a spreadsheet export in practice). Each row
//! describes one drug and the route it is given by. Only rows flagged with `use = Y` are
//! returned by the readers in this module.

use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::data::parameters::{DrugParameters, Route, DEFAULT_N_DOSES, DEFAULT_TAU_OFF};
use crate::simulator::{SimulationOptions, SimulationRequest};

/// Errors raised while reading a drug table
#[derive(Error, Debug, Clone)]
pub enum TableError {
    /// Error encountered when reading CSV data
    #[error("CSV error: {0}")]
    CSVError(String),
    /// The route label is not one of the known administration routes
    #[error("Unknown route '{label}' for drug {drug}")]
    UnknownRoute { drug: String, label: String },
    /// A column required by the selected route is empty or absent
    #[error("Column {column} is required for route {route} (drug {drug})")]
    MissingColumn {
        drug: String,
        route: String,
        column: String,
    },
}

/// Administration route without its regimen parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    OralSingle,
    OralMulti,
    PatchInstant,
    PatchWashout,
}

impl RouteKind {
    /// Map a route label from the drug table
    ///
    /// Besides the route names, the Korean labels of the clinical drug table are accepted.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "oral" | "oral-single" | "경구일반" | "경구서방" => Some(RouteKind::OralSingle),
            "oral-multi" | "경구연속" => Some(RouteKind::OralMulti),
            "patch" | "patch-instant" | "패치" => Some(RouteKind::PatchInstant),
            "patch-washout" => Some(RouteKind::PatchWashout),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            RouteKind::OralSingle => "oral-single",
            RouteKind::OralMulti => "oral-multi",
            RouteKind::PatchInstant => "patch-instant",
            RouteKind::PatchWashout => "patch-washout",
        }
    }
}

/// A [DrugRow] is one row of the drug table
///
/// Headers are matched case-insensitively. Bioavailability (`f`) is given in percent.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "lowercase")]
pub struct DrugRow {
    pub drug_name: String,
    /// `Y` marks rows that should be simulated
    #[serde(rename = "use", default)]
    pub active: String,
    pub route_of_administration: String,
    /// Dose (mg)
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub d: Option<f64>,
    /// Bioavailability (%)
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub f: Option<f64>,
    /// Distribution volume (L/kg)
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub v_d: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub t_half: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub t_max: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub onset_time_hour: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub end_threshold: Option<f64>,
    /// Dosing interval (h)
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub tau: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_option_usize")]
    pub n_doses: Option<usize>,
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub patch_duration_hour: Option<f64>,
    /// Residual absorption time constant after patch removal (h)
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub tau_off: Option<f64>,
    /// Hours of curve kept after the effect has worn off
    #[serde(default, deserialize_with = "deserialize_option_f64")]
    pub t_last: Option<f64>,
}

impl DrugRow {
    /// The route given by the row's route label
    pub fn route_kind(&self) -> Result<RouteKind, TableError> {
        RouteKind::from_label(&self.route_of_administration).ok_or_else(|| {
            TableError::UnknownRoute {
                drug: self.drug_name.clone(),
                label: self.route_of_administration.clone(),
            }
        })
    }

    /// Build the regimen for `kind` from the row's columns
    pub fn regimen(&self, kind: RouteKind) -> Result<Route, TableError> {
        let route = match kind {
            RouteKind::OralSingle => Route::OralSingle,
            RouteKind::OralMulti => Route::OralMulti {
                tau: self.required(self.tau, "tau", kind)?,
                n_doses: self.n_doses.unwrap_or(DEFAULT_N_DOSES),
            },
            RouteKind::PatchInstant => Route::PatchInstant {
                patch_duration: self.required(
                    self.patch_duration_hour,
                    "patch_duration_hour",
                    kind,
                )?,
            },
            RouteKind::PatchWashout => Route::PatchWashout {
                patch_duration: self.required(
                    self.patch_duration_hour,
                    "patch_duration_hour",
                    kind,
                )?,
                tau_off: self.tau_off.unwrap_or(DEFAULT_TAU_OFF),
            },
        };
        Ok(route)
    }

    fn required(&self, value: Option<f64>, column: &str, kind: RouteKind) -> Result<f64, TableError> {
        value.ok_or_else(|| TableError::MissingColumn {
            drug: self.drug_name.clone(),
            route: kind.label().to_string(),
            column: column.to_string(),
        })
    }

    /// Convert the row into a simulation request using its own route label
    pub fn into_request(self, body_weight: f64) -> Result<SimulationRequest, TableError> {
        let kind = self.route_kind()?;
        self.into_request_as(kind, body_weight)
    }

    /// Convert the row into a simulation request for an explicitly chosen route
    pub fn into_request_as(
        self,
        kind: RouteKind,
        body_weight: f64,
    ) -> Result<SimulationRequest, TableError> {
        let route = self.regimen(kind)?;
        let dose = self.required(self.d, "d", kind)?;
        let bioavailability = self.required(self.f, "f", kind)? * 0.01;
        let volume_per_kg = self.required(self.v_d, "v_d", kind)?;
        let half_life = self.required(self.t_half, "t_half", kind)?;

        let mut options = SimulationOptions::new(route);
        if let Some(margin) = self.t_last {
            options = options.with_tail_margin(margin);
        }

        let params = DrugParameters {
            name: self.drug_name,
            dose,
            bioavailability,
            volume_per_kg,
            body_weight,
            half_life,
            time_to_peak: self.t_max,
            onset_time: self.onset_time_hour.unwrap_or(0.0),
            end_threshold: self.end_threshold.unwrap_or(0.0),
        };

        Ok(SimulationRequest { params, options })
    }
}

/// Read the active rows of a drug table file
///
/// Inactive rows are skipped before their cells are parsed, so placeholder rows may be
/// incomplete. Blank numeric cells of active rows are reported per row by
/// [DrugRow::into_request].
///
/// # Example
///
/// ```rust,no_run
/// use pkcurve::data::parser::read_drug_table;
///
/// let rows = read_drug_table("drugs.csv").unwrap();
/// println!("Number of drugs: {}", rows.len());
/// ```
pub fn read_drug_table(path: impl AsRef<Path>) -> Result<Vec<DrugRow>, TableError> {
    let reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .has_headers(true)
        .flexible(true)
        .from_path(path.as_ref())
        .map_err(|e| TableError::CSVError(e.to_string()))?;
    collect_rows(reader)
}

/// Read the active rows of a drug table from any reader
pub fn read_drug_rows<R: Read>(reader: R) -> Result<Vec<DrugRow>, TableError> {
    let reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    collect_rows(reader)
}

fn collect_rows<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<DrugRow>, TableError> {
    // Convert headers to lowercase
    let headers = csv::StringRecord::from(
        reader
            .headers()
            .map_err(|e| TableError::CSVError(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect::<Vec<_>>(),
    );
    reader.set_headers(headers.clone());
    let use_column = headers.iter().position(|h| h == "use");

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| TableError::CSVError(e.to_string()))?;
        let active = use_column
            .and_then(|i| record.get(i))
            .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("y"));
        if !active {
            continue;
        }
        let row: DrugRow = record
            .deserialize(Some(&headers))
            .map_err(|e| TableError::CSVError(e.to_string()))?;
        rows.push(row);
    }
    Ok(rows)
}

fn deserialize_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    let s = s.trim();
    if s.is_empty() || s == "." || s == "NA" {
        Ok(None)
    } else {
        T::from_str(s).map(Some).map_err(serde::de::Error::custom)
    }
}

fn deserialize_option_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_option::<f64, D>(deserializer)
}

fn deserialize_option_usize<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_option::<usize, D>(deserializer)
}
