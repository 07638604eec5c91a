use crate::core::models::bioreactor::BioreactorRun;
use crate::core::models::kinetics::KineticRun;
use crate::core::models::score::SequenceScore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use thiserror::Error;

const TIME_SERIES_KEY: &str = "datos_temporales";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Report is not valid UTF-8")]
    Encoding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
    Text,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "text" | "txt" => Ok(Self::Text),
            other => Err(format!(
                "Unknown report format '{other}'. Expected 'json', 'csv' or 'text'."
            )),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "text",
        })
    }
}

/// A result that the formatter knows how to render.
///
/// The default CSV layout is one `key,value` row per scalar field; runs with a
/// time series override it with one row per sample.
pub trait Reportable: Serialize {
    fn title(&self) -> String;

    /// The value the key/value layouts are built from.
    fn fields(&self) -> Result<Value, ReportError> {
        Ok(serde_json::to_value(self)?)
    }

    fn write_csv<W: Write>(&self, writer: &mut csv::Writer<W>) -> Result<(), ReportError> {
        writer.write_record(["campo", "valor"])?;
        for (key, value) in flatten_fields(&self.fields()?) {
            writer.write_record([key, value])?;
        }
        Ok(())
    }
}

impl Reportable for SequenceScore {
    fn title(&self) -> String {
        format!("Análisis {} ({} residuos)", self.model, self.length)
    }
}

impl Reportable for KineticRun {
    fn title(&self) -> String {
        format!("Laboratorio virtual (duración {})", self.duration)
    }

    fn write_csv<W: Write>(&self, writer: &mut csv::Writer<W>) -> Result<(), ReportError> {
        let detailed = self
            .time_series
            .first()
            .is_some_and(|s| s.substrate.is_some());

        let mut header = vec!["tiempo", "actividad", "estabilidad", "producto"];
        if detailed {
            header.extend(["sustrato", "enzima_activa"]);
        }
        writer.write_record(&header)?;

        for sample in &self.time_series {
            let mut row = vec![
                sample.time.to_string(),
                sample.activity.to_string(),
                sample.stability.to_string(),
                sample.product.to_string(),
            ];
            if detailed {
                row.push(sample.substrate.map(|v| v.to_string()).unwrap_or_default());
                row.push(sample.active_enzyme.map(|v| v.to_string()).unwrap_or_default());
            }
            writer.write_record(&row)?;
        }
        Ok(())
    }
}

impl Reportable for BioreactorRun {
    fn title(&self) -> String {
        format!(
            "Gemelo digital de biorreactor (biomasa inicial {})",
            self.initial_conditions.initial_biomass
        )
    }

    fn write_csv<W: Write>(&self, writer: &mut csv::Writer<W>) -> Result<(), ReportError> {
        writer.write_record([
            "time",
            "biomasa",
            "producto",
            "viabilidad",
            "oxigeno",
            "ph",
            "temperatura",
        ])?;
        for s in &self.time_series {
            writer.write_record([
                s.time.to_string(),
                s.biomass.to_string(),
                s.product.to_string(),
                s.viability.to_string(),
                s.oxygen.to_string(),
                s.ph.to_string(),
                s.temperature.to_string(),
            ])?;
        }
        Ok(())
    }
}

pub fn render<R: Reportable>(report: &R, format: ReportFormat) -> Result<String, ReportError> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Csv => render_csv(report),
        ReportFormat::Text => render_text(report),
    }
}

pub fn write_report<R: Reportable>(
    report: &R,
    format: ReportFormat,
    out: &mut impl Write,
) -> Result<(), ReportError> {
    let rendered = render(report, format)?;
    out.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(())
}

fn render_csv<R: Reportable>(report: &R) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    report.write_csv(&mut writer)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|_| ReportError::Encoding)
}

fn render_text<R: Reportable>(report: &R) -> Result<String, ReportError> {
    let value = report.fields()?;
    let title = report.title();

    let mut out = String::new();
    out.push_str(&title);
    out.push('\n');
    out.push_str(&"=".repeat(title.chars().count()));
    out.push('\n');

    for (key, val) in flatten_fields(&value) {
        out.push_str(&format!("{key}: {val}\n"));
    }
    if let Some(Value::Array(samples)) = value.get(TIME_SERIES_KEY) {
        out.push_str(&format!("muestras: {}\n", samples.len()));
    }
    Ok(out)
}

/// Flattens nested objects into dotted keys, leaving out time series at any depth.
fn flatten_fields(value: &Value) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    if let Value::Object(map) = value {
        for (key, val) in map {
            if key != TIME_SERIES_KEY {
                flatten_into(key.clone(), val, &mut fields);
            }
        }
    }
    fields
}

fn flatten_into(prefix: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter().filter(|(k, _)| *k != TIME_SERIES_KEY) {
                flatten_into(format!("{prefix}.{key}"), val, out);
            }
        }
        Value::Array(items) if items.iter().all(|v| !v.is_object() && !v.is_array()) => {
            let joined = items.iter().map(scalar_text).collect::<Vec<_>>().join("; ");
            out.push((prefix, joined));
        }
        Value::Array(items) => {
            for (i, val) in items.iter().enumerate() {
                flatten_into(format!("{prefix}.{i}"), val, out);
            }
        }
        scalar => out.push((prefix, scalar_text(scalar))),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Plain {
        estado: &'static str,
        nested: Nested,
        tags: Vec<&'static str>,
        datos_temporales: Vec<u32>,
    }

    #[derive(Serialize)]
    struct Nested {
        a: f64,
        b: Option<u32>,
    }

    impl Reportable for Plain {
        fn title(&self) -> String {
            "Plain".to_string()
        }
    }

    fn plain() -> Plain {
        Plain {
            estado: "completado",
            nested: Nested { a: 1.5, b: None },
            tags: vec!["x", "y"],
            datos_temporales: vec![1, 2, 3],
        }
    }

    #[test]
    fn report_format_parses_known_names() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("txt".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn flatten_uses_dotted_keys_and_skips_time_series() {
        let fields = flatten_fields(&serde_json::to_value(plain()).unwrap());
        assert!(fields.contains(&("estado".to_string(), "completado".to_string())));
        assert!(fields.contains(&("nested.a".to_string(), "1.5".to_string())));
        assert!(fields.contains(&("nested.b".to_string(), String::new())));
        assert!(fields.contains(&("tags".to_string(), "x; y".to_string())));
        assert!(fields.iter().all(|(k, _)| !k.starts_with("datos_temporales")));
    }

    #[test]
    fn default_csv_is_key_value_rows() {
        let csv = render(&plain(), ReportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("campo,valor"));
        assert!(csv.contains("nested.a,1.5"));
    }

    #[test]
    fn text_report_has_title_and_sample_count() {
        let text = render(&plain(), ReportFormat::Text).unwrap();
        assert!(text.starts_with("Plain\n=====\n"));
        assert!(text.contains("estado: completado"));
        assert!(text.contains("muestras: 3"));
    }

    #[test]
    fn write_report_terminates_with_newline() {
        let mut buf = Vec::new();
        write_report(&plain(), ReportFormat::Json, &mut buf).unwrap();
        assert!(buf.ends_with(b"\n"));
    }
}
