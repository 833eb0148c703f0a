//! BCRA statistics API (v2.0) integration.
//!
//! Two endpoints are used:
//!
//! - `PrincipalesVariables`: current value + as-of date for every published variable
//! - `DatosVariable/{id}/{desde}/{hasta}`: history for one variable
//!
//! Historical fetches never fail the run: any error is logged and an empty
//! series comes back, so callers can degrade (placeholder panel) or abort
//! with their own policy.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::Certificate;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::{DateRange, HistoricalPoint, Series, Variable, VariableId};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.bcra.gob.ar/estadisticas/v2.0";

/// How server certificates are validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustPolicy {
    /// Built-in root store only.
    SystemRoots,
    /// Built-in roots plus one extra PEM-encoded root.
    ExtraRoot(PathBuf),
    /// Accept any certificate.
    AcceptInvalid,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub trust: TrustPolicy,
    /// `None` keeps reqwest's default timeout.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            trust: TrustPolicy::SystemRoots,
            timeout: None,
        }
    }
}

/// Where the pipelines get their data from.
///
/// `BcraClient` is the real implementation; tests plug in canned data.
pub trait IndicatorSource {
    fn principal_variables(&self) -> Result<Vec<Variable>, AppError>;

    /// Must return an empty series instead of failing.
    fn series(&self, id: VariableId, range: DateRange) -> Series;
}

pub struct BcraClient {
    client: Client,
    base_url: String,
}

impl BcraClient {
    pub fn new(config: &ClientConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        match &config.trust {
            TrustPolicy::SystemRoots => {}
            TrustPolicy::ExtraRoot(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    AppError::config(format!("Failed to read CA certificate '{}': {e}", path.display()))
                })?;
                let cert = Certificate::from_pem(&pem).map_err(|e| {
                    AppError::config(format!("Invalid CA certificate '{}': {e}", path.display()))
                })?;
                info!(path = %path.display(), "trusting extra root certificate");
                builder = builder.add_root_certificate(cert);
            }
            TrustPolicy::AcceptInvalid => {
                warn!("TLS certificate validation is disabled (--insecure)");
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        let client = builder
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn principal_variables_url(&self) -> String {
        format!("{}/PrincipalesVariables", self.base_url)
    }

    pub fn series_url(&self, id: VariableId, range: DateRange) -> String {
        format!(
            "{}/DatosVariable/{id}/{}/{}",
            self.base_url,
            range.from().format("%Y-%m-%d"),
            range.to().format("%Y-%m-%d"),
        )
    }

    pub fn fetch_principal_variables(&self) -> Result<Vec<Variable>, AppError> {
        let url = self.principal_variables_url();
        debug!(%url, "requesting principal variables");

        let body = self.get_text(&url)?;
        let variables = parse_variables(&body)?;

        debug!(count = variables.len(), "principal variables received");
        Ok(variables)
    }

    /// Fetch one historical series; empty on any failure.
    pub fn fetch_series(&self, id: VariableId, range: DateRange) -> Series {
        match self.try_fetch_series(id, range) {
            Ok(series) => series,
            Err(err) => {
                warn!(id, %range, "historical data unavailable: {err}");
                Series::empty(id)
            }
        }
    }

    fn try_fetch_series(&self, id: VariableId, range: DateRange) -> Result<Series, AppError> {
        let url = self.series_url(id, range);
        debug!(%url, "requesting historical series");

        let body = self.get_text(&url)?;
        let points = parse_series(id, &body)?;

        debug!(id, count = points.len(), "historical series received");
        Ok(Series::new(id, points))
    }

    fn get_text(&self, url: &str) -> Result<String, AppError> {
        let resp = self.client.get(url).send().map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::response(format!("GET {url} failed with status {status}.")));
        }

        resp.text()
            .map_err(|e| AppError::response(format!("Failed to read response from {url}: {e}")))
    }
}

impl IndicatorSource for BcraClient {
    fn principal_variables(&self) -> Result<Vec<Variable>, AppError> {
        self.fetch_principal_variables()
    }

    fn series(&self, id: VariableId, range: DateRange) -> Series {
        self.fetch_series(id, range)
    }
}

fn transport_error(e: reqwest::Error) -> AppError {
    if e.is_connect() || e.is_timeout() {
        AppError::connection(e.to_string())
    } else {
        AppError::response(format!("Request failed: {e}"))
    }
}

#[derive(Debug, Deserialize)]
struct ResultsEnvelope<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RawVariable {
    #[serde(rename = "idVariable")]
    id: VariableId,
    #[serde(rename = "descripcion", default)]
    description: Option<String>,
    #[serde(rename = "fecha")]
    date: String,
    #[serde(rename = "valor", default)]
    value: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    #[serde(rename = "fecha")]
    date: String,
    #[serde(rename = "valor", default)]
    value: Option<RawValue>,
}

/// `valor` is numeric in v2.0, but tolerate string-encoded numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    fn to_f64(&self) -> Option<f64> {
        let v = match self {
            RawValue::Number(v) => *v,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

fn parse_envelope<'de, T: Deserialize<'de>>(body: &'de str, what: &str) -> Result<Vec<T>, AppError> {
    let envelope: ResultsEnvelope<T> = serde_json::from_str(body)
        .map_err(|e| AppError::response(format!("Unexpected {what} payload: {e}")))?;
    Ok(envelope.results)
}

/// Parse a `PrincipalesVariables` body.
pub fn parse_variables(body: &str) -> Result<Vec<Variable>, AppError> {
    let raw: Vec<RawVariable> = parse_envelope(body, "principal variables")?;

    let mut out = Vec::with_capacity(raw.len());
    for row in raw {
        let Some(date) = parse_date(&row.date) else {
            warn!(id = row.id, fecha = %row.date, "skipping variable with unparseable date");
            continue;
        };
        let Some(value) = row.value.as_ref().and_then(RawValue::to_f64) else {
            warn!(id = row.id, "skipping variable without a numeric value");
            continue;
        };
        out.push(Variable {
            id: row.id,
            label: row.description,
            value,
            date,
        });
    }
    Ok(out)
}

/// Parse a `DatosVariable` body. Points come back in response order.
pub fn parse_series(id: VariableId, body: &str) -> Result<Vec<HistoricalPoint>, AppError> {
    let raw: Vec<RawPoint> = parse_envelope(body, &format!("historical data (id {id})"))?;

    let mut out = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;
    for row in raw {
        let date = parse_date(&row.date);
        let value = row.value.as_ref().and_then(RawValue::to_f64);
        match (date, value) {
            (Some(date), Some(value)) => out.push(HistoricalPoint { date, value }),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(id, skipped, "skipped malformed historical rows");
    }
    Ok(out)
}

/// Accepts `YYYY-MM-DD` (optionally followed by a time part) and `DD/MM/YYYY`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.split('T').next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(day, "%d/%m/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn range() -> DateRange {
        DateRange::new(d(2023, 9, 4), d(2024, 9, 4)).unwrap()
    }

    /// Nothing listens on the discard port locally, so connects are refused.
    fn unreachable_client() -> BcraClient {
        BcraClient::new(&ClientConfig {
            base_url: "http://127.0.0.1:9/estadisticas/v2.0".to_string(),
            trust: TrustPolicy::SystemRoots,
            timeout: Some(Duration::from_secs(5)),
        })
        .unwrap()
    }

    /// Local server answering every request with `500`, for `requests` connections.
    fn failing_server(requests: usize) -> (String, std::thread::JoinHandle<()>) {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = std::thread::spawn(move || {
            for _ in 0..requests {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut chunk).unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                let body = r#"{"status":500,"errorMessages":["internal"]}"#;
                write!(
                    stream,
                    "HTTP/1.1 500 Internal Server Error\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                )
                .unwrap();
            }
        });
        (format!("http://{addr}/estadisticas/v2.0"), handle)
    }

    #[test]
    fn server_error_status_yields_empty_series_and_fatal_current_values() {
        let (base_url, server) = failing_server(2);
        let client = BcraClient::new(&ClientConfig {
            base_url,
            trust: TrustPolicy::SystemRoots,
            timeout: Some(Duration::from_secs(5)),
        })
        .unwrap();

        let series = client.fetch_series(31, range());
        assert!(series.is_empty());
        assert_eq!(series.id, 31);

        let err = client.fetch_principal_variables().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Response);
        assert!(err.message().contains("500"));

        server.join().unwrap();
    }

    #[test]
    fn urls_follow_api_layout() {
        let client = BcraClient::new(&ClientConfig {
            base_url: format!("{DEFAULT_BASE_URL}/"),
            ..ClientConfig::default()
        })
        .unwrap();

        assert_eq!(
            client.principal_variables_url(),
            "https://api.bcra.gob.ar/estadisticas/v2.0/PrincipalesVariables"
        );
        assert_eq!(
            client.series_url(31, range()),
            "https://api.bcra.gob.ar/estadisticas/v2.0/DatosVariable/31/2023-09-04/2024-09-04"
        );
    }

    #[test]
    fn parses_series_and_skips_bad_rows() {
        let body = r#"{
            "status": 200,
            "results": [
                {"idVariable": 5, "fecha": "2023-09-05", "valor": 350.1},
                {"idVariable": 5, "fecha": "not-a-date", "valor": 1.0},
                {"idVariable": 5, "fecha": "04/09/2023", "valor": "349.95"},
                {"idVariable": 5, "fecha": "2023-09-06", "valor": null}
            ]
        }"#;

        let points = parse_series(5, body).unwrap();
        assert_eq!(
            points,
            vec![
                HistoricalPoint { date: d(2023, 9, 5), value: 350.1 },
                HistoricalPoint { date: d(2023, 9, 4), value: 349.95 },
            ]
        );
    }

    #[test]
    fn missing_results_is_a_response_error() {
        let err = parse_series(5, r#"{"status": 400, "errorMessages": ["bad range"]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Response);

        let err = parse_series(5, r#"{"results": [1, 2, 3]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Response);

        let err = parse_variables("<html>maintenance</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Response);
    }

    #[test]
    fn parses_principal_variables() {
        let body = r#"{
            "results": [
                {"idVariable": 1, "cdSerie": 246, "descripcion": "Reservas Internacionales del BCRA (en millones de dólares)", "fecha": "2024-09-04", "valor": 27415.0},
                {"idVariable": 31, "cdSerie": 3540, "fecha": "2024-09-06", "valor": 1094.56},
                {"idVariable": 99, "fecha": "2024-09-06"}
            ]
        }"#;

        let vars = parse_variables(body).unwrap();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].id, 1);
        assert_eq!(vars[0].date, d(2024, 9, 4));
        assert!(vars[0].label.as_deref().unwrap().starts_with("Reservas"));
        assert_eq!(vars[1].id, 31);
        assert_eq!(vars[1].label, None);
        assert!((vars[1].value - 1094.56).abs() < 1e-12);
    }

    #[test]
    fn parse_date_accepts_both_layouts() {
        assert_eq!(parse_date("2024-09-04"), Some(d(2024, 9, 4)));
        assert_eq!(parse_date("2024-09-04T00:00:00"), Some(d(2024, 9, 4)));
        assert_eq!(parse_date(" 04/09/2024 "), Some(d(2024, 9, 4)));
        assert_eq!(parse_date("09-04-2024"), None);
    }

    #[test]
    fn network_error_yields_empty_series() {
        let client = unreachable_client();
        let series = client.fetch_series(5, range());
        assert!(series.is_empty());
        assert_eq!(series.id, 5);
    }

    #[test]
    fn network_error_on_current_values_is_fatal() {
        let client = unreachable_client();
        let err = client.fetch_principal_variables().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);
    }

    #[test]
    fn missing_ca_file_is_a_config_error() {
        let err = BcraClient::new(&ClientConfig {
            trust: TrustPolicy::ExtraRoot(PathBuf::from("/nonexistent/bcra-ca.pem")),
            ..ClientConfig::default()
        })
        .err()
        .unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
