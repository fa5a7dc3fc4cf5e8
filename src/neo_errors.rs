use thiserror::Error;

#[derive(Error, Debug)]
pub enum NeoError {
    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("HTTP status {status} returned by {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("JSON deserialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing field in NeoWs response: {0}")]
    MissingField(&'static str),

    #[error("Invalid number for field {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Invalid impact scenario: {0}")]
    InvalidScenario(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unable to parse configuration file: {0}")]
    ConfigFileError(#[from] toml::de::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("System clock error: {0}")]
    ClockError(String),
}

impl From<hifitime::HifitimeError> for NeoError {
    fn from(err: hifitime::HifitimeError) -> Self {
        NeoError::ClockError(err.to_string())
    }
}

impl PartialEq for NeoError {
    fn eq(&self, other: &Self) -> bool {
        use NeoError::*;
        match (self, other) {
            (
                HttpStatus {
                    status: a,
                    url: ua,
                },
                HttpStatus {
                    status: b,
                    url: ub,
                },
            ) => a == b && ua == ub,
            (InvalidUrl(a), InvalidUrl(b)) => a == b,
            (MissingField(a), MissingField(b)) => a == b,
            (
                InvalidNumber {
                    field: fa,
                    value: va,
                },
                InvalidNumber {
                    field: fb,
                    value: vb,
                },
            ) => fa == fb && va == vb,
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (InvalidDateRange(a), InvalidDateRange(b)) => a == b,
            (InvalidScenario(a), InvalidScenario(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,
            (ClockError(a), ClockError(b)) => a == b,

            // Wrapped foreign errors are not comparable: equal when same variant
            (ReqwestError(_), ReqwestError(_)) => true,
            (JsonError(_), JsonError(_)) => true,
            (ConfigFileError(_), ConfigFileError(_)) => true,
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}
