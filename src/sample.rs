//! Probe outcomes

use std::fmt;
use std::time::Duration;

/// Classification of a single probe outcome
///
/// HTTP responses are classified by the hundreds digit of their status code.
/// `Timeout` and `Unreachable` are synthetic classes for transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// 2xx
    Success,
    /// 4xx
    ClientError,
    /// 5xx (connection failures are reported here as well)
    ServerError,
    Timeout,
    Unreachable,
    /// Any other status family (1xx, 3xx, ...)
    Other,
}

impl StatusClass {
    pub fn from_status_code(code: u16) -> Self {
        match code / 100 {
            2 => StatusClass::Success,
            4 => StatusClass::ClientError,
            5 => StatusClass::ServerError,
            _ => StatusClass::Other,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StatusClass::Success)
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatusClass::Success => "2xx",
            StatusClass::ClientError => "4xx",
            StatusClass::ServerError => "5xx",
            StatusClass::Timeout => "timeout",
            StatusClass::Unreachable => "unreachable",
            StatusClass::Other => "other",
        };
        f.write_str(label)
    }
}

/// Immutable record of one probe outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    latency: Duration,
    status: StatusClass,
}

impl Sample {
    pub fn new(latency: Duration, status: StatusClass) -> Self {
        Self { latency, status }
    }

    /// Sample for a response carrying the given HTTP status code
    pub fn from_response(latency: Duration, status_code: u16) -> Self {
        Self::new(latency, StatusClass::from_status_code(status_code))
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn status(&self) -> StatusClass {
        self.status
    }
}
