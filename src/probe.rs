//! HTTP availability probe
//!
//! A probe never fails: every transport outcome is folded into a [`Sample`].
//!
//! | outcome            | status class  | latency         |
//! |--------------------|---------------|-----------------|
//! | response           | status family | round trip time |
//! | timeout            | `Timeout`     | probe timeout   |
//! | connection failure | `ServerError` | zero            |
//! | other failure      | `Unreachable` | zero            |

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, instrument, trace};

use crate::sample::{Sample, StatusClass};

#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &str) -> Sample;
}

/// Probe issuing a HEAD request with a fixed timeout, without following redirects
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn failure_sample(&self, error: &reqwest::Error) -> Sample {
        if error.is_timeout() {
            Sample::new(self.timeout, StatusClass::Timeout)
        } else if error.is_connect() {
            Sample::new(Duration::ZERO, StatusClass::ServerError)
        } else {
            Sample::new(Duration::ZERO, StatusClass::Unreachable)
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    #[instrument(skip(self))]
    async fn probe(&self, url: &str) -> Sample {
        trace!("probing {url}");

        let start = Instant::now();
        let sample = match self.client.head(url).send().await {
            Ok(response) => Sample::from_response(start.elapsed(), response.status().as_u16()),
            Err(e) => {
                debug!("probe of {url} failed: {e}");
                self.failure_sample(&e)
            }
        };

        trace!(
            "{url}: {} in {:.4}s",
            sample.status(),
            sample.latency().as_secs_f64()
        );
        sample
    }
}
