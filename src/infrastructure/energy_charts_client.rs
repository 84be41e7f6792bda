// Energy-Charts public_power client
use crate::application::generation_source::GenerationSource;
use crate::domain::country::{Country, FuelNameTable};
use crate::domain::generation::{non_negative, FuelValues, Sample};
use crate::domain::window::FetchWindow;
use crate::error::{PipelineError, PipelineResult};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EnergyChartsClient {
    base_url: String,
    client: reqwest::Client,
    fuel_names: FuelNameTable,
}

#[derive(Debug, Deserialize)]
struct PublicPowerResponse {
    #[serde(default)]
    unix_seconds: Option<Vec<i64>>,
    #[serde(default)]
    production_types: Vec<ProductionType>,
}

#[derive(Debug, Deserialize)]
struct ProductionType {
    name: String,
    #[serde(default)]
    data: Vec<Option<f64>>,
}

impl EnergyChartsClient {
    pub fn new(base_url: &str, timeout: Duration, fuel_names: FuelNameTable) -> PipelineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| PipelineError::Http {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            fuel_names,
        })
    }

    fn build_url(&self, country_code: &str, window: FetchWindow) -> String {
        format!(
            "{}/public_power?country={}&start={}&end={}",
            self.base_url,
            urlencoding::encode(country_code),
            window.start,
            window.end
        )
    }
}

#[async_trait]
impl GenerationSource for EnergyChartsClient {
    async fn fetch_samples(&self, country: &Country, window: FetchWindow) -> PipelineResult<Vec<Sample>> {
        let url = self.build_url(&country.code, window);
        tracing::info!("Downloading data for {} from {} to {}", country.code, window.start, window.end);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| PipelineError::Http {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::UpstreamStatus { url, status, body });
        }

        let text = response.text().await.map_err(|source| PipelineError::Http {
            url: url.clone(),
            source,
        })?;

        let samples = parse_samples(&text, &self.fuel_names)?;
        tracing::debug!("Parsed {} samples for {}", samples.len(), country.code);
        Ok(samples)
    }
}

/// Turn a `public_power` payload into samples. Production types not in the
/// fuel table are ignored; absent series and `null` readings count as zero,
/// and negative readings are clamped to zero.
pub fn parse_samples(body: &str, fuel_names: &FuelNameTable) -> PipelineResult<Vec<Sample>> {
    let payload: PublicPowerResponse =
        serde_json::from_str(body).map_err(|e| PipelineError::MalformedPayload(e.to_string()))?;

    let Some(unix_seconds) = payload.unix_seconds else {
        tracing::warn!("Payload has no timestamps, treating as empty");
        return Ok(Vec::new());
    };

    let mut samples = unix_seconds
        .iter()
        .map(|secs| {
            DateTime::from_timestamp(*secs, 0)
                .map(|timestamp| Sample::new(timestamp, FuelValues::default()))
                .ok_or_else(|| PipelineError::MalformedPayload(format!("timestamp {secs} out of range")))
        })
        .collect::<PipelineResult<Vec<Sample>>>()?;

    for production_type in &payload.production_types {
        let Some(fuel) = fuel_names.fuel_for(&production_type.name) else {
            continue;
        };

        if production_type.data.len() != samples.len() {
            tracing::debug!(
                "Series '{}' has {} values for {} timestamps",
                production_type.name,
                production_type.data.len(),
                samples.len()
            );
        }

        // Several production types may map to one fuel
        for (sample, value) in samples.iter_mut().zip(&production_type.data) {
            let reading = value.unwrap_or(0.0);
            if reading < 0.0 {
                tracing::debug!("Clamping negative '{}' reading {} to zero", production_type.name, reading);
            }
            let current = sample.power_mw.get(fuel);
            sample.power_mw.set(fuel, current + non_negative(reading));
        }
    }

    Ok(samples)
}
