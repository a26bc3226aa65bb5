//! EnergyFlow REST backend client.

mod models;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    Method,
    Url,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;

pub use self::models::{BillingHistory, Device, LiveData, Reading, Registration, Status};
use crate::{api::Backend, prelude::*};

pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    pub fn try_new(base_url: Url, id_token: &str) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {id_token}"))
            .context("the ID token is not a valid header value")?;
        authorization.set_sensitive(true);
        let headers = HeaderMap::from_iter([(AUTHORIZATION, authorization)]);
        let client = Client::builder()
            .user_agent("energyflow")
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> Result<Url> {
        if path.is_empty() {
            return Ok(self.base_url.clone());
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid base URL `{}`", self.base_url))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(path = path))]
    async fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<R> {
        let response = self
            .client
            .request(method, self.url(path)?)
            .query(query)
            .send()
            .await
            .with_context(|| format!("failed to call `/{path}`"))?
            .error_for_status()
            .with_context(|| format!("`/{path}` failed"))?
            .json::<serde_json::Value>()
            .await
            .with_context(|| format!("failed to deserialize `/{path}` response JSON"))?;
        debug!(?response, "call succeeded");
        serde_json::from_value(response)
            .with_context(|| format!("failed to deserialize `/{path}` response structure"))
    }
}

#[async_trait]
impl Backend for Api {
    #[instrument(skip_all)]
    async fn get_status(&self) -> Result<Status> {
        self.call(Method::GET, "", &[]).await
    }

    #[instrument(skip_all)]
    async fn get_live(&self) -> Result<LiveData> {
        let live: LiveData = self.call(Method::GET, "live", &[]).await?;
        debug!(voltage = ?live.voltage, power = ?live.power, units_used = ?live.units_used);
        Ok(live)
    }

    #[instrument(skip_all)]
    async fn list_devices(&self) -> Result<Vec<Device>> {
        let devices: Vec<Device> = self.call(Method::GET, "devices", &[]).await?;
        debug!(n_devices = devices.len(), "fetched");
        Ok(devices)
    }

    #[instrument(skip_all)]
    async fn get_billing_history(&self) -> Result<BillingHistory> {
        let history: BillingHistory = self.call(Method::GET, "billing/history", &[]).await?;
        info!(n_records = history.len(), "fetched the billing history");
        Ok(history)
    }

    #[instrument(skip_all)]
    async fn take_reading(&self) -> Result<Reading> {
        info!("taking a reading…");
        let reading: Reading = self.call(Method::POST, "billing/take-reading", &[]).await?;
        info!(units = ?reading.units, amount = ?reading.amount, "taken");
        Ok(reading)
    }

    #[instrument(skip_all, fields(device_id = device_id))]
    async fn register_device(&self, device_id: &str) -> Result {
        ensure!(!device_id.trim().is_empty(), "device ID must not be empty");
        let registration: Registration =
            self.call(Method::POST, "register-device", &[("device_id", device_id)]).await?;
        info!(response = %registration.message, "registered");
        Ok(())
    }
}
