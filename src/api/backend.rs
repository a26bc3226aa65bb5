use async_trait::async_trait;

use crate::{
    api::energyflow::{BillingHistory, Device, LiveData, Reading, Status},
    prelude::*,
};

/// EnergyFlow backend operations used by the dashboard.
#[async_trait]
pub trait Backend: Sync {
    async fn get_status(&self) -> Result<Status>;

    /// Latest telemetry of the registered meter.
    async fn get_live(&self) -> Result<LiveData>;

    async fn list_devices(&self) -> Result<Vec<Device>>;

    async fn get_billing_history(&self) -> Result<BillingHistory>;

    /// Close the current billing cycle at the latest meter reading.
    async fn take_reading(&self) -> Result<Reading>;

    async fn register_device(&self, device_id: &str) -> Result;
}
