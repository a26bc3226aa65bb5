//! Application state and the operations that refresh it.

pub mod chart;
pub mod polling;

use bon::Builder;
use chrono::{DateTime, Local, Utc};

use self::{
    chart::{ChartBuffer, Sample},
    polling::PollStatus,
};
use crate::{
    api::{
        Backend,
        energyflow::{BillingHistory, Device, LiveData, Reading},
    },
    calendar::{CalendarCell, Month, aggregate_local},
    prelude::*,
    quantity::cost::Cost,
    tariff::Tariff,
};

/// Dashboard state, owned by a single controller.
///
/// The tariff and the calendar stay pure: they only ever see snapshots of this state.
#[derive(Builder)]
pub struct Dashboard<B> {
    backend: B,

    #[builder(default)]
    tariff: Tariff,

    /// Month displayed by the billing calendar.
    #[builder(default = Month::current())]
    month: Month,

    #[builder(default)]
    chart: ChartBuffer,

    #[builder(skip)]
    live: Option<LiveData>,

    #[builder(skip)]
    devices: Vec<Device>,

    #[builder(skip)]
    history: BillingHistory,

    #[builder(skip)]
    live_status: PollStatus,

    #[builder(skip)]
    devices_status: PollStatus,
}

impl<B: Backend> Dashboard<B> {
    pub const fn month(&self) -> Month {
        self.month
    }

    pub const fn set_month(&mut self, month: Month) {
        self.month = month;
    }

    pub fn next_month(&mut self) {
        self.month = self.month.next();
    }

    pub fn previous_month(&mut self) {
        self.month = self.month.previous();
    }

    pub const fn chart(&self) -> &ChartBuffer {
        &self.chart
    }

    pub const fn live(&self) -> Option<&LiveData> {
        self.live.as_ref()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub const fn history(&self) -> &BillingHistory {
        &self.history
    }

    pub const fn live_status(&self) -> &PollStatus {
        &self.live_status
    }

    pub const fn devices_status(&self) -> &PollStatus {
        &self.devices_status
    }

    /// Bill accrued since the last reading, or zero before the first telemetry arrives.
    pub fn current_bill(&self) -> Cost {
        self.live.map_or(Cost::ZERO, |live| self.tariff.cost(live.units_used))
    }

    pub fn calendar(&self) -> Vec<CalendarCell> {
        aggregate_local(self.month, &self.history)
    }

    /// Total billed over the displayed month.
    pub fn month_total(&self) -> Cost {
        self.calendar()
            .into_iter()
            .filter_map(|cell| match cell {
                CalendarCell::Day(day) => Some(day.total),
                CalendarCell::Blank => None,
            })
            .sum()
    }

    /// Fetch the live telemetry and append it to the chart.
    ///
    /// A failure is recorded and logged, and the previous state is kept.
    #[instrument(skip_all)]
    pub async fn poll_live(&mut self, now: DateTime<Utc>) {
        match self.backend.get_live().await {
            Ok(live) => {
                self.chart.push(Sample {
                    at: now.with_timezone(&Local),
                    voltage: live.voltage,
                    power: live.power,
                });
                self.live = Some(live);
                self.live_status.record_success(now);
            }
            Err(error) => {
                self.live_status.record_failure(now, &error);
                warn!(
                    n_failures = self.live_status.n_consecutive_failures,
                    "failed to fetch the live data: {error:#}",
                );
            }
        }
    }

    /// Refresh the device list, keeping the previous one on failure.
    #[instrument(skip_all)]
    pub async fn poll_devices(&mut self, now: DateTime<Utc>) {
        match self.backend.list_devices().await {
            Ok(devices) => {
                self.devices = devices;
                self.devices_status.record_success(now);
            }
            Err(error) => {
                self.devices_status.record_failure(now, &error);
                warn!(
                    n_failures = self.devices_status.n_consecutive_failures,
                    "failed to fetch the devices: {error:#}",
                );
            }
        }
    }

    pub async fn load_history(&mut self) -> Result {
        self.history = self.backend.get_billing_history().await?;
        Ok(())
    }

    /// Close the billing cycle and reload the history so that the calendar shows it.
    pub async fn take_reading(&mut self) -> Result<Reading> {
        let reading = self.backend.take_reading().await?;
        self.load_history()
            .await
            .context("the reading is taken, but the history reload failed")?;
        Ok(reading)
    }

    pub async fn register_device(&mut self, device_id: &str, now: DateTime<Utc>) -> Result {
        self.backend.register_device(device_id).await?;
        self.poll_devices(now).await;
        Ok(())
    }
}
