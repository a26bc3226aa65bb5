use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use serde_with::serde_as;

use crate::{
    billing::BillingRecord,
    quantity::{cost::Cost, energy::KilowattHours, power::Watts, voltage::Volts},
};

#[must_use]
#[derive(Clone, Debug, Deserialize)]
pub struct Status {
    pub status: String,
}

/// Latest meter telemetry.
///
/// The backend answers with zeroes when the meter has never reported, and any missing field is
/// read as zero as well.
#[must_use]
#[serde_as]
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LiveData {
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub voltage: Volts,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub power: Watts,

    /// Cumulative meter reading.
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default, rename = "energy_kWh")]
    pub total_energy: KilowattHours,

    #[serde_as(as = "serde_with::DefaultOnNull<serde_with::TimestampSeconds<i64>>")]
    #[serde(default, rename = "timestamp")]
    pub measured_at: DateTime<Utc>,

    /// Usage accrued since the last billing reading.
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub units_used: KilowattHours,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default, rename = "last_bill_amount")]
    pub last_bill: Cost,
}

#[must_use]
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Device {
    pub device_id: String,

    /// Zero when the meter has never reported.
    #[serde_as(as = "serde_with::DefaultOnNull<serde_with::TimestampSeconds<i64>>")]
    #[serde(default)]
    pub last_seen: DateTime<Utc>,
}

impl Device {
    /// A device counts as active when it has reported within this window.
    pub const ACTIVITY_WINDOW: TimeDelta = TimeDelta::seconds(30);

    #[must_use]
    pub fn last_seen_at(&self) -> Option<DateTime<Utc>> {
        (self.last_seen.timestamp() != 0).then_some(self.last_seen)
    }

    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.last_seen_at().is_some_and(|last_seen| now - last_seen < Self::ACTIVITY_WINDOW)
    }
}

/// Billing records ordered by the end of the billed period.
#[must_use]
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Deserialize,
    derive_more::Deref,
    derive_more::IntoIterator,
)]
#[into_iterator(owned, ref)]
#[serde(from = "Option<RawBillingHistory>")]
pub struct BillingHistory(Vec<BillingRecord>);

impl From<Vec<BillingRecord>> for BillingHistory {
    fn from(mut records: Vec<BillingRecord>) -> Self {
        records.sort_by_key(|record| record.to);
        Self(records)
    }
}

/// The history is stored under push IDs, so it comes as an object, `null` when empty, or an
/// array with holes when the keys happen to look like indices.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawBillingHistory {
    Keyed(BTreeMap<String, Option<BillingRecord>>),
    Listed(Vec<Option<BillingRecord>>),
}

impl From<Option<RawBillingHistory>> for BillingHistory {
    fn from(raw: Option<RawBillingHistory>) -> Self {
        let records: Vec<BillingRecord> = match raw {
            None => Vec::new(),
            Some(RawBillingHistory::Keyed(records)) => records.into_values().flatten().collect(),
            Some(RawBillingHistory::Listed(records)) => records.into_iter().flatten().collect(),
        };
        records.into()
    }
}

/// Outcome of closing a billing cycle.
#[must_use]
#[serde_as]
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct Reading {
    /// Missing for the very first reading, which only sets the baseline.
    #[serde(default)]
    pub units: Option<KilowattHours>,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub amount: Cost,
}

#[must_use]
#[derive(Clone, Debug, Deserialize)]
pub struct Registration {
    pub message: String,
}
