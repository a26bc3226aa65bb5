use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::serde_as;

use crate::quantity::{cost::Cost, energy::KilowattHours};

/// One completed billing cycle, as stored by the backend.
///
/// Missing and `null` fields decode as zero.
#[must_use]
#[serde_as]
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BillingRecord {
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub energy_start: KilowattHours,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub energy_end: KilowattHours,

    #[serde_as(as = "serde_with::DefaultOnNull<serde_with::TimestampSeconds<i64>>")]
    #[serde(default, rename = "from_ts")]
    pub from: DateTime<Utc>,

    /// End of the billed period, used for the calendar day.
    #[serde_as(as = "serde_with::DefaultOnNull<serde_with::TimestampSeconds<i64>>")]
    #[serde(default, rename = "to_ts")]
    pub to: DateTime<Utc>,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub units: KilowattHours,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub amount: Cost,
}
