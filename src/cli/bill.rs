use clap::Parser;

use crate::{
    prelude::*,
    quantity::energy::KilowattHours,
    tables::build_tariff_table,
    tariff::Tariff,
};

#[derive(Parser)]
pub struct BillArgs {
    /// Usage since the last reading, in kilowatt-hours.
    #[clap(long, allow_negative_numbers = true)]
    pub units: KilowattHours,
}

impl BillArgs {
    pub fn run(&self) {
        let tariff = Tariff::default();
        if !self.units.is_finite() || self.units < KilowattHours::ZERO {
            warn!(units = ?self.units, "usage is not a valid amount, billing it as zero");
        }
        let breakdown = tariff.breakdown(self.units);
        println!("{}", build_tariff_table(&breakdown));
        info!(units = ?self.units, cost = %tariff.cost(self.units), "calculated");
    }
}
