use clap::Parser;

use crate::{
    calendar::Month,
    cli::backend::BackendArgs,
    prelude::*,
    tables::build_calendar_table,
};

#[derive(Parser)]
pub struct CalendarArgs {
    /// Year to show, the current one by default.
    #[clap(long)]
    pub year: Option<i32>,

    /// Month to show, from 1 to 12, the current one by default.
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Move the displayed month forward or back by this many months.
    #[clap(long, allow_negative_numbers = true, default_value = "0")]
    pub shift: i32,

    #[clap(flatten)]
    pub backend: BackendArgs,
}

impl CalendarArgs {
    fn month(&self) -> Result<Month> {
        let current = Month::current();
        Month::try_new(
            self.year.unwrap_or_else(|| current.year()),
            self.month.map_or_else(|| current.month0(), |month| month - 1),
        )
    }

    #[instrument(skip_all)]
    pub async fn run(&self) -> Result {
        let mut dashboard = self.backend.new_dashboard()?;
        dashboard.set_month(self.month()?);
        for _ in 0..self.shift.unsigned_abs() {
            if self.shift > 0 { dashboard.next_month() } else { dashboard.previous_month() }
        }
        dashboard.load_history().await?;
        debug!(month = %dashboard.month(), first_day = %dashboard.month().first_day());
        println!("{}", build_calendar_table(dashboard.month(), &dashboard.calendar()));
        Ok(())
    }
}
