use chrono::Utc;
use clap::Parser;
use tokio::{
    signal::ctrl_c,
    time::{Instant, sleep_until},
};

use crate::{
    cli::backend::BackendArgs,
    dashboard::polling::PollPolicy,
    prelude::*,
    tables::{build_devices_table, build_live_table},
};

#[derive(Parser)]
pub struct LiveArgs {
    #[clap(long, env = "ENERGYFLOW_LIVE_INTERVAL", default_value = "3s")]
    live_interval: humantime::Duration,

    #[clap(long, env = "ENERGYFLOW_DEVICES_INTERVAL", default_value = "10s")]
    devices_interval: humantime::Duration,

    /// Longest delay between polls while a feed keeps failing.
    #[clap(long, env = "ENERGYFLOW_MAX_BACKOFF", default_value = "1min")]
    max_backoff: humantime::Duration,

    #[clap(flatten)]
    backend: BackendArgs,
}

impl LiveArgs {
    fn policy(&self, period: &humantime::Duration) -> PollPolicy {
        PollPolicy { period: **period, max_delay: *self.max_backoff }
    }

    pub async fn run(&self) -> Result {
        let live_policy = self.policy(&self.live_interval);
        let devices_policy = self.policy(&self.devices_interval);
        let mut dashboard = self.backend.new_dashboard()?;

        if let Err(error) = dashboard.load_history().await {
            warn!("failed to load the billing history: {error:#}");
        }

        let mut next_live_at = Instant::now();
        let mut next_devices_at = Instant::now();

        loop {
            tokio::select! {
                () = sleep_until(next_live_at) => {
                    dashboard.poll_live(Utc::now()).await;
                    next_live_at = Instant::now() + live_policy.next_delay(dashboard.live_status());
                    println!("{}", build_live_table(&dashboard));
                }
                () = sleep_until(next_devices_at) => {
                    let now = Utc::now();
                    dashboard.poll_devices(now).await;
                    next_devices_at =
                        Instant::now() + devices_policy.next_delay(dashboard.devices_status());
                    println!("{}", build_devices_table(dashboard.devices(), now));
                }
                result = ctrl_c() => {
                    result.context("failed to listen for Ctrl-C")?;
                    info!("interrupted");
                    break;
                }
            }
        }

        Ok(())
    }
}
