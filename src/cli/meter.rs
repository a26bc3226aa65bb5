use chrono::Utc;
use clap::Parser;

use crate::{
    api::Backend,
    cli::backend::BackendArgs,
    prelude::*,
    tables::build_devices_table,
};

#[instrument(skip_all)]
pub async fn status(args: &BackendArgs) -> Result {
    let status = args.new_client()?.get_status().await?;
    info!(status = %status.status, url = %args.base_url, "backend is up");
    Ok(())
}

#[instrument(skip_all)]
pub async fn devices(args: &BackendArgs) -> Result {
    let devices = args.new_client()?.list_devices().await?;
    if devices.is_empty() {
        warn!("no devices found, register one with `energyflow register`");
    } else {
        println!("{}", build_devices_table(&devices, Utc::now()));
    }
    Ok(())
}

#[derive(Parser)]
pub struct RegisterArgs {
    /// Meter identifier, as printed by the device firmware.
    pub device_id: String,

    #[clap(flatten)]
    pub backend: BackendArgs,
}

impl RegisterArgs {
    #[instrument(skip_all, fields(device_id = %self.device_id))]
    pub async fn run(&self) -> Result {
        let mut dashboard = self.backend.new_dashboard()?;
        let now = Utc::now();
        dashboard.register_device(&self.device_id, now).await?;
        println!("{}", build_devices_table(dashboard.devices(), now));
        Ok(())
    }
}
