use clap::Parser;
use reqwest::Url;

use crate::{api::energyflow, dashboard::Dashboard, prelude::*};

#[derive(Parser)]
pub struct BackendArgs {
    /// EnergyFlow backend base URL.
    #[clap(
        long = "backend-url",
        env = "ENERGYFLOW_BACKEND_URL",
        default_value = "https://energyflow-esp32.onrender.com"
    )]
    pub base_url: Url,

    /// ID token issued by the identity provider for the signed-in user.
    #[clap(long = "id-token", env = "ENERGYFLOW_ID_TOKEN", hide_env_values = true)]
    pub id_token: String,
}

impl BackendArgs {
    pub fn new_client(&self) -> Result<energyflow::Api> {
        energyflow::Api::try_new(self.base_url.clone(), &self.id_token)
    }

    pub fn new_dashboard(&self) -> Result<Dashboard<energyflow::Api>> {
        Ok(Dashboard::builder().backend(self.new_client()?).build())
    }
}
