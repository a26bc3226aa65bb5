use crate::{cli::backend::BackendArgs, prelude::*, tables::build_history_table};

#[instrument(skip_all)]
pub async fn history(args: &BackendArgs) -> Result {
    let mut dashboard = args.new_dashboard()?;
    dashboard.load_history().await?;
    if dashboard.history().is_empty() {
        warn!("no billing readings yet, take one with `energyflow reading`");
    } else {
        println!("{}", build_history_table(dashboard.history()));
    }
    Ok(())
}

#[instrument(skip_all)]
pub async fn take_reading(args: &BackendArgs) -> Result {
    let mut dashboard = args.new_dashboard()?;
    let reading = dashboard.take_reading().await?;
    match reading.units {
        Some(units) => info!(units = ?units, amount = %reading.amount, "billing cycle closed"),
        None => info!("baseline reading taken, the next reading will be billed"),
    }
    println!("{}", build_history_table(dashboard.history()));
    Ok(())
}
