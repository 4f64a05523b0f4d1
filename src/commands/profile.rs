use std::sync::Arc;

use crate::app::App;
use crate::models::BalanceTrend;
use crate::services::balance_service::format_balance;
use crate::services::profile_service::{build_profile, format_profile};

pub async fn execute(app: &Arc<App>, args: &[&str]) -> Result<(), String> {
    app.require_dashboard()?;

    let reveal = match args.first() {
        None => false,
        Some(&"reveal") => true,
        Some(other) => return Err(format!("Unknown option `{}`. Usage: `profile [reveal]`", other)),
    };

    let snapshot = app.profile().await?;
    println!("{}", format_profile(&build_profile(&snapshot, reveal)));
    Ok(())
}

pub async fn balance(app: &Arc<App>) -> Result<(), String> {
    app.require_dashboard()?;

    let balance = app.known_balance().await?;
    let marker = if app.cache.profile.is_stale() {
        " (refreshing…)"
    } else {
        ""
    };
    println!("💰 {}{}", format_balance(balance, BalanceTrend::Unchanged), marker);
    Ok(())
}
