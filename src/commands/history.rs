use std::sync::Arc;

use crate::app::App;
use crate::services::history_service::{build_rows, render_history};

pub async fn execute(app: &Arc<App>, args: &[&str]) -> Result<(), String> {
    app.require_dashboard()?;

    let page = match args.first() {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| "Usage: `history [page]`".to_string())?,
        None => 1,
    };

    let profile = app.profile().await?;
    let history = app.history().await?;

    let rows = build_rows(&history, &profile.email);
    println!("📋 Transaction History\n{}", render_history(rows, page)?);
    Ok(())
}
