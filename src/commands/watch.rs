use std::sync::Arc;

use crate::app::App;

pub async fn start(app: &Arc<App>) -> Result<(), String> {
    app.require_dashboard()?;

    if app.start_watch().await {
        println!(
            "👀 Watching for updates every {}ms. `unwatch` to stop.",
            app.config.poll_interval.as_millis()
        );
    } else {
        println!("Already watching.");
    }
    Ok(())
}

pub async fn stop(app: &Arc<App>) -> Result<(), String> {
    if app.stop_watch().await {
        println!("Stopped watching.");
    } else {
        println!("Not watching.");
    }
    Ok(())
}
