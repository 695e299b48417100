use std::sync::{Arc, Mutex};

use log::{error, info};

use clipvault::application::{CaptureLoop, Session};
use clipvault::config::{self, Settings};
use clipvault::error::Result;
use clipvault::infrastructure::clipboard::SystemClipboard;
use clipvault::infrastructure::storage::ClipboardStore;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        error!("fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let settings = Settings::load(None);
    let database_path = config::get_database_path()?;
    let store = Arc::new(ClipboardStore::open(&database_path.to_string_lossy())?);
    info!("database ready at {}", database_path.display());

    let session = Arc::new(Mutex::new(Session::new(settings, None)));

    let reader = SystemClipboard::new()?;
    let mut capture = CaptureLoop::new(Box::new(reader), Arc::clone(&store), Arc::clone(&session));
    capture.set_observer(Box::new(|item| {
        info!("captured {} item {}", item.item_type, item.id);
    }));
    let handle = capture.handle();
    let capture_task = tokio::spawn(capture.run());

    tokio::signal::ctrl_c()
        .await
        .map_err(clipvault::AppError::from)?;
    info!("shutting down");

    handle.stop();
    if let Err(e) = capture_task.await {
        error!("capture task did not shut down cleanly: {}", e);
    }
    Ok(())
}
