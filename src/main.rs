use std::sync::Arc;

use eyre::{Context, Result};
use sqlchat::app::App;
use sqlchat::backend::new_backend;
use sqlchat::cli::Command;
use sqlchat::config::{init_logger, set_verbose, verbose};
use sqlchat::models::{ArcEventTx, StoreEvent};
use sqlchat::storage::new_storage;
use sqlchat::store::Store;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    std::panic::set_hook(Box::new(|panic_info| {
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let config = cmd.get_config()?;
    set_verbose(cmd.verbose() || config.general.verbose);

    init_logger(&config.log)?;
    verbose!("[+] Logger initialized");

    verbose!("[+] Initializing backend...");
    let backend = new_backend(&config.backend).wrap_err("initializing backend")?;
    verbose!("[+] Backend {} initialized", backend.name());

    verbose!("[+] Initializing storage...");
    let storage = new_storage(&config.storage)
        .await
        .wrap_err("initializing storage")?;
    verbose!("[+] Storage initialized");

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<StoreEvent>();
    let events = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            log::debug!("Store event: {:?}", event);
        }
    });

    let store = Store::new(backend, storage)
        .with_options(&config)
        .with_event_tx(Arc::new(event_tx) as ArcEventTx);

    verbose!("[+] Fetching conversations...");
    match store.reload_from_storage().await {
        Ok(count) => verbose!("[+] Loaded {} conversations", count),
        Err(err) => {
            log::error!("Failed to load conversations: {}", err);
            eprintln!("Warning: conversations could not be loaded: {}", err);
        }
    }

    let mut app = App::new(Arc::new(store)).with_max_rows(config.general.table_max_rows);
    let result = match cmd.action() {
        Some(action) => app.run_action(action).await,
        None => app.run().await,
    };
    drop(app);
    events.abort();

    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
    Ok(())
}
