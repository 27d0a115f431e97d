use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{ListEvent, ListViewController, ListViewModel, UserListOrchestrator};
use futures::StreamExt;
use storage::UserStore;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
};
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod command;
mod config;
mod render;

use command::{parse_command, CommandError, ConsoleCommand, HELP};

#[derive(Parser, Debug)]
struct Args {
    /// Optional TOML settings file.
    #[arg(long, default_value = "users.toml")]
    config: PathBuf,
    /// Overrides the configured tracing filter.
    #[arg(long)]
    log_filter: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = config::load_settings(&args.config)?;
    let filter = args
        .log_filter
        .clone()
        .unwrap_or_else(|| settings.log_filter.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
    info!(?settings, "starting users console");

    let store = UserStore::seeded(settings.store_latency());
    let orchestrator = UserListOrchestrator::new(Arc::new(store));
    let controller = Arc::new(ListViewController::new(
        Arc::clone(&orchestrator),
        settings.list_view(),
    ));

    let event_log = tokio::spawn(log_events(orchestrator.subscribe_stream()));
    let renderer = tokio::spawn(render_changes(controller.watch()));

    println!("{HELP}");
    controller.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(ConsoleCommand::Quit) => break,
            Ok(ConsoleCommand::Help) => println!("{HELP}"),
            Ok(ConsoleCommand::Search(text)) => controller.search_changed(text),
            Ok(ConsoleCommand::View(view_kind)) => controller.view_kind_changed(view_kind),
            Ok(command) => {
                tokio::spawn(dispatch(Arc::clone(&controller), command));
            }
            Err(CommandError::Empty) => {}
            Err(err) => println!("{err}"),
        }
    }

    controller.teardown();
    renderer.abort();
    event_log.abort();
    info!("users console stopped");
    Ok(())
}

async fn dispatch(controller: Arc<ListViewController>, command: ConsoleCommand) {
    match command {
        ConsoleCommand::Page(page) => controller.page_clicked(page).await,
        ConsoleCommand::PageSize(size) => controller.items_per_page_selected(size).await,
        ConsoleCommand::Delete(id) => {
            if let Err(err) = controller.delete_requested(&id).await {
                error!(error = %err, "delete failed");
                println!("{err}");
            }
        }
        ConsoleCommand::Show(id) => match controller.user_details(&id).await {
            Ok(Some(user)) => println!("{}", render::render_user(&user)),
            Ok(None) => println!("no user with id {id}"),
            Err(err) => println!("lookup failed: {err:#}"),
        },
        ConsoleCommand::Search(_)
        | ConsoleCommand::View(_)
        | ConsoleCommand::Help
        | ConsoleCommand::Quit => {}
    }
}

async fn render_changes(mut rx: watch::Receiver<ListViewModel>) {
    while rx.changed().await.is_ok() {
        let model = rx.borrow_and_update().clone();
        println!("{}", render::render(&model));
    }
}

async fn log_events(mut events: BroadcastStream<ListEvent>) {
    while let Some(event) = events.next().await {
        match event {
            Ok(event) => debug!(?event, "list event"),
            Err(err) => warn!(error = %err, "list event stream lagged"),
        }
    }
}
