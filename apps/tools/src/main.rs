use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::{
    domain::{ItemsPerPage, UserId, UserRecord},
    error::{ApiError, ApiException},
    protocol::ListQuery,
};
use storage::{StoreLatency, UserStore};

#[derive(Parser, Debug)]
struct Cli {
    /// Print results as JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 5)]
        per_page: u32,
        #[arg(long)]
        search: Option<String>,
    },
    Get {
        id: String,
    },
    Remove {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let store = UserStore::seeded(StoreLatency::none());

    match cli.command {
        Command::List {
            page,
            per_page,
            search,
        } => {
            let items_per_page = ItemsPerPage::try_from(per_page)?;
            let query = ListQuery::new(page, items_per_page, search)?;
            let result = store.list(&query).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "{} matching, page {} ({} per page)",
                    result.total_matching_count, query.page_number, items_per_page
                );
                for user in &result.items {
                    println!("{}\t{}\t{}", user.id, user.display_name, user.is_active);
                }
            }
        }
        Command::Get { id } => {
            let id = UserId::new(id);
            let found = store.get_by_id(&id).await;
            match get_output(found, &id, cli.json)? {
                Ok(text) => println!("{text}"),
                Err(miss) => {
                    if let Some(body) = miss.body {
                        println!("{body}");
                    }
                    return Err(miss.error.into());
                }
            }
        }
        Command::Remove { id } => {
            let id = UserId::new(id);
            let removed = store.remove(&id).await;
            if cli.json {
                println!("{}", serde_json::json!({ "id": id, "removed": removed }));
            } else if removed {
                println!("removed {id}");
            } else {
                println!("no user with id {id}");
            }
        }
    }

    Ok(())
}

/// A `get` for an id the store does not hold.
struct Miss {
    body: Option<String>,
    error: ApiException,
}

/// Text to print for `get`. A miss carries the `ApiError` body in JSON mode.
fn get_output(found: Option<UserRecord>, id: &UserId, json: bool) -> Result<Result<String, Miss>> {
    let out = match found {
        Some(user) if json => Ok(serde_json::to_string_pretty(&user)?),
        Some(user) => Ok(format!("{}\t{}\t{}", user.id, user.display_name, user.is_active)),
        None => {
            let error = ApiException::not_found(format!("no user with id {id}"));
            let body = if json {
                Some(
                    serde_json::to_string_pretty(&ApiError::from(error.clone()))
                        .context("encode error body")?,
                )
            } else {
                None
            };
            Err(Miss { body, error })
        }
    };
    Ok(out)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
