//! Console front end for the rolodex user directory.

use std::sync::Arc;

use anyhow::{Context, bail};
use rdx_api::{DirectoryApi, HttpDirectoryApi};
use rdx_store::model::DEFAULT_AVATAR_URL;
use rdx_store::tracing::init_tracing;
use rdx_store::{DirectoryConfig, DirectoryStore, Role, StoreError, UserDraft, UserRecord, persist};

const USAGE: &str = "usage: rolo <command>
    list [page]                          fetch and print one page of users
    search <term> [page]                 fetch a page and filter it
    show <id>                            fetch and print a single user
    add <name> <email> [role] [avatar]   create a user
    update <id> <name> <email> [role] [avatar]
                                         replace a user
    delete <id>                          delete a user";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = DirectoryConfig::from_env()?;
    init_tracing(&config.env);

    let api = Arc::new(HttpDirectoryApi::new(&config.api_base_url)?);
    let store = DirectoryStore::new(api.clone(), config.per_page);

    // The cache only pre-seeds the store; every command fetches fresh data.
    if let Some(path) = &config.cache_path {
        match persist::load(path) {
            Ok(cached) => store.restore(cached),
            Err(e) => tracing::debug!(error = %e, "no usable directory cache"),
        }
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("list");

    match command {
        "list" => {
            let page = parse_page(args.get(1))?;
            store.fetch_page(page).await?;
            print_users(&store.visible_users());
            print_footer(&store);
        }
        "search" => {
            let Some(term) = args.get(1) else {
                bail!("search needs a term\n{USAGE}");
            };
            let page = parse_page(args.get(2))?;
            store.fetch_page(page).await?;
            store.set_search_term(term);
            let visible = store.visible_users();
            print_users(&visible);
            println!("{} match(es) for '{term}'", visible.len());
        }
        "show" => {
            let id = parse_id(args.get(1))?;
            let raw = api.fetch_user(id).await?;
            let record = UserRecord::from_raw(raw);
            store.set_selected_user(Some(record.clone()));
            print_detail(&record);
        }
        "add" => {
            let (draft, _) = parse_user_args(&args[1..])?;
            let record = unwrap_action(store.add_user(draft).await)?;
            println!("created user {} ({})", record.id, record.name);
        }
        "update" => {
            let id = parse_id(args.get(1))?;
            let (draft, avatar) = parse_user_args(&args[2..])?;
            let record = UserRecord {
                id,
                name: draft.name,
                email: draft.email,
                role: draft.role,
                avatar: avatar.unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
                locally_modified: false,
            };
            let record = unwrap_action(store.update_user(record).await)?;
            println!("updated user {} ({})", record.id, record.name);
        }
        "delete" => {
            let id = parse_id(args.get(1))?;
            unwrap_action(store.delete_user(id).await)?;
            println!("deleted user {id}");
        }
        _ => bail!("unknown command '{command}'\n{USAGE}"),
    }

    if let Some(path) = &config.cache_path
        && let Err(e) = persist::save(path, &store.snapshot())
    {
        tracing::warn!(error = %e, "failed to save directory cache");
    }

    Ok(())
}

fn parse_page(arg: Option<&String>) -> anyhow::Result<u32> {
    match arg {
        Some(value) => value
            .parse()
            .with_context(|| format!("'{value}' is not a page number")),
        None => Ok(1),
    }
}

fn parse_id(arg: Option<&String>) -> anyhow::Result<u32> {
    let Some(value) = arg else {
        bail!("missing user id\n{USAGE}");
    };
    value
        .parse()
        .with_context(|| format!("'{value}' is not a user id"))
}

/// Parse `<name> <email> [role] [avatar]` into a draft.
fn parse_user_args(args: &[String]) -> anyhow::Result<(UserDraft, Option<String>)> {
    let (Some(name), Some(email)) = (args.first(), args.get(1)) else {
        bail!("need at least a name and an email\n{USAGE}");
    };
    let role = match args.get(2) {
        Some(value) => value.parse::<Role>().map_err(|e| anyhow::anyhow!(e))?,
        None => Role::default(),
    };
    let avatar = args.get(3).cloned();

    Ok((
        UserDraft {
            name: name.clone(),
            email: email.clone(),
            role,
            avatar: avatar.clone(),
        },
        avatar,
    ))
}

/// Surface field-level validation messages before bailing.
fn unwrap_action<T>(outcome: Result<T, StoreError>) -> anyhow::Result<T> {
    match outcome {
        Ok(value) => Ok(value),
        Err(StoreError::Validation(fields)) => {
            for (field, message) in &fields {
                eprintln!("  {field}: {message}");
            }
            bail!("user is invalid");
        }
        Err(e) => Err(e.into()),
    }
}

fn print_users(records: &[UserRecord]) {
    println!("{:>10}  {:<24}{:<30}{:<8}", "id", "name", "email", "role");
    for record in records {
        println!(
            "{:>10}  {:<24}{:<30}{:<8}",
            record.id, record.name, record.email, record.role
        );
    }
}

fn print_detail(record: &UserRecord) {
    println!("id:     {}", record.id);
    println!("name:   {}", record.name);
    println!("email:  {}", record.email);
    println!("role:   {}", record.role);
    println!("avatar: {}", record.avatar);
}

fn print_footer(store: &DirectoryStore) {
    let state = store.snapshot();
    println!(
        "page {} of {} ({} users)",
        state.current_page, state.total_pages, state.total_users
    );
}
