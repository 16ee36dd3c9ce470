//! # CLI Layer
//!
//! The only place in the workspace that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the tracing subscriber
//! - Resolves configuration into a concrete store
//!
//! Errors bubble up as `anyhow::Error`; `main` prints them and exits with 1.

use super::render;
use super::setup::{Cli, Commands, NewContactArgs, UpdateContactArgs};
use anyhow::{anyhow, bail, Context};
use clap::Parser;
use console::style;
use contactsapp::error::ContactsError;
use contactsapp::store::FsBackend;
use contactsapp::{Contact, ContactStore, ContactsConfig, StoreOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

type Store = ContactStore<FsBackend>;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    debug!(?config, "effective configuration");

    // Naked invocation lists
    let command = cli.command.unwrap_or(Commands::List { json: false });

    // These never need the collection in memory
    match &command {
        Commands::Config => return handle_config(&config),
        Commands::Path => {
            let backend = config.fs_backend()?;
            println!("{}", backend.path_for(&config.store_name).display());
            return Ok(());
        }
        Commands::Reset => return handle_reset(&config).await,
        _ => {}
    }

    let store = open_store(&config).await?;

    match command {
        Commands::List { json } => handle_list(&store, json),
        Commands::Show { id } => handle_show(&store, &id),
        Commands::Add { fields } => handle_add(&store, fields).await,
        Commands::Update { id, fields } => handle_update(&store, &id, fields).await,
        Commands::Remove { id } => handle_remove(&store, &id).await,
        Commands::Config | Commands::Path | Commands::Reset => Ok(()),
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "contacts=debug,contactsapp=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(cli: &Cli) -> anyhow::Result<ContactsConfig> {
    let mut config = match &cli.config {
        Some(path) => ContactsConfig::load(Some(path.as_path())),
        None => ContactsConfig::load_default(),
    }?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    Ok(config)
}

async fn open_store(config: &ContactsConfig) -> anyhow::Result<Store> {
    let store = ContactStore::with_options(config.fs_backend()?, StoreOptions::from(config));
    let location = store.location();

    let subscription = store.subscribe_hydration(
        {
            let location = location.clone();
            move || debug!(%location, "loading contacts")
        },
        {
            let location = location.clone();
            move || debug!(%location, "contacts loaded")
        },
    );
    let hydrated = store.hydrate().await;
    subscription.unsubscribe();

    hydrated.with_context(|| format!("Could not load contacts from {}", location))?;
    Ok(store)
}

/// Find a contact by full id or by an id prefix matching exactly one contact.
fn resolve(store: &Store, query: &str) -> anyhow::Result<Contact> {
    if let Ok(id) = Uuid::parse_str(query) {
        return store
            .get(&id)
            .ok_or_else(|| anyhow!("No contact with id {}", id));
    }

    let prefix = query.trim().to_lowercase();
    if prefix.is_empty() {
        bail!("Contact id must not be empty");
    }
    let mut matches: Vec<Contact> = store
        .snapshot()
        .into_iter()
        .filter(|c| c.id.to_string().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => bail!("No contact matches id '{}'", query),
        1 => Ok(matches.remove(0)),
        n => bail!("Id '{}' is ambiguous ({} contacts match)", query, n),
    }
}

fn validated(contact: Contact) -> anyhow::Result<Contact> {
    contact.validate().map_err(ContactsError::Validation)?;
    Ok(contact)
}

fn handle_list(store: &Store, json: bool) -> anyhow::Result<()> {
    let contacts = store.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&contacts)?);
    } else {
        print!("{}", render::render_list(&contacts));
    }
    Ok(())
}

fn handle_show(store: &Store, id: &str) -> anyhow::Result<()> {
    let contact = resolve(store, id)?;
    print!("{}", render::render_contact(&contact));
    Ok(())
}

async fn handle_add(store: &Store, fields: NewContactArgs) -> anyhow::Result<()> {
    let contact = validated(Contact::new(
        fields.first_name,
        fields.last_name,
        fields.email,
        fields.phone,
        fields.avatar_url,
    ))?;

    store.add(contact.clone()).await?;
    println!(
        "{} {} {}",
        style("Added").green(),
        style(render::short_id(&contact)).dim(),
        contact.display_name()
    );
    Ok(())
}

async fn handle_update(store: &Store, id: &str, fields: UpdateContactArgs) -> anyhow::Result<()> {
    let current = resolve(store, id)?;
    let mut updated = current.clone();

    if let Some(v) = fields.first_name {
        updated.first_name = v;
    }
    if let Some(v) = fields.last_name {
        updated.last_name = v;
    }
    if let Some(v) = fields.email {
        updated.email = v;
    }
    if let Some(v) = fields.phone {
        updated.phone = v;
    }
    if let Some(v) = fields.avatar_url {
        updated.set_avatar_url(Some(v));
    }

    if updated == current {
        println!("{}", style("Nothing to update.").dim());
        return Ok(());
    }

    let updated = validated(updated)?;
    store.update(updated.clone()).await?;
    println!(
        "{} {} {}",
        style("Updated").green(),
        style(render::short_id(&updated)).dim(),
        updated.display_name()
    );
    Ok(())
}

async fn handle_remove(store: &Store, id: &str) -> anyhow::Result<()> {
    let contact = resolve(store, id)?;
    store.remove(&contact).await?;
    println!(
        "{} {} {}",
        style("Removed").red(),
        style(render::short_id(&contact)).dim(),
        contact.display_name()
    );
    Ok(())
}

fn handle_config(config: &ContactsConfig) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

async fn handle_reset(config: &ContactsConfig) -> anyhow::Result<()> {
    let store = ContactStore::with_options(config.fs_backend()?, StoreOptions::from(config));
    store.clear_storage().await?;
    println!("{} {}", style("Removed").red(), store.location());
    Ok(())
}
