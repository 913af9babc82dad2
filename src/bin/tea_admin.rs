use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use dialoguer::Confirm;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tea_admin::{
    config::{init_tracing, load_config, AdminConfig},
    models::{
        Employee, InventoryItem, InventorySummary, Product, QualityCheck, QualitySummary, Sale,
        SalesSummary, Supplier, SupplierSummary, SystemUser,
    },
    panel::{AutoConfirm, ConfirmDelete, ResourcePanel},
    profile::{self, ProfileUpdate},
    resource::{Resource, ResourceKind},
    session::{self, SessionStore, StoredSession},
    shell::{self, NavigationShell, TopBar},
    ApiClient,
};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize()?;

    match cli.command {
        Commands::Auth(command) => handle_auth_command(&context, command, cli.json).await?,
        Commands::Profile(command) => handle_profile_command(&context, command, cli.json).await?,
        Commands::Employees(command) => {
            handle_resource_command::<Employee>(&context, command, cli.json).await?
        }
        Commands::Suppliers(command) => {
            handle_resource_command::<Supplier>(&context, command, cli.json).await?
        }
        Commands::Inventory(command) => {
            handle_resource_command::<InventoryItem>(&context, command, cli.json).await?
        }
        Commands::Quality(command) => {
            handle_resource_command::<QualityCheck>(&context, command, cli.json).await?
        }
        Commands::Sales(command) => {
            handle_resource_command::<Sale>(&context, command, cli.json).await?
        }
        Commands::Products(command) => {
            handle_resource_command::<Product>(&context, command, cli.json).await?
        }
        Commands::Users(command) => {
            handle_resource_command::<SystemUser>(&context, command, cli.json).await?
        }
        Commands::Nav => handle_nav(&context, cli.json)?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "tea-admin",
    about = "Back-office client for the tea estate: staff, suppliers, stock, quality, sales and products",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON when available"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Auth(AuthCommands),
    #[command(subcommand)]
    Profile(ProfileCommands),
    #[command(subcommand)]
    Employees(ResourceCommands),
    #[command(subcommand)]
    Suppliers(ResourceCommands),
    #[command(subcommand)]
    Inventory(ResourceCommands),
    #[command(subcommand)]
    Quality(ResourceCommands),
    #[command(subcommand)]
    Sales(ResourceCommands),
    #[command(subcommand)]
    Products(ResourceCommands),
    #[command(subcommand)]
    Users(ResourceCommands),
    /// Show the navigation sidebar and top bar
    Nav,
}

#[derive(Subcommand)]
enum AuthCommands {
    Login(AuthLoginArgs),
    Logout,
    Whoami,
}

#[derive(Args)]
struct AuthLoginArgs {
    #[arg(long, help = "Email address for the account")]
    email: String,
    #[arg(long, help = "Password for the account")]
    password: String,
}

#[derive(Subcommand)]
enum ProfileCommands {
    Show,
    Update(ProfileUpdateArgs),
    Delete(DeleteArgs),
}

#[derive(Args)]
struct ProfileUpdateArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long, help = "New password (at least 6 characters)")]
    password: Option<String>,
}

#[derive(Subcommand)]
enum ResourceCommands {
    /// List records, optionally filtered
    List(ListArgs),
    /// Create a record
    Add(WriteArgs),
    /// Update a record
    Edit(EditArgs),
    /// Delete a record
    Delete(DeleteRecordArgs),
    /// Totals for inventory, suppliers, sales and quality checks
    Summary,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long, help = "Case-insensitive filter over the searchable fields")]
    search: Option<String>,
}

#[derive(Args)]
struct WriteArgs {
    #[arg(
        long = "set",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value,
        help = "Field to set, using wire names (e.g. --set stock=120). Values are read as JSON when possible; quote them ('contact=\"0771\"') to force text"
    )]
    fields: Vec<(String, Value)>,
    #[arg(long, help = "Image to upload and attach (products only)")]
    image_file: Option<PathBuf>,
}

#[derive(Args)]
struct EditArgs {
    id: String,
    #[command(flatten)]
    write: WriteArgs,
}

#[derive(Args)]
struct DeleteRecordArgs {
    id: String,
    #[command(flatten)]
    confirm: DeleteArgs,
}

#[derive(Args)]
struct DeleteArgs {
    #[arg(long, action = ArgAction::SetTrue, help = "Skip the confirmation prompt")]
    yes: bool,
}

struct CliContext {
    config: AdminConfig,
    client: ApiClient,
    store: Option<SessionStore>,
}

impl CliContext {
    fn initialize() -> Result<Self> {
        let config = load_config().context("failed to load configuration")?;
        init_tracing(config.log_level(), config.log_json);

        let store = SessionStore::from_env();
        let session = match &store {
            Some(store) => store.current().context("failed to read the stored session")?,
            None => None,
        };

        let mut client =
            ApiClient::new(config.clone()).context("failed to construct the API client")?;
        if let Some(token) = session.and_then(|s| s.token) {
            debug!("Using token from stored session");
            client = client.with_token(token);
        }

        Ok(Self {
            config,
            client,
            store,
        })
    }

    fn store(&self) -> Result<&SessionStore> {
        self.store
            .as_ref()
            .ok_or_else(|| anyhow!("no session location; set TEA_ADMIN_HOME or HOME"))
    }

    fn require_session(&self) -> Result<StoredSession> {
        self.store()?
            .current()?
            .ok_or_else(|| anyhow!("not signed in; run `tea-admin auth login` first"))
    }

    fn confirmer(&self, yes: bool) -> Box<dyn ConfirmDelete> {
        if yes || !self.config.confirm_deletes {
            Box::new(AutoConfirm)
        } else {
            Box::new(PromptConfirm)
        }
    }
}

/// Asks on the terminal before deleting.
struct PromptConfirm;

impl ConfirmDelete for PromptConfirm {
    fn confirm(&self, label: &str, id: &str) -> bool {
        Confirm::new()
            .with_prompt(format!("Delete {} {}?", label, id))
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

async fn handle_auth_command(context: &CliContext, command: AuthCommands, json: bool) -> Result<()> {
    match command {
        AuthCommands::Login(args) => {
            let store = context.store()?;
            let session = session::login(&context.client, store, &args.email, &args.password)
                .await
                .context("failed to sign in")?;
            if json {
                print_json(&session)?;
            } else {
                println!("Signed in as {} ({})", session.name, session.email);
                println!("Session saved to: {}", store.path().display());
            }
        }
        AuthCommands::Logout => {
            let removed = session::logout(context.store()?)?;
            if json {
                print_json(&json!({ "signed_out": removed }))?;
            } else if removed {
                println!("Signed out");
            } else {
                println!("No active session");
            }
        }
        AuthCommands::Whoami => {
            let current = context.store()?.current()?;
            match (current, json) {
                (Some(session), true) => print_json(&session)?,
                (None, true) => print_json(&Value::Null)?,
                (Some(session), false) => {
                    println!("{} <{}>", session.name, session.email);
                    if let Some(role) = &session.role {
                        println!("Role: {}", role);
                    }
                    println!("Expires: {}", session.expires_at.to_rfc3339());
                }
                (None, false) => println!("Not signed in"),
            }
        }
    }
    Ok(())
}

async fn handle_profile_command(
    context: &CliContext,
    command: ProfileCommands,
    json: bool,
) -> Result<()> {
    let session = context.require_session()?;
    match command {
        ProfileCommands::Show => {
            let current = profile::fetch(&context.client, &session)
                .await
                .context("failed to fetch profile")?;
            if json {
                print_json(&current)?;
            } else {
                println!("{} <{}>", current.name, current.email);
            }
        }
        ProfileCommands::Update(args) => {
            let current = profile::fetch(&context.client, &session)
                .await
                .context("failed to fetch profile")?;
            let mut changes = ProfileUpdate::from_profile(&current);
            if let Some(name) = args.name {
                changes.name = name;
            }
            if let Some(email) = args.email {
                changes.email = email;
            }
            changes.password = args.password.filter(|p| !p.is_empty());
            profile::update(&context.client, &session, &changes)
                .await
                .context("failed to update profile")?;
            if json {
                print_json(&json!({ "updated": true }))?;
            } else {
                println!("Profile updated");
            }
        }
        ProfileCommands::Delete(args) => {
            if !context.confirmer(args.yes).confirm("account", &session.email) {
                println!("Aborted");
                return Ok(());
            }
            profile::delete_account(&context.client, context.store()?, &session)
                .await
                .context("failed to delete account")?;
            if json {
                print_json(&json!({ "deleted": true }))?;
            } else {
                println!("Account deleted and signed out");
            }
        }
    }
    Ok(())
}

async fn handle_resource_command<R: Resource>(
    context: &CliContext,
    command: ResourceCommands,
    json: bool,
) -> Result<()> {
    let client = &context.client;
    let mut panel: ResourcePanel<R> = ResourcePanel::new();
    let label = R::KIND.record_label();

    match command {
        ResourceCommands::List(args) => {
            panel
                .load(client)
                .await
                .with_context(|| format!("failed to load {}", R::KIND))?;
            let records = panel.search(args.search.as_deref().unwrap_or_default());
            if json {
                print_json(&records)?;
            } else if records.is_empty() {
                println!("No {} records", label);
            } else {
                for record in records {
                    println!("- {}", record.summary_line());
                }
            }
        }
        ResourceCommands::Add(args) => {
            panel.open_create();
            apply_write_args::<R>(&mut panel, args)?;
            let saved = panel
                .save(client)
                .await
                .with_context(|| format!("failed to create {}", label))?;
            report_saved(saved.as_ref(), label, "Created", json)?;
        }
        ResourceCommands::Edit(args) => {
            panel
                .load(client)
                .await
                .with_context(|| format!("failed to load {}", R::KIND))?;
            panel.open_edit(&args.id)?;
            apply_write_args::<R>(&mut panel, args.write)?;
            let saved = panel
                .save(client)
                .await
                .with_context(|| format!("failed to update {} {}", label, args.id))?;
            report_saved(saved.as_ref(), label, "Updated", json)?;
        }
        ResourceCommands::Delete(args) => {
            let confirm = context.confirmer(args.confirm.yes);
            let deleted = panel
                .remove(client, &args.id, &*confirm)
                .await
                .with_context(|| format!("failed to delete {} {}", label, args.id))?;
            if json {
                print_json(&json!({ "id": args.id, "deleted": deleted }))?;
            } else if deleted {
                println!("Deleted {} {}", label, args.id);
            } else {
                println!("Aborted");
            }
        }
        ResourceCommands::Summary => {
            panel
                .load(client)
                .await
                .with_context(|| format!("failed to load {}", R::KIND))?;
            let summary = summarize(R::KIND, serde_json::to_value(panel.collection())?)?;
            if json {
                print_json(&summary)?;
            } else {
                print_fields(&summary);
            }
        }
    }
    Ok(())
}

fn apply_write_args<R: Resource>(panel: &mut ResourcePanel<R>, args: WriteArgs) -> Result<()> {
    let fields: Map<String, Value> = args.fields.into_iter().collect();
    panel.set_fields(fields)?;
    if let Some(path) = args.image_file {
        R::attach_image(panel.form_mut(), path)?;
    }
    Ok(())
}

fn report_saved<R: Resource>(saved: Option<&R>, label: &str, verb: &str, json: bool) -> Result<()> {
    match (saved, json) {
        (Some(record), true) => print_json(record),
        (None, true) => print_json(&json!({ "saved": true })),
        (Some(record), false) => {
            println!("{} {}: {}", verb, label, record.summary_line());
            Ok(())
        }
        (None, false) => {
            println!("{} {}", verb, label);
            Ok(())
        }
    }
}

/// Derived totals for the collections that have them. Records arrive as
/// JSON so one function can serve every resource type.
fn summarize(kind: ResourceKind, records: Value) -> Result<Value> {
    let summary = match kind {
        ResourceKind::Inventory => {
            let items: Vec<InventoryItem> = serde_json::from_value(records)?;
            serde_json::to_value(InventorySummary::from_items(&items))?
        }
        ResourceKind::Suppliers => {
            let suppliers: Vec<Supplier> = serde_json::from_value(records)?;
            serde_json::to_value(SupplierSummary::from_suppliers(&suppliers))?
        }
        ResourceKind::Sales => {
            let sales: Vec<Sale> = serde_json::from_value(records)?;
            serde_json::to_value(SalesSummary::from_sales(&sales))?
        }
        ResourceKind::Quality => {
            let checks: Vec<QualityCheck> = serde_json::from_value(records)?;
            serde_json::to_value(QualitySummary::from_checks(&checks))?
        }
        other => bail!("no summary is available for {}", other),
    };
    Ok(summary)
}

fn handle_nav(context: &CliContext, json: bool) -> Result<()> {
    if json {
        let routes: Vec<Value> = shell::sidebar()
            .iter()
            .map(|route| {
                json!({
                    "label": route.label(),
                    "path": route.path(),
                    "resource": route.resource(),
                })
            })
            .collect();
        return print_json(&json!({ "sidebar": routes, "top_bar": TopBar::default() }));
    }

    let store = context
        .store
        .clone()
        .unwrap_or_else(|| SessionStore::new("session.json"));
    let nav = NavigationShell::new(store);
    println!("{}", nav.render_sidebar());
    println!();
    println!(
        "Search: [{}]   Notifications: {}",
        nav.top_bar().search,
        nav.top_bar().notification_count
    );
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_fields(value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map {
                match field {
                    Value::Array(items) => println!("{}: {} item(s)", key, items.len()),
                    Value::Object(inner) => {
                        println!("{}:", key);
                        for (inner_key, inner_value) in inner {
                            println!("  {}: {}", inner_key, inner_value);
                        }
                    }
                    other => println!("{}: {}", key, other),
                }
            }
        }
        other => println!("{}", other),
    }
}

fn parse_key_value(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid field '{raw}', expected key=value"))?;
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err("field name cannot be empty".to_string());
    }
    let value = value.trim();
    let parsed = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key, parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_values_prefer_json() {
        assert_eq!(parse_key_value("stock=120").unwrap(), ("stock".into(), json!(120)));
        assert_eq!(
            parse_key_value("batchNumber=GT001").unwrap(),
            ("batchNumber".into(), json!("GT001"))
        );
        assert_eq!(
            parse_key_value("date=2025-01-10").unwrap(),
            ("date".into(), json!("2025-01-10"))
        );
        assert_eq!(
            parse_key_value("contact=\"0771\"").unwrap(),
            ("contact".into(), json!("0771"))
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=5").is_err());
    }

    #[test]
    fn summary_rejects_collections_without_totals() {
        assert!(summarize(ResourceKind::Employees, json!([])).is_err());
        let summary = summarize(
            ResourceKind::Quality,
            json!([{"_id": "1", "batchNumber": "A1", "inspectionDate": "2030-01-01", "status": "Failed"}]),
        )
        .unwrap();
        assert_eq!(summary["failed"], 1);
    }
}
