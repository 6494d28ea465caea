//! CLI commands

use std::io::Write;

use anyhow::{Context, Result};
use clap::Subcommand;
use marketplace_core::{
    preview_subtotal, HttpRequest, HttpResponse, LoginRequest, MarketplaceClient, Operation,
    RegisterRequest, ResourceKind,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::info;

use crate::render;
use crate::transport::Transport;

/// What every command runs against.
pub struct App {
    pub client: MarketplaceClient,
    pub transport: Transport,
}

impl App {
    fn send(&self, req: HttpRequest) -> Result<HttpResponse> {
        let url = req.path.clone();
        self.transport
            .execute(req)
            .with_context(|| format!("sending request to {url}"))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and cache the token and profile
    Login {
        #[arg(long, env = "MARKETPLACE_EMAIL")]
        email: String,
        #[arg(long, env = "MARKETPLACE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account (does not sign in)
    Register {
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the cached token and profile
    Logout,

    /// Ask the server who the cached token belongs to
    Whoami,

    /// Show the cached session without contacting the server
    Session,

    /// Dashboard totals
    Stats,

    /// Manage users
    Users {
        #[command(subcommand)]
        action: ResourceAction,
    },

    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: ResourceAction,
    },

    /// Manage order line items
    OrderItems {
        #[command(subcommand)]
        action: ResourceAction,
    },

    /// Manage products
    Products {
        #[command(subcommand)]
        action: ResourceAction,
    },

    /// Manage stores
    Stores {
        #[command(subcommand)]
        action: ResourceAction,
    },

    /// Manage reviews
    Reviews {
        #[command(subcommand)]
        action: ResourceAction,
    },

    /// Line subtotal the order-item form shows before saving
    PreviewSubtotal {
        #[arg(long)]
        quantity: i32,
        #[arg(long)]
        price: Decimal,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum ResourceAction {
    /// List every record
    List,
    /// Show one record
    Get { id: i64 },
    /// Create a record from a JSON body
    Create {
        #[arg(long)]
        data: String,
    },
    /// Replace a record with a JSON body
    Update {
        id: i64,
        #[arg(long)]
        data: String,
    },
    /// Delete a record
    Delete { id: i64 },
}

impl ResourceAction {
    fn operation(&self) -> Operation {
        match self {
            ResourceAction::List => Operation::List,
            ResourceAction::Get { .. } => Operation::Get,
            ResourceAction::Create { .. } => Operation::Create,
            ResourceAction::Update { .. } => Operation::Update,
            ResourceAction::Delete { .. } => Operation::Delete,
        }
    }

    fn id(&self) -> Option<i64> {
        match self {
            ResourceAction::Get { id }
            | ResourceAction::Update { id, .. }
            | ResourceAction::Delete { id } => Some(*id),
            ResourceAction::List | ResourceAction::Create { .. } => None,
        }
    }

    fn body(&self) -> Option<&str> {
        match self {
            ResourceAction::Create { data } | ResourceAction::Update { data, .. } => Some(data),
            _ => None,
        }
    }
}

impl Commands {
    pub fn execute(self, app: &App, out: &mut impl Write) -> Result<()> {
        let client = &app.client;
        match self {
            Commands::Login { email, password } => {
                let req = client.build_login(&LoginRequest { email, password })?;
                let auth = client.complete_login(app.send(req)?)?;
                let name = auth
                    .profile()
                    .map(|p| p.display_name())
                    .or(auth.email)
                    .unwrap_or_else(|| "unknown user".to_string());
                info!(%name, "signed in");
                writeln!(out, "Signed in as {name}.")?;
            }
            Commands::Register {
                firstname,
                lastname,
                email,
                password,
            } => {
                let input = RegisterRequest {
                    firstname,
                    lastname,
                    email,
                    password,
                };
                let auth = client.parse_register(app.send(client.build_register(&input)?)?)?;
                let email = auth.email.unwrap_or(input.email);
                writeln!(out, "Registered {email}. Run `marketplace login` to sign in.")?;
            }
            Commands::Logout => {
                client.logout()?;
                writeln!(out, "Signed out.")?;
            }
            Commands::Whoami => {
                let me = client.parse_me(app.send(client.build_me())?)?;
                render::json(out, &serde_json::to_value(&me)?)?;
            }
            Commands::Session => {
                let session = client.session().snapshot();
                let summary = json!({
                    "authenticated": session.is_authenticated(),
                    "user": session.user,
                    "baseUrl": client.base_url(),
                });
                render::json(out, &summary)?;
            }
            Commands::Stats => {
                let stats =
                    client.parse_dashboard_stats(app.send(client.build_dashboard_stats())?)?;
                writeln!(out, "Products: {}", stats.total_products)?;
                writeln!(out, "Stores:   {}", stats.total_stores)?;
                if !stats.products_per_store.is_empty() {
                    writeln!(out)?;
                    let rows = serde_json::to_value(&stats.products_per_store)?;
                    render::table(out, rows.as_array().map(Vec::as_slice).unwrap_or(&[]))?;
                }
            }
            Commands::Users { action } => run_resource(app, ResourceKind::Users, &action, out)?,
            Commands::Orders { action } => run_resource(app, ResourceKind::Orders, &action, out)?,
            Commands::OrderItems { action } => {
                run_resource(app, ResourceKind::OrderItems, &action, out)?
            }
            Commands::Products { action } => {
                run_resource(app, ResourceKind::Products, &action, out)?
            }
            Commands::Stores { action } => run_resource(app, ResourceKind::Stores, &action, out)?,
            Commands::Reviews { action } => run_resource(app, ResourceKind::Reviews, &action, out)?,
            Commands::PreviewSubtotal { quantity, price } => {
                let subtotal = preview_subtotal(quantity, price)
                    .with_context(|| format!("{quantity} x {price} is out of range"))?;
                writeln!(out, "{subtotal}")?;
            }
        }
        Ok(())
    }
}

fn run_resource(
    app: &App,
    kind: ResourceKind,
    action: &ResourceAction,
    out: &mut impl Write,
) -> Result<()> {
    let client = &app.client;
    let operation = action.operation();
    let req = client.build_dynamic(kind, operation, action.id(), action.body())?;
    let value = client.parse_dynamic(kind, operation, app.send(req)?)?;
    info!(resource = %kind, %operation, "request completed");

    match (operation, &value) {
        (Operation::List, Value::Array(rows)) => render::table(out, rows)?,
        (Operation::Delete, Value::String(message)) if message.is_empty() => {
            writeln!(out, "Deleted.")?
        }
        (Operation::Delete, Value::String(message)) => writeln!(out, "{message}")?,
        _ => render::json(out, &value)?,
    }
    Ok(())
}
