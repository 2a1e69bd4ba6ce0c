//! Subcommand handlers
//!
//! Each handler opens the desk it needs over the context's data source, runs
//! one workflow step and renders the result. Handlers never retry; a failed
//! backend call surfaces as the error of the whole command.

use crate::cli::{
    AdminsCommand, Command, ConfigCommand, DirectionArg, EmailCommand, KycCommand,
    TransactionsCommand, UsersCommand,
};
use crate::prompt::Prompt;
use crate::render::Renderer;
use anyhow::{Context, Result};
use punter_client::{
    AccountDesk, AppContext, BucketOrder, DashboardData, EmailDesk, KycDesk, StatusPersistence,
    StatusUpdate, TransactionDesk, UserDesk,
};
use punter_protocol::{
    AdminDraft, Confirmation, Decision, EmailDraft, KycQuery, ProtocolError, Sort, SortKey,
    TransactionQuery, UserQuery,
};
use serde_json::json;
use std::io::Write;
use tracing::debug;

fn sort_by<K: SortKey>(key: K, direction: DirectionArg) -> Sort<K> {
    Sort {
        key,
        direction: direction
            .direction
            .unwrap_or_else(|| key.default_direction()),
    }
}

const fn decision_verb(decision: Decision) -> &'static str {
    match decision {
        Decision::Approve => "approved",
        Decision::Reject => "rejected",
    }
}

/// Run one subcommand against `ctx`
///
/// # Errors
///
/// Returns the client or protocol error that stopped the command, or an I/O
/// error from writing the output.
#[allow(clippy::future_not_send)]
pub async fn execute<W: Write, P: Prompt>(
    ctx: &mut AppContext,
    command: Command,
    renderer: &mut Renderer<W>,
    prompt: &mut P,
) -> Result<()> {
    if !command.is_public() {
        ctx.require_session()?;
    }

    match command {
        Command::Login { email, password } => {
            ctx.login(&email, &password).await?;
            renderer.outcome(
                &format!("Logged in as {email}"),
                &json!({ "email": email, "authenticated": true }),
            )?;
        }
        Command::Logout => {
            ctx.logout().await?;
            renderer.outcome("Logged out", &json!({ "authenticated": false }))?;
        }
        Command::Dashboard { calendar_order } => {
            let order = if calendar_order {
                BucketOrder::Calendar
            } else {
                BucketOrder::FirstSeen
            };
            let data = DashboardData::load(ctx.source().as_ref()).await?;
            renderer.dashboard(&data.metrics(order))?;
        }
        Command::Users { action } => users(ctx, action, renderer).await?,
        Command::Transactions { action } => transactions(ctx, action, renderer).await?,
        Command::Kyc { action } => kyc(ctx, action, renderer).await?,
        Command::Admins { action } => admins(ctx, action, renderer, prompt).await?,
        Command::Email { action } => email(ctx, action, renderer).await?,
        Command::Config {
            action: ConfigCommand::Show,
        } => {
            let text = toml::to_string_pretty(ctx.config())
                .context("failed to serialize configuration")?;
            renderer.line(text.trim_end())?;
        }
    }
    Ok(())
}

#[allow(clippy::future_not_send)]
async fn users<W: Write>(
    ctx: &AppContext,
    action: UsersCommand,
    renderer: &mut Renderer<W>,
) -> Result<()> {
    let mut desk = UserDesk::load(ctx.source()).await?;

    match action {
        UsersCommand::List {
            role,
            search,
            sort,
            direction,
        } => {
            let query = UserQuery {
                role,
                search,
                sort: sort_by(sort, direction),
            };
            let view = desk.directory().list(&query);
            debug!(shown = view.len(), "users listed");
            renderer.users(&view)?;
        }
        UsersCommand::Show { id } => {
            let user = desk.directory_mut().open(&id)?;
            renderer.user(user)?;
        }
        UsersCommand::Status { id, status } => {
            let message = match desk.set_status(&id, status).await? {
                StatusUpdate::Unchanged => format!("User {id} is already {status}"),
                StatusUpdate::Applied(StatusPersistence::Remote) => {
                    format!("User {id} is now {status}")
                }
                StatusUpdate::Applied(StatusPersistence::LocalOnly) => format!(
                    "User {id} is now {status} in this session only; \
                     no user status endpoint is configured"
                ),
            };
            let user = desk
                .directory()
                .get(&id)
                .ok_or_else(|| ProtocolError::not_found("user", &id))?;
            renderer.outcome(&message, user)?;
        }
    }
    Ok(())
}

#[allow(clippy::future_not_send)]
async fn transactions<W: Write>(
    ctx: &AppContext,
    action: TransactionsCommand,
    renderer: &mut Renderer<W>,
) -> Result<()> {
    let mut desk = TransactionDesk::load(ctx.source()).await?;

    let (id, decision) = match action {
        TransactionsCommand::List {
            status,
            search,
            sort,
            direction,
        } => {
            let query = TransactionQuery::default()
                .with_status(status)
                .with_search(search)
                .with_sort(sort_by(sort, direction));
            renderer.transactions(&desk.board().list(&query))?;
            return Ok(());
        }
        TransactionsCommand::Show { id } => {
            let tx = desk.board_mut().open(&id)?;
            renderer.transaction(tx)?;
            return Ok(());
        }
        TransactionsCommand::Approve { id } => (id, Decision::Approve),
        TransactionsCommand::Reject { id } => (id, Decision::Reject),
    };

    let tx = desk.decide(&id, decision).await?;
    renderer.outcome(
        &format!(
            "Transaction {id} {}; status is now {}",
            decision_verb(decision),
            tx.status
        ),
        tx,
    )?;
    Ok(())
}

#[allow(clippy::future_not_send)]
async fn kyc<W: Write>(
    ctx: &AppContext,
    action: KycCommand,
    renderer: &mut Renderer<W>,
) -> Result<()> {
    let mut desk = KycDesk::load(ctx.source()).await?;

    let (id, decision) = match action {
        KycCommand::List {
            status,
            search,
            sort,
            direction,
        } => {
            let mut query = KycQuery::default().with_status(status).with_search(search);
            if let Some(key) = sort {
                query = query.with_sort(sort_by(key, direction));
            }
            renderer.kyc_requests(&desk.board().list(&query))?;
            return Ok(());
        }
        KycCommand::Show { id } => {
            let request = desk.board_mut().open(&id)?;
            renderer.kyc_request(request)?;
            return Ok(());
        }
        KycCommand::Approve { id } => (id, Decision::Approve),
        KycCommand::Reject { id } => (id, Decision::Reject),
    };

    let request = desk.decide(&id, decision).await?;
    renderer.outcome(
        &format!(
            "KYC request {id} from {} {}",
            request.full_name(),
            decision_verb(decision)
        ),
        request,
    )?;
    Ok(())
}

#[allow(clippy::future_not_send)]
async fn admins<W: Write, P: Prompt>(
    ctx: &AppContext,
    action: AdminsCommand,
    renderer: &mut Renderer<W>,
    prompt: &mut P,
) -> Result<()> {
    let mut desk = AccountDesk::load(ctx.source()).await?;

    match action {
        AdminsCommand::List => renderer.admins(desk.roster().admins())?,
        AdminsCommand::Create {
            first_name,
            last_name,
            email,
            password,
        } => {
            let mut draft = AdminDraft::new();
            {
                let mut rng = rand::thread_rng();
                draft.set_first_name(first_name, &mut rng);
                draft.set_last_name(last_name, &mut rng);
            }
            draft.set_email(email);
            if let Some(password) = password {
                draft.set_password(password);
            }

            let admin = desk.create(&draft).await?;
            renderer.created_admin(&admin, draft.password())?;
        }
        AdminsCommand::Delete { id, yes } => {
            let confirmation = match desk.roster().get(&id) {
                Some(_) if yes => Confirmation::Confirmed,
                Some(admin) => {
                    let question = format!(
                        "Delete admin {} {} <{}>?",
                        admin.firstname, admin.lastname, admin.email
                    );
                    Confirmation::from(prompt.confirm(&question)?)
                }
                // Unknown ids fail in the desk before anything is asked.
                None => Confirmation::Declined,
            };

            let removed = desk.delete(&id, confirmation).await?;
            renderer.outcome(&format!("Deleted admin {}", removed.email), &removed)?;
        }
    }
    Ok(())
}

#[allow(clippy::future_not_send)]
async fn email<W: Write>(
    ctx: &AppContext,
    action: EmailCommand,
    renderer: &mut Renderer<W>,
) -> Result<()> {
    let desk = EmailDesk::load(ctx.source()).await?;

    match action {
        EmailCommand::Recipients { to } => {
            renderer.recipients(&desk.candidates(&to.selection(None)))?;
        }
        EmailCommand::Send {
            to,
            id,
            subject,
            body,
        } => {
            let draft = EmailDraft {
                recipients: to.selection(id),
                subject,
                body,
            };
            let report = desk.send(&draft).await?;
            renderer.delivery(&report)?;
        }
    }
    Ok(())
}
