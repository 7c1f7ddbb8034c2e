//! A command-line client for the graduation project management portal.
//!
//! The client logs in against the GPMS backend, routes the user to
//! their role-specific dashboard, keeps notifications fresh by
//! polling, and exposes the invitation/approval workflows as
//! interactive commands.

use anyhow::{Context, Result};
use gpms::notifications::NotificationStore;
use gpms::roles::Dashboard;
use gpms::session::AuthSession;
use gpms::storage::{CredentialStore, FileStorage, MemoryStorage, StorageBackend};
use gpms::{ApprovalStore, InvitationStore};
use gpms_client::api_client::ApiClient;
use gpms_client::commands::{Command, parse_command};
use gpms_client::config::ClientConfig;
use gpms_client::poller::NotificationPoller;
use pico_args::Arguments;
use std::io::{self, Write};
use std::sync::Arc;

const HELP: &str = "\
Connect to a GPMS portal backend

USAGE:
  gpms_client [OPTIONS]

OPTIONS:
  --server URL          Backend base URL  [default: http://localhost:8000/api]
  --username NAME       Username for login
  --password PASS       Password for login
  --storage PATH        Credential storage file  [default: gpms_session.json]
  --interval MS         Notification poll interval in milliseconds  [default: 5000]

FLAGS:
  -h, --help            Print help information
";

struct Args {
    server_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    storage_path: Option<String>,
    interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server_url: pargs.opt_value_from_str("--server").ok().flatten(),
        username: pargs.opt_value_from_str("--username").ok().flatten(),
        password: pargs.opt_value_from_str("--password").ok().flatten(),
        storage_path: pargs.opt_value_from_str("--storage").ok().flatten(),
        interval_ms: pargs.opt_value_from_str("--interval").ok().flatten(),
    };

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let config = ClientConfig::from_env(args.server_url, args.storage_path, args.interval_ms)?;

    // Storage failures degrade to an in-memory session rather than
    // refusing to start.
    let backend: Arc<dyn StorageBackend> = match FileStorage::open(&config.storage_path) {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            log::warn!("credential storage unavailable ({e}), session will not survive restarts");
            Arc::new(MemoryStorage::new())
        }
    };
    let credentials = CredentialStore::open(backend);
    let session = AuthSession::restore(credentials.clone());
    let api = ApiClient::new(config.server_url.clone(), credentials);

    if let Some(user) = session.user() {
        println!("Restored session for {}.", user.name);
    } else {
        let username = match args.username {
            Some(u) => u,
            None => prompt("Username: ")?,
        };
        let password = match args.password {
            Some(p) => p,
            None => prompt("Password: ")?,
        };

        println!("Logging in as {}...", username);
        let login = api.login(&username, &password).await?;
        let roles = login
            .user
            .get("roles")
            .and_then(|r| r.as_array())
            .cloned()
            .unwrap_or_default();
        let user = session
            .login(&login.user, &roles, &login.access)
            .context("Login response could not be recorded")?;
        println!("Welcome, {}!", user.name);
    }

    // No dashboard is entered for a role-less account.
    let Some(role) = session.primary_role() else {
        session.logout();
        anyhow::bail!("This account has no roles; ask an administrator to assign one");
    };
    match Dashboard::for_role(role.label()).path() {
        Some(path) => println!("Dashboard: {} ({})", role.label(), path),
        None => println!(
            "Unrecognized role '{}'. No dashboard is available; 'logout' to switch accounts.",
            role.label()
        ),
    }

    let notifications = NotificationStore::new();
    let invitations = InvitationStore::new();
    let approvals = ApprovalStore::new();

    // Seed the counter from the dedicated endpoint; the first poll
    // tick replaces it with the recomputed value moments later.
    match api.unread_count().await {
        Ok(count) => notifications.set_unread_count(count),
        Err(e) => log::debug!("unread-count fetch failed: {e:#}"),
    }

    let poller = NotificationPoller::new(api.clone(), notifications.clone())
        .with_interval(config.poll_interval)
        .with_limit(config.notification_limit)
        .spawn();

    println!(
        "\nPolling notifications every {} ms. Type 'help' for commands.",
        config.poll_interval.as_millis()
    );

    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if io::stdin().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let command = match parse_command(input) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => print_command_help(),
            Command::List => print_notifications(&notifications),
            Command::Read(id) => {
                // Optimistic: the store flips first, the server call is
                // fire-and-forget, and the next poll reconciles.
                notifications.mark_read(id);
                if let Err(e) = api.mark_read(id).await {
                    log::warn!("server mark-read failed, local state may diverge: {e:#}");
                }
            }
            Command::ReadAll => {
                notifications.mark_all_read();
                if let Err(e) = api.mark_all_read().await {
                    log::warn!("server mark-all-read failed, local state may diverge: {e:#}");
                }
            }
            Command::Delete(id) => {
                notifications.remove(id);
                if let Err(e) = api.delete_notification(id).await {
                    log::warn!("server delete failed, local state may diverge: {e:#}");
                }
            }
            Command::Invitations => match api.fetch_invitations().await {
                Ok(list) => {
                    invitations.replace_all(list);
                    print_invitations(&invitations);
                }
                Err(e) => eprintln!("Could not fetch invitations: {e:#}"),
            },
            Command::Accept(id) => {
                invitations.update_status(id, gpms::InvitationStatus::Accepted);
                if let Err(e) = api.accept_invitation(id).await {
                    eprintln!("Accept failed: {e:#}");
                }
            }
            Command::Decline(id) => {
                invitations.update_status(id, gpms::InvitationStatus::Rejected);
                if let Err(e) = api.reject_invitation(id).await {
                    eprintln!("Decline failed: {e:#}");
                }
            }
            Command::Approvals => match api.fetch_approvals(None).await {
                Ok(list) => {
                    approvals.replace_all(list);
                    print_approvals(&approvals);
                }
                Err(e) => eprintln!("Could not fetch approvals: {e:#}"),
            },
            Command::Approve(id) => {
                approvals.update_status(id, gpms::ApprovalStatus::Approved);
                if let Err(e) = api.approve_request(id).await {
                    eprintln!("Approve failed: {e:#}");
                }
            }
            Command::Reject { id, reason } => {
                approvals.update_status(id, gpms::ApprovalStatus::Rejected);
                if let Err(e) = api.reject_request(id, reason.as_deref()).await {
                    eprintln!("Reject failed: {e:#}");
                }
            }
            Command::WhoAmI => {
                // Prefer a fresh profile; fall back to the cached
                // session when the backend is unreachable.
                match api.me().await {
                    Ok(payload) => {
                        let roles = payload
                            .get("roles")
                            .and_then(|r| r.as_array())
                            .cloned()
                            .unwrap_or_default();
                        match gpms::User::normalize(&payload, &roles) {
                            Ok(user) => session.set_user(user),
                            Err(e) => log::debug!("profile refresh unusable: {e}"),
                        }
                    }
                    Err(e) => log::debug!("profile refresh failed: {e:#}"),
                }
                match session.user() {
                    Some(user) => {
                        let roles: Vec<&str> = user.roles.iter().map(|r| r.label()).collect();
                        println!(
                            "{} ({}) roles: {}",
                            user.name,
                            user.username,
                            roles.join(", ")
                        );
                    }
                    None => println!("Not signed in."),
                }
            }
            Command::Logout => {
                session.logout();
                println!("Signed out.");
                break;
            }
        }
    }

    poller.stop();
    println!("Goodbye.");
    Ok(())
}

/// Read one trimmed line from stdin after printing a prompt.
fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn print_command_help() {
    println!("\nAvailable commands:");
    println!("  Notifications: list, read <id>, read-all, delete <id>");
    println!("  Invitations:   invitations, accept <id>, decline <id>");
    println!("  Approvals:     approvals, approve <id>, reject <id> [reason]");
    println!("  Session:       whoami, logout");
    println!("  Other:         help, quit");
}

fn print_notifications(store: &NotificationStore) {
    let items = store.snapshot();
    if items.is_empty() {
        println!("No notifications.");
        return;
    }
    println!("{} notification(s), {} unread:", items.len(), store.unread_count());
    for n in items {
        let marker = if n.is_read { " " } else { "*" };
        println!(
            "  {}[{}] {} - {}",
            marker,
            n.notification_id,
            n.title,
            n.created_at.format("%Y-%m-%d %H:%M")
        );
    }
}

fn print_invitations(store: &InvitationStore) {
    let pending = store.pending();
    if pending.is_empty() {
        println!("No pending invitations.");
        return;
    }
    println!("{} pending invitation(s):", pending.len());
    for i in pending {
        let group = i
            .group
            .get("group_name")
            .and_then(|v| v.as_str())
            .unwrap_or("unnamed group");
        println!(
            "  [{}] {} invited you to {} (expires {})",
            i.invitation_id,
            i.invited_by.name,
            group,
            i.expires_at.format("%Y-%m-%d")
        );
    }
}

fn print_approvals(store: &ApprovalStore) {
    let pending = store.pending();
    if pending.is_empty() {
        println!("No pending approvals.");
        return;
    }
    println!("{} pending approval(s):", pending.len());
    for a in pending {
        println!(
            "  [{}] {} requested by {} (level {})",
            a.approval_id, a.approval_type, a.requested_by.name, a.approval_level
        );
    }
}
