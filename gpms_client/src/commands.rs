use std::fmt;

/// A parsed interactive command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the notification list.
    List,
    /// Mark one notification read.
    Read(i64),
    /// Mark every notification read.
    ReadAll,
    /// Delete a notification.
    Delete(i64),
    /// Print pending group invitations.
    Invitations,
    /// Accept a group invitation.
    Accept(i64),
    /// Decline a group invitation.
    Decline(i64),
    /// Print pending approval requests.
    Approvals,
    /// Approve a pending request.
    Approve(i64),
    /// Reject a pending request with an optional reason.
    Reject { id: i64, reason: Option<String> },
    /// Print the logged-in user.
    WhoAmI,
    /// Sign out and exit.
    Logout,
    /// Print the command list.
    Help,
    /// Exit without signing out.
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Command received something other than a numeric id.
    InvalidId {
        command: &'static str,
        value: String,
    },
    /// Command requires an id argument.
    MissingId(&'static str),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId { command, value } => write!(
                f,
                "Invalid id '{}' for '{}'. Must be a number (e.g., '{} 12')",
                value, command, command
            ),
            Self::MissingId(command) => {
                write!(f, "'{}' requires an id (e.g., '{} 12')", command, command)
            }
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a command line into a [`Command`].
///
/// # Examples
///
/// ```
/// use gpms_client::commands::{parse_command, Command};
///
/// assert!(matches!(parse_command("list"), Ok(Command::List)));
/// assert!(matches!(parse_command("read 12"), Ok(Command::Read(12))));
/// assert!(matches!(parse_command("quit"), Ok(Command::Quit)));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    // Try single-word commands first
    match trimmed {
        "list" | "ls" => return Ok(Command::List),
        "read-all" => return Ok(Command::ReadAll),
        "invitations" | "inv" => return Ok(Command::Invitations),
        "approvals" => return Ok(Command::Approvals),
        "whoami" => return Ok(Command::WhoAmI),
        "logout" => return Ok(Command::Logout),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        _ => {}
    }

    // Parse multi-word commands
    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.first() {
        Some(&"read") => parse_id(&parts, "read").map(Command::Read),
        Some(&"delete") => parse_id(&parts, "delete").map(Command::Delete),
        Some(&"accept") => parse_id(&parts, "accept").map(Command::Accept),
        Some(&"decline") => parse_id(&parts, "decline").map(Command::Decline),
        Some(&"approve") => parse_id(&parts, "approve").map(Command::Approve),
        Some(&"reject") => {
            let id = parse_id(&parts, "reject")?;
            let reason = if parts.len() > 2 {
                Some(parts[2..].join(" "))
            } else {
                None
            };
            Ok(Command::Reject { id, reason })
        }
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse the id argument of a command like "read 12".
fn parse_id(parts: &[&str], command: &'static str) -> Result<i64, ParseError> {
    match parts.get(1) {
        Some(value) => value.parse().map_err(|_| ParseError::InvalidId {
            command,
            value: value.to_string(),
        }),
        None => Err(ParseError::MissingId(command)),
    }
}
