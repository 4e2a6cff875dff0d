//! Operator command parsing.
//!
//! Text-command dispatch stays out of the purge core: everything here is
//! pure string handling that either yields a well-formed [`Command`] or a
//! [`BotError::MalformedCommand`]. The engine never sees an invalid rule.

use chrono::{DateTime, NaiveDate, Utc};

use crate::core::models::{MessageId, PurgeRule, UserId};
use crate::core::rate::DelayPreset;
use crate::errors::BotError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DelaySetting {
    Preset(DelayPreset),
    Seconds(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Purge {
        rule: PurgeRule,
        /// Scan ceiling; `None` scans the full history.
        limit: Option<u64>,
    },
    /// `None` unconditionally disables user watching.
    WatchUser(Option<UserId>),
    WatchAll,
    WatchWord(String),
    Protect(MessageId),
    Unprotect(MessageId),
    ProtectedList,
    UnprotectAll,
    SetDelay(DelaySetting),
    ShowDelay,
    Stop,
}

/// Parses an incoming message as an operator command.
///
/// Returns `None` when the text does not carry the command prefix. `caller`
/// supplies the default target for `purge_user` without an argument.
pub fn parse(content: &str, prefix: &str, caller: UserId) -> Option<Result<Command, BotError>> {
    let body = content.trim().strip_prefix(prefix)?;
    let mut parts = body.split_whitespace();
    let name = parts.next()?;
    let args: Vec<&str> = parts.collect();
    Some(parse_named(name, &args, caller))
}

fn parse_named(name: &str, args: &[&str], caller: UserId) -> Result<Command, BotError> {
    match name {
        "purge_user" => {
            let (user, rest) = match args.first() {
                Some(first) => match parse_user_ref(first) {
                    Some(id) => (id, &args[1..]),
                    None => (caller, &args[..]),
                },
                None => (caller, &args[..]),
            };
            // A leading non-numeric arg that is not a user reference is a
            // typo'd mention, not a limit.
            if !rest.is_empty() && rest.len() == args.len() && rest[0].parse::<u64>().is_err() {
                return Err(BotError::MalformedCommand(format!(
                    "unresolved user reference: {}",
                    rest[0]
                )));
            }
            let limit = parse_limit(rest)?;
            Ok(Command::Purge {
                rule: PurgeRule::ByAuthor(user),
                limit,
            })
        }
        "purge_contains" => {
            let (text, rest) = take_text_arg(args)?;
            Ok(Command::Purge {
                rule: PurgeRule::BySubstring(text),
                limit: parse_limit(rest)?,
            })
        }
        "purge_links" => Ok(Command::Purge {
            rule: PurgeRule::ByLinkPattern,
            limit: parse_limit(args)?,
        }),
        "purge_files" => Ok(Command::Purge {
            rule: PurgeRule::ByAttachmentPresence,
            limit: parse_limit(args)?,
        }),
        "purge_after" => {
            let raw = args.first().ok_or_else(|| {
                BotError::MalformedCommand("usage: purge_after <date> [limit]".to_string())
            })?;
            let threshold = parse_date(raw)?;
            Ok(Command::Purge {
                rule: PurgeRule::ByTimestamp(threshold),
                limit: parse_limit(&args[1..])?,
            })
        }
        "purge_all" => Ok(Command::Purge {
            rule: PurgeRule::Unconditional,
            limit: parse_limit(args)?,
        }),
        "watch_user" => match args.first() {
            None => Ok(Command::WatchUser(None)),
            Some(raw) => parse_user_ref(raw)
                .map(|id| Command::WatchUser(Some(id)))
                .ok_or_else(|| {
                    BotError::MalformedCommand(format!("unresolved user reference: {}", raw))
                }),
        },
        "watch_all" => Ok(Command::WatchAll),
        "watch_word" => {
            let (word, _) = take_text_arg(args)?;
            Ok(Command::WatchWord(word))
        }
        "protect" => parse_message_id(args).map(Command::Protect),
        "unprotect" => parse_message_id(args).map(Command::Unprotect),
        "protected" => Ok(Command::ProtectedList),
        "unprotect_all" => Ok(Command::UnprotectAll),
        "delay" => match args.first() {
            None => Ok(Command::ShowDelay),
            Some(raw) => parse_delay(raw).map(Command::SetDelay),
        },
        "stop" => Ok(Command::Stop),
        other => Err(BotError::MalformedCommand(format!(
            "unknown command: {}",
            other
        ))),
    }
}

/// `<@123>`, `<@!123>`, or a bare numeric id.
fn parse_user_ref(raw: &str) -> Option<UserId> {
    let inner = raw
        .strip_prefix("<@!")
        .or_else(|| raw.strip_prefix("<@"))
        .map_or(raw, |s| s.strip_suffix('>').unwrap_or(s));
    inner.parse().ok()
}

/// Trailing optional numeric limit; 0 means unbounded.
fn parse_limit(args: &[&str]) -> Result<Option<u64>, BotError> {
    match args.first() {
        None => Ok(None),
        Some(raw) => {
            let n: u64 = raw.parse().map_err(|_| {
                BotError::MalformedCommand(format!("invalid limit: {}", raw))
            })?;
            Ok(if n == 0 { None } else { Some(n) })
        }
    }
}

fn take_text_arg<'a>(args: &'a [&'a str]) -> Result<(String, &'a [&'a str]), BotError> {
    // A trailing numeric token is treated as the limit, the rest as text.
    let split = match args.split_last() {
        Some((last, head)) if !head.is_empty() && last.parse::<u64>().is_ok() => head.len(),
        _ => args.len(),
    };
    if split == 0 {
        return Err(BotError::MalformedCommand(
            "missing text argument".to_string(),
        ));
    }
    Ok((args[..split].join(" "), &args[split..]))
}

fn parse_message_id(args: &[&str]) -> Result<MessageId, BotError> {
    let raw = args
        .first()
        .ok_or_else(|| BotError::MalformedCommand("missing message id".to_string()))?;
    raw.parse()
        .map_err(|_| BotError::MalformedCommand(format!("invalid message id: {}", raw)))
}

/// RFC 3339, or a bare `YYYY-MM-DD` taken as midnight UTC.
fn parse_date(raw: &str) -> Result<DateTime<Utc>, BotError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
        .map_err(|_| BotError::MalformedCommand(format!("unparseable date: {}", raw)))
}

fn parse_delay(raw: &str) -> Result<DelaySetting, BotError> {
    if let Some(preset) = DelayPreset::parse(raw) {
        return Ok(DelaySetting::Preset(preset));
    }
    let secs: f64 = raw
        .parse()
        .map_err(|_| BotError::MalformedCommand(format!("invalid delay: {}", raw)))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(BotError::MalformedCommand(format!("invalid delay: {}", raw)));
    }
    Ok(DelaySetting::Seconds(secs))
}
