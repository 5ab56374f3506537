//! # Command Handlers
//!
//! One function per `kkb` subcommand. Handlers write to the given output
//! so they can be driven from tests; logging goes to stderr.

use std::io::{Read, Write};
use std::path::PathBuf;

use tracing::{debug, info, warn};
use url::Url;

use kkb_core::share::{self, SHARE_QUERY_PARAM};
use kkb_core::{codec, BillSession, BillState, ServiceChargeKind, SUPPORTED_CURRENCIES};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::render;

/// Where a bill is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillSource {
    /// Bill JSON file.
    File(PathBuf),
    /// Share token.
    Token(String),
    /// Share link carrying a token.
    Url(String),
    /// Bill JSON on standard input.
    Stdin,
}

impl BillSource {
    pub fn from_args(file: Option<PathBuf>, token: Option<String>, url: Option<String>) -> Self {
        match (file, token, url) {
            (Some(path), _, _) => BillSource::File(path),
            (_, Some(token), _) => BillSource::Token(token),
            (_, _, Some(url)) => BillSource::Url(url),
            _ => BillSource::Stdin,
        }
    }
}

// =============================================================================
// Input
// =============================================================================

/// Reads a bill from `source`. Unlike the app, an unreadable token is an
/// error here rather than an empty bill.
pub fn load_bill(source: &BillSource, stdin: &mut dyn Read) -> CliResult<BillState> {
    match source {
        BillSource::File(path) => {
            debug!(?path, "Reading bill from file");
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        }
        BillSource::Stdin => {
            debug!("Reading bill from stdin");
            let mut contents = String::new();
            stdin.read_to_string(&mut contents)?;
            Ok(serde_json::from_str(&contents)?)
        }
        BillSource::Token(token) => Ok(codec::decode(token)?),
        BillSource::Url(raw) => bill_from_link(raw),
    }
}

fn bill_from_link(raw: &str) -> CliResult<BillState> {
    let url = Url::parse(raw)?;
    let token = share::token_from_url(&url).ok_or(CliError::MissingToken {
        param: SHARE_QUERY_PARAM,
    })?;
    Ok(codec::decode(&token)?)
}

fn looks_like_link(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

// =============================================================================
// Subcommands
// =============================================================================

/// `kkb split`: per-person breakdown, as text or JSON.
pub fn split(bill: BillState, json: bool, out: &mut dyn Write) -> CliResult<()> {
    let currency = bill.currency_symbol.clone();
    let session = BillSession::from_state(bill);
    let result = session.compute();

    info!(
        people = result.person_totals.len(),
        grand_total = %result.grand_total,
        "Bill split"
    );

    if json {
        serde_json::to_writer_pretty(&mut *out, &result)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render::render_split(&result, &currency))?;
    }
    Ok(())
}

/// `kkb encode`: the token and the share link, one per line.
pub fn encode(bill: BillState, config: &CliConfig, out: &mut dyn Write) -> CliResult<()> {
    let session = BillSession::from_state(bill);
    let base = config.base_url()?;

    writeln!(out, "{}", session.share_token())?;
    writeln!(out, "{}", session.share_link(&base))?;
    Ok(())
}

/// `kkb decode`: the bill behind a token or share link, as JSON.
pub fn decode(input: &str, out: &mut dyn Write) -> CliResult<()> {
    let input = input.trim();
    let bill = if looks_like_link(input) {
        bill_from_link(input)?
    } else {
        codec::decode(input)?
    };

    serde_json::to_writer_pretty(&mut *out, &bill)?;
    writeln!(out)?;
    Ok(())
}

/// Settings for `kkb template`.
#[derive(Debug, Clone, Default)]
pub struct TemplateOptions {
    pub currency: Option<String>,
    pub service_charge: Option<String>,
    pub kind: ServiceChargeKind,
}

/// True when the bill form offers `symbol`. Other symbols still work.
pub fn is_supported_currency(symbol: &str) -> bool {
    SUPPORTED_CURRENCIES.contains(&symbol)
}

/// `kkb template`: an empty bill to fill in.
pub fn template(
    config: &CliConfig,
    options: &TemplateOptions,
    out: &mut dyn Write,
) -> CliResult<()> {
    let currency = options
        .currency
        .as_deref()
        .unwrap_or(&config.display.currency_symbol);
    if !is_supported_currency(currency) {
        warn!(
            currency = %currency,
            "Currency symbol is not offered by the bill form, using it anyway"
        );
    }

    let mut session = BillSession::new();
    session.set_currency(currency);
    session.set_service_charge(options.service_charge.as_deref().unwrap_or(""), options.kind);

    serde_json::to_writer_pretty(&mut *out, session.state())?;
    writeln!(out)?;
    Ok(())
}

/// `kkb currencies`: the bill form's currency symbols, one per line.
pub fn currencies(out: &mut dyn Write) -> CliResult<()> {
    for symbol in SUPPORTED_CURRENCIES {
        writeln!(out, "{}", symbol)?;
    }
    Ok(())
}
