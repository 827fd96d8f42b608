use anyhow::{anyhow, Result};
use chrono::{Duration as ChronoDuration, Utc};
use clap::Parser;
use humantime::Duration;

use crate::Opts;
use portal_server::config::Config;
use portal_token::Token;

/// Generate a new token.
///
/// For example, to generate a token for Alice valid for 90 days that
/// fills in her contact details on new collections:
///
/// $ portaladm make-token --sub "alice" --validity "90d" --name "Alice Liddell" --email "alice@example.org"
#[derive(Debug, Parser)]
pub struct MakeToken {
    /// The subject of the JWT token, that is the user ID.
    #[clap(long)]
    sub: String,

    /// The validity period of the JWT token.
    ///
    /// You can use expressions like "2 years", "3 months"
    /// and "1y".
    #[clap(long)]
    validity: Duration,

    /// The display name of the user.
    #[clap(long)]
    name: Option<String>,

    /// The email address of the user.
    #[clap(long)]
    email: Option<String>,

    /// Dump the claims without signing and encoding it.
    #[clap(long)]
    dump_claims: bool,
}

pub async fn run(config: Config, opts: Opts) -> Result<()> {
    let sub = opts
        .command
        .as_make_token()
        .ok_or_else(|| anyhow!("Not a make-token command"))?;
    let duration = ChronoDuration::from_std(sub.validity.into())?;
    let exp = Utc::now()
        .checked_add_signed(duration)
        .ok_or_else(|| anyhow!("Expiry timestamp overflowed"))?;

    let mut token = Token::new(sub.sub.to_owned(), &exp)?;
    token.set_profile(sub.name.clone(), sub.email.clone());

    if sub.dump_claims {
        println!("{}", serde_json::to_string(token.opaque_claims())?);
    } else {
        let encoded_token = token.encode(
            &config.jwt.signing,
            &config.jwt.token_bound_issuer,
            &config.jwt.token_bound_audiences,
        )?;
        println!("{}", encoded_token);
    }

    Ok(())
}
