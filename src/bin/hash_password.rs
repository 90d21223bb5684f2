// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use clap::Parser;
use hydra_consent::session::{encode_password_hash, verify_password_hash};

/// Produce the `pass` value of an `access.users` entry
///
/// The password is hashed with SHA-512 crypt and base64 encoded.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Password to hash, read from the first line of stdin when omitted
    password: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let password = match args.password {
        Some(password) => password,
        None => {
            let mut line = String::new();
            io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Failed to read password from stdin")?;
            line.trim_end_matches(['\n', '\r']).to_string()
        }
    };
    if password.is_empty() {
        anyhow::bail!("Refusing to hash an empty password");
    }

    let encoded = encode_password_hash(&password)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    if !verify_password_hash(&password, &encoded) {
        anyhow::bail!("Generated hash does not verify");
    }

    println!("{}", encoded);
    Ok(())
}
