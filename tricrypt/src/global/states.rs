// this file contains enums found all around the codebase
// they act as toggles for certain features, so they can be
// enabled if selected by the user

use std::io::Read;

use anyhow::{Context, Result};
use clap::ArgMatches;
use tricrypt_core::protected::Protected;

use crate::cli::prompt::get_password;

pub const KEY_ENV: &str = "TRICRYPT_KEY";
pub const NONCE_ENV: &str = "TRICRYPT_NONCE";

#[derive(PartialEq, Eq, Clone, Copy)]
pub enum HashMode {
    CalculateHash,
    NoHash,
}

#[derive(PartialEq, Eq, Clone, Copy)]
pub enum ForceMode {
    Force,
    Prompt,
}

#[derive(PartialEq, Eq)]
pub enum PasswordState {
    Validate,
    Direct, // maybe not the best name
}

/// Where a secret (the key, or the ChaCha20 nonce) should be read from
pub enum Secret {
    File(String),
    Text(Protected<Vec<u8>>),
    Env(&'static str),
    User(&'static str),
}

impl Secret {
    // the precedence is: file, command-line text, environment variable, interactive prompt
    pub fn init(
        sub_matches: &ArgMatches,
        file_arg: &str,
        text_arg: &str,
        env: &'static str,
        label: &'static str,
    ) -> Self {
        if let Some(path) = sub_matches.value_of(file_arg) {
            Secret::File(path.to_string())
        } else if let Some(text) = sub_matches.value_of(text_arg) {
            Secret::Text(Protected::new(text.as_bytes().to_vec()))
        } else if std::env::var_os(env).is_some() {
            Secret::Env(env)
        } else {
            Secret::User(label)
        }
    }

    // this handles getting the secret, and returning it
    // it relies on `init()` to determine which route to get the secret
    // it has a check for if the secret is empty or not
    pub fn get_secret(&self, pass_state: &PasswordState) -> Result<Protected<Vec<u8>>> {
        let secret = match self {
            Secret::File(path) if path == "-" => {
                let secret = get_bytes(&mut std::io::stdin()).context("Unable to read STDIN")?;
                if secret.expose().is_empty() {
                    return Err(anyhow::anyhow!("STDIN is empty"));
                }
                secret
            }
            Secret::File(path) => {
                let mut reader = std::fs::File::open(path)
                    .with_context(|| format!("Unable to read file: {}", path))?;
                let secret =
                    get_bytes(&mut reader).with_context(|| format!("Unable to read file: {}", path))?;
                if secret.expose().is_empty() {
                    return Err(anyhow::anyhow!(format!("File '{}' is empty", path)));
                }
                secret
            }
            Secret::Text(text) => text.clone(),
            Secret::Env(env) => Protected::new(
                std::env::var(env)
                    .with_context(|| format!("Unable to read {} from environment variable", env))?
                    .into_bytes(),
            ),
            Secret::User(label) => get_password(label, pass_state)?,
        };

        if secret.expose().is_empty() {
            Err(anyhow::anyhow!("The specified secret is empty!"))
        } else {
            Ok(secret)
        }
    }
}

fn get_bytes(reader: &mut impl Read) -> std::io::Result<Protected<Vec<u8>>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(Protected::new(data))
}
