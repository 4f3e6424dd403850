// this file handles getting parameters from clap's ArgMatches
// it returns information (e.g. CryptoParams) to functions that require it

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use domain::transform::Destination;
use tricrypt_core::key::KeyMaterial;
use tricrypt_core::primitives::{Algorithm, Mode, RsaFormat};
use tricrypt_core::BigUint;

use super::states::{ForceMode, HashMode, PasswordState, Secret, KEY_ENV, NONCE_ENV};
use super::structs::{CryptoParams, RsaParams};

pub fn get_params(name: &str, sub_matches: &ArgMatches) -> Result<Vec<String>> {
    let values = sub_matches
        .get_many::<String>(name)
        .with_context(|| format!("No {} provided", name))?
        .map(String::from)
        .collect();
    Ok(values)
}

pub fn get_param(name: &str, sub_matches: &ArgMatches) -> Result<String> {
    let value = sub_matches
        .value_of(name)
        .with_context(|| format!("No {} provided", name))?
        .to_string();
    Ok(value)
}

pub fn parameter_handler(sub_matches: &ArgMatches) -> Result<CryptoParams> {
    let algorithm = algorithm(sub_matches)?;

    let hash_mode = if sub_matches.is_present("hash") {
        HashMode::CalculateHash
    } else {
        HashMode::NoHash
    };

    let destination = if sub_matches.is_present("in-place") {
        Destination::InPlace
    } else if let Some(output) = sub_matches.value_of("output") {
        Destination::Path(PathBuf::from(output))
    } else {
        Destination::Derived
    };

    let rsa = if algorithm == Algorithm::Rsa {
        Some(rsa_params(sub_matches)?)
    } else {
        reject_unused(sub_matches, &["modulus", "exponent", "decimal"], algorithm)?;
        None
    };

    if algorithm != Algorithm::ChaCha20 {
        reject_unused(sub_matches, &["nonce", "nonce-file"], algorithm)?;
    }

    Ok(CryptoParams {
        hash_mode,
        force: forcemode(sub_matches),
        algorithm,
        destination,
        key: Secret::init(sub_matches, "keyfile", "key", KEY_ENV, "Key"),
        nonce: Secret::init(sub_matches, "nonce-file", "nonce", NONCE_ENV, "Nonce"),
        rsa,
    })
}

pub fn algorithm(sub_matches: &ArgMatches) -> Result<Algorithm> {
    get_param("algorithm", sub_matches)?
        .to_lowercase()
        .parse()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid algorithm selected! Use \"tricrypt list\" to see all possible values."
            )
        })
}

// arguments that only apply to another algorithm are an error, rather than being ignored
fn reject_unused(sub_matches: &ArgMatches, args: &[&str], algorithm: Algorithm) -> Result<()> {
    match args.iter().copied().find(|arg| sub_matches.is_present(*arg)) {
        Some(arg) => Err(anyhow::anyhow!("--{} cannot be used with {}", arg, algorithm)),
        None => Ok(()),
    }
}

fn rsa_params(sub_matches: &ArgMatches) -> Result<RsaParams> {
    let modulus = get_param("modulus", sub_matches)
        .context("RSA requires a modulus (--modulus)")?
        .parse::<BigUint>()
        .context("The RSA modulus must be a decimal integer")?;

    let exponent = get_param("exponent", sub_matches)
        .context("RSA requires an exponent (--exponent)")?
        .parse::<BigUint>()
        .context("The RSA exponent must be a decimal integer")?;

    let format = if sub_matches.is_present("decimal") {
        RsaFormat::Decimal
    } else {
        RsaFormat::Binary
    };

    Ok(RsaParams {
        modulus,
        exponent,
        format,
    })
}

// secrets are only gathered once the user has confirmed any prompts
// the key is asked for twice when encrypting, so a typo can't lock the file away
pub fn key_material(params: &CryptoParams, mode: Mode) -> Result<KeyMaterial> {
    let pass_state = match mode {
        Mode::Encrypt => PasswordState::Validate,
        Mode::Decrypt => PasswordState::Direct,
    };

    let material = match params.algorithm {
        Algorithm::Rsa => {
            let rsa = params
                .rsa
                .as_ref()
                .context("No RSA parameters provided")?;
            KeyMaterial::Rsa {
                modulus: rsa.modulus.clone(),
                exponent: rsa.exponent.clone(),
                format: rsa.format,
            }
        }
        Algorithm::Aes128 => KeyMaterial::Aes {
            key: params.key.get_secret(&pass_state)?,
        },
        Algorithm::ChaCha20 => KeyMaterial::ChaCha20 {
            key: params.key.get_secret(&pass_state)?,
            nonce: params
                .nonce
                .get_secret(&PasswordState::Direct)?
                .expose()
                .clone(),
        },
    };

    Ok(material)
}

pub fn forcemode(sub_matches: &ArgMatches) -> ForceMode {
    if sub_matches.is_present("force") {
        ForceMode::Force
    } else {
        ForceMode::Prompt
    }
}
