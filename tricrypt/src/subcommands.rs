use anyhow::Result;
use clap::ArgMatches;
use tricrypt_core::primitives::Mode;

// this is called from main.rs
// it gets params and sends them to the appropriate functions

use crate::global::parameters::{get_param, get_params, parameter_handler};

pub mod hashing;
pub mod list;
pub mod transform;

pub fn encrypt(sub_matches: &ArgMatches) -> Result<()> {
    let params = parameter_handler(sub_matches)?;

    transform::execute(&get_param("input", sub_matches)?, &params, Mode::Encrypt)
}

pub fn decrypt(sub_matches: &ArgMatches) -> Result<()> {
    let params = parameter_handler(sub_matches)?;

    transform::execute(&get_param("input", sub_matches)?, &params, Mode::Decrypt)
}

pub fn hash_stream(sub_matches: &ArgMatches) -> Result<()> {
    let files = get_params("input", sub_matches)?;

    hashing::hash_stream(&files)
}

pub fn list_values(sub_matches: &ArgMatches) -> Result<()> {
    list::show_values(&get_param("input", sub_matches)?)
}
