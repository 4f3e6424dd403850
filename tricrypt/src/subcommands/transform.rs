use std::path::{Path, PathBuf};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use domain::storage::FileStorage;
use domain::transform::{derive_destination, Destination, Stage};
use paris::{warn, Logger};
use tricrypt_core::primitives::{Algorithm, Mode};
use tricrypt_core::visual::create_spinner;

use crate::cli::prompt::{get_answer, overwrite_check};
use crate::global::parameters::key_material;
use crate::global::states::HashMode;
use crate::global::structs::CryptoParams;

fn stage_message(stage: Stage) -> &'static str {
    match stage {
        Stage::Idle => "Checking the parameters",
        Stage::Reading => "Opening the input file",
        Stage::Transforming => "Transforming",
        Stage::Writing => "Saving the output file",
        Stage::Done => "Done",
        Stage::Failed => "Failed",
    }
}

// this function is for encrypting or decrypting a single file
// it handles any user-facing interactiveness (prompts, secrets, the spinner)
// the actual transform is left to the domain crate, which writes through a temporary file
pub fn execute(input: &str, params: &CryptoParams, mode: Mode) -> Result<()> {
    let mut logger = Logger::new();
    let source = PathBuf::from(input);

    let destination_path = match &params.destination {
        Destination::Derived => derive_destination(&source, mode),
        Destination::Path(path) => path.clone(),
        Destination::InPlace => source.clone(),
    };

    if params.destination == Destination::InPlace {
        let prompt = format!("{} will be replaced with its {}ed contents, continue?", input, mode);
        if !get_answer(&prompt, true, params.force)? {
            exit(0);
        }
    } else if !overwrite_check(&destination_path, params.force)? {
        exit(0);
    }

    let key_material = key_material(params, mode)?;

    if params.algorithm == Algorithm::ChaCha20 && mode == Mode::Encrypt {
        warn!("Never reuse this key and nonce pair for another file");
    }

    logger.info(format!("Using {} for {}ion", params.algorithm, mode));
    logger.info(format!("{}ing {} (this may take a while)", capitalise(mode), input));

    let start_time = Instant::now();
    let spinner = create_spinner();

    let result = domain::transform::execute(
        Arc::new(FileStorage),
        domain::transform::Request {
            source,
            destination: params.destination.clone(),
            algorithm: params.algorithm,
            mode,
            key_material,
            on_stage: Some(Box::new(|stage| spinner.set_message(stage_message(stage)))),
        },
    );

    spinner.finish_and_clear();

    let output = result.with_context(|| format!("Unable to {} {}", mode, input))?;
    let duration = start_time.elapsed();

    logger.success(format!(
        "{}ion successful! File saved as {} [took {:.2}s]",
        capitalise(mode),
        output.display(),
        duration.as_secs_f32(),
    ));

    if params.hash_mode == HashMode::CalculateHash {
        super::hashing::hash_stream(&[path_string(&output)?])?;
    }

    Ok(())
}

fn capitalise(mode: Mode) -> &'static str {
    match mode {
        Mode::Encrypt => "Encrypt",
        Mode::Decrypt => "Decrypt",
    }
}

fn path_string(path: &Path) -> Result<String> {
    path.to_str()
        .map(String::from)
        .context("Unable to get &str from PathBuf")
}
