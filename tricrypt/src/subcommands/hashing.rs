use anyhow::{Context, Result};
use domain::hasher::Blake3Hasher;
use paris::Logger;
use std::cell::RefCell;

// this hashes the input file
// it reads it in blocks, updates the hasher, and finalises/displays the hash
// it's used by hash-standalone mode, and after a transform with `--hash`
pub fn hash_stream(files: &[String]) -> Result<()> {
    let mut logger = Logger::new();
    for input in files {
        let input_file = std::fs::File::open(input)
            .with_context(|| format!("Unable to open file: {}", input))?;

        let hash = domain::hash::execute(
            Blake3Hasher::new(),
            domain::hash::Request {
                reader: &RefCell::new(input_file),
            },
        )
        .with_context(|| format!("Unable to hash file: {}", input))?;

        logger.success(format!("{}: {}", input, hash));
    }

    Ok(())
}
