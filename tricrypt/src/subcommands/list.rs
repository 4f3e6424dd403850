use anyhow::Result;

use tricrypt_core::primitives::ALGORITHMS;

// this just lists values contained within arrays
pub fn show_values(input: &str) -> Result<()> {
    match input.to_lowercase().as_str() {
        "algorithms" | "algorithm" => {
            println!("Here are all possible algorithms you can select:");
            for algorithm in &ALGORITHMS {
                println!("{} => {}", algorithm.id(), algorithm);
            }
        }
        _ => return Err(anyhow::anyhow!(format!("Item \"{}\" not found", input))),
    }

    Ok(())
}
