#![forbid(unsafe_code)]
#![warn(clippy::all)]

use anyhow::Result;

mod cli;
mod global;
mod subcommands;

// this is where subcommand function calling is handled
// it goes hand-in-hand with `subcommands.rs`
// it handles the calling of other functions, and some (minimal) argument parsing
fn main() -> Result<()> {
    let matches = cli::get_matches();

    match matches.subcommand() {
        Some(("encrypt", sub_matches)) => {
            subcommands::encrypt(sub_matches)?;
        }
        Some(("decrypt", sub_matches)) => {
            subcommands::decrypt(sub_matches)?;
        }
        Some(("hash", sub_matches)) => {
            subcommands::hash_stream(sub_matches)?;
        }
        Some(("list", sub_matches)) => {
            subcommands::list_values(sub_matches)?;
        }
        _ => (),
    }
    Ok(())
}
