use anyhow::{Context, Result};
use paris::warn;
use std::io::{self, stdin, Write};
use std::path::Path;

use crate::global::states::{ForceMode, PasswordState};

use tricrypt_core::protected::Protected;
use tricrypt_core::Zeroize;

// this handles user-interactivity, specifically getting a "yes" or "no" answer from the user
// it requires the question itself, if the default is true/false
// if force is enabled then it will just return `true`
pub fn get_answer(prompt: &str, default: bool, force: ForceMode) -> Result<bool> {
    if force == ForceMode::Force {
        return Ok(true);
    }

    let switch = if default { "(Y/n)" } else { "(y/N)" };

    let answer_bool = loop {
        print!("{prompt} {switch}: ");
        io::stdout().flush().context("Unable to flush stdout")?;

        let mut answer = String::new();
        stdin()
            .read_line(&mut answer)
            .context("Unable to read from stdin")?;

        let answer_lowercase = answer.to_lowercase();
        let first_char = answer_lowercase
            .chars()
            .next()
            .context("Unable to get first character of your answer")?;
        break match first_char {
            '\n' | '\r' => default,
            'y' => true,
            'n' => false,
            _ => {
                warn!("Unrecognised answer - please try again");
                continue;
            }
        };
    };
    Ok(answer_bool)
}

// this checks if the file exists
// then it prompts the user if they'd like to overwrite a file (while showing the associated file name)
// if force mode is true, avoid prompts at all
pub fn overwrite_check(path: &Path, force: ForceMode) -> Result<bool> {
    let answer = if std::fs::metadata(path).is_ok() {
        let prompt = format!(
            "{} already exists, would you like to overwrite?",
            path.display()
        );
        get_answer(&prompt, true, force)?
    } else {
        true
    };
    Ok(answer)
}

// this interactively gets a secret from the terminal, without echoing it
// it takes the secret twice, compares, and returns the bytes
// if direct mode is enabled, it just reads the secret once and returns it instantly
pub fn get_password(label: &str, pass_state: &PasswordState) -> Result<Protected<Vec<u8>>> {
    Ok(loop {
        let input = rpassword::prompt_password(format!("{label}: "))
            .with_context(|| format!("Unable to read {}", label.to_lowercase()))?;
        if pass_state == &PasswordState::Direct {
            return Ok(Protected::new(input.into_bytes()));
        }

        let mut input_validation =
            rpassword::prompt_password(format!("Confirm {}: ", label.to_lowercase()))
                .with_context(|| format!("Unable to read {}", label.to_lowercase()))?;

        if input == input_validation && !input.is_empty() {
            input_validation.zeroize();
            break Protected::new(input.into_bytes());
        } else if input.is_empty() {
            warn!("{} cannot be empty, please try again.", label);
        } else {
            warn!("The values aren't the same, please try again.");
        }
    })
}
