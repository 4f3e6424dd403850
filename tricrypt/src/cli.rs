use clap::{Arg, Command};

pub mod prompt;

// encrypt and decrypt take exactly the same arguments, only the wording differs
fn transform_command(
    name: &'static str,
    short: char,
    about: &'static str,
    input_help: &'static str,
    algorithm_help: &'static str,
) -> Command<'static> {
    Command::new(name)
        .short_flag(short)
        .about(about)
        .arg(
            Arg::new("input")
                .value_name("input")
                .takes_value(true)
                .required(true)
                .help(input_help),
        )
        .arg(
            Arg::new("output")
                .value_name("output")
                .takes_value(true)
                .help("The output file (derived from the input file if omitted)"),
        )
        .arg(
            Arg::new("algorithm")
                .short('a')
                .long("algorithm")
                .value_name("algorithm")
                .takes_value(true)
                .possible_values(["chacha20", "aes", "rsa"])
                .ignore_case(true)
                .default_value("chacha20")
                .help(algorithm_help),
        )
        .arg(
            Arg::new("keyfile")
                .short('k')
                .long("keyfile")
                .value_name("file")
                .takes_value(true)
                .help("Read the raw key bytes from a file (\"-\" for STDIN)"),
        )
        .arg(
            Arg::new("key")
                .long("key")
                .value_name("text")
                .takes_value(true)
                .conflicts_with("keyfile")
                .help("Provide the key as text"),
        )
        .arg(
            Arg::new("nonce")
                .short('n')
                .long("nonce")
                .value_name("text")
                .takes_value(true)
                .help("The 8-byte ChaCha20 nonce, as text"),
        )
        .arg(
            Arg::new("nonce-file")
                .long("nonce-file")
                .value_name("file")
                .takes_value(true)
                .conflicts_with("nonce")
                .help("Read the raw 8-byte ChaCha20 nonce from a file"),
        )
        .arg(
            Arg::new("modulus")
                .long("modulus")
                .value_name("n")
                .takes_value(true)
                .help("The RSA modulus, in decimal"),
        )
        .arg(
            Arg::new("exponent")
                .long("exponent")
                .value_name("e|d")
                .takes_value(true)
                .help("The RSA exponent (public for encryption, private for decryption), in decimal"),
        )
        .arg(
            Arg::new("decimal")
                .long("decimal")
                .takes_value(false)
                .help("Treat the RSA input as a single decimal number"),
        )
        .arg(
            Arg::new("in-place")
                .long("in-place")
                .takes_value(false)
                .conflicts_with("output")
                .help("Replace the input file with the output"),
        )
        .arg(
            Arg::new("hash")
                .short('H')
                .long("hash")
                .takes_value(false)
                .help("Return a BLAKE3 hash of the output file"),
        )
        .arg(
            Arg::new("force")
                .short('f')
                .long("force")
                .takes_value(false)
                .help("Force all actions"),
        )
}

// this defines all of the clap subcommands and arguments
pub fn build() -> Command<'static> {
    let encrypt = transform_command(
        "encrypt",
        'e',
        "Encrypt a file",
        "The file to encrypt",
        "The algorithm to encrypt with",
    );
    let decrypt = transform_command(
        "decrypt",
        'd',
        "Decrypt a file",
        "The file to decrypt",
        "The algorithm the file was encrypted with",
    );

    let hash = Command::new("hash")
        .about("Hash files with BLAKE3")
        .arg(
            Arg::new("input")
                .value_name("input")
                .takes_value(true)
                .required(true)
                .help("The file(s) to hash")
                .min_values(1)
                .multiple_occurrences(true),
        );

    let list = Command::new("list")
        .about("List the values you can select")
        .arg(
            Arg::new("input")
                .value_name("item")
                .takes_value(true)
                .default_value("algorithms")
                .help("The item to list"),
        );

    Command::new("tricrypt")
        .version(clap::crate_version!())
        .about("Command-line encryption of files with RSA, AES-128 or ChaCha20.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(encrypt)
        .subcommand(decrypt)
        .subcommand(hash)
        .subcommand(list)
}

// it returns the ArgMatches so that a match statement can send everything to the correct place
pub fn get_matches() -> clap::ArgMatches {
    build().get_matches()
}
