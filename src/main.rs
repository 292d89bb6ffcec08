use std::io::{self, Read, Write};

use anyhow::{bail, Context, Result};
use bitarray_codec::{build_table, container, decode, encode, BitArray};
use clap::Parser;
use cli::{Action, Cli};
use colored::Colorize;

mod cli;

fn main() {
    if let Err(e) = run(&Cli::parse()) {
        eprintln!("{} {e:#}", "error:".red());
        std::process::exit(1);
    }
}

fn run(args: &Cli) -> Result<()> {
    let input = read_input()?;

    let output = match &args.action {
        Action::Compress(compress) => {
            let text = String::from_utf8(input).context("input is not valid utf-8")?;
            let table = build_table(&text, compress.table);
            let payload = encode(&table, &text)?;
            let blob = container::pack(&table, &payload)?;
            if args.verbose {
                summary("compressed", text.len(), blob.len());
            }
            blob
        }
        Action::Decompress => {
            let (table, payload) = container::unpack(&input)?;
            let text = decode(&payload, &table)?;
            if args.verbose {
                summary("decompressed", input.len(), text.len());
            }
            text.into_bytes()
        }
        Action::Encrypt(keys) => {
            let text = String::from_utf8(input).context("input is not valid utf-8")?;
            let (secret, key) = BitArray::encrypt(&text);
            key.to_file(&keys.key)
                .with_context(|| format!("cannot write key to {}", keys.key.display()))?;
            secret.to_bytes()
        }
        Action::Decrypt(keys) => {
            let key = BitArray::from_file(&keys.key, None)
                .with_context(|| format!("cannot read key from {}", keys.key.display()))?;
            let secret = BitArray::from_bytes(&input, None);
            if key.len() != secret.len() {
                bail!(
                    "key is {} bytes but the message is {} bytes",
                    key.len() / 8,
                    secret.len() / 8
                );
            }
            secret.decrypt(&key)?.into_bytes()
        }
    };

    io::stdout().write_all(&output)?;
    Ok(())
}

fn read_input() -> Result<Vec<u8>> {
    let mut input = vec![];
    io::stdin().lock().read_to_end(&mut input)?;
    Ok(input)
}

fn summary(action: &str, from: usize, to: usize) {
    eprintln!(
        "{} {from} bytes -> {to} bytes",
        format!("{action}:").green()
    );
}
