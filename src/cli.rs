use std::path::PathBuf;

use bitarray_codec::TableStrategy;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(about = "Prefix-code compression and one-time pad encryption over bit arrays")]
pub struct Cli {
    #[arg(long, short, help = "Print a size summary to stderr")]
    pub verbose: bool,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Action {
    #[command(alias = "c", about = "Compress the text on stdin")]
    Compress(CompressArgs),

    #[command(alias = "d", about = "Decompress the contents of stdin")]
    Decompress,

    #[command(about = "Encrypt the text on stdin with a fresh one-time pad")]
    Encrypt(KeyArgs),

    #[command(about = "Decrypt the contents of stdin with a one-time pad")]
    Decrypt(KeyArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CompressArgs {
    #[arg(long, short, help = "How codes are assigned to symbols", default_value_t = TableStrategy::default())]
    pub table: TableStrategy,
}

#[derive(Debug, Clone, Args)]
pub struct KeyArgs {
    #[arg(long, short, help = "File the key is written to or read from")]
    pub key: PathBuf,
}
