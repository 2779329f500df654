#![doc = include_str!("../README.md")]
mod bench;
mod files;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Subcommand)]
pub enum Command {
    /// Compresses INPUT into OUTPUT and writes the key to OUTPUT.key
    #[clap(visible_alias = "e")]
    Encode {
        /// File to compress
        input: PathBuf,
        /// Destination of the payload
        output: PathBuf,
        /// Whether to encode the input as UTF-8 text (one symbol per character) instead of bytes
        #[arg(long, default_value_t = false)]
        text: bool,
        /// Whether to print the code table
        #[arg(long, default_value_t = false)]
        show_codes: bool,
    },
    /// Decompresses PAYLOAD into OUTPUT
    #[clap(visible_alias = "d")]
    Decode {
        /// Compressed payload
        payload: PathBuf,
        /// Destination of the decompressed data
        output: PathBuf,
        /// Key file [default: PAYLOAD.key]
        #[arg(short = 'k', long)]
        key: Option<PathBuf>,
    },
    /// Measures the performance of the coder on pseudo-random text
    #[clap(visible_alias = "b")]
    Bench(BenchConf),
}

#[derive(Args)]
pub struct BenchConf {
    /// Length of the test text
    #[arg(short = 'l', long, default_value_t = 1024*1024)]
    pub len: usize,

    /// Symbols of the test text, each is drawn with the same probability
    #[arg(short = 'a', long, default_value = "qwertyuiopasdfghjklzxcvbnm")]
    pub alphabet: String,

    /// Time (in seconds) of measuring and warming up the CPU cache before measuring
    #[arg(short='t', long, default_value_t = 5)]
    pub time: u16,

    /// Whether to check the validity
    #[arg(long, default_value_t = false)]
    pub verify: bool,

    /// Seed for random number generators
    #[arg(short='s', long, default_value_t = 1234)]
    pub seed: u64,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None, infer_subcommands=true)]
/// Static Huffman coder.
pub struct Conf {
    #[command(subcommand)]
    pub command: Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let conf: Conf = Conf::parse();
    match conf.command {
        Command::Encode { input, output, text, show_codes } => files::encode(&input, &output, text, show_codes),
        Command::Decode { payload, output, key } => {
            let key = key.unwrap_or_else(|| files::key_path(&payload));
            files::decode(&payload, &key, &output)
        },
        Command::Bench(conf) => bench::benchmark(&conf),
    }
}
