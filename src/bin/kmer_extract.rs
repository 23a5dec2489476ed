/* crate use */
use clap::Parser;
use log::info;

/* project use */
use fasta_kmer_index::error;
use fasta_kmer_index::pipeline::{self, Config};
use fasta_kmer_index::writer::OutputFormat;

#[derive(clap::Parser, Debug)]
#[clap(
    name = "kmer_extract",
    version,
    about = "Count canonical kmer of all records of a fasta file"
)]
struct Command {
    #[clap(short = 'i', long = "filename", help = "Fasta input")]
    filename: std::path::PathBuf,

    #[clap(short = 'k', long = "kmersize", help = "Kmer size")]
    kmersize: usize,

    #[clap(
        short = 't',
        long = "threads",
        help = "Number of threads, 0 use all cpus",
        default_value = "0"
    )]
    threads: usize,

    #[clap(
        short = 'f',
        long = "format",
        help = "Output format: fasta, list, csv",
        default_value = "fasta"
    )]
    format: OutputFormat,

    #[clap(
        short = 's',
        long = "streaming",
        help = "Read records line by line instead of load them"
    )]
    streaming: bool,
}

fn run(params: Command) -> error::Result<()> {
    let config = Config::new(
        &params.filename,
        params.kmersize,
        params.threads,
        params.format,
    )?
    .streaming(params.streaming);

    let output = pipeline::run(&config)?;

    info!("Counts written in {}", output.display());

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Command::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
