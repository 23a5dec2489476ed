/* crate use */
use clap::Parser;

/* project use */
use fasta_kmer_index::{error, index};

#[derive(clap::Parser, Debug)]
#[clap(
    name = "fasta_index",
    version,
    about = "Build the `<source>.idx` sidecar index of a fasta file"
)]
struct Command {
    #[clap(help = "Fasta input")]
    source: std::path::PathBuf,
}

fn run(params: Command) -> error::Result<()> {
    index::build(&params.source)?;

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Command::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
