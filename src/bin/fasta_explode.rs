/* crate use */
use clap::Parser;
use log::info;

/* project use */
use fasta_kmer_index::error;
use fasta_kmer_index::explode::{self, ExplodeMode};
use fasta_kmer_index::scheduler::Scheduler;

#[derive(clap::Parser, Debug)]
#[clap(
    name = "fasta_explode",
    version,
    about = "Write each record of a fasta file in `<source>_<name>.fasta`"
)]
struct Command {
    #[clap(help = "Fasta input")]
    source: std::path::PathBuf,

    #[clap(
        short = 't',
        long = "threads",
        help = "Number of threads, 0 use all cpus",
        default_value = "0"
    )]
    threads: usize,

    #[clap(
        short = 'l',
        long = "load-all",
        help = "Load and check each record before write it, lines are rewrapped"
    )]
    load_all: bool,
}

fn run(params: Command) -> error::Result<()> {
    let mode = if params.load_all {
        ExplodeMode::Reload
    } else {
        ExplodeMode::PassThrough
    };

    let paths = explode::explode(&params.source, &Scheduler::new(params.threads), mode)?;

    info!("{} records written", paths.len());

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Command::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
