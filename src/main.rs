//! CLI entry point for stereogram generation

use clap::Parser;
use sirds::io::cli::{Cli, FileProcessor};
use sirds::io::logging;

fn main() -> sirds::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
