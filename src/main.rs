//! CLI entry point for scoring drawings against their reference

use clap::Parser;
use sketchscore::io::cli::{Cli, FileProcessor};

fn main() -> sketchscore::Result<()> {
    let cli = Cli::parse();
    let env = env_logger::Env::default().default_filter_or(cli.log_level().as_str());
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();

    let mut processor = FileProcessor::new(cli);
    processor.process()
}
