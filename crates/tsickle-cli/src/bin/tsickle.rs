use clap::Parser;
use tracing_subscriber::EnvFilter;

use tsickle_cli::args::CliArgs;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let filter = if args.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };
    tracing_subscriber::fmt().with_env_filter(filter).without_time().init();

    let success = tsickle_cli::run(args)?;
    std::process::exit(i32::from(!success));
}
