use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use knowlens::cli::{print_error, run, Args};

fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter())),
        )
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    if let Err(err) = run(&args) {
        print_error(&err, args.output_mode());
        std::process::exit(1);
    }
}
