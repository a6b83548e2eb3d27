use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use walkthrough_resolver::cli::{Command, RootArgs};
use walkthrough_resolver::commands;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.global.log_json);

    match args.command {
        Command::Init(cmd) => commands::run_init(cmd),
        Command::Classes => commands::run_classes(),
        Command::Default(cmd) => commands::run_default(cmd),
        Command::Validate(cmd) => commands::run_validate(cmd),
        Command::Resolve(cmd) => commands::run_resolve(&args.global, cmd),
        Command::Save(cmd) => commands::run_save(&args.global, cmd),
        Command::Reset(cmd) => commands::run_reset(&args.global, cmd),
    }
}
