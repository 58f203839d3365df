use clap::Parser;
use deed::cli::{Cli, Commands};
use miette::Result;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    let default_filter = if global.verbose { "deed=debug" } else { "deed=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("DEED_LOG").unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match cli.command {
        Commands::Start(args) => deed::cli::commands::start::run(args, &global),
        Commands::Set(args) => deed::cli::commands::set::run(args, &global),
        Commands::Check(args) => deed::cli::commands::check::run(args, &global),
        Commands::Preview(args) => deed::cli::commands::preview::run(args, &global),
        Commands::Export(args) => deed::cli::commands::export::run(args, &global),
        Commands::Print(args) => deed::cli::commands::print::run(args, &global),
        Commands::Mail(args) => deed::cli::commands::mail::run(args, &global),
        Commands::Draft(cmd) => deed::cli::commands::draft::run(cmd, &global),
        Commands::Steps => deed::cli::commands::steps::run(&global),
        Commands::Config(cmd) => deed::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => deed::cli::commands::completions::run(args),
    }
}
