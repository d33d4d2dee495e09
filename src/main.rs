use clap::Parser;
use planhub::cli::Context;
use planhub::cli::commands::Cli;
use planhub::cli::handlers;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        // No subcommand → launch TUI
        None => Context::from_flags(cli.store.as_deref(), cli.config.as_deref())
            .map_err(Into::into)
            .and_then(|ctx| {
                planhub::logging::init(&ctx.log_dir(), &ctx.config.log.level);
                planhub::tui::run(ctx)
            }),
        Some(_) => handlers::dispatch(cli),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
