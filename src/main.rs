use aigit::{
   Result,
   cli::{Cli, Command, HookAction},
   commit, hooks, review, setup, style,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
   let filter = match EnvFilter::try_from_default_env() {
      Ok(filter) => filter,
      Err(_) if verbose => EnvFilter::new("aigit=debug"),
      Err(_) => EnvFilter::new("warn"),
   };
   tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .with_target(false)
      .init();
}

fn run(cli: Cli) -> Result<()> {
   match cli.command {
      Command::Config { key, value, show } => {
         setup::run_config(key.as_deref(), value.as_deref(), show)
      },
      Command::Commit { yes, all } => commit::run_commit(&cli.dir, yes, all),
      Command::Review { staged, hook } => review::run_review(&cli.dir, staged, hook),
      Command::Hooks { action: HookAction::Install } => hooks::run_install(&cli.dir),
      Command::Hooks { action: HookAction::Uninstall } => hooks::run_uninstall(&cli.dir),
   }
}

fn main() {
   let cli = Cli::parse();
   init_tracing(cli.verbose);

   if let Err(e) = run(cli) {
      eprintln!("{} {}", style::error(style::icons::ERROR), style::error(&e.to_string()));
      std::process::exit(1);
   }
}
