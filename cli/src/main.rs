#[macro_use]
extern crate log;

use structopt::StructOpt;

mod contexts;
mod shape;
mod spec;

fn main() {
    let cli_args = CliArgs::from_args();

    let level = match cli_args.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = cli_args.run() {
        error!("{e:?}");
        std::process::exit(1)
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "dlspec", about = "Check tensor shapes, network specs and execution contexts")]
pub struct CliArgs {
    #[structopt(short = "v", parse(from_occurrences))]
    pub verbosity: usize,
    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Parse and validate a shape like "3,?,224"
    Shape(shape::ShapeArgs),
    /// Load a network spec from a JSON settings file
    Spec(spec::SpecArgs),
    /// Build an execution context registry from a JSON settings file
    Contexts(contexts::ContextsArgs),
}

impl CliArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.command {
            Command::Shape(args) => args.run(),
            Command::Spec(args) => args.run(),
            Command::Contexts(args) => args.run(),
        }
    }
}
