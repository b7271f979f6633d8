mod actions;
mod fs;
mod scaffold;
mod types;
mod walker;
use actions::action_scaffold;
use anyhow::Result;
use env_logger::Env;
use seahorse::{App, Flag, FlagType};
use std::env;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args: Vec<String> = env::args().collect();
    let app = App::new(env!("CARGO_PKG_NAME"))
        .description(env!("CARGO_PKG_DESCRIPTION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .usage("postman-scaffold [path to collection files] [--output path]")
        .flag(
            Flag::new("output", FlagType::String)
                .description("Write the result here instead of overwriting the input")
                .alias("o"),
        )
        .action(action_scaffold);
    app.run(args);
    Ok(())
}
