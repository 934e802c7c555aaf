use anyhow::Context;
use bot::Bot;
use cli::ARGS;

use crate::config::Config;

mod bot;
mod cli;
mod command;
mod commands;
mod config;
mod guard;
mod response;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(
        if cfg!(debug_assertions) {
            "DEBUG"
        } else {
            "INFO"
        },
    ));

    let config = Config::load(ARGS.config.as_deref()).with_context(|| match &ARGS.config {
        Some(path) => format!("failed to load config from {}", path.display()),
        None => "failed to build the default config".to_owned(),
    })?;
    let features = config
        .network
        .features()
        .context("invalid [network] settings")?;
    let nick = ARGS.nick.clone().unwrap_or(config.bot.nick);

    let mut bot = Bot::new(nick, features)
        .add_channels(config.bot.channels)
        .add_commands(commands::builtin(&config.bot.prefix, &config.commands));

    bot.run(ARGS.input.as_deref()).await?;

    if ARGS.dump {
        eprint!("{}", bot.dump_table());
    }
    Ok(())
}
