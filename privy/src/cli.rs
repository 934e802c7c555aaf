use std::{path::PathBuf, sync::LazyLock};

use clap::Parser;

pub static ARGS: LazyLock<Args> = LazyLock::new(|| {
    let dotenv_found = dotenvy::dotenv().is_ok();
    if !dotenv_found {
        log::debug!(".env file was not found")
    }

    Args::parse()
});

/// Replays raw IRC lines through the privilege tracker and answers bot
/// commands, writing the responses as raw IRC lines to stdout.
#[derive(clap::Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// TOML config file, every setting has a default
    #[arg(long, env = "PRIVY_CONFIG")]
    pub config: Option<PathBuf>,
    /// read lines from this file instead of stdin
    #[arg(long, short)]
    pub input: Option<PathBuf>,
    /// overrides `bot.nick`
    #[arg(long, env = "PRIVY_NICK")]
    pub nick: Option<String>,
    /// print the privilege table to stderr once the input is exhausted
    #[arg(long)]
    pub dump: bool,
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::Args;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "privy",
            "--config",
            "privy.toml",
            "-i",
            "session.log",
            "--nick",
            "privy_",
            "--dump",
        ])
        .unwrap();
        assert_eq!(args.config.as_deref(), Some(Path::new("privy.toml")));
        assert_eq!(args.input.as_deref(), Some(Path::new("session.log")));
        assert_eq!(args.nick.as_deref(), Some("privy_"));
        assert!(args.dump);
    }
}
