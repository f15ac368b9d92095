use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(about = "A small tagged article CMS")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub config: Config,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print an argon2 hash suitable for ADMIN_PASSWORD_HASH.
    HashPassword { password: String },
}

#[derive(Args, Debug, Clone)]
pub struct Config {
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://development.sqlite3",
        help = "SQLite connection string"
    )]
    pub database_url: String,

    #[arg(long, env = "BIND_ADDRESS", default_value = "127.0.0.1:8080")]
    pub bind_address: SocketAddr,

    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    pub admin_username: String,

    #[arg(
        long,
        env = "ADMIN_PASSWORD_HASH",
        hide_env_values = true,
        help = "argon2 hash of the admin password"
    )]
    pub admin_password_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hash_password_subcommand() {
        let cli = Cli::parse_from(["tagpress", "hash-password", "secret"]);
        match cli.command {
            Some(Command::HashPassword { password }) => assert_eq!(password, "secret"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "tagpress",
            "--bind-address",
            "0.0.0.0:3001",
            "--admin-username",
            "editor",
        ]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config.bind_address.port(), 3001);
        assert_eq!(cli.config.admin_username, "editor");
    }
}
