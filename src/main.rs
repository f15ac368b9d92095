use clap::Parser;
use tagpress::{build_app, hash_password_argon2, run_app, Cli, Command};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        error!("Error: {:?}", error);
        std::process::exit(1);
    }
}

async fn run(Cli { command, config }: Cli) -> tagpress::Result<()> {
    match command {
        Some(Command::HashPassword { password }) => {
            println!("{}", hash_password_argon2(password).await?);
            Ok(())
        }
        None => {
            let router = build_app(&config).await?;
            run_app(router, config.bind_address).await
        }
    }
}
