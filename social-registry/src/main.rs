use anyhow::Result;
use clap::Parser;
use tokio::{
    io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader},
    select,
};
use tracing::{info, warn};

use social_registry::{
    cli::Cli,
    console::{Console, Outcome},
    loader, SocialRegistry,
};

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut registry = SocialRegistry::new();
    if let Some(path) = &cli.data {
        let report = loader::load_file(&mut registry, path)?;
        info!(path = %path.display(), loaded = report.loaded, "data file loaded");
    }

    let mut console = Console::new(registry, cli.history_limit);
    write_stdout(&format!(
        "{} clients loaded. Type HELP (or h) for commands.",
        console.registry().count()
    ))
    .await?;

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut input = String::new();
    loop {
        input.clear();
        select! {
            bytes_read = stdin.read_line(&mut input) => {
                if !handle_input(bytes_read, &input, &mut console).await? {
                    break;
                }
            }
            ctrl_c = tokio::signal::ctrl_c() => {
                if let Err(error) = ctrl_c {
                    warn!(?error, "ctrl-c handler failed");
                }
                break;
            }
        }
    }

    Ok(())
}

async fn handle_input(
    bytes_read: io::Result<usize>,
    input: &str,
    console: &mut Console,
) -> Result<bool> {
    if bytes_read? == 0 {
        return Ok(false);
    }
    if input.trim().is_empty() {
        return Ok(true);
    }

    match console.run_line(input) {
        Ok(Outcome::Continue(output)) => write_stdout(&output).await?,
        Ok(Outcome::Exit) => return Ok(false),
        Err(err) => write_stderr(&format!("error: {err:#}")).await?,
    }
    Ok(true)
}

async fn write_stdout(line: &str) -> io::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}

async fn write_stderr(line: &str) -> io::Result<()> {
    let mut stderr = tokio::io::stderr();
    stderr.write_all(line.as_bytes()).await?;
    stderr.write_all(b"\n").await?;
    stderr.flush().await
}
