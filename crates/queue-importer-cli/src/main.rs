use clap::Parser;
use queue_importer_cli::{run_cli, wait_for_acknowledgement, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let pause = cli.pause;

    let exit_code = match run_cli(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    if pause {
        // Nothing useful to do if stdin is gone
        let _ = wait_for_acknowledgement();
    }

    std::process::exit(exit_code);
}
