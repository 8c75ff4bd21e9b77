use anyhow::{Result, bail};
use tracing::info;

use sargo_uci::{UciEngine, puzzles};

fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout belongs to the UCI protocol.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--test" {
        if args.len() < 5 {
            bail!("usage: {} --test <FEN> <expected_move> <depth>", args[0]);
        }
        let depth: i32 = args[4].parse()?;
        let passed = puzzles::run_single_test(&args[2], &args[3], depth)?;
        std::process::exit(if passed { 0 } else { 1 });
    }

    info!("sargo starting");
    UciEngine::new().run()?;
    Ok(())
}
