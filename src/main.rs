use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;

use ev_dataset::{print_summary, write_csv, DatasetConfig, SeriesGenerator};

const DEFAULT_OUTPUT: &str = "ev_market_dataset.csv";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut config = DatasetConfig::default();
    let mut output = PathBuf::from(DEFAULT_OUTPUT);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.get(i).context("--config requires a file path")?;
                config = DatasetConfig::from_file(path)?;
            }
            "--seed" => {
                i += 1;
                config.seed = args
                    .get(i)
                    .context("--seed requires a value")?
                    .parse()
                    .context("--seed must be an unsigned integer")?;
            }
            "--periods" => {
                i += 1;
                config.periods = args
                    .get(i)
                    .context("--periods requires a value")?
                    .parse()
                    .context("--periods must be a positive integer")?;
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            arg if arg.starts_with("--") => bail!("Unknown option: {}", arg),
            arg => output = PathBuf::from(arg),
        }
        i += 1;
    }

    println!("🔋 EV Market Dataset Generator v{}", ev_dataset::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "\n🎲 Generating {} periods × {} states × {} models (seed {})...",
        config.periods,
        config.states.len(),
        config.models.len(),
        config.seed
    );

    let mut generator = SeriesGenerator::new(config.clone())?;
    let rows = generator.generate()?;
    println!("✓ Generated {} rows", rows.len());

    println!("\n💾 Writing CSV...");
    write_csv(&output, &config, &rows)?;
    println!("✓ Dataset created successfully: {}", output.display());

    print_summary(&config, &rows);

    Ok(())
}

fn print_usage() {
    println!("Usage: ev-dataset [OUTPUT.csv] [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config FILE    Load scenario from a JSON file");
    println!("  --seed N         Override the RNG seed");
    println!("  --periods N      Override the number of monthly periods");
    println!("  -h, --help       Show this help");
    println!();
    println!("Default output: {}", DEFAULT_OUTPUT);
}
