use clap::{Parser, Subcommand};
use image_trim::{config, output, process, scan};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-trim")]
#[command(about = "Remove uniform borders from a directory of images")]
#[command(long_about = "\
Remove uniform borders from a directory of images

Every .jpg .jpeg .png .webp .bmp .tiff file in the source directory is checked
for a border on each edge. Bordered images are cropped and written to the
destination under the same name; clean images are copied unchanged. Other
files are listed and skipped.

The border is black by default. With --allow-color the top-left pixel of each
image is taken as the border color instead. --threshold (0-200) sets how far
a pixel may drift from that color and still count as border.

Settings are read from ImageTrim.json (see 'image-trim gen-config') and can be
overridden per run with flags.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Show per-step trim details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Directory to read images from
    #[arg(long)]
    source: Option<PathBuf>,

    /// Directory to write results to
    #[arg(long)]
    output: Option<PathBuf>,

    /// Color distance tolerance, clamped to 0-200
    #[arg(long, allow_negative_numbers = true)]
    threshold: Option<i32>,

    /// Use the top-left pixel as border color instead of black
    #[arg(long)]
    allow_color: bool,

    /// Use black as border color even if the config file allows color
    #[arg(long, conflicts_with = "allow_color")]
    no_allow_color: bool,

    /// Parallel workers (0 = one per CPU core)
    #[arg(long)]
    jobs: Option<usize>,

    /// Write the effective settings back to the config file
    #[arg(long)]
    save_config: bool,

    /// Also write the per-file log and summary to this file
    #[arg(long)]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Trim every image in the source directory into the destination
    Run(RunArgs),
    /// List the source directory and show which files would be processed
    Check {
        /// Directory to inspect
        #[arg(long)]
        source: Option<PathBuf>,
    },
    /// Print a config file with every option at its default
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Run(args) => {
            let mut app = load_or_default(&cli.config);
            app.apply(&overrides(&args));
            app.validate()?;

            if args.save_config {
                config::save_config(&app, &cli.config)?;
                println!("Saved settings to {}", cli.config.display());
            }

            let transfer = process::TransferConfig::from_app_config(&app);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::process(&transfer, Some(tx), None)?;
            printer.join().map_err(|_| "output thread panicked")?;
            output::print_summary(&result);

            if let Some(path) = &args.log {
                let mut text = output::format_transfer_log(&result).join("\n");
                text.push('\n');
                std::fs::write(path, text)?;
            }
        }
        Command::Check { source } => {
            let source = match source {
                Some(dir) => dir,
                None => PathBuf::from(load_or_default(&cli.config).src_dir),
            };
            if source.as_os_str().is_empty() {
                return Err("no source directory: pass --source or set SrcDir".into());
            }
            let entries = scan::scan(&source)?;
            output::print_check_output(&entries, &source);
        }
        Command::GenConfig => {
            println!("{}", config::stock_config_json());
        }
    }

    Ok(())
}

/// Load the config file; a broken file is reported and replaced by defaults.
fn load_or_default(path: &Path) -> config::AppConfig {
    config::load_config(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), "ignoring config file: {e}");
        config::AppConfig::default()
    })
}

/// Command-line flags take precedence over the config file.
fn overrides(args: &RunArgs) -> config::Overrides {
    let allow_color = match (args.allow_color, args.no_allow_color) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    config::Overrides {
        src_dir: args.source.as_ref().map(|d| d.to_string_lossy().into_owned()),
        dst_dir: args.output.as_ref().map(|d| d.to_string_lossy().into_owned()),
        threshold: args.threshold,
        allow_color,
        max_processes: args.jobs.map(|jobs| (jobs > 0).then_some(jobs)),
    }
}
