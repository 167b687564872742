use batch_imgproc::config::ProcessorConfig;
use batch_imgproc::imaging::{OutputFormat, Transform};
use batch_imgproc::output;
use batch_imgproc::process::Processor;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "batch-imgproc")]
#[command(about = "Apply one transform to every image in a directory tree")]
#[command(long_about = "\
Apply one transform to every image in a directory tree

Every .jpg, .jpeg, .png, .gif, .webp and .tiff file under --source (any
depth, any letter case) is transformed and written to the same relative
path under --dest. Missing destination folders are created.

  photos/                 processed/
  ├── cat.jpg      ──►    ├── cat.jpg
  └── dog/                └── dog/
      └── pup.png  ──►        └── pup.png

A file that cannot be read or written is reported and skipped; the rest of
the batch still runs. Set RUST_LOG=debug for detailed diagnostics.")]
#[command(version)]
struct Cli {
    /// Directory scanned for input images
    #[arg(long, default_value = "images", global = true)]
    source: PathBuf,

    /// Directory receiving the transformed images
    #[arg(long, default_value = "processed", global = true)]
    dest: PathBuf,

    /// Maximum parallel workers (default: all cores, 1 = sequential)
    #[arg(long, short = 'j', global = true)]
    jobs: Option<usize>,

    /// Print the batch report as JSON instead of progress lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the images that would be processed
    Scan,
    /// Resize to exact dimensions (aspect ratio not preserved)
    Resize { width: u32, height: u32 },
    /// Crop to the pixel box [left, right) x [top, bottom)
    Crop {
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
    },
    /// Re-encode as another format (jpg, jpeg, png, gif, webp, tif, tiff)
    Convert { format: OutputFormat },
    /// Rotate counter-clockwise; the canvas grows to fit
    Rotate {
        #[arg(allow_negative_numbers = true)]
        degrees: i32,
    },
    /// Gaussian blur
    Blur { radius: f32 },
    /// Convert to single-channel grayscale
    Grayscale,
}

impl Command {
    fn transform(&self) -> Option<Transform> {
        Some(match *self {
            Command::Scan => return None,
            Command::Resize { width, height } => Transform::Resize { width, height },
            Command::Crop {
                left,
                top,
                right,
                bottom,
            } => Transform::Crop {
                left,
                top,
                right,
                bottom,
            },
            Command::Convert { format } => Transform::Convert { format },
            Command::Rotate { degrees } => Transform::Rotate { degrees },
            Command::Blur { radius } => Transform::Blur { radius },
            Command::Grayscale => Transform::Grayscale,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = ProcessorConfig::new(&cli.source, &cli.dest).with_max_workers(cli.jobs);
    config.validate()?;

    let Some(transform) = cli.command.transform() else {
        let discovery = Processor::new(config).discover()?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&discovery)?);
        } else {
            output::print_scan_output(&discovery, &cli.source);
        }
        return Ok(());
    };

    if cli.json {
        let report = Processor::new(config).run(transform)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let source_root = cli.source.clone();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event, &source_root) {
                println!("{}", line);
            }
        }
    });

    let processor = Processor::new(config).with_events(tx);
    let result = processor.run(transform);
    // Dropping the processor closes the channel so the printer can finish.
    drop(processor);
    printer.join().map_err(|_| "progress printer panicked")?;

    let report = result?;
    output::print_batch_summary(&report, &cli.source);
    Ok(())
}
