use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use o2_rom_tools::{emit, hex, load, remap_with, Layout};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Odyssey² ROM image tools.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error). Logs go to stderr.
    #[arg(long, default_value = "info", global = true)]
    log_level: Level,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Flatten a BIOS and a cartridge dump into a C array, mirroring each
    /// bank's upper KiB for the missing A10 line.
    Remap {
        /// 1 KiB BIOS dump. Shorter files are zero-padded.
        firmware: PathBuf,

        /// 2, 4 or 8 KiB cartridge dump.
        cartridge: PathBuf,

        /// Where to write the C source. Defaults to stdout.
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t)]
        layout: Layout,
    },

    /// List every byte of an image with its bits drawn out and a few opcodes
    /// recognized.
    Bitmap {
        image: PathBuf,

        /// Where to write the listing. Defaults to stdout.
        output: Option<PathBuf>,

        /// Only list offsets in `start.end` (hex, inclusive), e.g. `$400.7ff`.
        #[arg(long)]
        range: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")?;

    match args.cmd {
        Cmd::Remap {
            firmware,
            cartridge,
            output,
            layout,
        } => run_remap(&firmware, &cartridge, output.as_deref(), layout),
        Cmd::Bitmap {
            image,
            output,
            range,
        } => run_bitmap(&image, output.as_deref(), range.as_deref()),
    }
}

fn run_remap(
    fw_path: &Path,
    cart_path: &Path,
    output: Option<&Path>,
    layout: Layout,
) -> Result<()> {
    let fw = load::firmware(fw_path)?;
    let cart = load::cartridge(cart_path)?;
    let starts_with = &cart.as_bytes()[..3];
    info!("cartridge starts with {starts_with:02x?}");

    let image = remap_with(layout, &fw, &cart)?;
    info!(
        "mapped {} KiB cartridge as {} KiB ({layout:?})",
        cart.len() / 1024,
        image.len() / 1024
    );

    let sources = emit::Sources {
        firmware: &fw_path.display().to_string(),
        cartridge: &cart_path.display().to_string(),
    };
    write_output(output, |out| emit::c_source(out, &image, sources))
}

fn run_bitmap(path: &Path, output: Option<&Path>, range: Option<&str>) -> Result<()> {
    let image = load::raw(path)?;

    let range = range.map(hex::decode_range).transpose()?;
    if let Some(r) = &range {
        ensure!(
            *r.end() < image.len(),
            "range ${:04x}.{:04x} is past the end of a {} byte image",
            r.start(),
            r.end(),
            image.len()
        );
    }

    let name = path.display().to_string();
    write_output(output, |out| emit::bitmap(out, &image, &name, range))
}

fn write_output(
    path: Option<&Path>,
    f: impl FnOnce(&mut dyn Write) -> io::Result<()>,
) -> Result<()> {
    match path {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            f(&mut out).with_context(|| format!("failed to write {}", path.display()))?;
            out.flush()?;
        }
        None => {
            let mut out = io::stdout().lock();
            f(&mut out).context("failed to write to stdout")?;
            out.flush()?;
        }
    }
    Ok(())
}
