//! operadump
//!
//! Command-line front end for the `operafs` reader.
//!
//! - `info`: decoded volume and root directory headers
//! - `ls`: directory listings, optionally recursive
//! - `extract`: copy one file out of the image
//!
//! Usage errors exit with status 2 (clap's default), anything that goes wrong
//! reading the image exits with status 1.

use clap::{ArgAction, Parser, Subcommand};
use operafs::{
    extract_file, find_file, list_directory, open_volume_with, walk_path, Entry, ReadOptions,
    Volume,
};
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser, Debug)]
#[command(name = "operadump")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and extract 3DO Opera disc images")]
#[command(long_about = "operadump - 3DO Opera filesystem reader\n\n\
    Reads the volume header, walks directories and copies files out of\n\
    Opera disc images. The image is never modified.\n\n\
    Examples:\n\
      operadump info game.iso\n\
      operadump ls game.iso /IronManData -r\n\
      operadump extract game.iso /IronManData/QT/intro.mov -o intro.mov")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log more (-v debug, -vv trace); RUST_LOG is used otherwise
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Open images whose record type or sync marker is wrong
    #[arg(long, global = true)]
    no_verify: bool,

    /// Read only the first block of each directory
    #[arg(long, global = true)]
    single_block: bool,

    /// Largest mirror count accepted on a directory entry
    #[arg(long, global = true, value_name = "N", default_value_t = 9)]
    max_copies: u32,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the volume and root directory headers
    Info {
        /// Disc image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },

    /// List a directory
    Ls {
        /// Disc image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Directory inside the image
        #[arg(value_name = "PATH", default_value = "/")]
        path: String,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
    },

    /// Copy a file out of the image
    Extract {
        /// Disc image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// File inside the image
        #[arg(value_name = "PATH")]
        path: String,

        /// Destination (defaults to the file's name in the current directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    fn read_options(&self) -> ReadOptions {
        ReadOptions::default()
            .verify_signature(!self.no_verify)
            .follow_block_chains(!self.single_block)
            .max_blob_pointers(self.max_copies.saturating_add(1))
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run(&cli, &mut out) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, out: &mut dyn Write) -> CliResult<()> {
    let options = cli.read_options();
    match &cli.command {
        Commands::Info { image } => {
            let (_, volume) = open_image(image, options)?;
            print_info(out, &volume)?;
        }
        Commands::Ls {
            image,
            path,
            recursive,
        } => {
            let (mut reader, volume) = open_image(image, options)?;
            if *recursive {
                print_tree(out, &mut reader, &volume, path)?;
            } else {
                let entries = list_directory(&mut reader, &volume, path)?;
                for entry in &entries {
                    writeln!(out, "{}", format_entry(entry, &entry.name()))?;
                }
            }
        }
        Commands::Extract {
            image,
            path,
            output,
        } => {
            let (mut reader, volume) = open_image(image, options)?;
            let entry = find_file(&mut reader, &volume, path)?;
            let target = match output {
                Some(target) => target.clone(),
                None => PathBuf::from(entry.name().into_owned()),
            };
            let written = extract_to(&mut reader, &volume, &entry, &target)?;
            writeln!(out, "{} -> {} ({} bytes)", path, target.display(), written)?;
        }
    }
    Ok(())
}

fn open_image(path: &Path, options: ReadOptions) -> CliResult<(BufReader<File>, Volume)> {
    let file = File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let mut reader = BufReader::new(file);
    let volume = open_volume_with(&mut reader, options)?;
    debug!(image = %path.display(), "image opened");
    Ok((reader, volume))
}

fn print_info(out: &mut dyn Write, volume: &Volume) -> io::Result<()> {
    let header = &volume.header;
    let root = &volume.root;
    let copies: Vec<String> = volume.root_copies().iter().map(u32::to_string).collect();

    writeln!(out, "Volume label:    {}", header.label)?;
    writeln!(out, "Comment:         {}", header.comment)?;
    writeln!(out, "Volume id:       {:#010x}", header.volume_id)?;
    writeln!(out, "Record type:     {}", header.record_type)?;
    writeln!(
        out,
        "Sync bytes:      {}",
        String::from_utf8_lossy(&header.sync_bytes)
    )?;
    writeln!(out, "Record version:  {}", header.record_version)?;
    writeln!(out, "Volume flags:    {:#04x}", header.volume_flags)?;
    writeln!(out, "Block size:      {}", header.block_size)?;
    writeln!(
        out,
        "Block count:     {} ({} bytes)",
        header.block_count,
        header.volume_size()
    )?;
    writeln!(out, "Root id:         {:#010x}", root.directory_id)?;
    writeln!(
        out,
        "Root blocks:     {} of {} bytes",
        root.block_count, root.block_size
    )?;
    writeln!(out, "Root copies:     {} [{}]", root.copy_count, copies.join(", "))?;
    writeln!(out, "Root offset:     {:#x}", volume.root_directory_offset())
}

fn print_tree<R: Read + Seek>(
    out: &mut dyn Write,
    reader: &mut R,
    volume: &Volume,
    path: &str,
) -> CliResult<()> {
    let mut lines = Vec::new();
    walk_path(reader, volume, path, |full_path, entry, _| {
        lines.push(format_entry(entry, full_path));
    })?;
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn format_entry(entry: &Entry, name: &str) -> String {
    let kind = if entry.is_directory() { 'd' } else { '-' };
    format!(
        "{} {:>10} {:>6} {}",
        kind,
        entry.byte_length(),
        entry.canonical_block(),
        name
    )
}

fn extract_to<R: Read + Seek>(
    reader: &mut R,
    volume: &Volume,
    entry: &Entry,
    target: &Path,
) -> CliResult<u64> {
    let file = File::create(target).map_err(|e| format!("{}: {}", target.display(), e))?;
    let mut sink = BufWriter::new(file);
    let copied = extract_file(reader, volume, entry, &mut sink)
        .map_err(Box::<dyn Error>::from)
        .and_then(|written| sink.flush().map(|_| written).map_err(Box::<dyn Error>::from));
    drop(sink);

    match copied {
        Ok(written) => {
            info!(path = %target.display(), written, "extracted");
            Ok(written)
        }
        Err(e) => {
            // Leave no partial file behind
            if let Err(remove) = fs::remove_file(target) {
                warn!(path = %target.display(), error = %remove, "could not remove partial output");
            }
            Err(e)
        }
    }
}
