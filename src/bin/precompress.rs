use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use precompressed_server::observability::logging::{self, LogFormat};
use precompressed_server::recompress::{
    cleanup_tree, compress_tree, CleanupOptions, CompressOptions,
};

#[derive(Parser)]
#[command(name = "precompress")]
#[command(about = "Create or remove precompressed variants in a static tree", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress every eligible file, keeping the original
    Compress(CompressArgs),
    /// Remove precompressed variants
    Cleanup(CleanupArgs),
}

#[derive(Args)]
struct CompressArgs {
    /// Target directory
    #[arg(long)]
    dir: PathBuf,

    /// Log what would be done without running compressors
    #[arg(long)]
    dry_run: bool,

    /// Minimum file size to compress
    #[arg(long, default_value_t = 128)]
    min_size: u64,

    /// Maximum file size to compress
    #[arg(long, default_value_t = 10 * 1024 * 1024)]
    max_size: u64,

    /// gzip command line (file path is appended)
    #[arg(long)]
    gzip_cmd: Option<String>,

    /// brotli command line (file path is appended)
    #[arg(long)]
    brotli_cmd: Option<String>,

    /// zstd command line (file path is appended)
    #[arg(long)]
    zstd_cmd: Option<String>,
}

#[derive(Args)]
struct CleanupArgs {
    /// Target directory
    #[arg(long)]
    dir: PathBuf,

    /// Remove only variants that are not newer than their original
    #[arg(long)]
    old: bool,

    /// Log what would be removed without deleting
    #[arg(long)]
    dry_run: bool,
}

impl CompressArgs {
    fn into_options(self) -> Result<CompressOptions, Box<dyn std::error::Error>> {
        let mut opts = CompressOptions::new(self.dir);
        opts.dry_run = self.dry_run;
        opts.min_size = self.min_size;
        opts.max_size = self.max_size;

        let overrides = [
            (".gz", self.gzip_cmd),
            (".br", self.brotli_cmd),
            (".zst", self.zstd_cmd),
        ];
        for compressor in &mut opts.compressors {
            let line = overrides
                .iter()
                .find(|(suffix, _)| *suffix == compressor.suffix)
                .and_then(|(_, line)| line.as_deref());
            if let Some(line) = line {
                *compressor = compressor.clone().with_command_line(line)?;
            }
        }
        Ok(opts)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    logging::init(level, LogFormat::Json);

    let result = match cli.command {
        Commands::Compress(args) => {
            let opts = args.into_options()?;
            tracing::info!(dir = %opts.root.display(), dry_run = opts.dry_run, "Compressing tree");
            compress_tree(&opts)
        }
        Commands::Cleanup(args) => {
            let opts = CleanupOptions {
                root: args.dir,
                dry_run: args.dry_run,
                old_only: args.old,
            };
            tracing::info!(dir = %opts.root.display(), old_only = opts.old_only, "Cleaning up tree");
            cleanup_tree(&opts)
        }
    };

    match result {
        Ok(summary) => {
            tracing::info!(
                files = summary.files,
                skipped = summary.skipped,
                up_to_date = summary.up_to_date,
                compressed = summary.compressed,
                removed = summary.removed,
                planned = summary.planned,
                "Done"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Run aborted");
            Err(e.into())
        }
    }
}
