use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use langprof::{ModelBuilder, ProfileCache};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "A program to build language models from n-gram profiles.")]
struct Args {
    /// The directory containing one profile file per language
    #[arg(long)]
    profiles: PathBuf,

    /// The file to write the built model to
    #[arg(long)]
    model: PathBuf,

    /// A seed stored in the model for the classifier
    #[arg(long)]
    seed: Option<u64>,

    /// The zstd compression level
    #[arg(long, default_value = "19")]
    zstd_level: i32,

    /// The number of workers for zstd (0 means multithreaded will be disabled)
    #[arg(long, default_value = "0")]
    zstd_workers: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!(profiles = %args.profiles.display(), "loading profiles");
    let mut builder = ModelBuilder::new(ProfileCache::global());
    if let Some(seed) = args.seed {
        builder.set_seed(seed);
    }
    let model = builder.build_from_source(&args.profiles)?;
    info!(
        n_languages = model.n_languages(),
        n_ngrams = model.len(),
        "finish building"
    );

    let mut f = zstd::Encoder::new(File::create(&args.model)?, args.zstd_level)?;
    f.multithread(args.zstd_workers)?;
    let size = model.write(&mut f)?;
    f.finish()?;
    info!(model = %args.model.display(), size, "saved model");

    Ok(())
}
