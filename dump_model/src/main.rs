use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use langprof::LanguageModel;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "A program to inspect built language models.")]
struct Args {
    /// Input path of the model file
    #[arg(long)]
    model: PathBuf,

    /// Print the languages contained in the model.
    #[arg(long)]
    languages: bool,

    /// Output the probability table as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the probabilities of the given n-grams.
    #[arg(long)]
    ngram: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!(model = %args.model.display(), "loading model file");
    let mut f = zstd::Decoder::new(File::open(&args.model)?)?;
    let model = LanguageModel::read(&mut f)?;

    if args.languages {
        for (i, lang) in model.languages().iter().enumerate() {
            println!("{i}\t{lang}");
        }
    }

    for ngram in &args.ngram {
        match model.probabilities(ngram) {
            Some(probs) => {
                for (lang, p) in model.languages().iter().zip(probs) {
                    println!("{ngram}\t{lang}\t{p}");
                }
            }
            None => println!("{ngram}\tnot found"),
        }
    }

    if let Some(path) = args.csv {
        info!(path = %path.display(), "saving probability table");
        let mut wtr = csv::Writer::from_writer(File::create(path)?);
        let mut header = vec!["ngram"];
        header.extend(model.languages().iter().map(String::as_str));
        wtr.write_record(&header)?;
        for (ngram, probs) in model.iter() {
            let mut record = vec![ngram.to_string()];
            record.extend(probs.iter().map(f64::to_string));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
    }

    Ok(())
}
