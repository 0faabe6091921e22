use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use nota::{errors, FeatureKind, Model};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "manipulate_model",
    about = "A program to convert and inspect trained models."
)]
struct Args {
    /// Input path of the model file (JSON, or zstd-compressed binary ending in .zst)
    #[arg(long)]
    model_in: PathBuf,

    /// Output path of the model file (JSON, or zstd-compressed binary ending in .zst)
    #[arg(long)]
    model_out: Option<PathBuf>,

    /// Fail if the vocabulary holds features the extractor never produces.
    #[arg(long)]
    check_schema: bool,

    /// Record the current feature schema in the output model.
    #[arg(long)]
    stamp_schema: bool,

    /// Output the vocabulary contained in the model as CSV.
    #[arg(long)]
    dump_vocab: Option<PathBuf>,
}

#[derive(Serialize)]
struct FeatureRecord<'a> {
    index: usize,
    feature: &'a str,
    kind: &'a str,
}

fn is_zstd(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "zst")
}

fn load_model(path: &Path) -> errors::Result<Model> {
    let f = fs::File::open(path)?;
    if is_zstd(path) {
        let mut f = zstd::Decoder::new(f)?;
        Model::read(&mut f)
    } else {
        Model::from_json(&mut BufReader::new(f))
    }
}

fn save_model(model: &Model, path: &Path) -> errors::Result<()> {
    let f = fs::File::create(path)?;
    if is_zstd(path) {
        let mut f = zstd::Encoder::new(f, 19)?;
        model.write(&mut f)?;
        f.finish()?;
    } else {
        let mut f = BufWriter::new(f);
        model.to_json(&mut f)?;
        f.flush()?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    log::info!("Loading model file...");
    let mut model = load_model(&args.model_in)?;
    log::info!(
        "{} classes, {} features, schema: {}",
        model.classes().len(),
        model.feature_names().len(),
        model.feature_schema().unwrap_or("(none)")
    );

    if args.check_schema {
        model.check_feature_schema()?;
        log::info!("Every feature belongs to the current schema");
    }

    if let Some(path) = args.dump_vocab {
        log::info!("Saving vocabulary file...");
        let file = fs::File::create(path)?;
        let mut wtr = csv::Writer::from_writer(file);
        for (index, feature) in model.feature_names().iter().enumerate() {
            wtr.serialize(FeatureRecord {
                index,
                feature,
                kind: FeatureKind::from_key(feature).map_or("", FeatureKind::name),
            })?;
        }
        wtr.flush()?;
    }

    if args.stamp_schema {
        model = model.with_feature_schema();
    }

    if let Some(path) = args.model_out {
        log::info!("Saving model file...");
        save_model(&model, &path)?;
    }

    Ok(())
}
