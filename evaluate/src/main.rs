use std::fs::File;
use std::io::{prelude::*, stdin, BufReader};
use std::path::{Path, PathBuf};

use clap::Parser;
use nota::{errors, EntityKind, Model, Predictor, RuleCorrector, Sentence, Tag};

#[derive(Parser, Debug)]
#[command(
    name = "evaluate",
    about = "A program to evaluate the tagging accuracy of Nota."
)]
struct Args {
    /// The model file to use when tagging notes (JSON, or zstd-compressed binary ending in .zst)
    #[arg(long)]
    model: PathBuf,

    /// Compare full BIO tags instead of entity kinds.
    #[arg(long)]
    strict: bool,
}

fn load_model(path: &Path) -> errors::Result<Model> {
    let f = File::open(path)?;
    if path.extension().map_or(false, |ext| ext == "zst") {
        let mut f = zstd::Decoder::new(f)?;
        Model::read(&mut f)
    } else {
        Model::from_json(&mut BufReader::new(f))
    }
}

#[derive(Default)]
struct Counts {
    n_correct: usize,
    n_total: usize,
    tp: [usize; 3],
    fp: [usize; 3],
    fn_: [usize; 3],
}

const KINDS: [EntityKind; 3] = [EntityKind::Item, EntityKind::Quantity, EntityKind::Price];

impl Counts {
    fn add(&mut self, reference: &[Tag], hypothesis: &[Tag], strict: bool) {
        for (&r, &h) in reference.iter().zip(hypothesis) {
            let same = if strict { r == h } else { r.kind() == h.kind() };
            if same {
                self.n_correct += 1;
            }
            self.n_total += 1;
            for (k, &kind) in KINDS.iter().enumerate() {
                match (r.is_kind(kind), h.is_kind(kind)) {
                    (true, true) => self.tp[k] += 1,
                    (false, true) => self.fp[k] += 1,
                    (true, false) => self.fn_[k] += 1,
                    (false, false) => (),
                }
            }
        }
    }

    fn print(&self, title: &str) {
        println!("[{}]", title);
        println!(
            "Accuracy: {} ({}/{})",
            self.n_correct as f64 / self.n_total as f64,
            self.n_correct,
            self.n_total
        );
        for (k, kind) in KINDS.iter().enumerate() {
            let precision = self.tp[k] as f64 / (self.tp[k] + self.fp[k]) as f64;
            let recall = self.tp[k] as f64 / (self.tp[k] + self.fn_[k]) as f64;
            let f1 = 2. * precision * recall / (precision + recall);
            println!(
                "{}: Precision: {}, Recall: {}, F1: {}",
                kind.as_str(),
                precision,
                recall,
                f1
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    log::info!("Loading model file...");
    let model = load_model(&args.model)?;
    let predictor = Predictor::new(model)?;
    let rules = RuleCorrector::default();

    log::info!("Start tagging");
    let mut raw = Counts::default();
    let mut corrected = Counts::default();
    for line in stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let s = Sentence::from_tagged(&line)?;
        let reference = s.tags().to_vec();
        let mut s = predictor.predict(s);
        raw.add(&reference, s.tags(), args.strict);
        rules.correct(&mut s);
        corrected.add(&reference, s.tags(), args.strict);
    }

    raw.print("classifier");
    corrected.print("classifier + rules");

    Ok(())
}
