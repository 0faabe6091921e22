use std::fs::File;
use std::io::{prelude::*, stdin, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser as _;
use nota::worker::{encode_response, Worker};
use nota::{errors, Model, Parser};

#[derive(clap::Parser, Debug)]
#[command(name = "predict", about = "A program to parse transaction notes.")]
struct Args {
    /// The model file to use when parsing notes (JSON, or zstd-compressed binary ending in .zst)
    #[arg(long)]
    model: PathBuf,

    /// Speak the JSON-lines message protocol: PARSE_TEXT requests in, READY, PARSE_RESULT and
    /// ERROR messages out
    #[arg(long)]
    worker: bool,

    /// Print corrected tags and classifier scores instead of line items
    #[arg(long)]
    scores: bool,
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

fn run_worker(model_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let worker = Worker::new();
    let response = worker.load(|| load_model(model_path));
    println!("{}", encode_response(&response));
    for line in stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        println!("{}", worker.handle_json(&line));
    }
    Ok(())
}

fn write_scored(parser: &Parser, text: &str, buf: &mut String) {
    let meta = parser.extract_meta(text);
    let s = parser.tag_with_score(&meta.clean_text);
    let scores = s.tag_scores().unwrap_or_default();
    for (i, (token, tag)) in s.iter().enumerate() {
        if i != 0 {
            buf.push(' ');
        }
        buf.push_str(token.surface());
        buf.push('/');
        buf.push_str(&tag.to_string());
        if let Some(score) = scores.get(i) {
            buf.push_str(&format!(":{score:.3}"));
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    if args.worker {
        return run_worker(&args.model);
    }

    log::info!("Loading model file...");
    let model = load_model(&args.model)?;
    let parser = Parser::new(model)?;

    log::info!("Start parsing");
    let mut n_items = 0;
    let mut buf = String::new();
    let start = Instant::now();
    for line in stdin().lock().lines() {
        let line = line?;
        if args.scores {
            buf.clear();
            write_scored(&parser, &line, &mut buf);
            println!("{}", buf);
        } else {
            let tx = parser.process(&line);
            n_items += tx.items.len();
            println!("{}", serde_json::to_string(&tx)?);
        }
    }
    let duration = start.elapsed();
    log::info!("Elapsed: {} [sec]", duration.as_secs_f64());
    if !args.scores {
        log::info!("Items: {}", n_items);
    }

    Ok(())
}
