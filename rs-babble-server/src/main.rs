use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::{error, info};
use serde::Deserialize;

use rs_babble_core::corpus::{Corpus, CorpusOptions};
use rs_babble_core::io::{list_corpora, normalize_folder, CORPUS_EXTENSION};
use rs_babble_core::model::generator::Generator;

/// Length used when a request does not give one.
const DEFAULT_LENGTH: usize = 500;

/// Longest text a single request may ask for.
const MAX_LENGTH: usize = 100_000;

#[derive(Parser, Debug)]
#[command(name = "rs-babble-server")]
#[command(about = "Serves Markov chain babble over HTTP")]
struct Args {
	/// Folder holding the `.txt` corpora
	#[arg(long, default_value = "./data")]
	data: String,

	/// Corpus to learn from (file name without extension); the bundled corpus when absent
	#[arg(long)]
	corpus: Option<String>,

	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// First line of the corpus to read (1-based, inclusive)
	#[arg(long)]
	start_line: Option<usize>,

	/// Last line of the corpus to read (1-based, inclusive)
	#[arg(long)]
	end_line: Option<usize>,

	/// Keep `[n]` citation markers in words
	#[arg(long)]
	keep_citations: bool,
}

impl Args {
	fn corpus_options(&self) -> CorpusOptions {
		CorpusOptions {
			start_line: self.start_line,
			end_line: self.end_line,
			strip_citations: !self.keep_citations,
		}
	}

	/// Loads the selected corpus, falling back to the bundled one.
	fn load_corpus(&self) -> rs_babble_core::error::Result<Corpus> {
		match &self.corpus {
			Some(name) => {
				let mut path = normalize_folder(&self.data).join(name);
				path.set_extension(CORPUS_EXTENSION);
				Corpus::load(path, &self.corpus_options())
			}
			None => Corpus::bundled(),
		}
	}
}

/// Query parameters of the length-bounded endpoints
#[derive(Deserialize)]
struct LengthParams {
	length: Option<usize>,
}

impl LengthParams {
	/// Requested length, defaulted and bounded.
	fn length(&self) -> Result<usize, String> {
		match self.length {
			None => Ok(DEFAULT_LENGTH),
			Some(length) if length > MAX_LENGTH => {
				Err(format!("Length must be at most {MAX_LENGTH}, got {length}"))
			}
			Some(length) => Ok(length),
		}
	}
}

/// Folder listed by `/v1/corpora`.
struct DataFolder(PathBuf);

/// HTTP GET endpoint `/v1/sentence`
///
/// Returns one sentence ending on terminal punctuation.
#[get("/v1/sentence")]
async fn get_sentence(generator: web::Data<Generator>) -> impl Responder {
	let sentence = generator.generate_capped_sentence(&mut rand::rng());
	HttpResponse::Ok().body(sentence)
}

/// HTTP GET endpoint `/v1/text_block`
///
/// Returns whole sentences, at most `length` characters in total.
#[get("/v1/text_block")]
async fn get_text_block(generator: web::Data<Generator>, query: web::Query<LengthParams>) -> impl Responder {
	let length = match query.length() {
		Ok(length) => length,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};
	generate_off_worker(move || generator.generate_text_block(length, &mut rand::rng())).await
}

/// HTTP GET endpoint `/v1/phrase`
///
/// Returns at least `length` characters, cut anywhere.
#[get("/v1/phrase")]
async fn get_phrase(generator: web::Data<Generator>, query: web::Query<LengthParams>) -> impl Responder {
	let length = match query.length() {
		Ok(length) => length,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};
	generate_off_worker(move || generator.generate_sentence(length, &mut rand::rng())).await
}

/// Runs a long generation on the blocking thread pool, keeping the
/// worker free for other requests.
async fn generate_off_worker<F>(generate: F) -> HttpResponse
where
	F: FnOnce() -> String + Send + 'static,
{
	match web::block(generate).await {
		Ok(text) => HttpResponse::Ok().body(text),
		Err(e) => {
			error!("Generation task failed: {e}");
			HttpResponse::InternalServerError().body("Generation failed")
		}
	}
}

#[get("/v1/corpora")]
async fn get_corpora(folder: web::Data<DataFolder>) -> impl Responder {
	match list_corpora(&folder.0) {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(e) => {
			error!("Failed to list corpora in {}: {e}", folder.0.display());
			HttpResponse::InternalServerError().body("Failed to list corpora")
		}
	}
}

#[get("/v1/stats")]
async fn get_stats(generator: web::Data<Generator>) -> impl Responder {
	HttpResponse::Ok().json(generator.model().stats())
}

/// Main entry point for the server.
///
/// Builds the chain model once, then serves it read-only: handlers share
/// the generator without any lock.
///
/// # Notes
/// - Startup fails if the corpus cannot be loaded or is empty.
/// - `RUST_LOG` overrides the default `info` log level.
#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = Args::parse();
	let corpus = args.load_corpus()?;
	info!("Loaded corpus '{}' ({} tokens)", corpus.name(), corpus.len());

	let generator = web::Data::new(Generator::from_corpus(&corpus)?);
	let folder = web::Data::new(DataFolder(normalize_folder(&args.data)));

	info!("Listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(generator.clone())
			.app_data(folder.clone())
			.service(get_sentence)
			.service(get_text_block)
			.service(get_phrase)
			.service(get_corpora)
			.service(get_stats)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await?;

	Ok(())
}
