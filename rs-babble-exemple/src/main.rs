use rs_babble_core::corpus::{Corpus, CorpusOptions};
use rs_babble_core::model::chain_model::ChainModel;
use rs_babble_core::model::generation_input::GenerationInput;
use rs_babble_core::model::generator::Generator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=debug to see dead ends and rejected sentences
    env_logger::init();

    // Use the corpus compiled into the library.
    // 'Corpus::load("./data/name.txt", &options)' reads a file instead
    // and keeps a token snapshot ('name.bin') next to it
    let corpus = Corpus::bundled()?;
    println!("Corpus '{}': {} tokens", corpus.name(), corpus.len());

    // Any text can be tokenized; the options select a window of lines
    // and strip citation markers such as '[12]'
    let options = CorpusOptions {
        start_line: Some(2),
        ..CorpusOptions::default()
    };
    match Corpus::from_text("tiny", "Ignored line.\nIt worked[1]. It did!", &options) {
        Ok(tiny) => println!("Tiny corpus tokens: {:?}", tiny.tokens()),
        Err(e) => println!("Should not happen: {e}"),
    }

    // An empty corpus cannot produce a model
    match Corpus::from_text("empty", "   ", &CorpusOptions::default()) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Empty corpus refused: {e}"),
    }

    // Build the model once; it is read-only from now on
    let model = ChainModel::from_corpus(&corpus)?;
    let stats = model.stats();
    println!("Keys per order: {:?}, edges per order: {:?}", stats.keys, stats.edges);

    // A fixed seed makes every run print the same text
    let mut input = GenerationInput::with_seed(221);

    // Blocks grow while shorter than 'fill_ratio * length'
    input.set_fill_ratio(0.9)?;
    match input.set_fill_ratio(1.5) {
        Ok(_) => println!("Should not happen"),
        Err(_) => println!("Fill ratio 1.5 is invalid, must be in (0.0, 1.0]"),
    }

    let app = Generator::with_input(model, input);
    let mut rng = app.rng();

    // Sentences always end on '.', '?' or '!'
    for i in 0..5 {
        println!("Sentence {}: {}", i + 1, app.generate_capped_sentence(&mut rng));
    }

    // Whole sentences, at most 280 characters
    let block = app.generate_text_block(280, &mut rng);
    println!("Block ({} chars): {}", block.chars().count(), block);

    // At least 120 characters, may stop mid-sentence
    println!("Phrase: {}", app.generate_sentence(120, &mut rng));

    Ok(())
}
