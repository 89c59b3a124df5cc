//! echotext CLI — authorship experiments over echo-state reservoirs.
//!
//! Usage:
//!   echotext cluster <author1> <author2> --startup 20
//!   echotext embeddings <dataset> --voc-size 5000 --n-authors 10 --n-documents 10

use std::collections::HashSet;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use echotext::convert::onehot::{OneHotConverter, Vocabulary};
use echotext::convert::tags::TagConverter;
use echotext::convert::Converter;
use echotext::corpus;
use echotext::engine::{cluster_two_authors, AuthorshipEngine, EngineConfig};
use echotext::errors::{EchoError, Result};
use echotext::explog::ExperimentLog;
use echotext::rank::similar_documents;
use echotext::reduce::{ManifoldReducer, Pca};
use echotext::reservoir::ReservoirConfig;

#[derive(Parser)]
#[command(name = "echotext", version, about = "Echo-state reservoir analysis of text authorship")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster two authors via joint PCA of POS-tag reservoir states
    Cluster {
        /// First author text file or directory
        author1: PathBuf,
        /// Second author text file or directory
        author2: PathBuf,
        /// Number of start-up states to remove
        #[arg(long, default_value = "20")]
        startup: usize,
        /// Number of principal components to analyse
        #[arg(long, default_value = "2")]
        ncomponents: usize,
        /// Number of text files to analyze per directory
        #[arg(long)]
        nfile: Option<usize>,
        /// Language of the tagset
        #[arg(long, default_value = "en")]
        lang: String,
        /// Tags to exclude (repeatable)
        #[arg(long = "exclude")]
        exclude: Vec<String>,
        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Base directory for run artifacts
        #[arg(long, default_value = "runs")]
        out: PathBuf,
    },
    /// Embed every document of an authors corpus and rank by similarity
    Embeddings {
        /// Dataset directory: <dataset>/<author>/<index>.txt
        dataset: PathBuf,
        /// Number of authors
        #[arg(long = "n-authors", default_value = "10")]
        n_authors: usize,
        /// Number of documents per author
        #[arg(long = "n-documents", default_value = "10")]
        n_documents: usize,
        /// Vocabulary size
        #[arg(long = "voc-size")]
        voc_size: usize,
        /// Number of start-up states to remove
        #[arg(long, default_value = "0")]
        startup: usize,
        /// Number of components for the scatter dump
        #[arg(long, default_value = "2")]
        ncomponents: usize,
        /// Words to exclude (repeatable)
        #[arg(long = "exclude")]
        exclude: Vec<String>,
        /// Use a sparse input drive (recorded; numerically identical)
        #[arg(long)]
        sparse: bool,
        /// Verbose mode
        #[arg(long)]
        verbose: bool,
        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Base directory for run artifacts
        #[arg(long, default_value = "runs")]
        out: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Cluster {
            author1,
            author2,
            startup,
            ncomponents,
            nfile,
            lang,
            exclude,
            seed,
            out,
        } => cmd_cluster(&author1, &author2, startup, ncomponents, nfile, &lang, exclude, seed, &out),
        Commands::Embeddings {
            dataset,
            n_authors,
            n_documents,
            voc_size,
            startup,
            ncomponents,
            exclude,
            sparse,
            verbose,
            seed,
            out,
        } => cmd_embeddings(
            &dataset, n_authors, n_documents, voc_size, startup, ncomponents, exclude, sparse,
            verbose, seed, &out,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// cluster
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ClusterSettings<'a> {
    engine: &'a EngineConfig,
    lang: &'a str,
    nfile: Option<usize>,
    exclude: &'a [String],
    tagset_version: &'a str,
}

#[allow(clippy::too_many_arguments)]
fn cmd_cluster(
    author1: &PathBuf,
    author2: &PathBuf,
    startup: usize,
    ncomponents: usize,
    nfile: Option<usize>,
    lang: &str,
    exclude: Vec<String>,
    seed: u64,
    out: &PathBuf,
) -> Result<()> {
    if lang != "en" {
        return Err(EchoError::Config(format!(
            "unsupported tagset language '{lang}' (bundled: en)"
        )));
    }

    let converter = Converter::PosTags(TagConverter::new());
    let reservoir = ReservoirConfig::clustering_profile(converter.input_dim(), seed);
    let config = EngineConfig { reservoir: reservoir.clone(), startup, n_components: ncomponents };

    let log = ExperimentLog::new("Author clustering", "two authors, PCA", out)?;
    log.save_variables(
        "settings",
        &ClusterSettings {
            engine: &config,
            lang,
            nfile,
            exclude: &exclude,
            tagset_version: echotext::convert::tags::TAGSET_VERSION,
        },
    )?;

    let engine = AuthorshipEngine::new(converter, reservoir, startup)?;
    let exclude: HashSet<String> = exclude.into_iter().collect();

    let text1 = corpus::load_author_text(author1, nfile)?;
    let text2 = corpus::load_author_text(author2, nfile)?;

    let outcome = cluster_two_authors(&engine, &text1, &text2, ncomponents, seed, &exclude)?;
    println!(
        "Reservoir states: {} + {} steps of width {}",
        outcome.reduced_first.len(),
        outcome.reduced_second.len(),
        engine.reservoir.config.size
    );

    log.save_matrix("reduced-author1", &outcome.reduced_first)?;
    log.save_matrix("reduced-author2", &outcome.reduced_second)?;
    let image_path = log.save_image("pca-projection", &outcome.image)?;
    println!("Projection image: {}", image_path.display());
    println!("Run artifacts: {}", log.dir.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// embeddings
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct EmbeddingsSettings<'a> {
    engine: &'a EngineConfig,
    n_authors: usize,
    n_documents: usize,
    voc_size: usize,
    sparse: bool,
    exclude: &'a [String],
}

#[derive(Serialize)]
struct RankingDump {
    query: usize,
    ranking: Vec<(usize, f64)>,
}

#[allow(clippy::too_many_arguments)]
fn cmd_embeddings(
    dataset: &PathBuf,
    n_authors: usize,
    n_documents: usize,
    voc_size: usize,
    startup: usize,
    ncomponents: usize,
    exclude: Vec<String>,
    sparse: bool,
    verbose: bool,
    seed: u64,
    out: &PathBuf,
) -> Result<()> {
    let documents = corpus::load_dataset(dataset, n_authors, n_documents)?;
    if verbose {
        for (index, _) in documents.iter().enumerate() {
            let author = index / n_documents + 1;
            println!("Document {index} (author {author}) loaded");
        }
    }

    let vocab = Vocabulary::from_corpus(&documents, voc_size)?;
    let converter = Converter::OneHotWords(OneHotConverter::new(vocab));
    let reservoir = ReservoirConfig::embeddings_profile(converter.input_dim(), seed);
    let config = EngineConfig { reservoir: reservoir.clone(), startup, n_components: ncomponents };

    let log = ExperimentLog::new("Authorship attribution", "one-hot embeddings", out)?;
    log.save_variables(
        "settings",
        &EmbeddingsSettings {
            engine: &config,
            n_authors,
            n_documents,
            voc_size,
            sparse,
            exclude: &exclude,
        },
    )?;

    let engine = AuthorshipEngine::new(converter, reservoir, startup)?;
    let exclude: HashSet<String> = exclude.into_iter().collect();

    let embeddings = engine.embed_documents(&documents, &exclude)?;
    println!(
        "Document embeddings: {} × {}",
        embeddings.dim, embeddings.n_documents
    );

    // Rank neighbors of the first document of each author.
    let mut rankings = Vec::new();
    for query in (0..embeddings.n_documents).step_by(n_documents) {
        let ranking = similar_documents(&embeddings, query)?;
        if verbose {
            let nearest: Vec<String> = ranking
                .iter()
                .take(5)
                .map(|(j, d)| format!("{j} ({d:.3})"))
                .collect();
            println!("Documents similar to {query}: {}", nearest.join(", "));
        }
        rankings.push(RankingDump { query, ranking });
    }
    log.save_variables("similarities", &rankings)?;

    // 2-D scatter dump: document, author, x, y per row.
    let mut reducer = Pca::new(ncomponents.max(2), seed)?;
    let reduced = reducer.fit_transform(&embeddings.to_rows())?;
    let scatter: Vec<Vec<f64>> = reduced
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let author = (index / n_documents) as f64;
            vec![index as f64, author, point[0], point[1]]
        })
        .collect();
    log.save_matrix("scatter", &scatter)?;

    println!("Run artifacts: {}", log.dir.display());
    Ok(())
}
