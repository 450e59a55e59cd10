use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use hocr_edit_config::Config;
use hocr_edit_engine::{
    BBox, Dialect, Document, EditError, ExtractOptions, LoadOptions, Replacement, Word, edits, io,
};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "hocr-edit",
    about = "Edit hOCR word text and geometry without reformatting the file",
    version
)]
struct Cli {
    /// Parse as `tag-soup` or `strict-xml` instead of sniffing the prolog
    #[arg(long, global = true)]
    dialect: Option<Dialect>,

    /// Config file to use instead of ~/.config/hocr-edit/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the edited document to stdout instead of writing the file
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List words as id, bbox, confidence and text, tab separated
    Words { file: PathBuf },

    /// List pages as id, bbox and image
    Pages { file: PathBuf },

    /// List hOCR files under a directory with their word counts
    List {
        /// Directory to scan (defaults to `hocr_dir` from the config)
        dir: Option<PathBuf>,
    },

    /// Replace a word's text
    SetText {
        file: PathBuf,
        id: String,
        text: String,
    },

    /// Replace a word's bounding box
    SetBbox {
        file: PathBuf,
        id: String,
        #[arg(allow_negative_numbers = true)]
        left: i32,
        #[arg(allow_negative_numbers = true)]
        top: i32,
        #[arg(allow_negative_numbers = true)]
        right: i32,
        #[arg(allow_negative_numbers = true)]
        bottom: i32,
    },

    /// Replace a word's x_wconf
    SetConf {
        file: PathBuf,
        id: String,
        confidence: u32,
    },

    /// Rename a word's id
    SetId {
        file: PathBuf,
        id: String,
        new_id: String,
    },

    /// Check that a file loads and round-trips byte for byte
    Check { file: PathBuf },
}

/// Settings resolved from the command line and the config file.
struct Settings {
    options: LoadOptions,
    backup_suffix: Option<String>,
    hocr_dir: Option<PathBuf>,
    dry_run: bool,
}

impl Settings {
    fn new(cli: &Cli, config: Config) -> Result<Self> {
        let dialect = match (cli.dialect, &config.dialect) {
            (Some(dialect), _) => Some(dialect),
            (None, Some(name)) => Some(
                name.parse::<Dialect>()
                    .context("Invalid dialect in config file")?,
            ),
            (None, None) => None,
        };

        Ok(Self {
            options: LoadOptions {
                dialect,
                extract: ExtractOptions {
                    word_class: config.word_class,
                    page_class: config.page_class,
                },
            },
            backup_suffix: config.backup_suffix,
            hocr_dir: config.hocr_dir,
            dry_run: cli.dry_run,
        })
    }

    fn read(&self, file: &Path) -> Result<Document> {
        let doc = io::read_document_with(file, &self.options)?;
        log::debug!(
            "{}: {} as {}, {} words",
            file.display(),
            doc.revision(),
            doc.dialect(),
            doc.words().len()
        );
        Ok(doc)
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        log::debug!("Config path: {}", Config::config_path().display());
        return Ok(Config::load()?.unwrap_or_default());
    };
    log::debug!("Config path: {}", path.display());

    match Config::load_from_path(path)? {
        Some(config) => Ok(config),
        None => bail!("Config file {} not found", path.display()),
    }
}

/// First word with `id`; duplicates are reported but not an error.
fn find_word<'a>(doc: &'a Document, id: &str) -> Result<&'a Word> {
    let mut matches = doc.words().iter().filter(|w| w.id == id);
    let word = matches
        .next()
        .with_context(|| format!("No word with id {id:?}"))?;
    let others = matches.count();
    if others > 0 {
        log::warn!("{others} more words have id {id:?}, editing the first");
    }
    Ok(word)
}

/// Tabs and line breaks would break the column layout.
fn one_line(text: &str) -> String {
    text.replace(['\t', '\r', '\n'], " ")
}

fn print_words(doc: &Document, out: &mut impl Write) -> Result<()> {
    for word in doc.words() {
        let confidence = word
            .confidence
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        writeln!(
            out,
            "{}\t{}\t{confidence}\t{}",
            word.id,
            word.bbox,
            one_line(&word.text)
        )?;
    }
    Ok(())
}

fn print_pages(doc: &Document, out: &mut impl Write) -> Result<()> {
    for page in doc.pages() {
        writeln!(
            out,
            "{}\t{}\t{}",
            page.id.as_deref().unwrap_or("-"),
            page.bbox.map_or_else(|| "-".to_string(), |b| b.to_string()),
            page.image.as_deref().unwrap_or("-")
        )?;
    }
    Ok(())
}

fn list(settings: &Settings, dir: Option<&Path>, out: &mut impl Write) -> Result<()> {
    let dir = dir
        .or(settings.hocr_dir.as_deref())
        .context("No directory given and no hocr_dir in the config file")?;

    for file in io::scan_hocr_files(dir)? {
        match settings.read(&file) {
            Ok(doc) => writeln!(out, "{}\t{}", file.display(), doc.words().len())?,
            Err(e) => log::warn!("{e}"),
        }
    }
    Ok(())
}

/// Apply one word edit to `file` and write it back, or print it on a dry run.
fn edit(
    settings: &Settings,
    file: &Path,
    id: &str,
    make: impl FnOnce(&Word) -> Result<Replacement, EditError>,
    out: &mut impl Write,
) -> Result<()> {
    let doc = settings.read(file)?;
    let replacement = make(find_word(&doc, id)?)?;

    if replacement.is_noop(doc.as_bytes()) {
        log::info!("Word {id} already has that value");
    }
    let committed = doc.commit(&[replacement])?;

    if settings.dry_run {
        out.write_all(committed.as_bytes())?;
        return Ok(());
    }

    if let Some(suffix) = &settings.backup_suffix {
        let backup = io::backup_file(file, suffix)?;
        log::info!("Backed up {} to {}", file.display(), backup.display());
    }
    io::write_document(file, committed.as_bytes())?;
    log::info!("Updated word {id} in {}", file.display());
    Ok(())
}

fn check(settings: &Settings, file: &Path, out: &mut impl Write) -> Result<()> {
    let doc = settings.read(file)?;

    writeln!(out, "dialect: {}", doc.dialect())?;
    writeln!(out, "words: {}", doc.words().len())?;
    writeln!(out, "pages: {}", doc.pages().len())?;
    for skipped in doc.skipped_words() {
        writeln!(
            out,
            "skipped word {} at byte {}: {}",
            skipped.id.as_deref().unwrap_or("without id"),
            skipped.element_range.start,
            skipped.reason
        )?;
    }
    for error in doc.syntax_errors() {
        writeln!(out, "syntax: {error}")?;
    }

    let round_trip = doc.commit(&[])?;
    if round_trip.as_bytes() != doc.as_bytes() {
        bail!("{} does not round-trip byte for byte", file.display());
    }
    writeln!(out, "round trip: ok")?;
    Ok(())
}

fn run(cli: Cli, config: Config, out: &mut impl Write) -> Result<()> {
    let settings = Settings::new(&cli, config)?;

    match cli.command {
        Commands::Words { file } => print_words(&settings.read(&file)?, out),
        Commands::Pages { file } => print_pages(&settings.read(&file)?, out),
        Commands::List { dir } => list(&settings, dir.as_deref(), out),
        Commands::SetText { file, id, text } => {
            edit(&settings, &file, &id, |w| edits::set_text(w, &text), out)
        }
        Commands::SetBbox {
            file,
            id,
            left,
            top,
            right,
            bottom,
        } => {
            let bbox = BBox::new(left, top, right, bottom);
            edit(&settings, &file, &id, |w| edits::set_bbox(w, bbox), out)
        }
        Commands::SetConf {
            file,
            id,
            confidence,
        } => edit(&settings, &file, &id, |w| edits::set_confidence(w, confidence), out),
        Commands::SetId { file, id, new_id } => {
            edit(&settings, &file, &id, |w| edits::set_id(w, &new_id), out)
        }
        Commands::Check { file } => check(&settings, &file, out),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, config, &mut out)?;
    out.flush()?;
    Ok(())
}
