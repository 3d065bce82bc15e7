use clap::{Parser, Subcommand, ValueEnum};
use kstr::{
    CorpusCheck, ExtractorBuilder, InserterBuilder, ScanSettings,
    DEFAULT_CORPUS_PATH, DEFAULT_PATCH_DIR, DEFAULT_TRANSLATED_CORPUS_PATH,
    DEFAULT_WORK_DIR, DEFAULT_WRAP_WIDTH,
};
use log::{error, info, LevelFilter};
use std::{path::PathBuf, process::ExitCode};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,

    /// Set logging level
    #[arg(short, long, value_enum, global = true, default_value_t = CliLogLevel::Info)]
    log_level: CliLogLevel,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract translatable text from script files.
    Extract {
        /// Script files to extract
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Where to write the translator-facing corpus
        #[arg(long, default_value = DEFAULT_CORPUS_PATH)]
        outpath: PathBuf,

        /// Directory for skeleton files and the unit store
        #[arg(long, default_value = DEFAULT_WORK_DIR)]
        workpath: PathBuf,
    },

    /// Weave a translated corpus back into the extracted scripts.
    Insert {
        /// Translated corpus, one unit per line
        #[arg(default_value = DEFAULT_TRANSLATED_CORPUS_PATH)]
        inpath: PathBuf,

        /// Directory for the patched scripts
        #[arg(long, default_value = DEFAULT_PATCH_DIR)]
        outpath: PathBuf,

        /// Directory holding skeleton files and the unit store from extraction
        #[arg(long, default_value = DEFAULT_WORK_DIR)]
        workpath: PathBuf,

        /// Column width to wrap translated text to
        #[arg(long, default_value_t = DEFAULT_WRAP_WIDTH)]
        width: usize,

        /// Insert even if the corpus line count doesn't match the number of units
        #[arg(long)]
        lenient: bool,
    },
}

#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Off => LevelFilter::Off,
            CliLogLevel::Error => LevelFilter::Error,
            CliLogLevel::Warn => LevelFilter::Warn,
            CliLogLevel::Info => LevelFilter::Info,
            CliLogLevel::Debug => LevelFilter::Debug,
            CliLogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn run(commands: Commands) -> Result<(), kstr::Error> {
    match commands {
        Commands::Extract {
            paths,
            outpath,
            workpath,
        } => {
            let summary = ExtractorBuilder::new()
                .build()
                .extract(&paths, &outpath, &workpath)?;

            info!(
                "Extracted {} units from {} files.",
                summary.units, summary.files
            );
        }
        Commands::Insert {
            inpath,
            outpath,
            workpath,
            width,
            lenient,
        } => {
            let summary = InserterBuilder::new()
                .with_settings(ScanSettings {
                    wrap_width: width,
                    ..Default::default()
                })
                .corpus_check(if lenient {
                    CorpusCheck::Lenient
                } else {
                    CorpusCheck::Strict
                })
                .build()
                .insert(&inpath, &outpath, &workpath)?;

            info!(
                "Replaced {} placeholders in {} files.",
                summary.replaced, summary.files
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .format_timestamp(None)
        .init();

    match run(args.commands) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
