use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bankfeed_core::{BeancountWriter, JsonLinesWriter, TransactionSink};
use bankfeed_import::{find_importer, Config, Importer};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Turn bank CSV exports into ledger transactions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report which configured importer claims each file
    Identify {
        /// Importer configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,

        files: Vec<PathBuf>,
    },

    /// Extract transactions from every claimed file
    Extract {
        /// Importer configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,

        #[arg(short, long, value_enum, default_value_t)]
        format: Format,

        files: Vec<PathBuf>,
    },
}

#[derive(Copy, Clone, Default, PartialEq, Eq, ValueEnum, Debug)]
enum Format {
    #[default]
    Beancount,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout().lock();

    match &cli.command {
        Command::Identify { config, files } => {
            let importers = load_importers(config)?;
            identify(&importers, files, stdout)
        }
        Command::Extract {
            config,
            format,
            files,
        } => {
            let importers = load_importers(config)?;
            match format {
                Format::Beancount => extract(&importers, files, &mut BeancountWriter::new(stdout)),
                Format::Json => extract(&importers, files, &mut JsonLinesWriter::new(stdout)),
            }
        }
    }
}

fn load_importers(path: &Path) -> Result<Vec<Box<dyn Importer>>> {
    let config = Config::load(path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    let importers = config
        .build()
        .with_context(|| format!("invalid config {}", path.display()))?;
    if importers.is_empty() {
        tracing::warn!(config = %path.display(), "no importers configured");
    }
    Ok(importers)
}

fn identify(
    importers: &[Box<dyn Importer>],
    files: &[PathBuf],
    mut out: impl Write,
) -> Result<()> {
    for path in files {
        match find_importer(importers, path) {
            Some(importer) => {
                let date = importer
                    .file_date(path)
                    .with_context(|| format!("failed to read {}", path.display()))?
                    .map_or_else(|| "-".to_string(), |d| d.to_string());
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    path.display(),
                    importer.name(),
                    importer.account(),
                    date
                )?;
            }
            None => writeln!(out, "{}\t-", path.display())?,
        }
    }
    Ok(())
}

fn extract<S>(importers: &[Box<dyn Importer>], files: &[PathBuf], sink: &mut S) -> Result<()>
where
    S: TransactionSink,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    for path in files {
        let Some(importer) = find_importer(importers, path) else {
            tracing::warn!(file = %path.display(), "no importer claims file, skipping");
            continue;
        };
        let transactions = importer
            .extract(path)
            .with_context(|| format!("{} failed on {}", importer.name(), path.display()))?;
        sink.accept_all(transactions)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankfeed_core::Transaction;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
        [[importer]]
        kind = "mercury"
        account = "Assets:Checking:Mercury"

        [[importer.rules]]
        pattern = "^Charlie Customer$"
        account = "Income:Sales"
    "#;

    const MERCURY_HEADER: &str = "Date,Description,Amount,Status,Bank Description,Reference,Note\n";

    fn importers() -> Vec<Box<dyn Importer>> {
        Config::from_toml(CONFIG).unwrap().build().unwrap()
    }

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn mercury_file(dir: &TempDir) -> PathBuf {
        write(
            dir,
            "transactions-jan.csv",
            &format!(
                "{MERCURY_HEADER}01-30-2022,Charlie Customer,694.04,Sent,CHARLIE CUSTOMER,,\n\
                 01-31-2022,Joe Vendor,-5.00,Sent,JOE VENDOR,,\n"
            ),
        )
    }

    #[test]
    fn identify_prints_one_tab_separated_line_per_file() {
        let dir = TempDir::new().unwrap();
        let claimed = mercury_file(&dir);
        let unclaimed = write(&dir, "statement.pdf", "");

        let mut out = Vec::new();
        identify(&importers(), &[claimed.clone(), unclaimed.clone()], &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!(
                "{}\tmercury\tAssets:Checking:Mercury\t2022-01-31\n{}\t-\n",
                claimed.display(),
                unclaimed.display()
            )
        );
    }

    #[test]
    fn identify_reports_a_missing_date_for_empty_files() {
        let dir = TempDir::new().unwrap();
        let empty = write(&dir, "transactions-empty.csv", MERCURY_HEADER);

        let mut out = Vec::new();
        identify(&importers(), &[empty.clone()], &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\tmercury\tAssets:Checking:Mercury\t-\n", empty.display())
        );
    }

    #[test]
    fn extract_skips_unclaimed_files() {
        let dir = TempDir::new().unwrap();
        let unclaimed = write(&dir, "notes.txt", "not a statement");
        let claimed = mercury_file(&dir);

        let mut sink: Vec<Transaction> = Vec::new();
        extract(&importers(), &[unclaimed, claimed], &mut sink).unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].payee.as_deref(), Some("Charlie Customer"));
        assert_eq!(sink[0].postings[1].account.as_str(), "Income:Sales");
        assert_eq!(sink[1].postings.len(), 1);
    }

    #[test]
    fn extract_renders_beancount() {
        let dir = TempDir::new().unwrap();
        let claimed = mercury_file(&dir);

        let mut writer = BeancountWriter::new(Vec::new());
        extract(&importers(), &[claimed], &mut writer).unwrap();

        assert_eq!(
            String::from_utf8(writer.into_inner()).unwrap(),
            "2022-01-30 * \"Charlie Customer\" \"CHARLIE CUSTOMER\"\n  \
             Assets:Checking:Mercury   694.04 USD\n  \
             Income:Sales             -694.04 USD\n\
             \n\
             2022-01-31 * \"Joe Vendor\" \"JOE VENDOR\"\n  \
             Assets:Checking:Mercury  -5.00 USD\n"
        );
    }

    #[test]
    fn extract_aborts_on_a_bad_file_and_names_it() {
        let dir = TempDir::new().unwrap();
        let good = mercury_file(&dir);
        let bad = write(
            &dir,
            "transactions-bad.csv",
            &format!("{MERCURY_HEADER}2022-01-30,Someone,1.00,Sent,,,\n"),
        );

        let mut sink: Vec<Transaction> = Vec::new();
        let err = extract(&importers(), &[good, bad.clone()], &mut sink).unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains(&bad.display().to_string()), "{message}");
        assert!(message.contains("mercury"), "{message}");
        assert!(message.contains("invalid date"), "{message}");
    }
}
