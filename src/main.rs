use std::{fs::File, io::BufWriter, path::PathBuf, process::ExitCode};

use clap::Parser;
use expenses::{
    errors::Error,
    io,
    session::Session,
    storage::FileStorage,
    types::{Ledger, DEFAULT_LEDGER_PATH},
};

#[derive(Parser)]
#[command(name = "expenses", version, about = "Personal expense tracker")]
struct Cli {
    /// Ledger file, one expense per line
    #[arg(short, long, env = "EXPENSES_FILE", default_value = DEFAULT_LEDGER_PATH)]
    file: PathBuf,

    /// Log filter, e.g. `warn` or `expenses=debug`
    #[arg(long, env = "EXPENSES_LOG", default_value = "warn")]
    log_level: String,

    /// Write all expenses as CSV to this path and exit
    #[arg(long, value_name = "PATH")]
    export_csv: Option<PathBuf>,

    /// Write per-category totals as CSV to this path and exit
    #[arg(long, value_name = "PATH")]
    export_report: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level.as_str())
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let storage = FileStorage::new(cli.file);

    if cli.export_csv.is_some() || cli.export_report.is_some() {
        let ledger = Ledger::load(&storage)?;
        if let Some(path) = cli.export_csv {
            let mut writer = BufWriter::new(File::create(path)?);
            io::write_expenses_to_csv(&mut writer, &ledger)?;
        }
        if let Some(path) = cli.export_report {
            let mut writer = BufWriter::new(File::create(path)?);
            io::write_category_report_to_csv(&mut writer, &ledger)?;
        }
        return Ok(());
    }

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    // A malformed ledger never reaches a session, or exit would overwrite the file
    let mut session = Session::open(storage, stdin, stdout)?;
    tracing::info!(count = session.ledger().len(), "ledger loaded");
    session.run()
}
