mod calculator;
mod config;
mod invoice_gen;
mod logging;
mod models;
mod ui;

use std::io;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{error, info};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::config::Config;
use crate::invoice_gen::{format_currency, InvoiceGenerator};
use crate::models::Invoice;
use crate::ui::invoice_form::{
    handle_input, render_invoice_form, InvoiceFormAction, InvoiceFormState,
};

/// Fill in an invoice in the terminal and export it as a PDF
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory exported PDFs are written to
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Tax percentage to start the invoice with
    #[arg(short, long)]
    tax: Option<f64>,

    /// Days until the invoice is due
    #[arg(long)]
    due_days: Option<i64>,

    /// File to append log output to
    #[arg(long)]
    log_file: Option<String>,
}

impl Args {
    /// Command line flags take precedence over the environment
    fn apply(self, mut config: Config) -> Result<Config> {
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(tax) = self.tax {
            config.default_tax = tax;
        }
        if let Some(due_days) = self.due_days {
            config.due_days = due_days;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = log_file;
        }
        config.validate()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = args.apply(config::init()?)?;
    logging::init(&config.log_file)?;
    info!(?config, "starting invoice form");

    let generator = InvoiceGenerator::new(&config.output_dir)?;
    info!(output_dir = %generator.output_dir().display(), "writing invoices");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = InvoiceFormState::new(config.default_tax);

    // Run the main app loop
    let result = run_app(&mut terminal, &mut state, &generator, &config);

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = &result {
        error!(%err, "invoice form exited with an error");
        println!("Error: {}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut InvoiceFormState,
    generator: &InvoiceGenerator,
    config: &Config,
) -> Result<()> {
    loop {
        terminal.draw(|f| render_invoice_form(f, state))?;

        match handle_input(state)? {
            Some(InvoiceFormAction::Quit) => break,
            Some(InvoiceFormAction::Export) => export(state, generator, config),
            None => {}
        }
    }

    Ok(())
}

fn export(state: &mut InvoiceFormState, generator: &InvoiceGenerator, config: &Config) {
    let invoice = Invoice::snapshot(state.draft(), Local::now().date_naive(), config.due_days);

    match generator.export_invoice(&invoice) {
        Ok(path) => state.set_status(format!(
            "Exported {} (total {})",
            path.display(),
            format_currency(invoice.totals().total)
        )),
        Err(err) => state.set_error(format!("Export failed: {}", err)),
    }
}
