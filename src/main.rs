mod config;
mod error;
mod logo;
mod pdf;
mod sheet;
mod storage;
mod store;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tabled::{settings::Style, Table, Tabled};

use crate::config::{
    config_dir, data_dir, load_config, metrics_dir, resolve_output_dir, CONFIG_TEMPLATE,
};
use crate::error::{ExpenseError, Result};
use crate::pdf::{default_filename, export_report, ReportSnapshot};
use crate::sheet::{ExpenseRow, Sheet};
use crate::storage::{FileStorage, Storage, COUNTER_KEY};
use crate::store::{
    ColorRole, ColumnKey, ColumnUpdate, CurrencyPosition, CurrencyUpdate, DateFormat, FontKey,
    HeaderStyle, LabelKey, LayoutKey, ReportSettingUpdate, Store,
};

#[derive(Parser)]
#[command(name = "expense-report")]
#[command(version, about = "Customizable expense report builder with PDF export", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.expense-report or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config file
    Init,

    /// Show report state and customization summary
    Status,

    /// Edit customization settings
    #[command(subcommand)]
    Customize(CustomizeCommands),

    /// Manage expense rows
    #[command(subcommand)]
    Row(RowCommands),

    /// Set report detail fields (submitter, period, purpose)
    Details {
        #[arg(long)]
        submitted_by: Option<String>,

        /// Submission date (YYYY-MM-DD)
        #[arg(long)]
        submitted_on: Option<String>,

        #[arg(long)]
        report_to: Option<String>,

        /// Reporting period start (YYYY-MM-DD)
        #[arg(long)]
        period_from: Option<String>,

        /// Reporting period end (YYYY-MM-DD)
        #[arg(long)]
        period_to: Option<String>,

        #[arg(long)]
        report_title: Option<String>,

        #[arg(long)]
        business_purpose: Option<String>,
    },

    /// Manage the company logo
    #[command(subcommand)]
    Logo(LogoCommands),

    /// Print the next report number (advances the counter when
    /// auto-increment is on)
    Number,

    /// Export the report as a PDF
    Export {
        /// Custom output file path (default: output_dir/expense-report-<date>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },

    /// Export, import, or reset the customization settings
    #[command(subcommand)]
    Settings(SettingsCommands),
}

#[derive(Subcommand)]
enum CustomizeCommands {
    /// Set a color role to a hex value
    Color {
        role: ColorRole,
        /// 6-digit hex value like '#112233'
        value: String,
    },

    /// Set a font setting (family is a CSS-style font stack)
    Font { key: FontKey, value: String },

    /// Set a text label
    Label { key: LabelKey, value: String },

    /// Set a table column header text
    Header { column: ColumnKey, text: String },

    /// Set a layout size value
    Layout { key: LayoutKey, value: String },

    /// Update currency settings
    Currency {
        #[arg(long)]
        code: Option<String>,

        #[arg(long)]
        symbol: Option<String>,

        #[arg(long)]
        position: Option<CurrencyPosition>,

        #[arg(long)]
        decimals: Option<u32>,

        #[arg(long)]
        thousand_separator: Option<String>,

        #[arg(long)]
        decimal_separator: Option<String>,
    },

    /// Set the date display format
    DateFormat { format: DateFormat },

    /// Update report numbering settings
    ReportNumber {
        /// Number template, '{number}' is substituted
        #[arg(long)]
        format: Option<String>,

        #[arg(long)]
        start: Option<u32>,

        #[arg(long)]
        auto_increment: Option<bool>,

        #[arg(long)]
        show: Option<bool>,
    },

    /// Update a table column's visibility, order, or width
    Column {
        column: ColumnKey,

        #[arg(long)]
        visible: Option<bool>,

        #[arg(long)]
        order: Option<u32>,

        #[arg(long)]
        width: Option<String>,
    },

    /// Select the header layout variant
    HeaderStyle { style: HeaderStyle },
}

#[derive(Subcommand)]
enum RowCommands {
    /// Append a new expense row
    Add {
        /// Expense date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        merchant: Option<String>,

        #[arg(long)]
        amount: Option<String>,
    },

    /// Edit an existing row by its 1-based position
    Set {
        position: usize,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        merchant: Option<String>,

        #[arg(long)]
        amount: Option<String>,
    },

    /// List all rows with the running total
    List,
}

#[derive(Subcommand)]
enum LogoCommands {
    /// Store a PNG or JPEG file as the company logo
    Set { path: PathBuf },

    /// Remove the stored logo
    Remove,
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print the full settings tree as JSON
    Export,

    /// Replace settings from a JSON file
    Import { path: PathBuf },

    /// Restore the built-in defaults
    Reset,
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Customize(cmd) => cmd_customize(&cfg_dir, cmd),
        Commands::Row(cmd) => cmd_row(&cfg_dir, cmd),
        Commands::Details {
            submitted_by,
            submitted_on,
            report_to,
            period_from,
            period_to,
            report_title,
            business_purpose,
        } => cmd_details(
            &cfg_dir,
            submitted_by,
            submitted_on,
            report_to,
            period_from,
            period_to,
            report_title,
            business_purpose,
        ),
        Commands::Logo(cmd) => cmd_logo(&cfg_dir, cmd),
        Commands::Number => cmd_number(&cfg_dir),
        Commands::Export { output, open } => cmd_export(&cfg_dir, output, open),
        Commands::Settings(cmd) => cmd_settings(&cfg_dir, cmd),
    }
}

fn open_storage(cfg_dir: &PathBuf) -> Arc<dyn Storage> {
    Arc::new(FileStorage::new(data_dir(cfg_dir)))
}

fn open_store(cfg_dir: &PathBuf) -> Store {
    Store::new(open_storage(cfg_dir))
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &PathBuf) -> Result<()> {
    if cfg_dir.exists() {
        return Err(ExpenseError::AlreadyInitialized(cfg_dir.clone()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;
    fs::create_dir_all(data_dir(cfg_dir))?;
    fs::create_dir_all(metrics_dir(cfg_dir))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized expense-report config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your company details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Add expense rows:           expense-report row add --merchant <name> --amount <n>");
    println!("  3. Export the report:          expense-report export");

    Ok(())
}

fn cmd_status(cfg_dir: &PathBuf) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(ExpenseError::ConfigNotFound(cfg_dir.clone()));
    }

    let storage = open_storage(cfg_dir);
    let store = Store::new(Arc::clone(&storage));
    let sheet = Sheet::load(&storage);
    let state = store.state();

    let filled = sheet.rows.iter().filter(|r| !r.is_blank()).count();
    println!("Config directory:  {}", cfg_dir.display());
    println!("Header style:      {:?}", state.header_style);
    println!("Currency:          {} ({})", state.currency.code, state.currency.symbol);
    println!("Rows:              {} ({} filled)", sheet.rows.len(), filled);
    println!("Total:             {}", store.format_currency(sheet.total()));

    let counter = storage
        .get(COUNTER_KEY)?
        .unwrap_or_else(|| state.report_settings.number_start.to_string());
    println!(
        "Next number:       {}",
        state.report_settings.number_format.replace("{number}", counter.trim())
    );
    if state.report_settings.auto_increment {
        println!("Numbering:         auto-increment");
    } else {
        println!("Numbering:         fixed at {}", state.report_settings.number_start);
    }

    let logo = logo::logo_data(&storage)?;
    println!("Logo:              {}", if logo.is_some() { "set" } else { "not set" });

    Ok(())
}

fn validate_hex_color(value: &str) -> Result<()> {
    let digits = value.strip_prefix('#').unwrap_or(value);
    if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ExpenseError::InvalidColor(value.to_string()))
    }
}

fn cmd_customize(cfg_dir: &PathBuf, cmd: CustomizeCommands) -> Result<()> {
    let store = open_store(cfg_dir);

    match cmd {
        CustomizeCommands::Color { role, value } => {
            validate_hex_color(&value)?;
            store.update_color(role, value);
        }
        CustomizeCommands::Font { key, value } => store.update_font(key, value),
        CustomizeCommands::Label { key, value } => store.update_label(key, value),
        CustomizeCommands::Header { column, text } => store.update_table_header(column, text),
        CustomizeCommands::Layout { key, value } => store.update_layout(key, value),
        CustomizeCommands::Currency {
            code,
            symbol,
            position,
            decimals,
            thousand_separator,
            decimal_separator,
        } => store.update_currency(CurrencyUpdate {
            code,
            symbol,
            position,
            decimals,
            thousand_separator,
            decimal_separator,
        }),
        CustomizeCommands::DateFormat { format } => store.update_date_format(format),
        CustomizeCommands::ReportNumber {
            format,
            start,
            auto_increment,
            show,
        } => {
            if let Some(format) = format {
                store.update_report_setting(ReportSettingUpdate::NumberFormat(format));
            }
            if let Some(start) = start {
                store.update_report_setting(ReportSettingUpdate::NumberStart(start));
            }
            if let Some(auto) = auto_increment {
                store.update_report_setting(ReportSettingUpdate::AutoIncrement(auto));
            }
            if let Some(show) = show {
                store.update_report_setting(ReportSettingUpdate::ShowReportNumber(show));
            }
        }
        CustomizeCommands::Column {
            column,
            visible,
            order,
            width,
        } => store.update_column(
            column,
            ColumnUpdate {
                visible,
                order,
                width,
            },
        ),
        CustomizeCommands::HeaderStyle { style } => store.update_header_style(style),
    }

    store.flush();
    println!("Updated.");
    Ok(())
}

#[derive(Tabled)]
struct ExpenseTableRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "MERCHANT")]
    merchant: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

fn cmd_row(cfg_dir: &PathBuf, cmd: RowCommands) -> Result<()> {
    let storage = open_storage(cfg_dir);
    let store = Store::new(Arc::clone(&storage));
    let mut sheet = Sheet::load(&storage);

    match cmd {
        RowCommands::Add {
            date,
            description,
            merchant,
            amount,
        } => {
            let mut row = ExpenseRow::default();
            apply_row_fields(&mut row, date, description, merchant, amount);
            sheet.push_row(row);
            sheet.save(&storage)?;
            println!("Added row {}.", sheet.rows.len());
        }
        RowCommands::Set {
            position,
            date,
            description,
            merchant,
            amount,
        } => {
            let row = sheet.row_mut(position)?;
            apply_row_fields(row, date, description, merchant, amount);
            sheet.save(&storage)?;
            println!("Updated row {position}.");
        }
        RowCommands::List => {
            let rows: Vec<ExpenseTableRow> = sheet
                .rows
                .iter()
                .enumerate()
                .map(|(i, row)| ExpenseTableRow {
                    index: i + 1,
                    date: store.format_date(&row.date),
                    description: row.description.clone(),
                    merchant: row.merchant.clone(),
                    amount: store.format_currency(row.amount_value()),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{table}");
            println!("Total: {}", store.format_currency(sheet.total()));
        }
    }

    Ok(())
}

fn apply_row_fields(
    row: &mut ExpenseRow,
    date: Option<String>,
    description: Option<String>,
    merchant: Option<String>,
    amount: Option<String>,
) {
    if let Some(date) = date {
        row.date = date;
    }
    if let Some(description) = description {
        row.description = description;
    }
    if let Some(merchant) = merchant {
        row.merchant = merchant;
    }
    if let Some(amount) = amount {
        row.amount = amount;
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_details(
    cfg_dir: &PathBuf,
    submitted_by: Option<String>,
    submitted_on: Option<String>,
    report_to: Option<String>,
    period_from: Option<String>,
    period_to: Option<String>,
    report_title: Option<String>,
    business_purpose: Option<String>,
) -> Result<()> {
    let storage = open_storage(cfg_dir);
    let mut sheet = Sheet::load(&storage);

    let meta = &mut sheet.meta;
    if let Some(v) = submitted_by {
        meta.submitted_by = v;
    }
    if let Some(v) = submitted_on {
        meta.submitted_on = v;
    }
    if let Some(v) = report_to {
        meta.report_to = v;
    }
    if let Some(v) = period_from {
        meta.period_from = v;
    }
    if let Some(v) = period_to {
        meta.period_to = v;
    }
    if let Some(v) = report_title {
        meta.report_title = v;
    }
    if let Some(v) = business_purpose {
        meta.business_purpose = v;
    }

    sheet.save(&storage)?;
    println!("Details updated.");
    Ok(())
}

fn cmd_logo(cfg_dir: &PathBuf, cmd: LogoCommands) -> Result<()> {
    let storage = open_storage(cfg_dir);
    match cmd {
        LogoCommands::Set { path } => {
            logo::set_logo(&storage, &path)?;
            println!("Logo stored from {}.", path.display());
        }
        LogoCommands::Remove => {
            logo::remove_logo(&storage)?;
            println!("Logo removed.");
        }
    }
    Ok(())
}

fn cmd_number(cfg_dir: &PathBuf) -> Result<()> {
    let store = open_store(cfg_dir);
    println!("{}", store.next_report_number());
    Ok(())
}

fn cmd_export(cfg_dir: &PathBuf, output: Option<PathBuf>, open: bool) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(ExpenseError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let storage = open_storage(cfg_dir);
    let store = Store::new(Arc::clone(&storage));
    let sheet = Sheet::load(&storage);

    let pdf_path = match output {
        Some(path) => path,
        None => resolve_output_dir(&config)?.join(default_filename()),
    };

    let snapshot = ReportSnapshot::capture(
        store.state(),
        sheet,
        store.next_report_number(),
        logo::logo_data(&storage)?,
        config.pdf.branding.clone(),
    );

    export_report(&snapshot, &metrics_dir(cfg_dir), &pdf_path)?;
    println!("PDF saved to {}", pdf_path.display());

    if open {
        open_path(&pdf_path)?;
    }
    Ok(())
}

fn cmd_settings(cfg_dir: &PathBuf, cmd: SettingsCommands) -> Result<()> {
    let store = open_store(cfg_dir);
    match cmd {
        SettingsCommands::Export => {
            println!("{}", store.export_settings());
        }
        SettingsCommands::Import { path } => {
            let raw = fs::read_to_string(&path)?;
            if !store.import_settings(&raw) {
                return Err(ExpenseError::SettingsParse(path));
            }
            println!("Settings imported from {}.", path.display());
        }
        SettingsCommands::Reset => {
            store.reset_to_defaults();
            println!("Settings reset to defaults.");
        }
    }
    Ok(())
}

fn open_path(pdf_path: &PathBuf) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(pdf_path)
            .spawn()
            .map_err(ExpenseError::Io)?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(pdf_path)
            .spawn()
            .map_err(ExpenseError::Io)?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", pdf_path.to_str().unwrap_or("")])
            .spawn()
            .map_err(ExpenseError::Io)?;
    }
    Ok(())
}
