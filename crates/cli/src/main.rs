use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use docflex_core::{
    constants::DATE_FORMAT, listing::parse_list, ClinicError, FormKind, Prescription,
    PrescriptionForm, PrescriptionPreview, WorklistFilter,
};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "docflex")]
#[command(about = "DocFlex Pro clinic console tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive BMI from height (cm) and weight (kg)
    Bmi {
        /// Height, e.g. 180 or 180cm
        height: String,
        /// Weight, e.g. 65 or 65kg
        weight: String,
    },
    /// List the form schemas
    Schemas,
    /// Validate a JSON form against a schema
    Validate {
        /// Schema name, e.g. patient or medicalCentre
        schema: String,
        /// Path to the JSON form
        file: PathBuf,
        /// Evaluation date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        today: Option<String>,
    },
    /// Render the preview of a prescription form
    Preview {
        /// Path to the JSON prescription form
        file: PathBuf,
    },
    /// Filter a saved prescription list
    Worklist {
        /// Path to a list response (paged envelope or bare array)
        file: PathBuf,
        /// First day, inclusive (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        from: String,
        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        to: String,
        /// pending, issued, dispensed or cancelled
        #[arg(long, default_value = "")]
        status: String,
        /// Centre id
        #[arg(long, default_value = "")]
        center: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'docflex --help' for commands");
        return Ok(());
    };

    let stdout = std::io::stdout();
    let ok = run(command, &mut stdout.lock())?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Runs one command. Returns `false` when the command completed but its
/// answer is negative (an invalid form).
fn run(command: Commands, out: &mut impl Write) -> anyhow::Result<bool> {
    match command {
        Commands::Bmi { height, weight } => {
            let bmi = docflex_core::bmi(&height, &weight);
            if bmi.is_empty() {
                writeln!(out, "BMI: -")?;
            } else {
                writeln!(out, "BMI: {bmi}")?;
            }
        }
        Commands::Schemas => {
            for kind in FormKind::ALL {
                writeln!(out, "{kind}")?;
            }
        }
        Commands::Validate {
            schema,
            file,
            today,
        } => {
            let kind: FormKind = schema.parse()?;
            let today = match today {
                Some(raw) => NaiveDate::parse_from_str(&raw, DATE_FORMAT)
                    .with_context(|| format!("--today must be YYYY-MM-DD, got '{raw}'"))?,
                None => chrono::Local::now().date_naive(),
            };
            let json = read(&file)?;
            match kind.validate_json(&json, today) {
                Ok(()) => writeln!(out, "{kind}: valid")?,
                Err(ClinicError::Validation(errors)) => {
                    writeln!(out, "{kind}: invalid")?;
                    for (field, messages) in errors.fields() {
                        for message in messages {
                            writeln!(out, "  {field}: {message}")?;
                        }
                    }
                    return Ok(false);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Preview { file } => {
            let json = read(&file)?;
            let form: PrescriptionForm = serde_json::from_str(&json)
                .with_context(|| format!("{} is not a prescription form", file.display()))?;
            write!(out, "{}", PrescriptionPreview::render(&form))?;
        }
        Commands::Worklist {
            file,
            from,
            to,
            status,
            center,
        } => {
            let filter = WorklistFilter::from_inputs(&from, &to, &status, &center)?;
            let page = parse_list::<Prescription>(&read(&file)?)?;
            let shown = filter.apply(page.items);
            for p in &shown {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    p.prescription_no.as_deref().unwrap_or("-"),
                    p.created_at
                        .map(|at| at.date_naive().format(DATE_FORMAT).to_string())
                        .unwrap_or_else(|| "-".into()),
                    p.status,
                    p.center_id,
                )?;
            }
            writeln!(out, "{} of {} prescriptions", shown.len(), page.total)?;
        }
    }
    Ok(true)
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}
