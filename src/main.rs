//! fincalc CLI
//!
//! Command-line interface for loan schedules, growth projections, interest comparisons
//! and batch scenario files

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use fincalc::calculators::{
    interest, payment, InterestComparison, PaymentInputs, PaymentQuote, PaymentTarget,
};
use fincalc::export;
use fincalc::rates;
use fincalc::scenario::{self, ScenarioFile, ScenarioRunner};
use fincalc::{
    CompoundInterestConfig, GrowthBasis, GrowthConfig, GrowthProjectionEngine, GrowthResult,
    PaymentFrequency,
};

#[derive(Parser)]
#[command(
    name = "fincalc",
    version,
    about = "Loan amortization, savings growth and interest projections"
)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    format: OutputFormat,

    /// Roll schedules up by year instead of listing every period
    #[arg(long, global = true)]
    yearly: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary and rows
    Table,
    /// Period rows as CSV
    Csv,
    /// Full result as JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Amortize a fixed-rate loan
    Loan {
        /// Amount borrowed
        #[arg(short, long)]
        principal: f64,
        /// Nominal annual rate in percent
        #[arg(short, long)]
        rate: f64,
        /// Term in years (ignored when --payment is given)
        #[arg(short, long, default_value = "30")]
        years: f64,
        /// Fixed payment per period; solves for the term instead
        #[arg(long)]
        payment: Option<f64>,
        /// annual, semi_annual, quarterly, monthly, semi_monthly, bi_weekly, weekly, daily
        #[arg(long, default_value = "monthly")]
        frequency: PaymentFrequency,
        /// Loan start date (YYYY-MM-DD) for dated rows
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },

    /// Project a balance under recurring contributions
    Growth {
        #[arg(long, default_value = "0")]
        opening: f64,
        /// Contribution per period
        #[arg(short, long)]
        contribution: f64,
        /// Nominal annual return in percent
        #[arg(short, long)]
        rate: f64,
        #[arg(short, long)]
        years: u32,
        #[arg(long, default_value = "monthly")]
        frequency: PaymentFrequency,
        /// Employer match as a percent of the contribution
        #[arg(long, default_value = "0")]
        match_percent: f64,
        /// Annual inflation in percent for real balances
        #[arg(long)]
        inflation: Option<f64>,
        /// grow-then-contribute (end of period) or contribution-then-grow (start of period)
        #[arg(long, default_value = "grow-then-contribute")]
        basis: GrowthBasis,
    },

    /// Compound interest next to its simple-interest baseline
    Compound {
        #[arg(short, long)]
        principal: f64,
        /// Nominal annual rate in percent
        #[arg(short, long)]
        rate: f64,
        #[arg(short, long)]
        years: f64,
        #[arg(short = 'n', long, default_value = "12")]
        compounds_per_year: u32,
        /// Amount added each contribution period
        #[arg(long, default_value = "0")]
        contribution: f64,
        #[arg(long, default_value = "12")]
        contributions_per_year: u32,
    },

    /// Run every calculation in a JSON scenario file
    Run {
        scenario: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let out = io::stdout().lock();

    match cli.command {
        Commands::Loan {
            principal,
            rate,
            years,
            payment: fixed_payment,
            frequency,
            start_date,
        } => {
            let target = match fixed_payment {
                Some(amount) => PaymentTarget::Payment(amount),
                None => PaymentTarget::TermYears(years),
            };
            let quote = payment::calculate(&PaymentInputs {
                principal,
                annual_rate_percent: rate,
                target,
                frequency,
                start_date,
            })?;
            print_loan(out, &quote, cli.format, cli.yearly)
        }
        Commands::Growth {
            opening,
            contribution,
            rate,
            years,
            frequency,
            match_percent,
            inflation,
            basis,
        } => {
            rates::ensure_term_years("years", f64::from(years))?;
            let periods_per_year = frequency.periods_per_year();
            let mut config = GrowthConfig::new(
                opening,
                contribution,
                rates::periodic_rate(rate, periods_per_year)?,
                i64::from(years) * i64::from(periods_per_year),
                basis,
            )
            .with_employer_match(match_percent, None);
            if let Some(inflation) = inflation {
                let periodic_inflation = rates::periodic_growth_rate(inflation, periods_per_year)?;
                config = config.with_inflation(periodic_inflation);
            }
            let result = GrowthProjectionEngine::new(config).project()?;
            print_growth(out, &result, periods_per_year, cli.format, cli.yearly)
        }
        Commands::Compound {
            principal,
            rate,
            years,
            compounds_per_year,
            contribution,
            contributions_per_year,
        } => {
            let comparison = interest::calculate(&CompoundInterestConfig {
                principal,
                annual_rate_percent: rate,
                years,
                compounds_per_year,
                periodic_contribution: contribution,
                contributions_per_year,
            })?;
            print_compound(out, &comparison, cli.format)
        }
        Commands::Run { scenario } => run_scenario(out, &scenario, cli.format),
    }
}

fn print_loan<W: Write>(
    mut out: W,
    quote: &PaymentQuote,
    format: OutputFormat,
    yearly: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => export::write_json(out, quote)?,
        OutputFormat::Csv if yearly => export::write_yearly_totals_csv(out, &quote.yearly)?,
        OutputFormat::Csv => export::write_amortization_csv(out, &quote.schedule)?,
        OutputFormat::Table => {
            writeln!(
                out,
                "Loan of ${:.2} at {}% over {} payments",
                quote.terms.principal, quote.terms.annual_rate_percent, quote.terms.term_periods
            )?;
            writeln!(out, "  Payment:        ${:.2}", quote.periodic_payment)?;
            writeln!(out, "  Total Paid:     ${:.2}", quote.total_paid)?;
            writeln!(out, "  Total Interest: ${:.2}", quote.total_interest)?;
            writeln!(out)?;

            if yearly {
                writeln!(
                    out,
                    "{:>5} {:>14} {:>14} {:>14} {:>14}",
                    "Year", "Payments", "Principal", "Interest", "Balance"
                )?;
                writeln!(out, "{}", "-".repeat(65))?;
                for year in &quote.yearly {
                    writeln!(
                        out,
                        "{:>5} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
                        year.year, year.payments, year.principal, year.interest, year.ending_balance
                    )?;
                }
            } else {
                writeln!(
                    out,
                    "{:>6} {:>10} {:>12} {:>12} {:>12} {:>14}",
                    "Period", "Date", "Payment", "Principal", "Interest", "Balance"
                )?;
                writeln!(out, "{}", "-".repeat(71))?;
                for row in &quote.schedule.rows {
                    let date = row.date.map(|d| d.to_string()).unwrap_or_default();
                    writeln!(
                        out,
                        "{:>6} {:>10} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
                        row.period_index,
                        date,
                        row.payment_amount,
                        row.principal_portion,
                        row.interest_portion,
                        row.ending_balance
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn print_growth<W: Write>(
    mut out: W,
    result: &GrowthResult,
    periods_per_year: u32,
    format: OutputFormat,
    yearly: bool,
) -> Result<()> {
    let years = result.yearly_snapshots(periods_per_year);
    match format {
        OutputFormat::Json => export::write_json(out, result)?,
        OutputFormat::Csv if yearly => export::write_growth_years_csv(out, &years)?,
        OutputFormat::Csv => export::write_growth_csv(out, result)?,
        OutputFormat::Table => {
            let summary = result.summary();
            writeln!(out, "Growth over {} periods", summary.total_periods)?;
            writeln!(out, "  Final Balance:      ${:.2}", result.final_balance)?;
            writeln!(out, "  Real Final Balance: ${:.2}", result.real_final_balance)?;
            writeln!(out, "  Contributions:      ${:.2}", summary.total_contributions())?;
            writeln!(out, "  Returns:            ${:.2}", result.total_returns)?;
            if let Some(roi) = summary.return_on_investment {
                writeln!(out, "  Return on Invested: {:.2}%", roi * 100.0)?;
            }
            writeln!(out)?;

            writeln!(
                out,
                "{:>5} {:>14} {:>14} {:>14} {:>16} {:>16}",
                "Year", "Employee", "Employer", "Returns", "Balance", "Real Balance"
            )?;
            writeln!(out, "{}", "-".repeat(84))?;
            for year in &years {
                writeln!(
                    out,
                    "{:>5} {:>14.2} {:>14.2} {:>14.2} {:>16.2} {:>16.2}",
                    year.year,
                    year.employee_contributions,
                    year.employer_contributions,
                    year.returns,
                    year.ending_balance,
                    year.real_balance
                )?;
            }
        }
    }
    Ok(())
}

fn print_compound<W: Write>(
    mut out: W,
    comparison: &InterestComparison,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => export::write_json(out, comparison)?,
        OutputFormat::Csv => export::write_compound_years_csv(out, &comparison.yearly)?,
        OutputFormat::Table => {
            writeln!(out, "Compound Balance:  ${:.2}", comparison.compound.final_balance)?;
            writeln!(out, "Compound Interest: ${:.2}", comparison.compound.interest_earned)?;
            writeln!(out, "Simple Balance:    ${:.2}", comparison.simple.final_balance)?;
            writeln!(out, "Simple Interest:   ${:.2}", comparison.simple.interest_earned)?;
            writeln!(out, "Effective Annual:  {:.4}%", comparison.effective_annual_rate_percent)?;
            writeln!(out)?;

            writeln!(
                out,
                "{:>5} {:>16} {:>16} {:>16}",
                "Year", "Balance", "Interest", "Contributed"
            )?;
            writeln!(out, "{}", "-".repeat(56))?;
            for year in &comparison.yearly {
                writeln!(
                    out,
                    "{:>5} {:>16.2} {:>16.2} {:>16.2}",
                    year.year, year.balance, year.interest_earned, year.total_contributed
                )?;
            }
        }
    }
    Ok(())
}

fn run_scenario<W: Write>(mut out: W, path: &Path, format: OutputFormat) -> Result<()> {
    let scenario = ScenarioFile::from_path(path)
        .with_context(|| format!("Failed to load scenario {}", path.display()))?;

    let start = Instant::now();
    let runner = ScenarioRunner::new();
    let results = runner.run_file(&scenario);
    let elapsed = start.elapsed();

    match format {
        OutputFormat::Json => {
            export::write_json(out, &scenario::report(&scenario.requests, results))?
        }
        OutputFormat::Csv => {
            let summaries: Vec<_> = results
                .iter()
                .filter_map(|r| r.as_ref().ok())
                .filter_map(|outcome| outcome.summary())
                .collect();
            export::write_rows(out, &summaries)?;
        }
        OutputFormat::Table => {
            writeln!(
                out,
                "Scenario {} ({} calculations in {:?})",
                scenario.name.as_deref().unwrap_or("unnamed"),
                scenario.requests.len(),
                elapsed
            )?;
            writeln!(
                out,
                "{:>3} {:<18} {:>8} {:>16} {:>16} {:>16}",
                "#", "Calculator", "Periods", "Final Balance", "Total Paid", "Total Interest"
            )?;
            writeln!(out, "{}", "-".repeat(82))?;
            for (i, (request, result)) in scenario.requests.iter().zip(&results).enumerate() {
                let name = request.calculator_name();
                match result {
                    Ok(outcome) => match outcome.summary() {
                        Some(s) => writeln!(
                            out,
                            "{:>3} {:<18} {:>8} {:>16.2} {:>16.2} {:>16.2}",
                            i + 1,
                            name,
                            s.total_periods,
                            s.final_balance,
                            s.total_paid,
                            s.total_interest
                        )?,
                        None => writeln!(
                            out,
                            "{:>3} {:<18} (closed form, see --format json)",
                            i + 1,
                            name
                        )?,
                    },
                    Err(e) => writeln!(out, "{:>3} {:<18} error: {}", i + 1, name, e)?,
                }
            }
        }
    }
    Ok(())
}
