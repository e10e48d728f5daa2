//! `sakila` command line entry point.
//!
//! # Responsibility
//! - Map subcommands onto `CustomerService` queries.
//! - Print results as JSON lines on stdout; errors go to stderr.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use sakila_core::{
    CoreConfig, Customer, CustomerFilter, CustomerService, SqliteCustomerRepository,
};
use serde::Serialize;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sakila", version, about = "Query the Sakila customer store")]
struct Cli {
    /// SQLite database file; overrides `database.path` from the config.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Seed an empty database with the bundled sample dataset.
    #[arg(long, global = true)]
    load_sample: bool,

    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one customer by id.
    Get { id: i64 },
    /// Print every customer in id order.
    List,
    /// Print one page of customers.
    Page(PageArgs),
    /// Print customers whose first and last names both have this length.
    EqualNames { length: u32 },
    /// Print customers matching all given filters.
    Search(SearchArgs),
    /// Print the number of customers.
    Count,
}

const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Args)]
struct PageArgs {
    /// Zero-based page index.
    #[arg(long, default_value_t = 0)]
    page: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    size: u32,
    /// `field[,asc|desc]`, e.g. `lastName,desc`.
    #[arg(long)]
    sort: Option<String>,
}

#[derive(Debug, Args)]
struct SearchArgs {
    #[arg(long)]
    first_name_prefix: Option<String>,
    #[arg(long)]
    last_name_prefix: Option<String>,
    /// Keep customers whose city name is longer than this.
    #[arg(long)]
    min_city_length: Option<u32>,
    #[arg(long)]
    active: Option<bool>,
    /// Print one page instead of every match.
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    size: Option<u32>,
    #[arg(long)]
    sort: Option<String>,
}

impl SearchArgs {
    fn is_paged(&self) -> bool {
        self.page.is_some() || self.size.is_some() || self.sort.is_some()
    }

    fn filter(&self) -> CustomerFilter {
        CustomerFilter {
            first_name_prefix: self.first_name_prefix.clone(),
            last_name_prefix: self.last_name_prefix.clone(),
            city_longer_than: self.min_city_length,
            active: self.active,
        }
    }
}

#[derive(Serialize)]
struct CountLine {
    count: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    config
        .init_logging()
        .context("failed to initialize logging")?;

    let conn = config.open_store().context("failed to open customer store")?;
    let repo = SqliteCustomerRepository::try_new(&conn)?;
    let service = CustomerService::new(repo);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run(&service, cli.command, &mut out)?;
    out.flush()?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<CoreConfig> {
    let mut config = match cli.config.as_ref() {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    if let Some(db) = cli.db.as_ref() {
        config.database.path = Some(db.clone());
    }
    if cli.load_sample {
        config.database.load_sample = Some(true);
    }
    Ok(config)
}

fn run(
    service: &CustomerService<SqliteCustomerRepository<'_>>,
    command: Command,
    out: &mut impl Write,
) -> Result<()> {
    info!("event=cli_command module=cli status=start command={command:?}");
    match command {
        Command::Get { id } => write_line(out, &service.get(id)?),
        Command::List => write_customers(out, &service.list()?),
        Command::Page(args) => {
            let page = service.page(args.page, args.size, args.sort.as_deref())?;
            write_line(out, &page)
        }
        Command::EqualNames { length } => {
            write_customers(out, &service.equal_length_names(length)?)
        }
        Command::Search(args) if args.is_paged() => {
            let page = service.search_page(
                &args.filter(),
                args.page.unwrap_or(0),
                args.size.unwrap_or(DEFAULT_PAGE_SIZE),
                args.sort.as_deref(),
            )?;
            write_line(out, &page)
        }
        Command::Search(args) => write_customers(out, &service.search(&args.filter())?),
        Command::Count => write_line(
            out,
            &CountLine {
                count: service.count()?,
            },
        ),
    }
}

fn write_customers(out: &mut impl Write, customers: &[Customer]) -> Result<()> {
    customers
        .iter()
        .try_for_each(|customer| write_line(out, customer))
}

fn write_line(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, Command};
    use clap::Parser;
    use sakila_core::{open_sample_db_in_memory, CustomerService, SqliteCustomerRepository};

    fn output_of(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        let conn = open_sample_db_in_memory().unwrap();
        let service = CustomerService::new(SqliteCustomerRepository::try_new(&conn).unwrap());
        let mut out = Vec::new();
        run(&service, cli.command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn get_prints_one_json_line() {
        let output = output_of(&["sakila", "get", "42"]);
        let value: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(value["email"], "CAROLYN.PEREZ@sakilacustomer.org");
        assert_eq!(value["firstName"], "CAROLYN");
    }

    #[test]
    fn page_prints_sorted_page_with_totals() {
        let output = output_of(&[
            "sakila",
            "page",
            "--page",
            "1",
            "--size",
            "5",
            "--sort",
            "lastName,desc",
        ]);
        let value: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(value["totalElements"], 599);
        assert_eq!(value["content"][0]["lastName"], "WREN");
    }

    #[test]
    fn search_and_count_print_json_lines() {
        let output = output_of(&[
            "sakila",
            "search",
            "--first-name-prefix",
            "mar",
            "--min-city-length",
            "10",
        ]);
        assert_eq!(output.lines().count(), 5);

        assert_eq!(output_of(&["sakila", "count"]).trim_end(), r#"{"count":599}"#);
        assert_eq!(output_of(&["sakila", "equal-names", "8"]).lines().count(), 5);
    }

    #[test]
    fn search_with_paging_prints_one_page() {
        let output = output_of(&[
            "sakila",
            "search",
            "--first-name-prefix",
            "MAR",
            "--size",
            "5",
            "--sort",
            "lastName,desc",
        ]);
        assert_eq!(output.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(value["totalElements"], 21);
        assert_eq!(value["number"], 0);
        assert_eq!(value["content"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["sakila", "list", "--db", "/tmp/store.db"]).unwrap();
        assert!(matches!(cli.command, Command::List));
        assert!(cli.db.is_some());
    }
}
