//! Command-line front end for the fwfdb library.
//!
//! Three subcommands: `geometry` to inspect how a spec lays a file out,
//! `scan` to list matching line numbers, and `index` to build and report the
//! size of an index over one field. Exit code 0 on success, 1 on a usage
//! error (handled by `clap` before we ever run), 2 on any `FwfError` raised
//! while opening or scanning the table.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fwfdb::{Bound, FileSpec, FilterSet, FwfTable, KeyKind, Predicate};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fwfdb", about = "Inspect and scan fixed-width-field files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the derived record geometry: width, newline length, start offset, record count.
    Geometry {
        /// Path to a JSON FileSpec.
        spec: PathBuf,
        /// Path to the data file.
        file: PathBuf,
    },
    /// List the line numbers of records matching zero or more filters.
    Scan {
        /// Path to a JSON FileSpec.
        spec: PathBuf,
        /// Path to the data file.
        file: PathBuf,
        /// A filter expression: `field=value`, `field>=value`, `field<=value`,
        /// `field>value`, or `field<value`. May be repeated; filters combine
        /// with logical AND.
        #[arg(long = "filter")]
        filters: Vec<String>,
    },
    /// Build an index over one field and report how many distinct keys it has.
    Index {
        /// Path to a JSON FileSpec.
        spec: PathBuf,
        /// Path to the data file.
        file: PathBuf,
        /// Field to key on.
        #[arg(long)]
        field: String,
        /// Build a unique (last-write-wins) index instead of a multi index.
        #[arg(long, conflicts_with = "multi")]
        unique: bool,
        /// Build an order-preserving multi index instead of a unique index.
        #[arg(long, conflicts_with = "unique")]
        multi: bool,
        /// Key on the field's parsed integer value instead of its raw bytes.
        #[arg(long)]
        int_key: bool,
        /// A filter expression restricting which records are indexed, same
        /// syntax as `scan`'s `--filter`. May be repeated.
        #[arg(long = "filter")]
        filters: Vec<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Command) -> fwfdb::Result<()> {
    match command {
        Command::Geometry { spec, file } => cmd_geometry(spec, file),
        Command::Scan { spec, file, filters } => cmd_scan(spec, file, filters),
        Command::Index {
            spec,
            file,
            field,
            unique,
            multi,
            int_key,
            filters,
        } => cmd_index(spec, file, field, unique || !multi, int_key, filters),
    }
}

fn load_table(spec_path: PathBuf, file_path: PathBuf) -> fwfdb::Result<FwfTable> {
    let text = std::fs::read_to_string(&spec_path)?;
    let spec = FileSpec::from_json(&text)?;
    FwfTable::open(file_path, &spec)
}

fn cmd_geometry(spec_path: PathBuf, file_path: PathBuf) -> fwfdb::Result<()> {
    let table = load_table(spec_path, file_path)?;
    let geometry = table.geometry();
    println!("width: {}", geometry.width());
    println!("data_width: {}", geometry.data_width());
    println!("newline_len: {}", geometry.newline_len());
    println!("start: {}", geometry.start());
    println!("count: {}", geometry.count());
    Ok(())
}

fn cmd_scan(spec_path: PathBuf, file_path: PathBuf, filter_args: Vec<String>) -> fwfdb::Result<()> {
    let table = load_table(spec_path, file_path)?;
    let mut filters = FilterSet::new();
    for arg in &filter_args {
        for predicate in parse_filter(&table, arg)? {
            filters.push(predicate);
        }
    }
    filters.optimize();

    for line_no in table.scan_line_numbers(&filters)? {
        println!("{line_no}");
    }
    Ok(())
}

fn cmd_index(
    spec_path: PathBuf,
    file_path: PathBuf,
    field: String,
    unique: bool,
    int_key: bool,
    filter_args: Vec<String>,
) -> fwfdb::Result<()> {
    let table = load_table(spec_path, file_path)?;
    let kind = if int_key { KeyKind::Int } else { KeyKind::Bytes };
    let mut filters = FilterSet::new();
    for arg in &filter_args {
        for predicate in parse_filter(&table, arg)? {
            filters.push(predicate);
        }
    }
    filters.optimize();

    if unique {
        let index = table.build_unique_index(&field, &filters, kind)?;
        println!("unique index on '{field}': {} distinct keys", index.len());
    } else {
        let index = table.build_multi_index(&field, &filters, kind)?;
        println!("multi index on '{field}': {} distinct keys", index.len());
    }
    Ok(())
}

/// Parses `field<op>value` where `<op>` is one of `=`, `>=`, `<=`, `>`, `<`.
/// `=` expands to a lower-inclusive and upper-inclusive pair pinning the
/// field to exactly `value`.
fn parse_filter(table: &FwfTable, arg: &str) -> fwfdb::Result<Vec<Predicate>> {
    let ops: &[(&str, &[(Bound, bool)])] = &[
        (">=", &[(Bound::Lower, true)]),
        ("<=", &[(Bound::Upper, true)]),
        (">", &[(Bound::Lower, false)]),
        ("<", &[(Bound::Upper, false)]),
        ("=", &[(Bound::Lower, true), (Bound::Upper, true)]),
    ];

    for (op, variants) in ops {
        if let Some(idx) = arg.find(op) {
            let (name, value) = (&arg[..idx], &arg[idx + op.len()..]);
            let field = table
                .fields()
                .get(name)
                .ok_or_else(|| fwfdb::FwfError::Filter(format!("no such field '{name}'")))?;

            return variants
                .iter()
                .map(|(bound, inclusive)| Predicate::on_field(field, value.as_bytes().to_vec(), *bound, *inclusive))
                .collect();
        }
    }
    Err(fwfdb::FwfError::Filter(format!(
        "could not parse filter expression '{arg}'"
    )))
}
