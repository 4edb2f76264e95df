use std::{fs::File, io::BufWriter, time::Instant};

use anyhow::Result;
use clap::Parser;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::io::Write;

const STATES: &[&str] = &["AR", "MI", "WI", "CA", "OK", "NV", "RI", "ME", "PA", "VT"];
const SEXES: &[u8] = &[b'F', b'M'];

/// Field layout matches `demos/sample_spec.json`: 9-byte country, 2-byte
/// state, 8-byte birthday (YYYYMMDD), 1-byte sex, 60 bytes of filler.
#[derive(Parser)]
struct Args {
    /// Output file path.
    #[clap(required = true)]
    path: String,
    /// Number of records to generate (in millions).
    #[clap(long, default_value_t = 1.0)]
    records: f64,
    #[clap(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = if let Some(seed) = args.seed {
        SmallRng::seed_from_u64(seed)
    } else {
        SmallRng::from_os_rng()
    };

    let handle = File::create(&args.path)?;
    let mut writer = BufWriter::with_capacity(4 * 1024 * 1024, handle);

    let start = Instant::now();
    let num_records = (args.records * 1_000_000.0) as usize;
    for _ in 0..num_records {
        let state = STATES[rng.random_range(0..STATES.len())];
        let year = rng.random_range(1950..2000);
        let month = rng.random_range(1..=12);
        let day = rng.random_range(1..=28);
        let sex = SEXES[rng.random_range(0..SEXES.len())] as char;
        writeln!(
            writer,
            "US       {state}{year:04}{month:02}{day:02}{sex}{:60}",
            ""
        )?;
    }
    writer.flush()?;
    let elapsed = start.elapsed();

    eprintln!("Finished generating {num_records} records");
    eprintln!("Elapsed time: {elapsed:?}");
    eprintln!(
        "Rate: {:.2} M records/s",
        num_records as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );

    Ok(())
}
