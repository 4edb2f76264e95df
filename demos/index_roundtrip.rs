use std::time::Instant;

use fwfdb::{load_packed_index, save_packed_index, FileSpec, FilterSet, FwfTable, KeyKind};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "fixture.fwf".to_string());
    let spec_text = std::fs::read_to_string(
        std::env::args()
            .nth(2)
            .unwrap_or_else(|| "demos/sample_spec.json".to_string()),
    )?;
    let spec = FileSpec::from_json(&spec_text)?;
    let table = FwfTable::open(&path, &spec)?;
    println!("{} records", table.record_count());

    let build_start = Instant::now();
    let index = table.build_packed_multi_index(
        "state",
        &FilterSet::new(),
        KeyKind::Bytes,
        table.record_count() as usize,
    )?;
    println!(
        "built packed multi index on 'state' in {:.3}s ({} distinct keys)",
        build_start.elapsed().as_secs_f64(),
        index.len()
    );

    let index_path = format!("{path}.idx");
    save_packed_index(&index_path, index)?;

    let load_start = Instant::now();
    let reloaded = load_packed_index(&index_path)?;
    println!(
        "reloaded index from disk in {:.3}s ({} distinct keys)",
        load_start.elapsed().as_secs_f64(),
        reloaded.len()
    );

    std::fs::remove_file(&index_path).ok();
    Ok(())
}
