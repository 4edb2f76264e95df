use std::sync::{Arc, Mutex};
use std::time::Instant;

use fwfdb::{FileMap, FileSpec, FilterSet, Newline, ParallelScan, ParallelScanner, RecordGeometry, ScanProcessor};

#[derive(Clone, Default)]
struct StateCounter {
    local: std::collections::HashMap<Vec<u8>, u64>,
    global: Arc<Mutex<std::collections::HashMap<Vec<u8>, u64>>>,
}

impl ScanProcessor for StateCounter {
    fn process_record(&mut self, _line_no: u64, record: &[u8]) -> fwfdb::Result<()> {
        let state = record[9..11].to_vec();
        *self.local.entry(state).or_insert(0) += 1;
        Ok(())
    }

    fn on_batch_complete(&mut self) -> fwfdb::Result<()> {
        let mut guard = self.global.lock().unwrap();
        for (state, count) in self.local.drain() {
            *guard.entry(state).or_insert(0) += count;
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "fixture.fwf".to_string());
    let spec_text = std::fs::read_to_string(
        std::env::args()
            .nth(2)
            .unwrap_or_else(|| "demos/sample_spec.json".to_string()),
    )?;
    let spec = FileSpec::from_json(&spec_text)?;

    let file = FileMap::open(&path)?;
    let widths = spec.field_widths()?;
    let geometry = RecordGeometry::derive(&widths, spec.newline(), &spec.comment_rule(), file.bytes())?;
    println!("scanning {} records across all cores", geometry.count());

    let scanner = ParallelScanner::new(file, geometry, FilterSet::new());
    let counter = StateCounter::default();

    let start = Instant::now();
    scanner.process_parallel(counter.clone(), 0)?;
    let elapsed = start.elapsed();

    let totals = counter.global.lock().unwrap();
    let mut by_state: Vec<(String, u64)> = totals
        .iter()
        .map(|(k, v)| (String::from_utf8_lossy(k).into_owned(), *v))
        .collect();
    by_state.sort();

    for (state, count) in &by_state {
        println!("{state}: {count}");
    }
    println!("elapsed: {:.3}s", elapsed.as_secs_f64());

    Ok(())
}
