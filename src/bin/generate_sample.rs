use std::path::PathBuf;

use anyhow::{Context, Result};

const N_ROWS: usize = 30;
const N_FEATURES: usize = 8;
/// Share of feature cells left at zero.
const ZERO_FRACTION: f64 = 0.6;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// One row: id, sparse features, class label. Features of class `k` are
/// centred on `k` so the label is learnable from the matrix.
fn generate_row(id: usize, rng: &mut SimpleRng) -> Vec<String> {
    let class = rng.below(3) + 1;
    let mut row = Vec::with_capacity(N_FEATURES + 2);
    row.push(id.to_string());
    for _ in 0..N_FEATURES {
        if rng.next_f64() < ZERO_FRACTION {
            row.push("0".to_string());
        } else {
            let value = class as f64 + rng.next_f64() - 0.5;
            row.push(format!("{value:.3}"));
        }
    }
    row.push(format!("{class}.0"));
    row
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data.csv"));

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;

    let mut header = vec!["id".to_string()];
    header.extend((1..=N_FEATURES).map(|i| format!("f{i}")));
    header.push("label".to_string());
    writer.write_record(&header).context("writing header")?;

    for id in 1..=N_ROWS {
        writer
            .write_record(generate_row(id, &mut rng))
            .with_context(|| format!("writing row {id}"))?;
    }
    writer.flush().context("flushing output")?;

    log::info!("label column is {}", N_FEATURES + 2);
    println!(
        "Wrote {N_ROWS} rows ({N_FEATURES} features + id + label) to {}",
        output_path.display()
    );
    Ok(())
}
