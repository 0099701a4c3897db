use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use geodash::config::DEFAULT_SOURCES;

const YEARS: [i32; 5] = [2018, 2019, 2020, 2021, 2022];

/// Quality labels with the coliform range (NMP/100 ml) typical for each.
const QUALITY_BANDS: [(&str, f64, f64); 4] = [
    ("Buena Calidad", 0.0, 100.0),
    ("Aceptable", 100.0, 1000.0),
    ("Contaminada", 1000.0, 24000.0),
    ("Datos insuficientes", 0.0, 0.0),
];

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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Site-id prefix and quality-column name per source file.
fn file_profile(file_name: &str) -> (&'static str, &'static str) {
    let upper = file_name.to_uppercase();
    if upper.contains("COSTEROS") {
        ("PLAYA", "CALIDAD_ENTEROC")
    } else if upper.contains("LENTICOS") {
        ("LAGUNA", "CALIDAD_COLI_FEC")
    } else if upper.contains("LOTICOS") {
        ("RIO", "CALIDAD_COLI_FEC")
    } else {
        ("POZO", "CALIDAD_SST")
    }
}

fn write_source(dir: &Path, file_name: &str, sites: usize, rng: &mut SimpleRng) -> Result<usize> {
    let path = dir.join(file_name);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    let (prefix, quality_col) = file_profile(file_name);

    writer.write_record(["SITIO", "YEAR", "LATITUD", "LONGITUD", "COLI_FEC", quality_col])?;

    // Quintana Roo, roughly.
    let stations: Vec<(String, f64, f64)> = (0..sites)
        .map(|i| {
            (
                format!("{prefix}-{:03}", i + 1),
                rng.uniform(18.0, 21.6),
                rng.uniform(-89.2, -86.7),
            )
        })
        .collect();

    let mut rows = 0;
    for &year in &YEARS {
        for (site, lat, lon) in &stations {
            let (label, lo, hi) = QUALITY_BANDS[(rng.next_u64() % 4) as usize];

            let coliform = if label == "Datos insuficientes" || rng.chance(0.1) {
                String::new()
            } else {
                format!("{:.0}", rng.uniform(lo, hi))
            };
            // A few rows without coordinates so the null filter has work to do.
            let lat = if rng.chance(0.05) { String::new() } else { format!("{lat:.5}") };

            let year = year.to_string();
            let lon = format!("{lon:.5}");
            writer.write_record([
                site.as_str(),
                year.as_str(),
                lat.as_str(),
                lon.as_str(),
                coliform.as_str(),
                label,
            ])?;
            rows += 1;
        }
    }

    writer.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(rows)
}

fn main() -> Result<()> {
    let dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| ".".to_string()));
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);

    for (i, file_name) in DEFAULT_SOURCES.iter().enumerate() {
        let rows = write_source(&dir, file_name, 8 + 4 * i, &mut rng)?;
        println!("Wrote {rows} rows to {}", dir.join(file_name).display());
    }

    Ok(())
}
