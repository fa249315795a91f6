use std::sync::Arc;

use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let regions = ["North America", "Europe", "Asia Pacific", "Middle East", "Latin America"];
    let sectors = ["Energy", "Oil & Gas", "Chemicals", "Mining", "Power Generation"];
    let project_types = [
        "Capital Expansion",
        "Capital Greenfield",
        "Maintenance Turnaround",
        "Maintenance Routine",
    ];

    let mut all_geo: Vec<&str> = Vec::new();
    let mut all_sector: Vec<&str> = Vec::new();
    let mut all_type: Vec<&str> = Vec::new();
    let mut all_year: Vec<i32> = Vec::new();
    let mut all_spend: Vec<Option<f64>> = Vec::new();

    for region in regions {
        for sector in sectors {
            for year in 2015..=2024 {
                // Roughly a third of combinations have no project that year.
                if rng.next_f64() < 0.3 {
                    continue;
                }
                // A few records carry no spend figure.
                let spend = (rng.next_f64() >= 0.05)
                    .then(|| ((0.2 + rng.next_f64() * 9.3) * 100.0).round() / 100.0);

                all_geo.push(region);
                all_sector.push(sector);
                all_type.push(rng.pick(&project_types));
                all_year.push(year);
                all_spend.push(spend);
            }
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("GEO", DataType::Utf8, false),
        Field::new("SECTOR", DataType::Utf8, false),
        Field::new("PROJECT_TYPE_GRP", DataType::Utf8, false),
        Field::new("YEAR", DataType::Int32, false),
        Field::new("SPEND (in Billion $)", DataType::Float64, true),
    ]));

    let n_rows = all_year.len();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(all_geo)),
            Arc::new(StringArray::from(all_sector)),
            Arc::new(StringArray::from(all_type)),
            Arc::new(Int32Array::from(all_year)),
            Arc::new(Float64Array::from(all_spend)),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "sample_spend.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {n_rows} spend records to {output_path}");
}
