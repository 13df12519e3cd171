use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Days, NaiveDate};
use jobs_dashboard::data::model::JobRecord;
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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }

    /// One to `max` distinct items joined the way multi-valued cells are.
    fn pick_many(&mut self, items: &[&str], max: usize) -> String {
        let n = 1 + self.below(max as u64) as usize;
        let mut chosen: Vec<&str> = Vec::with_capacity(n);
        while chosen.len() < n.min(items.len()) {
            let item = self.pick(items);
            if !chosen.contains(&item) {
                chosen.push(item);
            }
        }
        chosen.join(", ")
    }

    /// `Some(..)` nine times out of ten.
    fn mostly<T>(&mut self, value: T) -> Option<T> {
        (self.below(10) != 0).then_some(value)
    }
}

const TITLES: [&str; 5] = [
    "Data Analyst",
    "Data Engineer",
    "Data Scientist",
    "Machine Learning Engineer",
    "Business Intelligence Analyst",
];
const PROVINCES: [&str; 6] = ["Quebec", "Ontario", "Alberta", "British Columbia", "Manitoba", "Nova Scotia"];
const CITIES: [&str; 7] = ["Montréal", "Toronto", "Calgary", "Sherbrooke", "Laval", "Vancouver", "Halifax"];
const COMPANIES: [&str; 8] = ["Desjardins", "Shopify", "RBC", "Ubisoft", "Telus", "CGI", "Hydro-Québec", "Bell"];
const SECTORS: [&str; 5] = ["Finance", "IT", "Healthcare", "Education", "Retail"];
const SKILLS: [&str; 6] = ["Python", "SQL", "R", "Spark", "Tableau", "Power BI"];
const SOFT_SKILLS: [&str; 5] = ["Communication", "Teamwork", "Autonomy", "Rigour", "Initiative"];
const LANGUAGES: [&str; 2] = ["French", "English"];
const EDUCATION: [&str; 4] = ["College", "Bachelor", "Master", "PhD"];
const WORK_MODES: [&str; 3] = ["On site", "Hybrid", "Remote"];

fn generate(count: usize, rng: &mut SimpleRng) -> Vec<JobRecord> {
    let first_day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    (0..count)
        .map(|i| {
            let date = first_day
                .checked_add_days(Days::new(rng.below(366)))
                .unwrap_or(first_day);
            let salary = 55_000.0 + (rng.below(100) * 1_000) as f64;
            let sectors = rng.pick_many(&SECTORS, 2);
            let skills = rng.pick_many(&SKILLS, 4);
            let soft_skills = rng.pick_many(&SOFT_SKILLS, 3);
            let language = rng.pick_many(&LANGUAGES, 2);
            let education_level = rng.pick(&EDUCATION).to_string();
            let work_mode = rng.pick(&WORK_MODES).to_string();
            let city = rng.pick_many(&CITIES, 2);
            JobRecord {
                date,
                title: rng.pick(&TITLES).to_string(),
                locations: rng.pick(&PROVINCES).to_string(),
                salary: rng.mostly(salary),
                num_jobs: 1 + rng.below(4) as i64,
                company: rng.pick(&COMPANIES).to_string(),
                sectors: rng.mostly(sectors),
                skills: rng.mostly(skills),
                soft_skills: rng.mostly(soft_skills),
                language: rng.mostly(language),
                education_level: rng.mostly(education_level),
                work_mode: rng.mostly(work_mode),
                city: rng.mostly(city),
                link: format!("https://jobportal.example.com/job/{}", 1000 + i),
            }
        })
        .collect()
}

fn write_json(path: &Path, records: &[JobRecord]) -> Result<()> {
    let text = serde_json::to_string_pretty(records).context("serializing postings")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn write_parquet(path: &Path, records: &[JobRecord]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    let text_column = |get: fn(&JobRecord) -> Option<&str>| -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(get).collect::<Vec<_>>()))
    };

    let columns: Vec<(&str, DataType, ArrayRef)> = vec![
        (
            "date",
            DataType::Date32,
            Arc::new(Date32Array::from(
                records
                    .iter()
                    .map(|r| (r.date - epoch).num_days() as i32)
                    .collect::<Vec<_>>(),
            )) as ArrayRef,
        ),
        ("title", DataType::Utf8, text_column(|r| Some(r.title.as_str()))),
        ("locations", DataType::Utf8, text_column(|r| Some(r.locations.as_str()))),
        (
            "salary",
            DataType::Float64,
            Arc::new(Float64Array::from(records.iter().map(|r| r.salary).collect::<Vec<_>>())) as ArrayRef,
        ),
        (
            "num_jobs",
            DataType::Int64,
            Arc::new(Int64Array::from(records.iter().map(|r| r.num_jobs).collect::<Vec<_>>())) as ArrayRef,
        ),
        ("company", DataType::Utf8, text_column(|r| Some(r.company.as_str()))),
        ("sectors", DataType::Utf8, text_column(|r| r.sectors.as_deref())),
        ("skills", DataType::Utf8, text_column(|r| r.skills.as_deref())),
        ("soft_skills", DataType::Utf8, text_column(|r| r.soft_skills.as_deref())),
        ("language", DataType::Utf8, text_column(|r| r.language.as_deref())),
        ("education_level", DataType::Utf8, text_column(|r| r.education_level.as_deref())),
        ("work_mode", DataType::Utf8, text_column(|r| r.work_mode.as_deref())),
        ("ville_offre_last_Q", DataType::Utf8, text_column(|r| r.city.as_deref())),
        ("link", DataType::Utf8, text_column(|r| Some(r.link.as_str()))),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, data_type, _)| Field::new(*name, data_type.clone(), true))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = columns.into_iter().map(|(_, _, array)| array).collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/job_data.json"));

    if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut rng = SimpleRng::new(42);
    let records = generate(1200, &mut rng);

    let is_parquet = output_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(&output_path, &records)?;
    } else {
        write_json(&output_path, &records)?;
    }

    println!("Wrote {} postings to {}", records.len(), output_path.display());
    Ok(())
}
