//! Demo-data seeding.
//!
//! Generates plausible admission records from a fixed condition table
//! spanning every department bucket, with randomized demographics, dates,
//! and vital signs. Admission numbers are sequential; existing ones are
//! skipped so reseeding an already-populated store is safe.

use chrono::{Duration, Utc};
use rand::Rng;

use hpr_core::{HprResult, PatientInput, PatientStore};

struct Condition {
    pdx: &'static str,
    description: &'static str,
    cc: &'static str,
    pi: &'static str,
    ph: &'static str,
    drg: &'static str,
    rw: f64,
    los_range: (i64, i64),
    sdx: &'static [&'static str],
    procs: &'static [&'static str],
}

const CONDITIONS: &[Condition] = &[
    // Cardiology (I codes)
    Condition {
        pdx: "I21.9",
        description: "Acute myocardial infarction",
        cc: "Chest pain",
        pi: "Acute chest pain radiating to left arm for 2 hours",
        ph: "Hypertension, Diabetes",
        drg: "280",
        rw: 1.5432,
        los_range: (3, 7),
        sdx: &["E11.9", "I10"],
        procs: &["0BH17EZ", "02703DZ"],
    },
    Condition {
        pdx: "I50.9",
        description: "Heart failure",
        cc: "Shortness of breath",
        pi: "Progressive dyspnea on exertion for 1 week",
        ph: "Coronary artery disease",
        drg: "291",
        rw: 1.2345,
        los_range: (4, 8),
        sdx: &["I25.10", "I10"],
        procs: &["0BH13EZ"],
    },
    Condition {
        pdx: "I63.9",
        description: "Cerebral infarction",
        cc: "Weakness and confusion",
        pi: "Sudden onset right sided weakness",
        ph: "Hypertension, Atrial fibrillation",
        drg: "064",
        rw: 2.1567,
        los_range: (5, 10),
        sdx: &["I48.91", "I10", "E11.9"],
        procs: &["3E03317"],
    },
    // Respiratory (J codes)
    Condition {
        pdx: "J18.9",
        description: "Pneumonia",
        cc: "Fever and cough",
        pi: "High fever with productive cough for 3 days",
        ph: "No significant history",
        drg: "195",
        rw: 0.8234,
        los_range: (3, 7),
        sdx: &[],
        procs: &[],
    },
    Condition {
        pdx: "J44.1",
        description: "COPD with exacerbation",
        cc: "Dyspnea",
        pi: "Worsening shortness of breath",
        ph: "COPD, Smoking history",
        drg: "190",
        rw: 0.9876,
        los_range: (4, 8),
        sdx: &["F17.210"],
        procs: &["0BH13EZ"],
    },
    // Neurology (G codes)
    Condition {
        pdx: "G40.909",
        description: "Epilepsy",
        cc: "Seizure",
        pi: "Generalized tonic-clonic seizure",
        ph: "Epilepsy on medication",
        drg: "100",
        rw: 1.1234,
        los_range: (2, 5),
        sdx: &[],
        procs: &[],
    },
    Condition {
        pdx: "G43.909",
        description: "Migraine",
        cc: "Severe headache",
        pi: "Severe unilateral headache with nausea",
        ph: "Recurrent migraines",
        drg: "102",
        rw: 0.6543,
        los_range: (1, 3),
        sdx: &[],
        procs: &[],
    },
    // Orthopedics (M, S codes)
    Condition {
        pdx: "M17.11",
        description: "Knee osteoarthritis",
        cc: "Knee pain",
        pi: "Progressive knee pain limiting mobility",
        ph: "Obesity, Previous knee injury",
        drg: "469",
        rw: 1.8765,
        los_range: (3, 7),
        sdx: &["E66.9"],
        procs: &["0SRD0J9"],
    },
    Condition {
        pdx: "S72.001A",
        description: "Femoral neck fracture",
        cc: "Hip pain after fall",
        pi: "Fall at home, unable to bear weight",
        ph: "Osteoporosis",
        drg: "480",
        rw: 2.0123,
        los_range: (5, 10),
        sdx: &["M81.0", "W01.0XXA"],
        procs: &["0QS604Z"],
    },
    // General (everything else)
    Condition {
        pdx: "K35.80",
        description: "Acute appendicitis",
        cc: "Abdominal pain",
        pi: "Right lower quadrant pain with fever",
        ph: "No significant history",
        drg: "343",
        rw: 1.0456,
        los_range: (2, 5),
        sdx: &[],
        procs: &["0DTJ4ZZ"],
    },
];

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Clara", "David", "Elena", "Frank", "Grace", "Henry", "Irene", "James",
    "Karen", "Louis", "Maria", "Nathan", "Olivia", "Peter", "Quinn", "Rosa", "Samuel", "Teresa",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Baker", "Carter", "Doyle", "Evans", "Foster", "Garcia", "Hughes", "Iverson",
    "Jensen", "Keller", "Lambert", "Mitchell", "Novak", "Olsen", "Parker", "Reyes", "Silva",
    "Turner", "Walsh",
];

fn random_vitals(rng: &mut impl Rng, input: &mut PatientInput) {
    input.bt = Some(format!("{:.1}", 36.5 + rng.gen::<f64>() * 2.0));
    input.pr = Some(rng.gen_range(60..100).to_string());
    input.rr = Some(rng.gen_range(14..24).to_string());
    input.bp = Some(format!(
        "{}/{}",
        rng.gen_range(110..150),
        rng.gen_range(70..90)
    ));
    input.o2 = Some(rng.gen_range(94..=100).to_string());
}

fn assign_codes(condition: &Condition, input: &mut PatientInput) {
    input.pdx = Some(condition.pdx.to_owned());

    let mut sdx = condition.sdx.iter().map(|s| Some((*s).to_owned()));
    input.sdx1 = sdx.next().flatten();
    input.sdx2 = sdx.next().flatten();
    input.sdx3 = sdx.next().flatten();

    let mut procs = condition.procs.iter().map(|p| Some((*p).to_owned()));
    input.proc1 = procs.next().flatten();
    input.proc2 = procs.next().flatten();

    input.drg = Some(condition.drg.to_owned());
    input.rw = Some(condition.rw);
}

/// Seeds up to `count` demo admissions, skipping AN collisions.
///
/// Returns how many records were actually created.
pub fn seed(store: &PatientStore, count: usize) -> HprResult<usize> {
    let mut rng = rand::thread_rng();
    let today = Utc::now().date_naive();
    let mut created = 0;

    for i in 0..count {
        let an = format!("AN{:06}", i + 1);
        if store.fetch_by_an(&an)?.is_some() {
            continue;
        }

        let condition = &CONDITIONS[rng.gen_range(0..CONDITIONS.len())];
        let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];

        let age: i64 = rng.gen_range(18..90);
        let dateadm = today - Duration::days(rng.gen_range(0..60));

        let mut input = PatientInput {
            an: Some(an),
            name: Some(format!("{first} {last}")),
            dob: Some(today - Duration::days(age * 365 + rng.gen_range(0..365))),
            sex: Some(if rng.gen_bool(0.5) { "M" } else { "F" }.to_owned()),
            dateadm: Some(dateadm),
            timeadm: Some(format!("{:02}:{:02}", rng.gen_range(0..24), rng.gen_range(0..60))),
            age: Some(age as u32),
            cc: Some(condition.cc.to_owned()),
            pi: Some(condition.pi.to_owned()),
            ph: Some(condition.ph.to_owned()),
            pre_diagnosis: Some(condition.description.to_owned()),
            ..Default::default()
        };
        random_vitals(&mut rng, &mut input);

        // Roughly: 15% still pending intake, the rest coded; of those,
        // 70% already discharged.
        if !rng.gen_bool(0.15) {
            assign_codes(condition, &mut input);
            if rng.gen_bool(0.7) {
                let los = rng.gen_range(condition.los_range.0..=condition.los_range.1);
                input.datedsc = Some(dateadm + Duration::days(los));
                input.timedsc = Some(format!(
                    "{:02}:{:02}",
                    rng.gen_range(8..18),
                    rng.gen_range(0..60)
                ));
            }
        }

        store.insert(input)?;
        created += 1;
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpr_core::{CoreConfig, RecordFilter};
    use tempfile::TempDir;

    #[test]
    fn seed_creates_the_requested_number_of_records() {
        let temp_dir = TempDir::new().unwrap();
        let cfg = CoreConfig::new(temp_dir.path().to_path_buf());
        let store = PatientStore::open(&cfg).unwrap();

        let created = seed(&store, 10).unwrap();
        assert_eq!(created, 10);

        let records = store.list(&RecordFilter::default()).unwrap();
        assert_eq!(records.len(), 10);
        assert!(records.iter().all(|r| r.an.starts_with("AN")));
    }

    #[test]
    fn reseeding_skips_existing_admission_numbers() {
        let temp_dir = TempDir::new().unwrap();
        let cfg = CoreConfig::new(temp_dir.path().to_path_buf());
        let store = PatientStore::open(&cfg).unwrap();

        seed(&store, 5).unwrap();
        let created = seed(&store, 8).unwrap();
        assert_eq!(created, 3, "only the new admission numbers are seeded");

        let records = store.list(&RecordFilter::default()).unwrap();
        assert_eq!(records.len(), 8);
    }
}
