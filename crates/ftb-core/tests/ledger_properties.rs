use std::{path::PathBuf, sync::Arc, thread};

use ftb_core::{
    domain::UserId,
    ledger::{
        Ledger, Summary, EDIT_INVALID_FIELD, NO_RECORDS, SPEND_USAGE, TOTAL_OUT_OF_RANGE,
    },
    store::{AccountStore, JsonFileStore},
    Error,
};

fn tmp_file(prefix: &str) -> PathBuf {
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let pid = std::process::id();
    PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}.json"))
}

struct Fixture {
    path: PathBuf,
    store: Arc<JsonFileStore>,
    ledger: Ledger,
}

impl Fixture {
    fn new(prefix: &str) -> Self {
        let path = tmp_file(prefix);
        let store = Arc::new(JsonFileStore::new(&path));
        let ledger = Ledger::new(store.clone(), "ks");
        Self {
            path,
            store,
            ledger,
        }
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

const USER: UserId = UserId(5_000_001);
const OTHER: UserId = UserId(5_000_002);

#[test]
fn first_save_is_reflected_in_summary() {
    let f = Fixture::new("ftb-it-first");
    let cases = [("250", 250.0), ("12.5", 12.5), ("-3", -3.0), ("2e2", 200.0)];
    for (i, (raw, value)) in cases.into_iter().enumerate() {
        let user = UserId(i as i64 + 1);
        f.ledger.record_save(user, &[raw]).unwrap();
        assert_eq!(
            f.ledger.summary(user).unwrap(),
            Some(Summary {
                saved: value,
                spent: 0.0,
                balance: value
            })
        );
    }
}

#[test]
fn summary_is_idempotent_and_leaves_file_alone() {
    let f = Fixture::new("ftb-it-idem");
    f.ledger.record_save(USER, &["10"]).unwrap();
    let before = std::fs::read_to_string(&f.path).unwrap();

    let a = f.ledger.get_summary(USER).unwrap();
    let b = f.ledger.get_summary(USER).unwrap();
    assert_eq!(a, b);
    assert_eq!(std::fs::read_to_string(&f.path).unwrap(), before);
}

#[test]
fn accumulate_then_overwrite() {
    let f = Fixture::new("ftb-it-acc");
    f.ledger.record_save(USER, &["100"]).unwrap();
    f.ledger.record_save(USER, &["100"]).unwrap();
    assert_eq!(f.ledger.summary(USER).unwrap().unwrap().saved, 200.0);

    f.ledger.edit_field(USER, &["Save", "50"]).unwrap();
    assert_eq!(f.ledger.summary(USER).unwrap().unwrap().saved, 50.0);
}

#[test]
fn rejected_commands_do_not_create_the_file() {
    let f = Fixture::new("ftb-it-reject");
    assert_eq!(f.ledger.record_spend(USER, &["abc"]).unwrap(), SPEND_USAGE);
    assert_eq!(
        f.ledger.edit_field(USER, &["invest", "10"]).unwrap(),
        EDIT_INVALID_FIELD
    );
    assert_eq!(f.ledger.get_summary(USER).unwrap(), NO_RECORDS);
    assert!(!f.path.exists());
}

#[test]
fn persisted_document_uses_external_shape() {
    let f = Fixture::new("ftb-it-shape");
    f.ledger.record_save(USER, &["5000"]).unwrap();
    f.ledger.record_spend(OTHER, &["1.25"]).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&f.path).unwrap()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!({
            "users": {
                "5000001": { "save": 5000.0, "spend": 0.0 },
                "5000002": { "save": 0.0, "spend": 1.25 },
            }
        })
    );
}

#[test]
fn reload_through_a_fresh_ledger() {
    let f = Fixture::new("ftb-it-reload");
    f.ledger.record_save(USER, &["0.1"]).unwrap();
    f.ledger.record_save(USER, &["0.2"]).unwrap();
    let expected = f.store.load().unwrap();

    let reopened = Ledger::new(Arc::new(JsonFileStore::new(&f.path)), "ks");
    assert_eq!(
        reopened.summary(USER).unwrap().unwrap().saved,
        expected.get(USER).unwrap().saved
    );
}

#[test]
fn corrupt_file_surfaces_as_error() {
    let f = Fixture::new("ftb-it-corrupt");
    std::fs::write(&f.path, "not json").unwrap();
    assert!(matches!(
        f.ledger.record_save(USER, &["1"]),
        Err(Error::Json(_))
    ));
    assert!(matches!(f.ledger.get_summary(USER), Err(Error::Json(_))));
    // Nothing was written over the corrupt document.
    assert_eq!(std::fs::read_to_string(&f.path).unwrap(), "not json");
}

#[test]
fn overflowing_save_keeps_the_file_loadable() {
    let f = Fixture::new("ftb-it-overflow");
    f.ledger.record_save(USER, &["1e308"]).unwrap();
    assert_eq!(
        f.ledger.record_save(USER, &["1e308"]).unwrap(),
        TOTAL_OUT_OF_RANGE
    );

    // Other users are unaffected and the stored total is unchanged.
    assert_eq!(
        f.ledger.record_save(OTHER, &["5"]).unwrap(),
        "✅ Saved 5.0 ks!"
    );
    assert_eq!(f.ledger.summary(OTHER).unwrap().unwrap().saved, 5.0);
    assert_eq!(f.ledger.summary(USER).unwrap().unwrap().saved, 1e308);
    assert!(!std::fs::read_to_string(&f.path).unwrap().contains("null"));
}

#[test]
fn concurrent_saves_lose_no_updates() {
    let path = tmp_file("ftb-it-concurrent");
    let ledger = Arc::new(Ledger::new(Arc::new(JsonFileStore::new(&path)), "ks"));
    let threads = 8;
    let per_thread = 25;

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let ledger = ledger.clone();
            thread::spawn(move || {
                let user = if i % 2 == 0 { USER } else { OTHER };
                for _ in 0..per_thread {
                    ledger.record_save(user, &["1"]).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let half = (threads / 2 * per_thread) as f64;
    assert_eq!(ledger.summary(USER).unwrap().unwrap().saved, half);
    assert_eq!(ledger.summary(OTHER).unwrap().unwrap().saved, half);
    let _ = std::fs::remove_file(&path);
}
