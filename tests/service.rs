//! Pipeline tests through the library API: extraction, scoring and
//! recording, with a canned OCR engine and a ledger that refuses writes.

use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use resume_matcher::extract::{ExtractError, Extractor, OcrEngine};
use resume_matcher::ledger::{InMemoryLedger, Ledger, LedgerError, SqliteLedger};
use resume_matcher::models::{DocumentRole, MatchRecord, NewMatch};
use resume_matcher::skills::{SkillMatchMode, SkillVocabulary, DEFAULT_SKILLS};
use resume_matcher::{MatchError, MatchService};

struct CannedOcr {
    text: &'static str,
    calls: AtomicUsize,
}

#[async_trait]
impl OcrEngine for CannedOcr {
    async fn recognize_pdf(&self, _path: &Path) -> Result<String, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.to_string())
    }
}

struct RefusingLedger;

#[async_trait]
impl Ledger for RefusingLedger {
    async fn append(&self, _entry: &NewMatch) -> Result<MatchRecord, LedgerError> {
        Err(LedgerError::Unavailable("disk full".to_string()))
    }

    async fn list(&self, _limit: Option<usize>) -> Result<Vec<MatchRecord>, LedgerError> {
        Ok(Vec::new())
    }

    async fn count(&self) -> Result<i64, LedgerError> {
        Ok(0)
    }
}

fn canned_ocr(text: &'static str) -> Arc<CannedOcr> {
    Arc::new(CannedOcr {
        text,
        calls: AtomicUsize::new(0),
    })
}

fn service_with(ocr: Arc<CannedOcr>, ledger: Arc<dyn Ledger>) -> MatchService {
    let extractor = Extractor::new(ocr, 2, Duration::from_secs(10));
    MatchService::new(extractor, SkillVocabulary::default(), ledger)
}

fn write(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn python_resume_covers_python_job() {
    let dir = TempDir::new().unwrap();
    let resume = write(&dir, "resume.txt", b"Python and SQL experience");
    let jd = write(&dir, "jd.txt", b"Looking for Python skills");

    let ledger = Arc::new(InMemoryLedger::new());
    let service = service_with(canned_ocr(""), ledger.clone());
    let report = service.run_match(&resume, &jd).await.unwrap();

    assert_eq!(report.skill_score, 1.0);
    assert!(report.tfidf_score > 0.0 && report.tfidf_score < 1.0);
    assert_eq!(
        report.resume_skills.iter().collect::<Vec<_>>(),
        vec!["python", "sql"]
    );
    assert_eq!(report.jd_skills.iter().collect::<Vec<_>>(), vec!["python"]);

    let records = ledger.list(None).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, report.record_id);
    assert_eq!(records[0].resume_path, resume.display().to_string());
    assert_eq!(records[0].jd_path, jd.display().to_string());
    assert_eq!(records[0].scores(), report.scores());
}

#[tokio::test]
async fn unsupported_format_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let resume = write(&dir, "resume.docx", b"PK\x03\x04");
    let jd = write(&dir, "jd.txt", b"Python");

    let ledger = Arc::new(InMemoryLedger::new());
    let service = service_with(canned_ocr(""), ledger.clone());
    let err = service.run_match(&resume, &jd).await.unwrap_err();

    assert!(matches!(
        err,
        MatchError::Extraction {
            role: DocumentRole::Resume,
            source: ExtractError::UnsupportedFormat(_)
        }
    ));
    assert_eq!(ledger.count().await.unwrap(), 0);
}

#[tokio::test]
async fn missing_job_description_is_reported_against_that_document() {
    let dir = TempDir::new().unwrap();
    let resume = write(&dir, "resume.txt", b"Python");

    let ledger = Arc::new(InMemoryLedger::new());
    let service = service_with(canned_ocr(""), ledger.clone());
    let err = service
        .run_match(&resume, &dir.path().join("missing.txt"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "could not read job description");
    let cause = std::error::Error::source(&err).expect("extraction error as source");
    assert!(cause.to_string().starts_with("failed to read "), "{}", cause);
    assert!(matches!(
        err,
        MatchError::Extraction {
            role: DocumentRole::JobDescription,
            source: ExtractError::Io { .. }
        }
    ));
    assert_eq!(ledger.count().await.unwrap(), 0);
}

#[tokio::test]
async fn broken_pdf_is_read_through_ocr() {
    let dir = TempDir::new().unwrap();
    let resume = write(&dir, "scan.pdf", b"not a pdf");
    let jd = write(&dir, "jd.txt", b"Pandas and NumPy for data work");

    let ocr = canned_ocr("Data engineer\nPandas, NumPy, Excel\n");
    let ledger = Arc::new(InMemoryLedger::new());
    let service = service_with(ocr.clone(), ledger.clone());
    let report = service.run_match(&resume, &jd).await.unwrap();

    assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.skill_score, 1.0);
    assert_eq!(ledger.count().await.unwrap(), 1);
}

/// Collects formatted log lines from a subscriber installed for one test.
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[tokio::test]
async fn ocr_fallback_logs_a_warning_with_the_path() {
    let dir = TempDir::new().unwrap();
    let resume = write(&dir, "scan.pdf", b"not a pdf");
    let jd = write(&dir, "jd.txt", b"Python");

    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let service = service_with(canned_ocr("Python"), Arc::new(InMemoryLedger::new()));
    service.run_match(&resume, &jd).await.unwrap();

    let logs = capture.contents();
    let line = logs
        .lines()
        .find(|l| l.contains("switching to OCR"))
        .unwrap_or_else(|| panic!("no fallback warning in: {}", logs));
    assert!(line.contains("WARN"), "{}", line);
    assert!(line.contains(&resume.display().to_string()), "{}", line);
}

#[tokio::test]
async fn blank_ocr_result_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let resume = write(&dir, "blank.pdf", b"not a pdf");
    let jd = write(&dir, "jd.txt", b"Java developer");

    let service = service_with(canned_ocr("   \n"), Arc::new(InMemoryLedger::new()));
    let report = service.run_match(&resume, &jd).await.unwrap();

    assert_eq!(report.tfidf_score, 0.0);
    assert_eq!(report.skill_score, 0.0);
}

#[tokio::test]
async fn repeated_match_appends_new_records_with_same_scores() {
    let dir = TempDir::new().unwrap();
    let resume = write(&dir, "resume.txt", b"Rust, Python and NLP research");
    let jd = write(&dir, "jd.txt", b"NLP engineer, Python preferred, Java a plus");

    let ledger = Arc::new(SqliteLedger::open(&dir.path().join("history.db")).await.unwrap());
    let service = service_with(canned_ocr(""), ledger.clone());

    let first = service.run_match(&resume, &jd).await.unwrap();
    let second = service.run_match(&resume, &jd).await.unwrap();

    assert!(second.record_id > first.record_id);
    assert_eq!(first.scores(), second.scores());
    assert!((first.skill_score - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(ledger.count().await.unwrap(), 2);
}

#[tokio::test]
async fn ledger_failure_surfaces_computed_scores() {
    let dir = TempDir::new().unwrap();
    let resume = write(&dir, "resume.txt", b"Python");
    let jd = write(&dir, "jd.txt", b"Python");

    let service = service_with(canned_ocr(""), Arc::new(RefusingLedger));
    let err = service.run_match(&resume, &jd).await.unwrap_err();

    match err {
        MatchError::NotRecorded { scores, source } => {
            assert_eq!(scores.tfidf_score, 1.0);
            assert_eq!(scores.skill_score, 1.0);
            assert!(matches!(source, LedgerError::Unavailable(_)));
        }
        other => panic!("expected NotRecorded, got {:?}", other),
    }
}

#[tokio::test]
async fn phrase_mode_counts_multi_word_skills() {
    let dir = TempDir::new().unwrap();
    let resume = write(&dir, "resume.txt", b"Built deep learning models in Python");
    let jd = write(&dir, "jd.txt", b"Deep learning and machine learning role");

    let vocabulary = SkillVocabulary::new(DEFAULT_SKILLS.iter().copied(), SkillMatchMode::Phrase);
    let extractor = Extractor::new(canned_ocr(""), 1, Duration::from_secs(10));
    let service = MatchService::new(extractor, vocabulary, Arc::new(InMemoryLedger::new()));
    let report = service.run_match(&resume, &jd).await.unwrap();

    assert_eq!(report.skill_score, 0.5);

    // The default token mode cannot see either phrase.
    let token_service = service_with(canned_ocr(""), Arc::new(InMemoryLedger::new()));
    let token_report = token_service.run_match(&resume, &jd).await.unwrap();
    assert_eq!(token_report.skill_score, 0.0);
    assert!(token_report.jd_skills.is_empty());
}

#[tokio::test]
async fn ledger_backends_agree_on_limits() {
    let dir = TempDir::new().unwrap();
    let sqlite = SqliteLedger::open(&dir.path().join("history.db")).await.unwrap();
    let memory = InMemoryLedger::new();

    for name in ["a.txt", "b.txt", "c.txt"] {
        let entry = NewMatch {
            resume_path: name.to_string(),
            jd_path: "jd.txt".to_string(),
            scores: resume_matcher::models::MatchScores {
                tfidf_score: 0.5,
                skill_score: 0.5,
            },
        };
        sqlite.append(&entry).await.unwrap();
        memory.append(&entry).await.unwrap();
    }

    for limit in [None, Some(0), Some(1), Some(3), Some(10)] {
        let from_sqlite: Vec<_> = sqlite
            .list(limit)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.resume_path)
            .collect();
        let from_memory: Vec<_> = memory
            .list(limit)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.resume_path)
            .collect();
        assert_eq!(from_sqlite, from_memory, "limit {:?}", limit);
    }
    assert!(sqlite.list(Some(0)).await.unwrap().is_empty());
}
