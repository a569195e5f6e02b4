use super::*;
use crate::corpus::CorpusRepository;
use crate::embedding::{BiEncoder, BiEncoderConfig, Embedder, FailingEmbedder};
use crate::extract::UnicodeSegmenter;
use crate::index::VectorIndex;
use crate::storage::CorpusStore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DIM: usize = 64;

const CLIMATE: &str = "Le changement climatique affecte profondément la biodiversité mondiale depuis plusieurs décennies déjà.";
const FORESTS: &str =
    "Les forêts tropicales abritent une très grande partie des espèces animales connues.";
const OCEANS: &str =
    "Les océans absorbent une part importante de la chaleur produite par les activités humaines.";
const SHORT: &str = "Ceci est une phrase courte.";
const TEN_TOKENS: &str = "Un deux trois quatre cinq six sept huit neuf dix.";
const FORMULA: &str =
    "La relation √x ≤ y reste vraie pour toutes les valeurs positives considérées ici.";

struct Fixture {
    _dir: TempDir,
    staging: PathBuf,
    archive: PathBuf,
    corpus: PathBuf,
    repository: CorpusRepository,
    embedder: BiEncoder,
    segmenter: UnicodeSegmenter,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("staging");
        let archive = dir.path().join("archive");
        let corpus = dir.path().join("corpus");
        fs::create_dir_all(&staging).unwrap();
        let repository = CorpusRepository::open_or_init(CorpusStore::new(&corpus), DIM).unwrap();
        Self {
            _dir: dir,
            staging,
            archive,
            corpus,
            repository,
            embedder: BiEncoder::load(BiEncoderConfig::stub().with_stub_dimension(DIM)).unwrap(),
            segmenter: UnicodeSegmenter::default(),
        }
    }

    fn config(&self) -> IngestConfig {
        IngestConfig::new(&self.staging, &self.archive).with_min_file_bytes(0)
    }

    fn stage(&self, name: &str, sentences: &[&str]) -> PathBuf {
        let path = self.staging.join(name);
        fs::write(&path, sentences.join("\n")).unwrap();
        path
    }

    fn run(&self, config: IngestConfig) -> IngestRunSummary {
        Maintainer::new(&self.repository, &self.embedder, &self.segmenter, config)
            .unwrap()
            .run()
            .unwrap()
    }
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.path().is_file())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[test]
fn test_ingest_appends_and_archives() {
    let fx = Fixture::new();
    fx.stage("a.txt", &[CLIMATE, SHORT, FORESTS]);
    fx.stage("b.txt", &[OCEANS, TEN_TOKENS]);

    let summary = fx.run(fx.config());

    assert_eq!(summary.staged, 2);
    assert_eq!(summary.ingested, 2);
    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.sentences_submitted, 3);
    assert_eq!(summary.appended, 3);
    assert_eq!(summary.total_entries, 3);
    assert_eq!(summary.generation, Some(1));
    assert!(summary.files.iter().all(|f| f.state == FileState::Archived));

    assert!(names_in(&fx.staging).is_empty());
    assert_eq!(names_in(&fx.archive), vec!["a.txt", "b.txt"]);

    let snapshot = fx.repository.snapshot_read();
    let contents: Vec<&str> = snapshot
        .entries()
        .iter()
        .map(|e| e.content_block.as_str())
        .collect();
    assert_eq!(contents, vec![CLIMATE, FORESTS, OCEANS]);
    assert_eq!(snapshot.entries()[2].title, "b.txt");
    assert_eq!(snapshot.index().len(), 3);
}

#[test]
fn test_reingest_is_idempotent() {
    let fx = Fixture::new();
    fx.stage("a.txt", &[CLIMATE, FORESTS]);
    let first = fx.run(fx.config());
    assert_eq!(first.appended, 2);

    fx.stage("a.txt", &[CLIMATE, FORESTS]);
    let second = fx.run(fx.config());

    assert_eq!(second.sentences_submitted, 2);
    assert_eq!(second.duplicates, 2);
    assert_eq!(second.appended, 0);
    assert_eq!(second.total_entries, 2);
    assert_eq!(second.generation, None);
    assert_eq!(fx.repository.snapshot_read().len(), 2);

    // Name already taken in the archive: the second copy gets a suffix.
    let archived = names_in(&fx.archive);
    assert_eq!(archived.len(), 2);
    assert!(archived.contains(&"a.txt".to_string()));
    assert!(
        archived
            .iter()
            .any(|n| n.starts_with("a-") && n.ends_with(".txt"))
    );
}

#[test]
fn test_first_staged_duplicate_wins() {
    let fx = Fixture::new();
    fx.stage("a.txt", &[CLIMATE]);
    fx.stage("b.txt", &[CLIMATE, OCEANS]);

    let summary = fx.run(fx.config());

    assert_eq!(summary.sentences_submitted, 3);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(summary.appended, 2);

    let snapshot = fx.repository.snapshot_read();
    assert_eq!(snapshot.entries()[0].content_block, CLIMATE);
    assert_eq!(snapshot.entries()[0].title, "a.txt");
    assert_eq!(snapshot.entries()[1].title, "b.txt");
}

#[test]
fn test_small_file_archived_unprocessed() {
    let fx = Fixture::new();
    fx.stage("tiny.txt", &[CLIMATE]);

    let summary = fx.run(IngestConfig::new(&fx.staging, &fx.archive));

    assert_eq!(summary.too_small, 1);
    assert_eq!(summary.ingested, 0);
    assert_eq!(summary.appended, 0);
    assert_eq!(summary.files[0].state, FileState::TooSmall);
    assert_eq!(names_in(&fx.archive), vec!["tiny.txt"]);
    assert!(fx.repository.snapshot_read().is_empty());
}

#[test]
fn test_failed_file_isolated() {
    let fx = Fixture::new();
    fs::write(fx.staging.join("broken.pdf"), b"this is not a pdf document").unwrap();
    fs::write(fx.staging.join("latin1.txt"), [0x43, 0x61, 0x66, 0xe9, 0xff]).unwrap();
    fx.stage("good.txt", &[CLIMATE, OCEANS]);

    let summary = fx.run(fx.config());

    assert_eq!(summary.staged, 3);
    assert_eq!(summary.failed(), 2);
    assert_eq!(summary.ingested, 1);
    assert_eq!(summary.appended, 2);

    for failure in &summary.failures {
        assert_eq!(failure.stage, FileState::Staged);
        let moved = failure.moved_to.as_ref().unwrap();
        assert!(moved.starts_with(fx.staging.join(DEFAULT_ERROR_DIR_NAME)));
        assert!(moved.exists());
    }
    assert_eq!(
        names_in(&fx.staging.join(DEFAULT_ERROR_DIR_NAME)),
        vec!["broken.pdf", "latin1.txt"]
    );
    assert_eq!(names_in(&fx.archive), vec!["good.txt"]);

    // The published store is consistent on disk.
    let manifest = CorpusStore::new(&fx.corpus).read_manifest().unwrap();
    assert_eq!(manifest.entry_count, manifest.vector_count);
    let reopened = CorpusRepository::open(CorpusStore::new(&fx.corpus)).unwrap();
    let snapshot = reopened.snapshot_read();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.entries().len(), snapshot.index().len());
}

#[test]
fn test_error_dir_not_rescanned() {
    let fx = Fixture::new();
    fs::write(fx.staging.join("broken.pdf"), b"garbage").unwrap();
    let first = fx.run(fx.config());
    assert_eq!(first.failed(), 1);

    let second = fx.run(fx.config());
    assert_eq!(second.staged, 0);
    assert_eq!(second.failed(), 0);
}

#[test]
fn test_unsupported_files_stay_in_staging() {
    let fx = Fixture::new();
    fs::write(fx.staging.join("notes.docx"), b"binary").unwrap();
    fx.stage("a.TXT", &[CLIMATE]);

    let summary = fx.run(fx.config());

    assert_eq!(summary.staged, 1);
    assert_eq!(summary.appended, 1);
    assert_eq!(names_in(&fx.staging), vec!["notes.docx"]);
}

#[test]
fn test_math_sentences_skipped_when_enabled() {
    let fx = Fixture::new();
    fx.stage("maths.txt", &[FORMULA, FORESTS]);

    let summary = fx.run(fx.config().with_skip_math_sentences(true));

    assert_eq!(summary.appended, 1);
    assert_eq!(
        fx.repository.snapshot_read().entries()[0].content_block,
        FORESTS
    );
}

#[test]
fn test_math_sentences_kept_by_default() {
    let fx = Fixture::new();
    fx.stage("maths.txt", &[FORMULA, FORESTS]);

    let summary = fx.run(fx.config());
    assert_eq!(summary.appended, 2);
}

#[test]
fn test_embedder_failure_publishes_nothing() {
    let fx = Fixture::new();
    fx.stage("a.txt", &[CLIMATE, FORESTS]);

    let maintainer =
        Maintainer::new(
        &fx.repository,
        &FailingEmbedder { dimension: DIM },
        &fx.segmenter,
        fx.config(),
    )
    .unwrap();
    let result = maintainer.run();

    assert!(matches!(result, Err(IngestError::Corpus(_))));
    assert_eq!(names_in(&fx.staging), vec!["a.txt"]);
    assert!(names_in(&fx.archive).is_empty());
    assert!(fx.repository.snapshot_read().is_empty());
    assert_eq!(
        CorpusStore::new(&fx.corpus).read_manifest().unwrap().generation,
        0
    );

    // The files are picked up again on the next run.
    let summary = fx.run(fx.config());
    assert_eq!(summary.appended, 2);
}

#[test]
fn test_small_embed_batches_keep_order() {
    let fx = Fixture::new();
    fx.stage("a.txt", &[CLIMATE, FORESTS, OCEANS]);

    fx.run(fx.config().with_embed_batch_size(1));

    let snapshot = fx.repository.snapshot_read();
    let expected = fx.embedder.embed_batch(&[CLIMATE, FORESTS, OCEANS]).unwrap();
    let hits = snapshot.index().search(&expected, 1).unwrap();
    let ids: Vec<usize> = hits.iter().map(|h| h[0].corpus_id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn test_empty_staging() {
    let fx = Fixture::new();
    let summary = fx.run(fx.config());
    assert_eq!(summary.staged, 0);
    assert_eq!(summary.generation, None);
    assert!(summary.files.is_empty());
}

#[test]
fn test_sentences_from_text_threshold() {
    let fx = Fixture::new();
    let maintainer =
        Maintainer::new(&fx.repository, &fx.embedder, &fx.segmenter, fx.config()).unwrap();

    let text = format!("{TEN_TOKENS}\n{CLIMATE}\n\n{SHORT}");
    let entries = maintainer.sentences_from_text(&text, "doc.pdf");

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].content_block, CLIMATE);
    assert_eq!(entries[0].title, "doc.pdf");

    let lenient = Maintainer::new(
        &fx.repository,
        &fx.embedder,
        &fx.segmenter,
        fx.config().with_min_sentence_tokens(4),
    )
    .unwrap();
    assert_eq!(lenient.sentences_from_text(&text, "doc.pdf").len(), 3);
}

#[test]
fn test_staged_file_yields_same_entries_as_text() {
    let fx = Fixture::new();
    let lines = [CLIMATE, SHORT, FORESTS, TEN_TOKENS, OCEANS];
    let path = fx.stage("cours.txt", &lines);
    let text = fs::read_to_string(&path).unwrap();

    let expected = Maintainer::new(&fx.repository, &fx.embedder, &fx.segmenter, fx.config())
        .unwrap()
        .sentences_from_text(&text, "cours.txt");
    assert_eq!(expected.len(), 3);

    fx.run(fx.config());
    assert_eq!(fx.repository.snapshot_read().entries(), expected.as_slice());
}

#[test]
fn test_invalid_config() {
    let fx = Fixture::new();

    let zero_batch = fx.config().with_embed_batch_size(0);
    assert!(matches!(
        Maintainer::new(&fx.repository, &fx.embedder, &fx.segmenter, zero_batch),
        Err(IngestError::InvalidConfig { .. })
    ));

    let same_dirs = IngestConfig::new(&fx.staging, &fx.staging);
    assert!(matches!(
        Maintainer::new(&fx.repository, &fx.embedder, &fx.segmenter, same_dirs),
        Err(IngestError::InvalidConfig { .. })
    ));

    let error_in_staging = fx.config().with_error_dir(&fx.staging);
    assert!(matches!(
        Maintainer::new(&fx.repository, &fx.embedder, &fx.segmenter, error_in_staging),
        Err(IngestError::InvalidConfig { .. })
    ));
}

#[test]
fn test_default_config_values() {
    let config = IngestConfig::new("/data/staging", "/data/archive");
    assert_eq!(config.error_dir, PathBuf::from("/data/staging/errors"));
    assert_eq!(config.min_file_bytes, 10_000);
    assert_eq!(config.min_sentence_tokens, 10);
    assert!(!config.skip_math_sentences);
    assert_eq!(config.embed_batch_size, 64);
}

#[test]
fn test_file_state_terminal() {
    assert!(FileState::Archived.is_terminal());
    assert!(FileState::TooSmall.is_terminal());
    assert!(FileState::Failed.is_terminal());
    assert!(!FileState::Merged.is_terminal());
    assert_eq!(FileState::TooSmall.to_string(), "too_small");
}
