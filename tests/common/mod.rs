//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use plagiat::config::Config;
use plagiat::context::ServiceContext;
use plagiat::corpus::{CorpusEntry, CorpusRepository};
use plagiat::embedding::{BiEncoder, BiEncoderConfig, CrossEncoder};
use plagiat::storage::CorpusStore;
use tempfile::TempDir;

pub const DIM: usize = 64;

pub const CLIMATE: &str = "Le changement climatique affecte la biodiversité mondiale";
pub const FORESTS: &str =
    "Les forêts tropicales abritent une très grande partie des espèces animales connues.";
pub const OCEANS: &str =
    "Les océans absorbent une part importante de la chaleur produite par les activités humaines.";
pub const MARKETS: &str = "Les marchés financiers ont connu une forte volatilité cette semaine.";
pub const BRIDGE: &str = "Un pont métallique enjambe le fleuve depuis plus de deux siècles.";

/// Temporary corpus, staging and archive directories with a matching [`Config`].
pub struct TestWorkspace {
    dir: TempDir,
    pub config: Config,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let config = Config {
            corpus_dir: dir.path().join("corpus"),
            staging_dir: dir.path().join("staging"),
            archive_dir: dir.path().join("archive"),
            min_file_bytes: 0,
            ..Default::default()
        };
        fs::create_dir_all(&config.staging_dir).expect("create staging dir");
        Self { dir, config }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> CorpusStore {
        CorpusStore::new(&self.config.corpus_dir)
    }

    pub fn stage(&self, name: &str, text: &str) -> PathBuf {
        let path = self.config.staging_dir.join(name);
        fs::write(&path, text).expect("write staged file");
        path
    }

    pub fn write_document(&self, name: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, text).expect("write document");
        path
    }

    /// Repository over a fresh store of [`DIM`] seeded with `rows`.
    pub fn seeded_repository(&self, rows: &[(&str, &str)]) -> CorpusRepository {
        let repository =
            CorpusRepository::open_or_init(self.store(), DIM).expect("open corpus store");
        if !rows.is_empty() {
            let entries = rows
                .iter()
                .map(|(content, title)| CorpusEntry::new(*content, *title))
                .collect();
            repository
                .append_batch(entries, &stub_encoder(), 16)
                .expect("seed corpus");
        }
        repository
    }

    /// Context over a seeded corpus, with the stub encoder and the given reranker.
    pub fn context(
        &self,
        rows: &[(&str, &str)],
        reranker: Arc<dyn CrossEncoder>,
    ) -> ServiceContext {
        ServiceContext::from_parts(
            self.config.clone(),
            Arc::new(stub_encoder()),
            reranker,
            self.seeded_repository(rows),
        )
        .expect("build service context")
    }
}

pub fn stub_encoder() -> BiEncoder {
    BiEncoder::load(BiEncoderConfig::stub().with_stub_dimension(DIM)).expect("stub encoder")
}

pub fn file_names(dir: &Path) -> Vec<String> {
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
