// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering}
    }
};

use async_trait::async_trait;
use groundwater_sql::{
    catalog::SchemaCatalog,
    error::{AppResult, llm_api_error, model_load_error},
    model::{GenerationParams, ModelBasedGenerator, ModelHandle, ModelLoader, SequenceModel},
    rule_based::RuleBasedGenerator,
    store::SqliteStore
};

pub const TABLE: &str = "facts_assessment";

pub const FIXTURE_SQL: &str = r#"
CREATE TABLE facts_assessment (
    "STATE - 1_level_1" TEXT,
    "DISTRICT - 2_level_1" TEXT,
    "Rainfall (mm) - Total" REAL,
    "Rainfall (mm) - Command" REAL,
    "Ground Water Recharge (ham) - Total" REAL,
    "Annual Ground water Recharge (ham) - Total" REAL,
    "Annual Extractable Ground water Resource (ham) - Total" REAL,
    "Ground Water Extraction for all uses (ha.m) - Total" REAL,
    "Stage of Ground Water Extraction (%) - Total" REAL,
    "Net Annual Ground Water Availability for Future Use (ham) - Total" REAL
);
INSERT INTO facts_assessment VALUES
    ('TAMIL NADU', 'CHENNAI', 1400.5, 600.0, 2100.0, 2000.0, 1800.0, 1500.0, 83.3, 300.0),
    ('TAMIL NADU', 'COIMBATORE', 650.2, 200.0, 1200.0, 1150.0, 1000.0, 1100.0, 110.0, 0.0),
    ('KARNATAKA', 'BANGALORE URBAN', 900.0, 300.0, 800.0, 780.0, 700.0, 950.0, 135.7, 0.0),
    ('KERALA', 'IDUKKI', 3000.0, NULL, 5000.0, 4900.0, 4500.0, 900.0, 20.0, 3500.0);
"#;

/// In-memory store populated with the assessment fixture
pub fn memory_store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    store.execute_batch(FIXTURE_SQL).unwrap();
    store
}

/// Write the fixture into a database file inside `dir`
pub fn fixture_file(dir: &Path) -> PathBuf {
    let path = dir.join("groundwater.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(FIXTURE_SQL).unwrap();
    path
}

pub fn catalog(store: &SqliteStore) -> SchemaCatalog {
    SchemaCatalog::load(store, TABLE)
}

pub fn rules(store: &SqliteStore) -> RuleBasedGenerator {
    RuleBasedGenerator::new(catalog(store))
}

/// Model returning the same text for every prompt
pub struct FixedModel(pub String);

#[async_trait]
impl SequenceModel for FixedModel {
    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> AppResult<String> {
        Ok(self.0.clone())
    }
}

/// Model whose inference always fails
pub struct BrokenModel;

#[async_trait]
impl SequenceModel for BrokenModel {
    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> AppResult<String> {
        Err(llm_api_error("inference failed"))
    }
}

/// Loader producing a [`FixedModel`] and counting loads
pub struct FixedLoader {
    pub output: String,
    pub loads:  Arc<AtomicUsize>
}

impl FixedLoader {
    pub fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
            loads:  Arc::new(AtomicUsize::new(0))
        }
    }
}

#[async_trait]
impl ModelLoader for FixedLoader {
    async fn load(&self) -> AppResult<Box<dyn SequenceModel>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FixedModel(self.output.clone())))
    }
}

/// Loader that never succeeds
pub struct FailingLoader;

#[async_trait]
impl ModelLoader for FailingLoader {
    async fn load(&self) -> AppResult<Box<dyn SequenceModel>> {
        Err(model_load_error("weights not found"))
    }
}

/// Loader producing a [`BrokenModel`]
pub struct BrokenLoader;

#[async_trait]
impl ModelLoader for BrokenLoader {
    async fn load(&self) -> AppResult<Box<dyn SequenceModel>> {
        Ok(Box::new(BrokenModel))
    }
}

pub fn model_generator(store: &SqliteStore, loader: impl ModelLoader + 'static) -> ModelBasedGenerator {
    ModelBasedGenerator::new(ModelHandle::new(loader), catalog(store))
}
