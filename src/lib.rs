//! # groundwater_sql
//!
//! Natural-language questions about groundwater assessments, answered with
//! SQL over a SQLite table.
//!
//! A learned text-to-SQL model proposes a statement, a deterministic
//! enhancer and repair pass fix the column-name and quoting mistakes such
//! models make on this dataset, a validator dry-runs the result, and a
//! rule-based generator takes over whenever the model fails. Only `SELECT`
//! statements are ever executed.
//!
//! ```
//! use groundwater_sql::{
//!     catalog::SchemaCatalog, pipeline::HybridGenerator, rule_based::RuleBasedGenerator,
//!     store::SqliteStore, validator::SqlValidator
//! };
//!
//! # tokio_test_block(async {
//! let store = SqliteStore::open_in_memory().unwrap();
//! store
//!     .execute_batch(
//!         r#"CREATE TABLE facts_assessment ("STATE - 1_level_1" TEXT, "DISTRICT - 2_level_1" TEXT);
//!            INSERT INTO facts_assessment VALUES ('KERALA', 'IDUKKI');"#
//!     )
//!     .unwrap();
//! let catalog = SchemaCatalog::load(&store, "facts_assessment");
//! let generator =
//!     HybridGenerator::rules_only(RuleBasedGenerator::new(catalog), SqlValidator::new(&store));
//!
//! let sql = generator.generate_sql("Tell me about Kerala").await.unwrap();
//! assert!(sql.contains("'KERALA'"));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! # Modules
//!
//! - [`columns`] - Dataset column names and substitution tables
//! - [`store`] - Storage trait and SQLite implementation
//! - [`catalog`] - Schema snapshot with sampled locations
//! - [`intent`] - Question intent classification
//! - [`rule_based`] - Deterministic rule-based generator
//! - [`model`] - Model-based generator and lazy model handle
//! - [`llm`] - HTTP model backends
//! - [`repair`] - SQL enhancement and repair
//! - [`validator`] - Candidate validation
//! - [`pipeline`] - Hybrid orchestration
//! - [`executor`] - SELECT-only execution
//! - [`config`] - Configuration loading
//! - [`output`] - Result formatting

pub mod app;
pub mod catalog;
pub mod cli;
pub mod columns;
pub mod config;
pub mod error;
pub mod executor;
pub mod intent;
pub mod llm;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod repair;
pub mod rule_based;
pub mod store;
pub mod validator;
