//! Hybrid text-to-SQL pipeline.
//!
//! One question runs through a fixed sequence of stages:
//!
//! 1. the model generator proposes SQL; an error goes straight to fallback
//! 2. the enhancer rewrites it; a valid result is accepted
//! 3. otherwise the repair pass rewrites it again; a valid result is accepted
//! 4. otherwise the rule-based generator's output is accepted without
//!    validation
//!
//! There is exactly one repair attempt and no retry at this level. Without a
//! model generator the pipeline runs in rules-only mode.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    error::{AppResult, error_message, question_error},
    executor::{QueryExecutor, QueryResult},
    intent::Intent,
    model::ModelBasedGenerator,
    repair::SqlEnhancer,
    rule_based::RuleBasedGenerator,
    validator::{Rejection, SqlValidator}
};

/// Last transform applied to accepted model output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStage {
    Enhanced,
    Repaired
}

/// Accepted SQL together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum Candidate {
    Model { sql: String, stage: ModelStage },
    Rule { sql: String }
}

impl Candidate {
    pub fn sql(&self) -> &str {
        match self {
            Self::Model {
                sql, ..
            }
            | Self::Rule {
                sql
            } => sql
        }
    }

    pub fn into_sql(self) -> String {
        match self {
            Self::Model {
                sql, ..
            }
            | Self::Rule {
                sql
            } => sql
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Rule { .. })
    }
}

/// Every intermediate result produced for one question.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub question:           String,
    pub intent:             Intent,
    /// Model output after code-fence stripping
    pub model_raw:          Option<String>,
    /// Load or inference error of the model
    pub model_error:        Option<String>,
    pub enhanced:           Option<String>,
    pub enhanced_rejection: Option<Rejection>,
    pub repaired:           Option<String>,
    pub repaired_rejection: Option<Rejection>,
    /// Rule-based SQL for the same question
    pub rule_sql:           String,
    pub candidate:          Candidate
}

/// Model generation with enhancement, validation, repair and rule fallback.
pub struct HybridGenerator<'a> {
    model:     Option<ModelBasedGenerator>,
    rules:     RuleBasedGenerator,
    validator: SqlValidator<'a>,
    enhancer:  SqlEnhancer
}

impl<'a> HybridGenerator<'a> {
    pub fn new(
        model: Option<ModelBasedGenerator>,
        rules: RuleBasedGenerator,
        validator: SqlValidator<'a>
    ) -> Self {
        let enhancer = SqlEnhancer::new(rules.catalog().table.clone());
        Self {
            model,
            rules,
            validator,
            enhancer
        }
    }

    /// Rules-only pipeline
    pub fn rules_only(rules: RuleBasedGenerator, validator: SqlValidator<'a>) -> Self {
        Self::new(None, rules, validator)
    }

    pub fn rules(&self) -> &RuleBasedGenerator {
        &self.rules
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Release the loaded model, if any
    pub fn unload_model(&mut self) {
        if let Some(model) = self.model.as_mut() {
            model.handle_mut().unload();
        }
    }

    /// Accepted candidate for a question
    pub async fn generate(&self, question: &str) -> AppResult<Candidate> {
        Ok(self.generate_report(question).await?.candidate)
    }

    /// Accepted SQL for a question
    pub async fn generate_sql(&self, question: &str) -> AppResult<String> {
        Ok(self.generate(question).await?.into_sql())
    }

    /// Run the pipeline and keep every intermediate result
    pub async fn generate_report(&self, question: &str) -> AppResult<GenerationReport> {
        let question = question.trim();
        if question.is_empty() {
            return Err(question_error("Question must not be empty"));
        }
        info!(question, "Processing question");
        let mut report = GenerationReport {
            question:           question.to_string(),
            intent:             self.rules.intent(question),
            model_raw:          None,
            model_error:        None,
            enhanced:           None,
            enhanced_rejection: None,
            repaired:           None,
            repaired_rejection: None,
            rule_sql:           self.rules.generate(question),
            candidate:          Candidate::Rule {
                sql: String::new()
            }
        };
        report.candidate = match self.try_model(question, &mut report).await {
            Some(candidate) => candidate,
            None => {
                info!("Falling back to rule-based SQL generation");
                debug!(sql = %report.rule_sql, "Rule-based SQL");
                Candidate::Rule {
                    sql: report.rule_sql.clone()
                }
            }
        };
        Ok(report)
    }

    /// Execute accepted SQL
    pub fn run_sql(&self, sql: &str) -> QueryResult {
        QueryExecutor::new(self.validator.store()).execute(sql)
    }

    async fn try_model(&self, question: &str, report: &mut GenerationReport) -> Option<Candidate> {
        let model = self.model.as_ref()?;
        let raw = match model.generate(question).await {
            Ok(raw) => raw,
            Err(e) => {
                let message = error_message(&e);
                warn!("Model-based generation failed: {}", message);
                report.model_error = Some(message);
                return None;
            }
        };
        report.model_raw = Some(raw.clone());

        let enhanced = self.enhancer.enhance(&raw, question);
        report.enhanced = Some(enhanced.clone());
        match self.validator.check(&enhanced) {
            Ok(()) => {
                info!("Enhanced model SQL accepted");
                return Some(Candidate::Model {
                    sql:   enhanced,
                    stage: ModelStage::Enhanced
                });
            }
            Err(rejection) => {
                warn!("Enhanced model SQL rejected: {}", rejection);
                report.enhanced_rejection = Some(rejection);
            }
        }

        let repaired = self.enhancer.repair(&enhanced);
        report.repaired = Some(repaired.clone());
        match self.validator.check(&repaired) {
            Ok(()) => {
                info!("Repaired model SQL accepted");
                Some(Candidate::Model {
                    sql:   repaired,
                    stage: ModelStage::Repaired
                })
            }
            Err(rejection) => {
                warn!("Repaired model SQL rejected: {}", rejection);
                report.repaired_rejection = Some(rejection);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_accessors() {
        let candidate = Candidate::Model {
            sql:   String::from("SELECT 1 LIMIT 10;"),
            stage: ModelStage::Repaired
        };
        assert_eq!(candidate.sql(), "SELECT 1 LIMIT 10;");
        assert!(!candidate.is_fallback());
        assert!(
            Candidate::Rule {
                sql: String::new()
            }
            .is_fallback()
        );
    }

    #[test]
    fn test_candidate_serialization() {
        let json = serde_json::to_value(Candidate::Model {
            sql:   String::from("SELECT 1;"),
            stage: ModelStage::Enhanced
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"source": "model", "sql": "SELECT 1;", "stage": "enhanced"})
        );
    }
}
