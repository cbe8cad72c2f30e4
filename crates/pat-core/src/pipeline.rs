use std::collections::BTreeMap;

use pat_classify::{RuleClassifier, SensitivityClassifier, StatisticalClassifier};
use pat_model::{ClassificationResult, ClassificationSummary, Table, TableMetadata};
use pat_transform::TransformEngine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, trace};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::logging::redact_value;

/// Per-column classification of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableClassification {
    pub table_name: String,
    /// Results keyed by column name.
    pub results: BTreeMap<String, ClassificationResult>,
    pub summary: ClassificationSummary,
}

impl TableClassification {
    pub fn get(&self, column: &str) -> Option<&ClassificationResult> {
        self.results.get(column)
    }
}

/// Classify table metadata, then transform table data for a consumer type.
#[derive(Debug)]
pub struct PrivacyPipeline {
    classifier: SensitivityClassifier,
    transformer: TransformEngine,
}

impl PrivacyPipeline {
    pub fn new(classifier: SensitivityClassifier, transformer: TransformEngine) -> Self {
        Self {
            classifier,
            transformer,
        }
    }

    /// Build every stage from configuration.
    ///
    /// A configured model that fails to load leaves the classifier in
    /// rule-only mode.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let statistical = config
            .classifier
            .model_path
            .as_ref()
            .map(StatisticalClassifier::from_path);
        let classifier = SensitivityClassifier::new(RuleClassifier::with_default_rules()?, statistical)
            .with_threshold(config.classifier.blend_threshold);
        let transformer = TransformEngine::new(config.policy_engine()?, config.key_ring()?);
        Ok(Self::new(classifier, transformer))
    }

    pub fn classifier(&self) -> &SensitivityClassifier {
        &self.classifier
    }

    pub fn transformer(&self) -> &TransformEngine {
        &self.transformer
    }

    pub fn classify_table(
        &self,
        metadata: &TableMetadata,
    ) -> Result<TableClassification, PipelineError> {
        let _span = info_span!("classify_table", table = %metadata.table_name).entered();
        let results = self.classifier.classify_all(&metadata.columns)?;
        let summary = SensitivityClassifier::summarize(&results);
        for (class, count) in summary.iter() {
            info!(%class, count, "classified columns");
        }
        let results = results
            .into_iter()
            .map(|result| (result.column_name.clone(), result))
            .collect();
        Ok(TableClassification {
            table_name: metadata.table_name.clone(),
            results,
            summary,
        })
    }

    /// Transform every classified column of `table` for `consumer_type`.
    ///
    /// Columns without a classification are copied unchanged.
    pub fn transform_table(
        &self,
        table: &Table,
        metadata: &TableMetadata,
        classification: &TableClassification,
        consumer_type: &str,
    ) -> Result<Table, PipelineError> {
        let _span =
            info_span!("transform_table", table = %table.name, consumer_type).entered();
        let mut output = table.clone();
        let mut transformed = 0usize;

        for column in &table.columns {
            let Some(result) = classification.get(column) else {
                debug!(column = %column, "no classification, passing column through");
                continue;
            };
            let column_metadata =
                metadata
                    .column(column)
                    .ok_or_else(|| PipelineError::UnknownColumn {
                        table: table.name.clone(),
                        column: column.clone(),
                    })?;

            let values = table.column_values(column);
            let values = self.transformer.transform_column(
                &values,
                result.class,
                consumer_type,
                column_metadata.data_type,
            )?;
            if let Some(first) = values.first() {
                trace!(column = %column, sample = redact_value(&first.render()), "transformed column");
            }
            output.set_column_values(column, values);
            transformed += 1;
        }

        info!(
            transformed,
            passed_through = table.columns.len() - transformed,
            rows = table.rows.len(),
            "transformed table"
        );
        Ok(output)
    }

    /// Classify `metadata` and transform `table` in one step.
    pub fn run(
        &self,
        table: &Table,
        metadata: &TableMetadata,
        consumer_type: &str,
    ) -> Result<(TableClassification, Table), PipelineError> {
        let classification = self.classify_table(metadata)?;
        let output = self.transform_table(table, metadata, &classification, consumer_type)?;
        Ok((classification, output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pat_model::{ColumnMetadata, DataType, Row, SensitivityClass, Value};
    use pat_policy::REPORTING;

    fn pipeline() -> PrivacyPipeline {
        PrivacyPipeline::from_config(&PipelineConfig::default()).unwrap()
    }

    #[test]
    fn unclassified_columns_pass_through() {
        let metadata = TableMetadata::new(
            "contacts",
            vec![ColumnMetadata::new("email", DataType::String)],
        );
        let mut table = Table::new("contacts", vec!["email".to_string(), "note".to_string()]);
        table.push_row(Row::new().with("email", "ann@example.com").with("note", "vip"));

        let classification = pipeline().classify_table(&metadata).unwrap();
        assert_eq!(classification.get("email").unwrap().class, SensitivityClass::Pii);

        let out = pipeline()
            .transform_table(&table, &metadata, &classification, REPORTING)
            .unwrap();
        assert_eq!(out.rows[0].get("note"), &Value::from("vip"));
        assert_ne!(out.rows[0].get("email"), &Value::from("ann@example.com"));
    }

    #[test]
    fn classified_column_without_metadata_is_error() {
        let metadata = TableMetadata::new(
            "contacts",
            vec![ColumnMetadata::new("email", DataType::String)],
        );
        let classification = pipeline().classify_table(&metadata).unwrap();
        let table = Table::new("contacts", vec!["email".to_string()]);
        let empty = TableMetadata::new("contacts", Vec::new());

        let err = pipeline()
            .transform_table(&table, &empty, &classification, REPORTING)
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnknownColumn { ref column, .. } if column == "email"));
    }
}
