use std::path::Path;

use async_trait::async_trait;
use domain_publication::{
    exception::{ReductionException, ReductionResult},
    model::vo::SelectionCriteria,
    service::ReductionEngine,
};

/// Reduces newline-delimited JSON masters.
///
/// Each line is one record object whose hierarchy dimensions are top-level
/// string fields keyed by field name. Retained lines are copied verbatim in
/// input order, so identical input and criteria give byte-identical output.
#[derive(Default, Clone)]
pub struct JsonlReductionEngine;

#[async_trait]
impl ReductionEngine for JsonlReductionEngine {
    async fn reduce(
        &self,
        master: &Path,
        criteria: &SelectionCriteria,
        output: &Path,
    ) -> ReductionResult<()> {
        let source = tokio::fs::read(master).await.map_err(|source| {
            ReductionException::SourceUnreadable {
                path: master.to_path_buf(),
                source,
            }
        })?;
        let text =
            String::from_utf8(source).map_err(|e| ReductionException::MalformedRecord {
                line: 0,
                reason: format!("master isn't valid utf-8: {e}"),
            })?;

        let mut retained = Vec::with_capacity(text.len());
        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            let value: serde_json::Value = serde_json::from_str(line).map_err(|e| {
                ReductionException::MalformedRecord {
                    line: line_no,
                    reason: e.to_string(),
                }
            })?;
            let record = value.as_object().ok_or(ReductionException::MalformedRecord {
                line: line_no,
                reason: "not a JSON object".to_string(),
            })?;

            // Every criterion field is validated on every record; a record
            // the schema can't explain fails the whole task instead of
            // being skipped.
            let mut keep = true;
            for criterion in &criteria.entries {
                let field_value =
                    record.get(&criterion.field_name).ok_or(ReductionException::MissingField {
                        line: line_no,
                        field: criterion.field_name.clone(),
                    })?;
                let text_value =
                    field_value.as_str().ok_or(ReductionException::NonTextField {
                        line: line_no,
                        field: criterion.field_name.clone(),
                    })?;
                if !criterion.allows(text_value) {
                    keep = false;
                }
            }
            if keep {
                retained.extend_from_slice(line.as_bytes());
                retained.push(b'\n');
            }
        }

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|source| {
                ReductionException::OutputUnwritable {
                    path: output.to_path_buf(),
                    source,
                }
            })?;
        }
        tokio::fs::write(output, &retained).await.map_err(|source| {
            ReductionException::OutputUnwritable {
                path: output.to_path_buf(),
                source,
            }
        })?;
        Ok(())
    }
}
