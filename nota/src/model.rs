use std::io::{Read, Write};

use bincode::{Decode, Encode};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{NotaError, Result, SchemaMismatchError};
use crate::feature::{FeatureKind, FEATURE_SCHEMA};

/// Metadata block of the JSON model file. Entries other than the schema id are ignored.
#[derive(Deserialize, Serialize)]
struct ModelMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feature_schema: Option<String>,
}

/// Layout of the JSON model file exported by the trainer.
#[derive(Deserialize, Serialize)]
struct ModelFile {
    classes: Option<Vec<String>>,
    class_log_prior: Option<Vec<f64>>,
    feature_log_prob: Option<Vec<Vec<f64>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    vocabulary: Option<HashMap<String, usize>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    feature_names: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<ModelMeta>,
}

/// Weights of the per-token Naive Bayes classifier.
//
// Weight matrix layout:
//
//          feat1 feat2 feat3 ...
//
// class1     .     .     .
// class2     .     .     .
// ...
#[derive(Debug, Clone, PartialEq, Decode, Encode)]
pub struct Model {
    pub(crate) classes: Vec<String>,
    pub(crate) class_log_prior: Vec<f64>,
    pub(crate) feature_log_prob: Vec<Vec<f64>>,
    pub(crate) feature_names: Vec<String>,
    pub(crate) feature_schema: Option<String>,
}

impl Model {
    /// Creates a model from its parts.
    ///
    /// # Arguments
    ///
    /// * `classes` - Class names, e.g. `B-ITEM` or `QTY`.
    /// * `class_log_prior` - Log prior of each class.
    /// * `feature_log_prob` - One row of feature log probabilities per class.
    /// * `feature_names` - Vocabulary key of each column.
    ///
    /// # Errors
    ///
    /// When the dimensions disagree, an error variant will be returned.
    pub fn new(
        classes: Vec<String>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        let model = Self {
            classes,
            class_log_prior,
            feature_log_prob,
            feature_names,
            feature_schema: None,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(NotaError::invalid_model("`classes` is empty"));
        }
        if self.class_log_prior.len() != self.classes.len() {
            return Err(NotaError::invalid_model(format!(
                "`class_log_prior` has {} entries, but there are {} classes",
                self.class_log_prior.len(),
                self.classes.len(),
            )));
        }
        if self.feature_log_prob.len() != self.classes.len() {
            return Err(NotaError::invalid_model(format!(
                "`feature_log_prob` has {} rows, but there are {} classes",
                self.feature_log_prob.len(),
                self.classes.len(),
            )));
        }
        let n_features = self.feature_names.len();
        for (i, row) in self.feature_log_prob.iter().enumerate() {
            if row.len() != n_features {
                return Err(NotaError::invalid_model(format!(
                    "row {} of `feature_log_prob` has {} columns, but the vocabulary has {} features",
                    i,
                    row.len(),
                    n_features,
                )));
            }
        }
        if let Some(schema) = &self.feature_schema {
            if schema != FEATURE_SCHEMA {
                return Err(SchemaMismatchError {
                    expected: FEATURE_SCHEMA,
                    found: format!("`{schema}`"),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Turns a vocabulary map into a dense list of feature names.
    fn dense_names(vocabulary: HashMap<String, usize>) -> Result<Vec<String>> {
        let mut names: Vec<Option<String>> = vec![None; vocabulary.len()];
        for (key, idx) in vocabulary {
            let slot = names.get_mut(idx).ok_or_else(|| {
                NotaError::invalid_model(format!(
                    "index of feature {key:?} is out of range: {idx}"
                ))
            })?;
            if let Some(other) = slot.replace(key) {
                return Err(NotaError::invalid_model(format!(
                    "features {other:?} and {:?} share index {idx}",
                    slot.as_deref().unwrap_or_default(),
                )));
            }
        }
        // Every index is in range and unique, so every slot is filled.
        Ok(names.into_iter().flatten().collect())
    }

    /// Creates a model from the JSON model file.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Errors
    ///
    /// This function will return an error variant when:
    ///
    /// * `rdr` generates an error or the data is not JSON.
    /// * `classes`, `class_log_prior` or `feature_log_prob` is missing.
    /// * The dimensions disagree or vocabulary indices are not dense.
    /// * `meta.feature_schema` names another schema.
    pub fn from_json<R>(rdr: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let file: ModelFile = serde_json::from_reader(rdr)?;
        let classes = file
            .classes
            .ok_or_else(|| NotaError::invalid_model("`classes` is missing"))?;
        let class_log_prior = file
            .class_log_prior
            .ok_or_else(|| NotaError::invalid_model("`class_log_prior` is missing"))?;
        let feature_log_prob = file
            .feature_log_prob
            .ok_or_else(|| NotaError::invalid_model("`feature_log_prob` is missing"))?;
        let feature_names = match (file.vocabulary, file.feature_names) {
            (Some(vocabulary), _) => Self::dense_names(vocabulary)?,
            (None, Some(names)) => names,
            (None, None) => vec![],
        };
        let model = Self {
            classes,
            class_log_prior,
            feature_log_prob,
            feature_names,
            feature_schema: file.meta.and_then(|meta| meta.feature_schema),
        };
        model.validate()?;
        let n_unknown = model.unknown_features().count();
        if n_unknown != 0 {
            log::warn!(
                "{} of {} features are not produced by schema `{}` and will be ignored",
                n_unknown,
                model.feature_names.len(),
                FEATURE_SCHEMA,
            );
        }
        Ok(model)
    }

    /// Exports the model as JSON, with a `vocabulary` map.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn to_json<W>(&self, wtr: &mut W) -> Result<()>
    where
        W: Write,
    {
        let vocabulary = self
            .feature_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        let meta = self.feature_schema.as_ref().map(|schema| ModelMeta {
            feature_schema: Some(schema.clone()),
        });
        let file = ModelFile {
            classes: Some(self.classes.clone()),
            class_log_prior: Some(self.class_log_prior.clone()),
            feature_log_prob: Some(self.feature_log_prob.clone()),
            vocabulary: Some(vocabulary),
            feature_names: None,
            meta,
        };
        serde_json::to_writer(wtr, &file)?;
        Ok(())
    }

    /// Exports the model data in the compact binary format.
    ///
    /// # Arguments
    ///
    /// * `wtr` - Byte-oriented sink object.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: &mut W) -> Result<()>
    where
        W: Write,
    {
        bincode::encode_into_std_write(self, wtr, bincode::config::standard())?;
        Ok(())
    }

    /// Creates a model from a reader of the compact binary format.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Returns
    ///
    /// A model data read from `rdr`.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error, it will be returned as is. Invalid dimensions are
    /// reported as [`NotaError::InvalidModel`].
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let model: Self = bincode::decode_from_std_read(rdr, bincode::config::standard())?;
        model.validate()?;
        Ok(model)
    }

    /// Marks the model as trained against the current feature schema.
    pub fn with_feature_schema(mut self) -> Self {
        self.feature_schema = Some(FEATURE_SCHEMA.to_string());
        self
    }

    /// Iterates over vocabulary keys that the feature extractor can never produce.
    pub fn unknown_features(&self) -> impl Iterator<Item = &str> {
        self.feature_names
            .iter()
            .map(String::as_str)
            .filter(|key| FeatureKind::from_key(key).is_none())
    }

    /// Checks that every vocabulary key belongs to the current feature schema.
    ///
    /// # Errors
    ///
    /// When some keys have unknown kinds, [`NotaError::SchemaMismatch`] listing a few of them
    /// will be returned.
    pub fn check_feature_schema(&self) -> Result<()> {
        let unknown: Vec<&str> = self.unknown_features().collect();
        if unknown.is_empty() {
            return Ok(());
        }
        let sample: Vec<&str> = unknown.iter().copied().take(5).collect();
        Err(SchemaMismatchError {
            expected: FEATURE_SCHEMA,
            found: format!("{} unknown features, e.g. {:?}", unknown.len(), sample),
        }
        .into())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn class_log_prior(&self) -> &[f64] {
        &self.class_log_prior
    }

    /// Rows of feature log probabilities, one per class.
    pub fn feature_log_prob(&self) -> &[Vec<f64>] {
        &self.feature_log_prob
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn feature_schema(&self) -> Option<&str> {
        self.feature_schema.as_deref()
    }
}
