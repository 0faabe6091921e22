use core::fmt::Write;

use hashbrown::HashMap;

use crate::errors::Result;
use crate::feature::{Feature, FeatureExtractor};
use crate::model::Model;
use crate::sentence::Sentence;
use crate::tag::Tag;

/// Per-token classifier.
///
/// A class scores its log prior plus the log probability of every active feature found in the
/// vocabulary. Features missing from the vocabulary contribute nothing.
pub struct Predictor {
    extractor: FeatureExtractor,
    tags: Vec<Tag>,
    class_log_prior: Vec<f64>,
    feature_ids: HashMap<String, usize>,

    // Weights are stored feature-major:
    //
    //          feat1 feat2 feat3 ...
    //
    // class1     1     4     7
    // class2     2     5     .
    // class3     3     6     .
    weights: Vec<f64>,
}

impl Predictor {
    /// Creates a new predictor.
    ///
    /// # Arguments
    ///
    /// * `model` - A model data.
    ///
    /// # Errors
    ///
    /// When a class name is not a known tag, an error variant will be returned.
    pub fn new(model: Model) -> Result<Self> {
        let tags = model
            .classes
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<Tag>>>()?;
        let n_classes = tags.len();
        let n_features = model.feature_names.len();
        let mut weights = vec![0.; n_classes * n_features];
        for (c, row) in model.feature_log_prob.iter().enumerate() {
            for (f, &w) in row.iter().enumerate() {
                weights[f * n_classes + c] = w;
            }
        }
        let feature_ids = model
            .feature_names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name, i))
            .collect();
        log::info!(
            "predictor ready: {} classes, {} features",
            n_classes,
            n_features
        );
        Ok(Self {
            extractor: FeatureExtractor::new(),
            tags,
            class_log_prior: model.class_log_prior,
            feature_ids,
            weights,
        })
    }

    /// Tags the classifier can produce, in model order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    fn add_feature_scores(&self, features: &[Feature], key: &mut String, ys: &mut [f64]) {
        let n_classes = self.tags.len();
        for feature in features {
            key.clear();
            // Writing into a String never fails.
            let _ = write!(key, "{}", feature);
            if let Some(&id) = self.feature_ids.get(key.as_str()) {
                let weights = &self.weights[id * n_classes..(id + 1) * n_classes];
                for (y, w) in ys.iter_mut().zip(weights) {
                    *y += w;
                }
            }
        }
    }

    /// Returns the index of the highest score. Ties go to the earliest class.
    fn best_class(ys: &[f64]) -> usize {
        let mut best = 0;
        for (c, &y) in ys.iter().enumerate().skip(1) {
            if y > ys[best] {
                best = c;
            }
        }
        best
    }

    fn predict_impl(&self, sentence: &Sentence, tags: &mut [Tag], mut scores: Option<&mut [f64]>) {
        let mut features = vec![];
        let mut key = String::new();
        let mut ys = vec![0.; self.tags.len()];
        for i in 0..sentence.len() {
            self.extractor.extract_into(sentence, i, &mut features);
            ys.copy_from_slice(&self.class_log_prior);
            self.add_feature_scores(&features, &mut key, &mut ys);
            let best = Self::best_class(&ys);
            tags[i] = self.tags[best];
            if let Some(scores) = scores.as_deref_mut() {
                scores[i] = ys[best];
            }
        }
    }

    /// Scores every class for the `i`-th token, in model order.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn class_scores(&self, sentence: &Sentence, i: usize) -> Vec<f64> {
        let features = self.extractor.extract(sentence, i);
        let mut ys = self.class_log_prior.clone();
        self.add_feature_scores(&features, &mut String::new(), &mut ys);
        ys
    }

    /// Predicts tags.
    ///
    /// # Arguments
    ///
    /// * `sentence` - A sentence.
    ///
    /// # Returns
    ///
    /// A sentence with predicted tags.
    pub fn predict(&self, mut sentence: Sentence) -> Sentence {
        let mut tags = core::mem::take(&mut sentence.tags);
        tags.resize(sentence.len(), Tag::Outside);
        self.predict_impl(&sentence, &mut tags, None);
        sentence.tags = tags;
        sentence
    }

    /// Predicts tags. This function also records the score of each winning class.
    ///
    /// # Arguments
    ///
    /// * `sentence` - A sentence.
    ///
    /// # Returns
    ///
    /// A sentence with predicted tags and scores.
    pub fn predict_with_score(&self, mut sentence: Sentence) -> Sentence {
        let mut tags = core::mem::take(&mut sentence.tags);
        tags.resize(sentence.len(), Tag::Outside);
        let mut scores = vec![0.; sentence.len()];
        self.predict_impl(&sentence, &mut tags, Some(&mut scores));
        sentence.tags = tags;
        sentence.tag_scores.replace(scores);
        sentence
    }
}
