//! Model adapter: Implementation of Classifier over an exported logistic pipeline.
//!
//! The training pipeline exports a JSON description of its fitted steps:
//! standard scaling for numeric columns, one-hot coefficients for categorical
//! columns (unknown categories contribute nothing) and a logistic head.
//!
//! # Integrity
//!
//! A model directory may carry a `manifest.json` binding SHA-256 digests of the
//! model files, and a detached Ed25519 signature `model.sig` over the manifest.
//! - With a verifying key configured, the signature and every digest must match.
//! - Without a key, digests are still checked but the manifest is unauthenticated.
//! - With `require_signature`, an unsigned or unverifiable model is refused.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{ColumnKind, CustomerRecord, FeatureValue, SchemaVersion};
use crate::ports::{Classifier, ClassifierError};

pub const MODEL_FILE: &str = "model.json";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const SIGNATURE_FILE: &str = "model.sig";

pub const MANIFEST_VERSION: u32 = 1;

/// Allowed clock skew for manifest timestamps.
const MAX_FUTURE_SKEW_SECS: i64 = 300;

/// Error type for model loading.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model format: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Invalid model: {0}")]
    Invalid(String),

    #[error("Model integrity check failed: {0}")]
    Integrity(String),
}

/// Standard-scaled numeric term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericTerm {
    pub mean: f64,
    pub scale: f64,
    pub coefficient: f64,
}

fn default_threshold() -> f64 {
    0.5
}

/// Model parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedModel {
    pub schema: SchemaVersion,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub expose_probability: bool,
    #[serde(default)]
    pub numeric: BTreeMap<String, NumericTerm>,
    /// Column -> category -> one-hot coefficient
    #[serde(default)]
    pub categorical: BTreeMap<String, BTreeMap<String, f64>>,
}

impl ExportedModel {
    /// Check that the parameters cover the schema exactly and are finite.
    ///
    /// # Errors
    /// Returns `ModelError::Invalid` describing the first problem found.
    pub fn validate(&self) -> Result<(), ModelError> {
        let invalid = |msg: String| Err(ModelError::Invalid(msg));

        if !self.intercept.is_finite() {
            return invalid("intercept is not finite".into());
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return invalid(format!("threshold {} outside (0, 1)", self.threshold));
        }

        for (column, kind) in self.schema.columns() {
            let covered = match kind {
                ColumnKind::Numeric => self.numeric.contains_key(*column),
                ColumnKind::Categorical => self.categorical.contains_key(*column),
            };
            if !covered {
                return invalid(format!(
                    "schema {} column '{column}' has no {kind:?} parameters",
                    self.schema
                ));
            }
        }

        for (column, term) in &self.numeric {
            if self.schema.kind_of(column) != Some(ColumnKind::Numeric) {
                return invalid(format!("numeric parameters for unknown column '{column}'"));
            }
            if !(term.scale.is_finite() && term.scale > 0.0) {
                return invalid(format!("column '{column}' scale must be > 0"));
            }
            if !(term.mean.is_finite() && term.coefficient.is_finite()) {
                return invalid(format!("column '{column}' has non-finite parameters"));
            }
        }

        for (column, levels) in &self.categorical {
            if self.schema.kind_of(column) != Some(ColumnKind::Categorical) {
                return invalid(format!(
                    "categorical parameters for unknown column '{column}'"
                ));
            }
            if let Some((level, _)) = levels.iter().find(|(_, c)| !c.is_finite()) {
                return invalid(format!("column '{column}' level '{level}' is not finite"));
            }
        }

        Ok(())
    }
}

/// How strictly model integrity is enforced at load time.
#[derive(Debug, Clone, Default)]
pub struct LoadPolicy {
    /// Key that must have signed `manifest.json`
    pub verifying_key: Option<VerifyingKey>,
    /// Refuse models that are not signed and verified
    pub require_signature: bool,
}

/// Integrity level reached when the model was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integrity {
    /// Manifest signature and file digests verified
    Signed,
    /// File digests matched an unauthenticated manifest
    DigestsOnly,
    /// No manifest present
    Unsigned,
}

impl std::fmt::Display for Integrity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Signed => write!(f, "signed"),
            Self::DigestsOnly => write!(f, "digests only"),
            Self::Unsigned => write!(f, "unsigned"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelManifest {
    pub version: u32,
    #[serde(default)]
    pub created_at: Option<i64>,
    pub files: BTreeMap<String, String>,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

// Constant-time compare for hex digests.
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn read_file(path: &Path) -> Result<Vec<u8>, ModelError> {
    fs::read(path).map_err(|source| ModelError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Logistic classifier backed by an [`ExportedModel`].
#[derive(Debug, Clone)]
pub struct LogisticModel {
    params: ExportedModel,
    source: PathBuf,
    integrity: Integrity,
}

impl LogisticModel {
    /// Wrap already-loaded parameters.
    ///
    /// # Errors
    /// Returns error if the parameters do not validate.
    pub fn from_exported(params: ExportedModel) -> Result<Self, ModelError> {
        params.validate()?;
        Ok(Self {
            params,
            source: PathBuf::new(),
            integrity: Integrity::Unsigned,
        })
    }

    /// Load `model.json` from a directory (or a direct file path).
    ///
    /// # Errors
    /// Returns error if the model cannot be read, does not validate, or fails
    /// the integrity checks required by `policy`.
    pub fn load(path: &Path, policy: &LoadPolicy) -> Result<Self, ModelError> {
        let (base_dir, model_path) = if path.is_file() {
            let dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
            (dir, path.to_path_buf())
        } else {
            (path.to_path_buf(), path.join(MODEL_FILE))
        };

        let model_bytes = read_file(&model_path)?;
        let file_name = model_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| MODEL_FILE.to_string());

        let integrity = Self::verify_integrity(&base_dir, &file_name, &model_bytes, policy)?;

        let params: ExportedModel = serde_json::from_slice(&model_bytes)?;
        params.validate()?;

        tracing::info!(
            "Loaded model from {:?} (schema={}, integrity={}, probability={})",
            model_path,
            params.schema,
            integrity,
            params.expose_probability
        );

        Ok(Self {
            params,
            source: model_path,
            integrity,
        })
    }

    fn verify_integrity(
        base_dir: &Path,
        model_file: &str,
        model_bytes: &[u8],
        policy: &LoadPolicy,
    ) -> Result<Integrity, ModelError> {
        let manifest_path = base_dir.join(MANIFEST_FILE);
        let sig_path = base_dir.join(SIGNATURE_FILE);

        if !manifest_path.exists() {
            if policy.require_signature {
                return Err(ModelError::Integrity(format!(
                    "{MANIFEST_FILE} not found in {base_dir:?}; signed model required"
                )));
            }
            tracing::warn!("Loading UNSIGNED model from {:?}", base_dir);
            return Ok(Integrity::Unsigned);
        }

        let manifest_bytes = read_file(&manifest_path)?;

        let signed = match (&policy.verifying_key, sig_path.exists()) {
            (Some(key), true) => {
                let sig_bytes = read_file(&sig_path)?;
                let sig_array: [u8; 64] = sig_bytes.as_slice().try_into().map_err(|_| {
                    ModelError::Integrity("invalid signature length (expected 64 bytes)".into())
                })?;
                key.verify(&manifest_bytes, &Signature::from_bytes(&sig_array))
                    .map_err(|_| ModelError::Integrity("invalid model signature".into()))?;
                true
            }
            (Some(_), false) => {
                if policy.require_signature {
                    return Err(ModelError::Integrity(format!(
                        "{SIGNATURE_FILE} not found in {base_dir:?}"
                    )));
                }
                tracing::warn!("Model manifest present without signature; checking digests only");
                false
            }
            (None, _) => {
                if policy.require_signature {
                    return Err(ModelError::Integrity(
                        "signed model required but no verifying key is configured".into(),
                    ));
                }
                tracing::warn!("No model verifying key configured; checking digests only");
                false
            }
        };

        let manifest: ModelManifest = serde_json::from_slice(&manifest_bytes)
            .map_err(|e| ModelError::Integrity(format!("invalid {MANIFEST_FILE}: {e}")))?;

        if manifest.version != MANIFEST_VERSION {
            return Err(ModelError::Integrity(format!(
                "unsupported manifest version {}",
                manifest.version
            )));
        }
        if let Some(created_at) = manifest.created_at {
            if created_at > unix_now() + MAX_FUTURE_SKEW_SECS {
                return Err(ModelError::Integrity(
                    "manifest created_at is in the future".into(),
                ));
            }
        }
        if !manifest.files.contains_key(model_file) {
            return Err(ModelError::Integrity(format!(
                "manifest does not bind {model_file}"
            )));
        }

        // The model entry is checked against the bytes that get parsed.
        for (rel, expected_hex) in &manifest.files {
            let actual_hex = if rel == model_file {
                sha256_hex(model_bytes)
            } else {
                let bytes = fs::read(base_dir.join(rel)).map_err(|e| {
                    ModelError::Integrity(format!(
                        "manifest references missing/unreadable file {rel}: {e}"
                    ))
                })?;
                sha256_hex(&bytes)
            };
            if !constant_time_eq_str(&actual_hex, expected_hex) {
                return Err(ModelError::Integrity(format!("file hash mismatch for {rel}")));
            }
        }

        tracing::info!("Model manifest digests verified (signed={signed})");
        Ok(if signed {
            Integrity::Signed
        } else {
            Integrity::DigestsOnly
        })
    }

    #[must_use]
    pub fn integrity(&self) -> Integrity {
        self.integrity
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn exposes_probability(&self) -> bool {
        self.params.expose_probability
    }

    /// Check the record against the fitted schema and compute the logit.
    fn logit(&self, record: &CustomerRecord) -> Result<f64, ClassifierError> {
        let schema = self.params.schema;
        if record.schema() != schema {
            return Err(ClassifierError::SchemaMismatch {
                record: record.schema(),
                model: schema,
            });
        }

        if let Some(extra) = record.columns().find(|c| schema.kind_of(c).is_none()) {
            return Err(ClassifierError::UnexpectedColumn(extra.to_string()));
        }

        let mut z = self.params.intercept;
        for (column, kind) in schema.columns() {
            let value = record
                .get(column)
                .ok_or_else(|| ClassifierError::MissingColumn(column.to_string()))?;
            let wrong_type = || ClassifierError::WrongType {
                column: column.to_string(),
                expected: *kind,
            };

            match (kind, value) {
                (ColumnKind::Numeric, FeatureValue::Number(x)) => {
                    let term = self.params.numeric.get(*column).ok_or_else(|| {
                        ClassifierError::MissingColumn(column.to_string())
                    })?;
                    z += (x - term.mean) / term.scale * term.coefficient;
                }
                (ColumnKind::Categorical, FeatureValue::Category(level)) => {
                    z += self
                        .params
                        .categorical
                        .get(*column)
                        .and_then(|levels| levels.get(level))
                        .copied()
                        .unwrap_or(0.0);
                }
                _ => return Err(wrong_type()),
            }
        }

        if !z.is_finite() {
            return Err(ClassifierError::Numerical(format!(
                "non-finite decision value {z}"
            )));
        }
        Ok(z)
    }

    fn probability(&self, record: &CustomerRecord) -> Result<f64, ClassifierError> {
        Ok(sigmoid(self.logit(record)?))
    }
}

impl Classifier for LogisticModel {
    fn schema(&self) -> SchemaVersion {
        self.params.schema
    }

    fn predict(&self, record: &CustomerRecord) -> Result<u8, ClassifierError> {
        let p = self.probability(record)?;
        Ok(u8::from(p >= self.params.threshold))
    }

    fn predict_proba(&self, record: &CustomerRecord) -> Result<Option<f64>, ClassifierError> {
        if !self.params.expose_probability {
            return Ok(None);
        }
        self.probability(record).map(Some)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{normalize, CustomerInput, Thresholds};
    use base64::Engine;
    use ed25519_dalek::{Signer, SigningKey};
    use rand::RngCore;

    pub(crate) fn grouped_model(intercept: f64, expose_probability: bool) -> ExportedModel {
        let mut numeric = BTreeMap::new();
        let mut categorical = BTreeMap::new();
        for (column, kind) in SchemaVersion::Grouped.columns() {
            match kind {
                ColumnKind::Numeric => {
                    numeric.insert(
                        column.to_string(),
                        NumericTerm {
                            mean: 0.0,
                            scale: 1.0,
                            coefficient: 0.0,
                        },
                    );
                }
                ColumnKind::Categorical => {
                    categorical.insert(column.to_string(), BTreeMap::new());
                }
            }
        }
        categorical
            .get_mut("poutcome")
            .expect("poutcome")
            .insert("success".into(), 4.0);

        ExportedModel {
            schema: SchemaVersion::Grouped,
            intercept,
            threshold: 0.5,
            expose_probability,
            numeric,
            categorical,
        }
    }

    fn input(poutcome: &str) -> CustomerInput {
        CustomerInput {
            age: 41.0,
            job: "admin.".into(),
            poutcome: poutcome.into(),
            pdays: 999.0,
            ..Default::default()
        }
    }

    fn thresholds() -> Thresholds {
        Thresholds {
            campaign_cap: 7.0,
            previous_cap: 2.0,
            age_cap: 71.0,
        }
    }

    fn signing_key() -> SigningKey {
        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);
        SigningKey::from_bytes(&seed)
    }

    fn write_model(dir: &Path, model: &ExportedModel) -> Vec<u8> {
        let bytes = serde_json::to_vec(model).expect("serialize model");
        fs::write(dir.join(MODEL_FILE), &bytes).expect("write model");
        bytes
    }

    fn manifest_for(files: &[(&str, &[u8])]) -> ModelManifest {
        ModelManifest {
            version: MANIFEST_VERSION,
            created_at: Some(unix_now()),
            files: files
                .iter()
                .map(|(rel, bytes)| (rel.to_string(), sha256_hex(bytes)))
                .collect(),
        }
    }

    fn write_manifest(dir: &Path, files: &[(&str, &[u8])], key: Option<&SigningKey>) {
        write_signed(dir, &manifest_for(files), key);
    }

    fn write_signed(dir: &Path, manifest: &ModelManifest, key: Option<&SigningKey>) {
        let manifest_bytes = serde_json::to_vec(manifest).expect("serialize manifest");
        fs::write(dir.join(MANIFEST_FILE), &manifest_bytes).expect("write manifest");
        if let Some(key) = key {
            let signature: Signature = key.sign(&manifest_bytes);
            fs::write(dir.join(SIGNATURE_FILE), signature.to_bytes()).expect("write signature");
        }
    }

    #[test]
    fn test_predict_uses_categorical_coefficients() {
        let model = LogisticModel::from_exported(grouped_model(-2.0, true)).expect("model");

        let yes = normalize(&input("success"), &thresholds(), SchemaVersion::Grouped);
        let no = normalize(&input("failure"), &thresholds(), SchemaVersion::Grouped);

        assert_eq!(model.predict(&yes), Ok(1));
        assert_eq!(model.predict(&no), Ok(0));

        let p_yes = model.predict_proba(&yes).expect("proba").expect("exposed");
        let p_no = model.predict_proba(&no).expect("proba").expect("exposed");
        assert!((p_yes - sigmoid(2.0)).abs() < 1e-12);
        assert!((p_no - sigmoid(-2.0)).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&p_yes));
    }

    #[test]
    fn test_probability_hidden_unless_exposed() {
        let model = LogisticModel::from_exported(grouped_model(0.0, false)).expect("model");
        let record = normalize(&input("success"), &thresholds(), SchemaVersion::Grouped);
        assert_eq!(model.predict_proba(&record), Ok(None));
    }

    #[test]
    fn test_numeric_terms_are_standardized() {
        let mut params = grouped_model(0.0, true);
        params.numeric.insert(
            "age".into(),
            NumericTerm {
                mean: 40.0,
                scale: 10.0,
                coefficient: 2.0,
            },
        );
        let model = LogisticModel::from_exported(params).expect("model");

        // (60 - 40) / 10 * 2 = 4
        let mut raw = input("failure");
        raw.age = 60.0;
        let record = normalize(&raw, &thresholds(), SchemaVersion::Grouped);
        let p = model.predict_proba(&record).expect("proba").expect("exposed");
        assert!((p - sigmoid(4.0)).abs() < 1e-12);
    }

    #[test]
    fn test_schema_mismatch_is_reported() {
        let model = LogisticModel::from_exported(grouped_model(0.0, true)).expect("model");
        let record = normalize(&input("success"), &thresholds(), SchemaVersion::Raw);
        assert_eq!(
            model.predict(&record),
            Err(ClassifierError::SchemaMismatch {
                record: SchemaVersion::Raw,
                model: SchemaVersion::Grouped,
            })
        );
    }

    #[test]
    fn test_column_errors_are_reported() {
        let model = LogisticModel::from_exported(grouped_model(0.0, true)).expect("model");
        let full = normalize(&input("success"), &thresholds(), SchemaVersion::Grouped);

        let missing: Vec<_> = full
            .iter()
            .filter(|(c, _)| *c != "pdays_grouped")
            .map(|(c, v)| (c, v.clone()))
            .collect();
        let record = CustomerRecord::from_fields(SchemaVersion::Grouped, missing);
        assert_eq!(
            model.predict(&record),
            Err(ClassifierError::MissingColumn("pdays_grouped".into()))
        );

        let mut extra: Vec<_> = full.iter().map(|(c, v)| (c, v.clone())).collect();
        extra.push(("duration", FeatureValue::Number(100.0)));
        let record = CustomerRecord::from_fields(SchemaVersion::Grouped, extra);
        assert_eq!(
            model.predict(&record),
            Err(ClassifierError::UnexpectedColumn("duration".into()))
        );

        let retyped: Vec<_> = full
            .iter()
            .map(|(c, v)| {
                if c == "age" {
                    (c, FeatureValue::from("forty"))
                } else {
                    (c, v.clone())
                }
            })
            .collect();
        let record = CustomerRecord::from_fields(SchemaVersion::Grouped, retyped);
        assert!(matches!(
            model.predict(&record),
            Err(ClassifierError::WrongType { .. })
        ));
    }

    #[test]
    fn test_non_finite_input_is_numerical_error() {
        let mut params = grouped_model(0.0, true);
        params.numeric.insert(
            "euribor3m".into(),
            NumericTerm {
                mean: 0.0,
                scale: 1.0,
                coefficient: 1.0,
            },
        );
        let model = LogisticModel::from_exported(params).expect("model");
        let mut raw = input("success");
        raw.euribor3m = f64::NAN;
        let record = normalize(&raw, &thresholds(), SchemaVersion::Grouped);
        assert!(matches!(
            model.predict(&record),
            Err(ClassifierError::Numerical(_))
        ));
    }

    #[test]
    fn test_validate_rejects_incomplete_parameters() {
        let mut params = grouped_model(0.0, true);
        params.categorical.remove("pdays_grouped");
        let err = params.validate().expect_err("must fail");
        assert!(err.to_string().contains("pdays_grouped"));

        let mut params = grouped_model(0.0, true);
        params.numeric.get_mut("age").expect("age").scale = 0.0;
        assert!(params.validate().is_err());

        let mut params = grouped_model(0.0, true);
        params.threshold = 1.0;
        assert!(params.validate().is_err());

        let mut params = grouped_model(0.0, true);
        params.numeric.insert(
            "duration".into(),
            NumericTerm {
                mean: 0.0,
                scale: 1.0,
                coefficient: 1.0,
            },
        );
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_load_unsigned_model_when_allowed() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_model(temp.path(), &grouped_model(0.5, true));

        let model = LogisticModel::load(temp.path(), &LoadPolicy::default()).expect("load");
        assert_eq!(model.integrity(), Integrity::Unsigned);
        assert_eq!(model.schema(), SchemaVersion::Grouped);
        assert!(model.exposes_probability());

        // Direct file path works too.
        let model = LogisticModel::load(&temp.path().join(MODEL_FILE), &LoadPolicy::default())
            .expect("load file");
        assert_eq!(model.source(), temp.path().join(MODEL_FILE));
    }

    #[test]
    fn test_load_refuses_unsigned_model_when_required() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_model(temp.path(), &grouped_model(0.5, true));

        let policy = LoadPolicy {
            verifying_key: Some(signing_key().verifying_key()),
            require_signature: true,
        };
        let err = LogisticModel::load(temp.path(), &policy).expect_err("must fail");
        assert!(matches!(err, ModelError::Integrity(_)));
    }

    #[test]
    fn test_load_signed_model() {
        let temp = tempfile::tempdir().expect("tempdir");
        let bytes = write_model(temp.path(), &grouped_model(0.5, true));
        let key = signing_key();
        write_manifest(temp.path(), &[(MODEL_FILE, &bytes)], Some(&key));

        let policy = LoadPolicy {
            verifying_key: Some(key.verifying_key()),
            require_signature: true,
        };
        let model = LogisticModel::load(temp.path(), &policy).expect("load signed");
        assert_eq!(model.integrity(), Integrity::Signed);
    }

    #[test]
    fn test_load_rejects_signature_from_other_key() {
        let temp = tempfile::tempdir().expect("tempdir");
        let bytes = write_model(temp.path(), &grouped_model(0.5, true));
        write_manifest(temp.path(), &[(MODEL_FILE, &bytes)], Some(&signing_key()));

        let policy = LoadPolicy {
            verifying_key: Some(signing_key().verifying_key()),
            require_signature: false,
        };
        let err = LogisticModel::load(temp.path(), &policy).expect_err("must fail");
        assert!(err.to_string().contains("invalid model signature"));
    }

    #[test]
    fn test_load_detects_tampered_model() {
        let temp = tempfile::tempdir().expect("tempdir");
        let bytes = write_model(temp.path(), &grouped_model(0.5, true));
        write_manifest(temp.path(), &[(MODEL_FILE, &bytes)], None);

        // Rewrite the model after the manifest was produced.
        write_model(temp.path(), &grouped_model(3.0, true));

        let err = LogisticModel::load(temp.path(), &LoadPolicy::default()).expect_err("must fail");
        assert!(err.to_string().contains("hash mismatch"));
    }

    fn required(key: Option<&SigningKey>) -> LoadPolicy {
        LoadPolicy {
            verifying_key: key.map(SigningKey::verifying_key),
            require_signature: true,
        }
    }

    #[test]
    fn test_load_requires_key_when_signature_required() {
        let temp = tempfile::tempdir().expect("tempdir");
        let bytes = write_model(temp.path(), &grouped_model(0.5, true));
        write_manifest(temp.path(), &[(MODEL_FILE, &bytes)], Some(&signing_key()));

        let err = LogisticModel::load(temp.path(), &required(None)).expect_err("must fail");
        assert!(err.to_string().contains("no verifying key is configured"));
    }

    #[test]
    fn test_load_rejects_manifest_not_binding_model() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_model(temp.path(), &grouped_model(0.5, true));
        fs::write(temp.path().join("encoder.json"), b"{}").expect("write extra");
        let key = signing_key();
        write_manifest(temp.path(), &[("encoder.json", b"{}")], Some(&key));

        let err = LogisticModel::load(temp.path(), &required(Some(&key))).expect_err("must fail");
        assert!(err.to_string().contains("does not bind model.json"));
    }

    #[test]
    fn test_load_rejects_manifest_from_the_future() {
        let temp = tempfile::tempdir().expect("tempdir");
        let bytes = write_model(temp.path(), &grouped_model(0.5, true));
        let key = signing_key();
        let mut manifest = manifest_for(&[(MODEL_FILE, &bytes)]);
        manifest.created_at = Some(unix_now() + MAX_FUTURE_SKEW_SECS + 3600);
        write_signed(temp.path(), &manifest, Some(&key));

        let err = LogisticModel::load(temp.path(), &required(Some(&key))).expect_err("must fail");
        assert!(err.to_string().contains("in the future"));

        // Small clock skew is tolerated.
        manifest.created_at = Some(unix_now() + 60);
        write_signed(temp.path(), &manifest, Some(&key));
        LogisticModel::load(temp.path(), &required(Some(&key))).expect("skew tolerated");
    }

    #[test]
    fn test_load_rejects_unsupported_manifest_version() {
        let temp = tempfile::tempdir().expect("tempdir");
        let bytes = write_model(temp.path(), &grouped_model(0.5, true));
        let key = signing_key();
        let mut manifest = manifest_for(&[(MODEL_FILE, &bytes)]);
        manifest.version = MANIFEST_VERSION + 1;
        write_signed(temp.path(), &manifest, Some(&key));

        let err = LogisticModel::load(temp.path(), &required(Some(&key))).expect_err("must fail");
        assert!(err.to_string().contains("unsupported manifest version"));
    }

    #[test]
    fn test_load_rejects_truncated_signature() {
        let temp = tempfile::tempdir().expect("tempdir");
        let bytes = write_model(temp.path(), &grouped_model(0.5, true));
        let key = signing_key();
        write_manifest(temp.path(), &[(MODEL_FILE, &bytes)], Some(&key));
        fs::write(temp.path().join(SIGNATURE_FILE), [0u8; 32]).expect("truncate signature");

        let err = LogisticModel::load(temp.path(), &required(Some(&key))).expect_err("must fail");
        assert!(err.to_string().contains("expected 64 bytes"));
    }

    #[test]
    fn test_digest_covers_bytes_in_memory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let signed = write_model(temp.path(), &grouped_model(0.5, true));
        write_manifest(temp.path(), &[(MODEL_FILE, &signed)], None);

        // Swap the file on disk after it was read.
        write_model(temp.path(), &grouped_model(3.0, true));

        let policy = LoadPolicy::default();
        let integrity =
            LogisticModel::verify_integrity(temp.path(), MODEL_FILE, &signed, &policy)
                .expect("in-memory bytes match the manifest");
        assert_eq!(integrity, Integrity::DigestsOnly);

        let swapped = serde_json::to_vec(&grouped_model(3.0, true)).expect("serialize");
        let err = LogisticModel::verify_integrity(temp.path(), MODEL_FILE, &swapped, &policy)
            .expect_err("must fail");
        assert!(err.to_string().contains("hash mismatch"));
    }

    #[test]
    fn test_load_digests_only_without_key() {
        let temp = tempfile::tempdir().expect("tempdir");
        let bytes = write_model(temp.path(), &grouped_model(0.5, true));
        write_manifest(temp.path(), &[(MODEL_FILE, &bytes)], None);

        let model = LogisticModel::load(temp.path(), &LoadPolicy::default()).expect("load");
        assert_eq!(model.integrity(), Integrity::DigestsOnly);
    }

    #[test]
    fn test_load_fails_if_manifest_references_missing_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let bytes = write_model(temp.path(), &grouped_model(0.5, true));
        write_manifest(
            temp.path(),
            &[(MODEL_FILE, &bytes), ("encoder.json", b"missing")],
            None,
        );

        let err = LogisticModel::load(temp.path(), &LoadPolicy::default()).expect_err("must fail");
        assert!(err.to_string().contains("missing/unreadable"));
    }

    #[test]
    fn test_load_missing_model_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = LogisticModel::load(temp.path(), &LoadPolicy::default()).expect_err("must fail");
        assert!(matches!(err, ModelError::Io { .. }));
    }

    #[test]
    fn test_pubkey_b64_roundtrip_for_policy() {
        let key = signing_key();
        let b64 = base64::engine::general_purpose::STANDARD.encode(key.verifying_key().to_bytes());
        let parsed = crate::config::verifying_key_from_b64(&b64).expect("parse key");
        assert_eq!(parsed, key.verifying_key());
    }
}
