//! Startup wiring: reference dataset and model, loaded once per session.

use std::sync::Arc;

use crate::adapters::dataset::load_reference_data;
use crate::adapters::model::LogisticModel;
use crate::config::AppConfig;

use super::PredictionService;

/// Load the reference dataset and the model named by `config`.
///
/// # Errors
/// Returns `DepositError::Dataset` if the dataset cannot be read or summarized,
/// and `DepositError::Model` if the model is unreadable, invalid or fails the
/// integrity policy.
pub fn bootstrap(config: &AppConfig) -> crate::Result<PredictionService<LogisticModel>> {
    let reference = load_reference_data(&config.dataset_path)?;

    // Refuse to start without a usable model.
    let model = LogisticModel::load(&config.model_path, &config.load_policy())?;

    tracing::info!(
        "Prediction service ready ({} reference rows, {} model)",
        reference.row_count(),
        model.integrity()
    );
    Ok(PredictionService::new(Arc::new(model), Arc::new(reference)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::model::tests::grouped_model;
    use crate::adapters::model::{ModelError, MODEL_FILE};
    use crate::adapters::DatasetError;
    use crate::domain::reference::tests::HEADER;
    use crate::DepositError;

    const ROWS: &str = "\
56;housemaid;married;basic.4y;no;no;no;telephone;may;mon;261;1;999;0;nonexistent;1.1;93.994;-36.4;4.857;5191;no
41;admin.;single;high.school;no;yes;no;cellular;oct;tue;300;4;6;2;success;-3.4;92.431;-26.9;0.754;5017.5;yes
";

    fn write_dataset(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("bank.csv");
        let content = format!("{}\n{ROWS}", HEADER.join(";"));
        std::fs::write(&path, content).expect("write dataset");
        path
    }

    fn write_model(dir: &std::path::Path) {
        let bytes = serde_json::to_vec(&grouped_model(-1.0, true)).expect("serialize");
        std::fs::write(dir.join(MODEL_FILE), bytes).expect("write model");
    }

    #[test]
    fn test_bootstrap_builds_service() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            dataset_path: write_dataset(temp.path()),
            model_path: temp.path().to_path_buf(),
            ..AppConfig::default()
        };
        write_model(temp.path());

        let service = bootstrap(&config).expect("bootstrap");
        assert_eq!(service.reference().row_count(), 2);
        assert!(service.predict_input(&service.default_input()).is_success());
    }

    #[test]
    fn test_missing_dataset_is_dataset_io_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_model(temp.path());
        let config = AppConfig {
            dataset_path: temp.path().join("absent.csv"),
            model_path: temp.path().to_path_buf(),
            ..AppConfig::default()
        };

        let err = bootstrap(&config).err().expect("must fail");
        assert!(matches!(
            err,
            DepositError::Dataset(DatasetError::Io { .. })
        ));
        assert!(err.to_string().contains("absent.csv"));
    }

    #[test]
    fn test_missing_model_is_model_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            dataset_path: write_dataset(temp.path()),
            model_path: temp.path().join("models"),
            ..AppConfig::default()
        };

        let err = bootstrap(&config).err().expect("must fail");
        assert!(matches!(err, DepositError::Model(ModelError::Io { .. })));
    }

    #[test]
    fn test_unsigned_model_refused_under_policy() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_model(temp.path());
        let config = AppConfig {
            dataset_path: write_dataset(temp.path()),
            model_path: temp.path().to_path_buf(),
            require_signed_model: true,
            ..AppConfig::default()
        };

        let err = bootstrap(&config).err().expect("must fail");
        assert!(matches!(
            err,
            DepositError::Model(ModelError::Integrity(_))
        ));
    }
}
