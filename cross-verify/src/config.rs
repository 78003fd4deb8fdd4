//! 配置管理模塊
//!
//! 負責加載和驗證交叉驗證配置

use crate::artifact::{ArtifactSet, Side};
use crate::error::{CrossVerifyError, Result};
use config::{Config, File};
use pqc_signer::Scheme;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 交叉驗證配置
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CrossVerifyConfig {
    /// 產物目錄
    pub artifact_dir: PathBuf,

    /// 參考實現產物的文件名前綴
    pub reference_label: String,

    /// 被測庫產物的文件名前綴
    pub library_label: String,

    /// 是否額外寫出公鑰/簽名的十六進制轉儲
    pub write_hex_dumps: bool,

    /// 是否用不同退出碼區分前置條件失敗 (2) 與配置錯誤 (3)
    pub distinct_exit_codes: bool,
}

impl Default for CrossVerifyConfig {
    fn default() -> Self {
        Self {
            artifact_dir: std::env::var("CROSS_VERIFY_ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            reference_label: std::env::var("CROSS_VERIFY_REFERENCE_LABEL")
                .unwrap_or_else(|_| "ref".to_string()),
            library_label: std::env::var("CROSS_VERIFY_LIBRARY_LABEL")
                .unwrap_or_else(|_| "qrypto".to_string()),
            write_hex_dumps: std::env::var("CROSS_VERIFY_WRITE_HEX_DUMPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            distinct_exit_codes: std::env::var("CROSS_VERIFY_DISTINCT_EXIT_CODES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }
}

impl CrossVerifyConfig {
    /// 生成端標籤
    pub fn label(&self, side: Side) -> &str {
        match side {
            Side::Reference => &self.reference_label,
            Side::Library => &self.library_label,
        }
    }

    /// 某一生成端、某一方案的產物路徑集
    pub fn artifact_set(&self, side: Side, scheme: Scheme) -> ArtifactSet {
        ArtifactSet::new(&self.artifact_dir, self.label(side), scheme)
    }
}

/// 從配置文件加載配置
///
/// # 參數
/// - `config_path`: 配置文件路徑（支持 TOML、JSON、YAML）
///
/// # 示例
/// ```no_run
/// use cross_verify::config::load_config;
///
/// let config = load_config("cross-verify.toml").expect("Failed to load config");
/// println!("Artifacts: {}", config.artifact_dir.display());
/// ```
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<CrossVerifyConfig> {
    let config = Config::builder()
        .add_source(File::from(config_path.as_ref()))
        .build()
        .map_err(|e| CrossVerifyError::Config(format!("Failed to load config file: {}", e)))?;

    let cross_verify_config: CrossVerifyConfig = config
        .try_deserialize()
        .map_err(|e| CrossVerifyError::Config(format!("Failed to parse config: {}", e)))?;

    validate_config(&cross_verify_config)?;

    Ok(cross_verify_config)
}

/// 從環境變量加載配置
///
/// 環境變量前綴: `CROSS_VERIFY`
/// 示例: `CROSS_VERIFY_ARTIFACT_DIR`, `CROSS_VERIFY_LIBRARY_LABEL`
pub fn load_config_from_env() -> Result<CrossVerifyConfig> {
    let config = Config::builder()
        .add_source(config::Environment::with_prefix("CROSS_VERIFY"))
        .build()
        .map_err(|e| CrossVerifyError::Config(format!("Failed to load env vars: {}", e)))?;

    let cross_verify_config: CrossVerifyConfig = config
        .try_deserialize()
        .map_err(|e| CrossVerifyError::Config(format!("Failed to parse env config: {}", e)))?;

    validate_config(&cross_verify_config)?;

    Ok(cross_verify_config)
}

/// 驗證配置的有效性
///
/// 檢查:
/// - 標籤非空且互不相同
/// - 標籤不含路徑分隔符或 `_`（`_` 是文件名字段分隔符）
pub fn validate_config(config: &CrossVerifyConfig) -> Result<()> {
    for (name, label) in [
        ("reference_label", &config.reference_label),
        ("library_label", &config.library_label),
    ] {
        if label.is_empty() {
            return Err(CrossVerifyError::Config(format!("{} must not be empty", name)));
        }

        if label.contains(['/', '\\', '_']) {
            return Err(CrossVerifyError::Config(format!(
                "{} must not contain '/', '\\' or '_': {}",
                name, label
            )));
        }
    }

    if config.reference_label == config.library_label {
        return Err(CrossVerifyError::Config(format!(
            "reference_label and library_label must differ (both are {})",
            config.reference_label
        )));
    }

    if config.artifact_dir.as_os_str().is_empty() {
        return Err(CrossVerifyError::Config(
            "artifact_dir must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> CrossVerifyConfig {
        CrossVerifyConfig {
            artifact_dir: PathBuf::from("/tmp"),
            reference_label: "ref".to_string(),
            library_label: "qrypto".to_string(),
            write_hex_dumps: true,
            distinct_exit_codes: false,
        }
    }

    #[test]
    fn test_default_labels_are_valid() {
        assert!(validate_config(&base_config()).is_ok());
    }

    #[test]
    fn test_identical_labels() {
        let mut config = base_config();
        config.library_label = "ref".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_label_with_separator() {
        let mut config = base_config();
        config.library_label = "go_qrllib".to_string();
        assert!(validate_config(&config).is_err());

        config.library_label = "../up".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_label() {
        let mut config = base_config();
        config.reference_label.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_artifact_set_uses_side_label() {
        let config = base_config();
        let set = config.artifact_set(Side::Library, Scheme::Dilithium5);
        assert_eq!(set.public_key, PathBuf::from("/tmp/qrypto_dilithium5_pk.bin"));
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cross-verify.toml");
        std::fs::write(
            &path,
            "artifact_dir = \"/var/tmp/xv\"\nlibrary_label = \"goqrllib\"\nwrite_hex_dumps = false\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.artifact_dir, PathBuf::from("/var/tmp/xv"));
        assert_eq!(config.library_label, "goqrllib");
        assert!(!config.write_hex_dumps);
    }

    #[test]
    fn test_load_invalid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cross-verify.toml");
        std::fs::write(&path, "library_label = \"ref\"\n").unwrap();

        // 與默認的 reference_label 相同
        let result = load_config(&path);
        if std::env::var("CROSS_VERIFY_REFERENCE_LABEL").is_err() {
            assert!(matches!(result, Err(CrossVerifyError::Config(_))));
        }
    }
}
