//! 交叉驗證統一錯誤類型定義
//!
//! 區分三類失敗：
//! - 前置條件失敗（產物缺失或不可讀）：測試流程本身有問題
//! - 自驗證失敗：參考實現自身的缺陷
//! - 配置錯誤：未知方案、非法標籤等
//!
//! 交叉驗證「不通過」不是錯誤，而是 `VerificationVerdict` 的正常結果。

use crate::artifact::ArtifactRole;
use std::path::PathBuf;
use thiserror::Error;

/// 交叉驗證錯誤類型
#[derive(Error, Debug)]
pub enum CrossVerifyError {
    /// 配置錯誤
    ///
    /// 未知的方案標識、非法的產物標籤或配置文件格式錯誤
    #[error("Configuration error: {0}")]
    Config(String),

    /// 產物文件不存在
    ///
    /// 表示生成端尚未運行或運行順序錯誤，無法嘗試驗證
    #[error("Cannot open {role}: {} not found", .path.display())]
    ArtifactNotFound { role: ArtifactRole, path: PathBuf },

    /// 產物文件讀取失敗
    #[error("Failed to read {role} from {}: {reason}", .path.display())]
    ReadFailure {
        role: ArtifactRole,
        path: PathBuf,
        reason: String,
    },

    /// 產物文件寫入失敗
    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 自驗證失敗
    ///
    /// 參考實現無法驗證自己剛生成的簽名，產物不會被寫出
    #[error("Self-verification failed for {0}")]
    SelfVerificationFailed(&'static str),

    /// PQC 簽名錯誤
    #[error("PQC signature error: {0}")]
    Pqc(#[from] pqc_signer::PqcError),

    /// 序列化/反序列化錯誤
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CrossVerifyError {
    /// 是否屬於前置條件失敗（無法嘗試驗證）
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CrossVerifyError::ArtifactNotFound { .. } | CrossVerifyError::ReadFailure { .. }
        )
    }

    /// 是否屬於配置錯誤
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CrossVerifyError::Config(_)
                | CrossVerifyError::Pqc(pqc_signer::PqcError::UnknownScheme(_))
        )
    }
}

/// Result 類型別名
pub type Result<T> = std::result::Result<T, CrossVerifyError>;

/// 從 JSON 錯誤轉換
impl From<serde_json::Error> for CrossVerifyError {
    fn from(err: serde_json::Error) -> Self {
        CrossVerifyError::Serialization(err.to_string())
    }
}
