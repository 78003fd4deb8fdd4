//! 產物清單
//!
//! 生成端寫出每個產物的字節長度與 SHA3-256 摘要。驗證端在清單存在時據此
//! 檢查簽名長度：簽名文件相對記錄長度被截斷或填充，判定為驗證不通過。
//! 外部生成端不寫清單，缺失清單不是錯誤。

use crate::artifact::{ArtifactRole, ArtifactSet, ArtifactStore};
use crate::error::{CrossVerifyError, Result};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

/// 清單文件讀取上限
const MANIFEST_CAPACITY: usize = 16 * 1024;

/// 單個產物的記錄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    /// 角色後綴（pk / sig / msg / ctx）
    pub role: String,
    /// 文件名
    pub file: String,
    /// 字節長度
    pub len: usize,
    /// SHA3-256（十六進制）
    pub sha3_256: String,
}

/// 產物清單
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub scheme: String,
    pub side: String,
    /// RFC 3339 生成時間
    pub created_at: String,
    pub artifacts: Vec<ArtifactEntry>,
}

impl Manifest {
    /// 根據已寫出的產物內容構建清單
    pub fn build(set: &ArtifactSet, contents: &[(ArtifactRole, &[u8])]) -> Self {
        let artifacts = contents
            .iter()
            .filter_map(|(role, bytes)| {
                let path = set.path(*role)?;
                Some(ArtifactEntry {
                    role: role.suffix().to_string(),
                    file: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    len: bytes.len(),
                    sha3_256: digest_hex(bytes),
                })
            })
            .collect();

        Self {
            scheme: set.scheme.name().to_string(),
            side: set.side_label.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
            artifacts,
        }
    }

    pub fn entry(&self, role: ArtifactRole) -> Option<&ArtifactEntry> {
        self.artifacts.iter().find(|e| e.role == role.suffix())
    }

    /// 對照實際讀到的字節，返回不一致之處的描述
    pub fn check(&self, role: ArtifactRole, bytes: &[u8]) -> Option<String> {
        let entry = self.entry(role)?;
        if entry.len != bytes.len() {
            return Some(format!(
                "{} length mismatch: manifest records {} bytes, artifact has {}",
                role,
                entry.len,
                bytes.len()
            ));
        }
        if entry.sha3_256 != digest_hex(bytes) {
            return Some(format!("{} digest mismatch against manifest", role));
        }
        None
    }

    /// 序列化為寫入 `ArtifactSet::manifest` 的 JSON
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// 讀取清單；不存在時返回 `None`
    pub fn load(store: &dyn ArtifactStore, set: &ArtifactSet) -> Result<Option<Self>> {
        if !store.exists(&set.manifest) {
            return Ok(None);
        }

        let bytes = store
            .read(ArtifactRole::Manifest, &set.manifest, MANIFEST_CAPACITY)?
            .into_bytes();
        let manifest = serde_json::from_slice(&bytes).map_err(|e| {
            CrossVerifyError::Serialization(format!(
                "Invalid manifest {}: {}",
                set.manifest.display(),
                e
            ))
        })?;
        Ok(Some(manifest))
    }
}

fn digest_hex(bytes: &[u8]) -> String {
    hex::encode(Sha3_256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::MemoryArtifactStore;
    use pqc_signer::Scheme;
    use std::path::Path;

    fn sample_set() -> ArtifactSet {
        ArtifactSet::new(Path::new("/virtual"), "ref", Scheme::MlDsa87)
    }

    #[test]
    fn test_check_detects_length_and_digest() {
        let set = sample_set();
        let manifest = Manifest::build(
            &set,
            &[
                (ArtifactRole::Signature, b"abcdef".as_slice()),
                (ArtifactRole::Context, b"ZOND".as_slice()),
            ],
        );

        assert!(manifest.check(ArtifactRole::Signature, b"abcdef").is_none());
        let truncated = manifest.check(ArtifactRole::Signature, b"abcde").unwrap();
        assert!(truncated.contains("length mismatch"));
        let altered = manifest.check(ArtifactRole::Signature, b"abcdeg").unwrap();
        assert!(altered.contains("digest mismatch"));

        // 未記錄的角色不做檢查
        assert!(manifest.check(ArtifactRole::Message, b"anything").is_none());
    }

    #[test]
    fn test_write_and_load() {
        let store = MemoryArtifactStore::new();
        let set = sample_set();

        assert!(Manifest::load(&store, &set).unwrap().is_none());

        let manifest = Manifest::build(&set, &[(ArtifactRole::Context, b"ZOND".as_slice())]);
        store.write(&set.manifest, &manifest.to_json().unwrap()).unwrap();

        let loaded = Manifest::load(&store, &set).unwrap().unwrap();
        assert_eq!(loaded, manifest);
        assert_eq!(loaded.entry(ArtifactRole::Context).unwrap().file, "ref_mldsa87_ctx.bin");
    }

    #[test]
    fn test_corrupt_manifest() {
        let store = MemoryArtifactStore::new();
        let set = sample_set();
        store.write(&set.manifest, b"{not json").unwrap();

        assert!(matches!(
            Manifest::load(&store, &set),
            Err(CrossVerifyError::Serialization(_))
        ));
    }
}
