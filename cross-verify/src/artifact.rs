//! 產物交換契約與存儲
//!
//! 兩個實現之間唯一的通道是文件系統上的二進制產物：
//!
//! ```text
//! {artifact_dir}/
//!   ├── {side}_{scheme}_pk.bin        (公鑰，恰好 public_key_bytes)
//!   ├── {side}_{scheme}_sig.bin       (簽名，實際長度 = 文件字節數)
//!   ├── {side}_{scheme}_msg.bin       (消息)
//!   ├── {side}_{scheme}_ctx.bin       (上下文，僅 ML-DSA-87)
//!   ├── {side}_{scheme}_pk.hex        (調試用十六進制轉儲)
//!   ├── {side}_{scheme}_sig.hex
//!   └── {side}_{scheme}_manifest.json (長度與摘要清單)
//! ```
//!
//! `side` 是生成端的標籤（參考實現默認 `ref`，被測庫默認 `qrypto`）。
//! 每個 (side, scheme) 組合的路徑互不相交，因此四個驅動可以任意順序或並行運行。

use crate::error::{CrossVerifyError, Result};
use pqc_signer::Scheme;
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// 消息和上下文的讀取容量（與參考端固定緩衝區一致）
pub const MESSAGE_CAPACITY: usize = 256;

/// 產物的生成端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// 參考實現（本工具）
    Reference,
    /// 被測庫
    Library,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Reference => f.write_str("reference"),
            Side::Library => f.write_str("library"),
        }
    }
}

/// 產物角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactRole {
    PublicKey,
    Signature,
    Message,
    Context,
    /// 長度與摘要清單（不參與驗證調用）
    Manifest,
}

impl ArtifactRole {
    /// 文件名後綴
    pub const fn suffix(self) -> &'static str {
        match self {
            ArtifactRole::PublicKey => "pk",
            ArtifactRole::Signature => "sig",
            ArtifactRole::Message => "msg",
            ArtifactRole::Context => "ctx",
            ArtifactRole::Manifest => "manifest",
        }
    }
}

impl fmt::Display for ArtifactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactRole::PublicKey => f.write_str("public key"),
            ArtifactRole::Signature => f.write_str("signature"),
            ArtifactRole::Message => f.write_str("message"),
            ArtifactRole::Context => f.write_str("context"),
            ArtifactRole::Manifest => f.write_str("manifest"),
        }
    }
}

/// 一個 (side, scheme) 組合的完整產物路徑集
///
/// 生成端和驗證端都從這裡取路徑，不在驅動中拼接字符串。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    pub scheme: Scheme,
    pub side_label: String,
    pub public_key: PathBuf,
    pub signature: PathBuf,
    pub message: PathBuf,
    /// 僅在方案使用上下文時存在
    pub context: Option<PathBuf>,
    pub public_key_hex: PathBuf,
    pub signature_hex: PathBuf,
    pub manifest: PathBuf,
}

impl ArtifactSet {
    pub fn new(dir: &Path, side_label: &str, scheme: Scheme) -> Self {
        let stem = format!("{}_{}", side_label, scheme.artifact_tag());
        let bin = |role: ArtifactRole| dir.join(format!("{}_{}.bin", stem, role.suffix()));

        Self {
            scheme,
            side_label: side_label.to_string(),
            public_key: bin(ArtifactRole::PublicKey),
            signature: bin(ArtifactRole::Signature),
            message: bin(ArtifactRole::Message),
            context: scheme.uses_context().then(|| bin(ArtifactRole::Context)),
            public_key_hex: dir.join(format!("{}_pk.hex", stem)),
            signature_hex: dir.join(format!("{}_sig.hex", stem)),
            manifest: dir.join(format!("{}_manifest.json", stem)),
        }
    }

    /// 角色對應的路徑（無上下文方案的 Context 返回 None）
    pub fn path(&self, role: ArtifactRole) -> Option<&Path> {
        match role {
            ArtifactRole::PublicKey => Some(&self.public_key),
            ArtifactRole::Signature => Some(&self.signature),
            ArtifactRole::Message => Some(&self.message),
            ArtifactRole::Context => self.context.as_deref(),
            ArtifactRole::Manifest => Some(&self.manifest),
        }
    }

    /// 該方案需要交換的角色（3 或 4 個）
    pub fn roles(&self) -> Vec<ArtifactRole> {
        let mut roles = vec![
            ArtifactRole::PublicKey,
            ArtifactRole::Signature,
            ArtifactRole::Message,
        ];
        if self.context.is_some() {
            roles.push(ArtifactRole::Context);
        }
        roles
    }
}

/// 一次讀取的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactBytes {
    /// 讀入的字節，至多 `max_bytes`
    pub bytes: Vec<u8>,
    /// 文件的實際字節數
    pub file_len: usize,
}

impl ArtifactBytes {
    /// 文件是否超出讀取容量
    pub fn is_oversized(&self) -> bool {
        self.file_len > self.bytes.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// 產物存儲抽象
///
/// 文件系統實現用於真實運行，內存實現用於在不觸碰磁盤的情況下測試生成端/驗證端契約。
pub trait ArtifactStore {
    /// 寫入完整字節序列
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()>;

    /// 讀取至多 `max_bytes` 字節
    ///
    /// 短讀不是錯誤：`bytes` 的長度就是權威長度。超出容量的文件同樣不報錯，
    /// 由調用方根據 `file_len` 判定。
    fn read(&self, role: ArtifactRole, path: &Path, max_bytes: usize) -> Result<ArtifactBytes>;

    fn exists(&self, path: &Path) -> bool;

    /// 刪除產物；不存在時視為成功
    fn delete(&self, path: &Path) -> Result<()>;
}

/// 文件系統產物存儲
#[derive(Debug, Clone, Copy, Default)]
pub struct FsArtifactStore;

impl FsArtifactStore {
    fn ensure_parent(path: &Path) -> Result<()> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() || parent.exists() {
            return Ok(());
        }

        fs::create_dir_all(parent).map_err(|source| CrossVerifyError::WriteFailure {
            path: parent.to_path_buf(),
            source,
        })?;

        // 僅收緊本工具新建的目錄，不改動已有目錄（例如 /tmp）的權限
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            fs::set_permissions(parent, fs::Permissions::from_mode(0o700)).map_err(|source| {
                CrossVerifyError::WriteFailure {
                    path: parent.to_path_buf(),
                    source,
                }
            })?;
        }

        debug!("Created artifact directory {:?}", parent);
        Ok(())
    }
}

impl ArtifactStore for FsArtifactStore {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        Self::ensure_parent(path)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let to_write_failure = |source| CrossVerifyError::WriteFailure {
            path: path.to_path_buf(),
            source,
        };

        // 文件句柄在作用域結束時釋放，包括寫入失敗的路徑
        let mut file = options.open(path).map_err(to_write_failure)?;
        file.write_all(bytes).map_err(to_write_failure)?;
        file.flush().map_err(to_write_failure)?;

        debug!("Wrote {} bytes to {:?}", bytes.len(), path);
        Ok(())
    }

    fn read(&self, role: ArtifactRole, path: &Path, max_bytes: usize) -> Result<ArtifactBytes> {
        let to_read_failure = |e: std::io::Error| CrossVerifyError::ReadFailure {
            role,
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CrossVerifyError::ArtifactNotFound {
                role,
                path: path.to_path_buf(),
            },
            _ => to_read_failure(e),
        })?;
        let metadata_len = file.metadata().ok().map(|m| m.len() as usize);

        let mut buf = Vec::with_capacity(max_bytes);
        file.take(max_bytes as u64)
            .read_to_end(&mut buf)
            .map_err(to_read_failure)?;

        let file_len = metadata_len.unwrap_or(buf.len()).max(buf.len());
        if file_len > max_bytes {
            warn!(
                "{} artifact {:?} is {} bytes, exceeds capacity {}",
                role, path, file_len, max_bytes
            );
        }

        debug!("Read {} bytes of {} from {:?}", buf.len(), role, path);
        Ok(ArtifactBytes {
            bytes: buf,
            file_len,
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn delete(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!("Removed stale artifact {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CrossVerifyError::WriteFailure {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// 內存產物存儲（測試用）
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Vec<u8>>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 取出已寫入的內容
    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files().get(path).cloned()
    }

    /// 刪除一個產物（模擬生成端未運行）
    pub fn remove(&self, path: &Path) -> Option<Vec<u8>> {
        self.files().remove(path)
    }

    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.files().insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, role: ArtifactRole, path: &Path, max_bytes: usize) -> Result<ArtifactBytes> {
        let files = self.files();
        let bytes = files
            .get(path)
            .ok_or_else(|| CrossVerifyError::ArtifactNotFound {
                role,
                path: path.to_path_buf(),
            })?;
        Ok(ArtifactBytes {
            bytes: bytes[..bytes.len().min(max_bytes)].to_vec(),
            file_len: bytes.len(),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files().contains_key(path)
    }

    fn delete(&self, path: &Path) -> Result<()> {
        self.files().remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_set_paths() {
        let set = ArtifactSet::new(Path::new("/tmp"), "ref", Scheme::MlDsa87);

        assert_eq!(set.public_key, PathBuf::from("/tmp/ref_mldsa87_pk.bin"));
        assert_eq!(set.signature, PathBuf::from("/tmp/ref_mldsa87_sig.bin"));
        assert_eq!(set.message, PathBuf::from("/tmp/ref_mldsa87_msg.bin"));
        assert_eq!(set.context, Some(PathBuf::from("/tmp/ref_mldsa87_ctx.bin")));
        assert_eq!(set.manifest, PathBuf::from("/tmp/ref_mldsa87_manifest.json"));
        assert_eq!(set.roles().len(), 4);
    }

    #[test]
    fn test_context_free_set_has_no_context_path() {
        let set = ArtifactSet::new(Path::new("/tmp"), "qrypto", Scheme::Dilithium5);

        assert_eq!(set.public_key, PathBuf::from("/tmp/qrypto_dilithium5_pk.bin"));
        assert!(set.context.is_none());
        assert!(set.path(ArtifactRole::Context).is_none());
        assert_eq!(set.roles().len(), 3);
    }

    #[test]
    fn test_sides_and_schemes_are_disjoint() {
        let dir = Path::new("/tmp");
        let mut all = Vec::new();
        for label in ["ref", "qrypto"] {
            for scheme in Scheme::ALL {
                let set = ArtifactSet::new(dir, label, scheme);
                for role in set.roles() {
                    all.push(set.path(role).unwrap().to_path_buf());
                }
            }
        }
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_memory_store_short_read_and_missing() {
        let store = MemoryArtifactStore::new();
        let path = Path::new("/virtual/ref_dilithium5_msg.bin");

        let missing = store.read(ArtifactRole::Message, path, MESSAGE_CAPACITY);
        assert!(matches!(missing, Err(CrossVerifyError::ArtifactNotFound { .. })));

        store.write(path, b"hello").unwrap();
        let read = store.read(ArtifactRole::Message, path, MESSAGE_CAPACITY).unwrap();
        assert_eq!(read.bytes, b"hello");
        assert!(!read.is_oversized());

        let capped = store.read(ArtifactRole::Message, path, 3).unwrap();
        assert_eq!(capped.bytes, b"hel");
        assert_eq!(capped.file_len, 5);
        assert!(capped.is_oversized());
    }

    #[test]
    fn test_memory_store_delete_is_idempotent() {
        let store = MemoryArtifactStore::new();
        let path = Path::new("/virtual/ref_mldsa87_sig.bin");

        store.write(path, b"sig").unwrap();
        store.delete(path).unwrap();
        assert!(!store.exists(path));
        store.delete(path).unwrap();
    }
}
