//! 自驗證簽名驅動
//!
//! 流程：生成密鑰對 → 簽名測試消息 → 立即自驗證 → 寫出產物
//!
//! 自驗證失敗說明參考實現本身有缺陷，此時不寫出任何產物（下游會被誤導），
//! 直接返回 `SelfVerificationFailed`，不重試。

use crate::artifact::{ArtifactRole, ArtifactSet, ArtifactStore, Side};
use crate::config::CrossVerifyConfig;
use crate::error::{CrossVerifyError, Result};
use crate::manifest::Manifest;
use crate::vectors::test_vector;
use pqc_signer::{Scheme, SignatureScheme};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// 調試日誌中打印的前綴字節數
const PREVIEW_BYTES: usize = 32;

/// 自驗證通過後的結果
#[derive(Debug, Clone)]
pub struct SelfCheckReport {
    pub scheme: Scheme,
    pub artifacts: ArtifactSet,
    pub public_key_len: usize,
    pub secret_key_len: usize,
    pub signature_len: usize,
    pub message_len: usize,
    pub context_len: Option<usize>,
}

impl fmt::Display for SelfCheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} Signature Generation ===", self.scheme)?;
        writeln!(f, "PK size:  {} bytes", self.public_key_len)?;
        writeln!(f, "SK size:  {} bytes", self.secret_key_len)?;
        writeln!(f, "Sig size: {} bytes", self.signature_len)?;
        writeln!(f, "Msg size: {} bytes", self.message_len)?;
        if let Some(ctx_len) = self.context_len {
            writeln!(f, "Ctx size: {} bytes", ctx_len)?;
        }
        writeln!(f, "Self-verify: PASSED")?;
        writeln!(f)?;
        writeln!(f, "Output files written:")?;
        for role in self.artifacts.roles() {
            if let Some(path) = self.artifacts.path(role) {
                writeln!(f, "  {}", path.display())?;
            }
        }
        Ok(())
    }
}

/// 自驗證簽名驅動
pub struct SelfCheck<'a> {
    store: &'a dyn ArtifactStore,
    backend: &'a dyn SignatureScheme,
    config: &'a CrossVerifyConfig,
}

impl<'a> SelfCheck<'a> {
    pub fn new(
        store: &'a dyn ArtifactStore,
        backend: &'a dyn SignatureScheme,
        config: &'a CrossVerifyConfig,
    ) -> Self {
        Self {
            store,
            backend,
            config,
        }
    }

    /// 對後端所屬方案執行一次自驗證並寫出參考端產物
    pub fn run(&self) -> Result<SelfCheckReport> {
        let scheme = self.backend.scheme();
        let params = scheme.parameters();
        let vector = test_vector(scheme);
        let set = self.config.artifact_set(Side::Reference, scheme);

        info!("Generating {} signature for cross-verification", scheme);

        // 步驟 1: 生成密鑰對
        let keypair = self.backend.generate_keypair()?;

        // 步驟 2: 簽名（上下文是否傳入由方案決定）
        let signature = self.backend.sign(vector.message, vector.context, &keypair)?;

        if signature.len() > params.max_signature_bytes {
            return Err(CrossVerifyError::Pqc(pqc_signer::PqcError::InvalidLength(
                format!(
                    "{} produced a {} byte signature (max {})",
                    scheme,
                    signature.len(),
                    params.max_signature_bytes
                ),
            )));
        }

        // 步驟 3: 自驗證
        let verified = self.backend.verify(
            &signature,
            vector.message,
            vector.context,
            keypair.public_key(),
        )?;

        if !verified {
            tracing::error!("{} self-verification failed, no artifacts written", scheme);
            return Err(CrossVerifyError::SelfVerificationFailed(scheme.name()));
        }

        info!(
            "Self-verify passed: pk={} bytes, sig={} bytes",
            keypair.public_key().len(),
            signature.len()
        );
        debug!(
            "Public key (first {} bytes): {}",
            PREVIEW_BYTES,
            preview(keypair.public_key())
        );
        debug!(
            "Signature (first {} bytes): {}",
            PREVIEW_BYTES,
            preview(signature.as_bytes())
        );

        // 步驟 4: 寫出產物（清單最後寫，存在清單即代表整組完整）
        let mut contents: Vec<(ArtifactRole, &[u8])> = vec![
            (ArtifactRole::PublicKey, keypair.public_key()),
            (ArtifactRole::Signature, signature.as_bytes()),
            (ArtifactRole::Message, vector.message),
        ];
        if let Some(ctx) = vector.context {
            contents.push((ArtifactRole::Context, ctx));
        }

        let mut writes: Vec<(&Path, Vec<u8>)> = contents
            .iter()
            .filter_map(|(role, bytes)| Some((set.path(*role)?, bytes.to_vec())))
            .collect();
        if self.config.write_hex_dumps {
            writes.push((
                set.public_key_hex.as_path(),
                hex::encode(keypair.public_key()).into_bytes(),
            ));
            writes.push((
                set.signature_hex.as_path(),
                hex::encode(signature.as_bytes()).into_bytes(),
            ));
        }
        writes.push((
            set.manifest.as_path(),
            Manifest::build(&set, &contents).to_json()?,
        ));

        self.persist(&set, &writes)?;

        info!("{} artifacts written with prefix {:?}", scheme, set.side_label);

        Ok(SelfCheckReport {
            scheme,
            public_key_len: keypair.public_key().len(),
            secret_key_len: keypair.secret_key().len(),
            signature_len: signature.len(),
            message_len: vector.message.len(),
            context_len: vector.context.map(<[u8]>::len),
            artifacts: set,
        })
    }
}

impl SelfCheck<'_> {
    /// 替換整組產物
    ///
    /// 先清除上一輪留下的文件，寫入中途失敗時再清除一次，
    /// 驗證端不會讀到新舊混合的一組產物。
    fn persist(&self, set: &ArtifactSet, writes: &[(&Path, Vec<u8>)]) -> Result<()> {
        self.clear(set)?;

        for (path, bytes) in writes {
            if let Err(e) = self.store.write(path, bytes) {
                warn!("Write to {:?} failed, removing partial {} artifacts", path, set.scheme);
                if let Err(cleanup) = self.clear(set) {
                    warn!("Cleanup after failed write also failed: {}", cleanup);
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// 刪除一組產物的全部文件；逐個嘗試，返回第一個錯誤
    fn clear(&self, set: &ArtifactSet) -> Result<()> {
        let mut paths: Vec<&Path> = vec![set.manifest.as_path()];
        paths.extend(set.roles().into_iter().filter_map(|role| set.path(role)));
        paths.push(set.public_key_hex.as_path());
        paths.push(set.signature_hex.as_path());

        let mut first_error = None;
        for path in paths {
            if let Err(e) = self.store.delete(path) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn preview(bytes: &[u8]) -> String {
    hex::encode(&bytes[..bytes.len().min(PREVIEW_BYTES)])
}
