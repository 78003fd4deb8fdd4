//! 交叉驗證驅動
//!
//! 讀取另一實現寫出的產物，調用參考實現的驗證入口，給出 PASSED/FAILED 結論。
//!
//! ```text
//! Start ──load()──▶ ArtifactsLoaded ──verify()──▶ Verified{Pass|Fail} ──▶ Reported
//!   │
//!   └── 產物缺失/不可讀 ──▶ Err(ArtifactNotFound | ReadFailure)
//! ```
//!
//! 產物缺失是前置條件失敗（測試流程有問題），與「驗證不通過」（真實的互操作缺陷）
//! 通過不同的返回路徑區分。

use crate::artifact::{
    ArtifactBytes, ArtifactRole, ArtifactSet, ArtifactStore, Side, MESSAGE_CAPACITY,
};
use crate::config::CrossVerifyConfig;
use crate::error::{CrossVerifyError, Result};
use crate::manifest::Manifest;
use pqc_signer::{Scheme, Signature, SignatureScheme};
use std::fmt;
use tracing::{info, warn};

/// 超出讀取容量的產物文件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OversizedArtifact {
    pub role: ArtifactRole,
    pub file_len: usize,
    pub max_bytes: usize,
}

impl fmt::Display for OversizedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file is {} bytes, max {}",
            self.role, self.file_len, self.max_bytes
        )
    }
}

/// 已從存儲讀入的產物（ArtifactsLoaded 狀態）
///
/// 每個緩衝區的長度就是實際讀到的字節數；超出容量的文件記錄在 `oversized` 中。
#[derive(Debug, Clone)]
pub struct LoadedArtifacts {
    pub set: ArtifactSet,
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
    pub message: Vec<u8>,
    /// 僅上下文方案
    pub context: Option<Vec<u8>>,
    pub manifest: Option<Manifest>,
    pub oversized: Vec<OversizedArtifact>,
}

impl LoadedArtifacts {
    fn oversized(&self, role: ArtifactRole) -> Option<&OversizedArtifact> {
        self.oversized.iter().find(|o| o.role == role)
    }

    /// 簽名文件的實際字節數
    pub fn signature_file_len(&self) -> usize {
        self.oversized(ArtifactRole::Signature)
            .map_or(self.signature.len(), |o| o.file_len)
    }
}

/// 驗證結論
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationVerdict {
    pub scheme: Scheme,
    pub side: Side,
    pub passed: bool,
    pub public_key_len: usize,
    pub signature_len: usize,
    pub message_len: usize,
    pub context_len: Option<usize>,
    /// 輔助排查的說明
    pub diagnostics: Vec<String>,
}

impl fmt::Display for VerificationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} Verification ({} artifacts) ===", self.scheme, self.side)?;
        writeln!(f, "PK size:  {} bytes", self.public_key_len)?;
        writeln!(f, "Sig size: {} bytes", self.signature_len)?;
        writeln!(f, "Msg size: {} bytes", self.message_len)?;
        if let Some(ctx_len) = self.context_len {
            writeln!(f, "Ctx size: {} bytes", ctx_len)?;
        }
        for note in &self.diagnostics {
            writeln!(f, "Note: {}", note)?;
        }
        writeln!(f)?;
        if self.passed {
            write!(f, "✓ Signature verification PASSED")
        } else {
            write!(f, "✗ Signature verification FAILED")
        }
    }
}

/// 交叉驗證驅動
pub struct CrossVerifier<'a> {
    store: &'a dyn ArtifactStore,
    backend: &'a dyn SignatureScheme,
    config: &'a CrossVerifyConfig,
}

impl<'a> CrossVerifier<'a> {
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

    /// 讀取並驗證 `side` 寫出的產物
    pub fn run(&self, side: Side) -> Result<VerificationVerdict> {
        let loaded = self.load(side)?;
        let verdict = self.verify(side, &loaded)?;

        if verdict.passed {
            info!("{} cross-verification PASSED ({} artifacts)", verdict.scheme, side);
        } else {
            warn!("{} cross-verification FAILED ({} artifacts)", verdict.scheme, side);
        }

        Ok(verdict)
    }

    /// Start → ArtifactsLoaded
    pub fn load(&self, side: Side) -> Result<LoadedArtifacts> {
        let scheme = self.backend.scheme();
        let params = scheme.parameters();
        let set = self.config.artifact_set(side, scheme);

        info!("Loading {} artifacts from {:?} side", scheme, set.side_label);

        let public_key = self.store.read(
            ArtifactRole::PublicKey,
            &set.public_key,
            params.public_key_bytes,
        )?;
        if public_key.file_len != params.public_key_bytes {
            return Err(CrossVerifyError::ReadFailure {
                role: ArtifactRole::PublicKey,
                path: set.public_key.clone(),
                reason: format!(
                    "expected {} bytes, got {}",
                    params.public_key_bytes, public_key.file_len
                ),
            });
        }

        let mut oversized = Vec::new();
        let mut record = |role: ArtifactRole, read: ArtifactBytes, max_bytes: usize| {
            if read.is_oversized() {
                oversized.push(OversizedArtifact {
                    role,
                    file_len: read.file_len,
                    max_bytes,
                });
            }
            read.into_bytes()
        };

        let signature = record(
            ArtifactRole::Signature,
            self.store.read(
                ArtifactRole::Signature,
                &set.signature,
                params.max_signature_bytes,
            )?,
            params.max_signature_bytes,
        );
        let message = record(
            ArtifactRole::Message,
            self.store
                .read(ArtifactRole::Message, &set.message, MESSAGE_CAPACITY)?,
            MESSAGE_CAPACITY,
        );

        let context = match &set.context {
            Some(path) => Some(record(
                ArtifactRole::Context,
                self.store.read(ArtifactRole::Context, path, MESSAGE_CAPACITY)?,
                MESSAGE_CAPACITY,
            )),
            None => None,
        };

        let manifest = Manifest::load(self.store, &set)?;

        Ok(LoadedArtifacts {
            public_key: public_key.into_bytes(),
            set,
            signature,
            message,
            context,
            manifest,
            oversized,
        })
    }

    /// ArtifactsLoaded → Verified{Pass|Fail}
    pub fn verify(&self, side: Side, loaded: &LoadedArtifacts) -> Result<VerificationVerdict> {
        let scheme = self.backend.scheme();
        let mut diagnostics = Vec::new();
        let mut length_ok = true;

        // 超出容量的文件只讀入了前 max 字節，不代表生成端的真實輸出
        for oversized in &loaded.oversized {
            let note = oversized.to_string();
            warn!("{}", note);
            diagnostics.push(note);
            length_ok = false;
        }

        if let Some(manifest) = &loaded.manifest {
            let mut checks: Vec<(ArtifactRole, &[u8])> = vec![
                (ArtifactRole::PublicKey, loaded.public_key.as_slice()),
                (ArtifactRole::Signature, loaded.signature.as_slice()),
                (ArtifactRole::Message, loaded.message.as_slice()),
            ];
            if let Some(ctx) = &loaded.context {
                checks.push((ArtifactRole::Context, ctx.as_slice()));
            }

            for (role, bytes) in checks {
                if let Some(note) = manifest.check(role, bytes) {
                    let recorded_len = manifest.entry(role).map(|e| e.len);
                    if role == ArtifactRole::Signature && recorded_len != Some(bytes.len()) {
                        length_ok = false;
                    }
                    warn!("{}", note);
                    diagnostics.push(note);
                }
            }
        }

        let passed = match Signature::new(scheme, loaded.signature.clone()) {
            Ok(signature) if length_ok => self.backend.verify(
                &signature,
                &loaded.message,
                loaded.context.as_deref(),
                &loaded.public_key,
            )?,
            Ok(_) => false,
            Err(e) => {
                diagnostics.push(e.to_string());
                false
            }
        };

        Ok(VerificationVerdict {
            scheme,
            side,
            passed,
            public_key_len: loaded.public_key.len(),
            signature_len: loaded.signature_file_len(),
            message_len: loaded.message.len(),
            context_len: loaded.context.as_ref().map(Vec::len),
            diagnostics,
        })
    }
}
