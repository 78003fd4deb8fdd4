//! 後量子簽名交叉驗證
//!
//! 驗證被測庫與參考實現（pq-crystals）在 Dilithium5 / ML-DSA-87 上的互操作性。
//! 兩個實現互不鏈接，只通過文件系統交換二進制產物：
//!
//! ```text
//!  參考實現 ──SelfCheck──▶ ref_<scheme>_{pk,sig,msg,ctx}.bin ──▶ 被測庫驗證器
//!  被測庫   ──────────────▶ qrypto_<scheme>_{pk,sig,msg,ctx}.bin ──CrossVerifier──▶ PASSED/FAILED
//! ```
//!
//! # 示例用法
//!
//! ```no_run
//! use cross_verify::{CrossVerifier, CrossVerifyConfig, FsArtifactStore, Side};
//! use pqc_signer::{backend_for, Scheme};
//!
//! let config = CrossVerifyConfig::default();
//! let backend = backend_for(Scheme::MlDsa87);
//! let verdict = CrossVerifier::new(&FsArtifactStore, backend.as_ref(), &config)
//!     .run(Side::Library)?;
//! println!("{}", verdict);
//! # Ok::<(), cross_verify::CrossVerifyError>(())
//! ```

pub mod artifact;
pub mod config;
pub mod error;
pub mod manifest;
pub mod outcome;
pub mod self_check;
pub mod vectors;
pub mod verify;

// Re-export 常用類型
pub use artifact::{
    ArtifactBytes, ArtifactRole, ArtifactSet, ArtifactStore, FsArtifactStore, MemoryArtifactStore,
    Side,
};
pub use config::CrossVerifyConfig;
pub use error::{CrossVerifyError, Result};
pub use outcome::Outcome;
pub use self_check::{SelfCheck, SelfCheckReport};
pub use verify::{CrossVerifier, OversizedArtifact, VerificationVerdict};
