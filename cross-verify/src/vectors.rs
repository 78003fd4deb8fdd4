//! 參考端簽名使用的固定測試向量

use pqc_signer::Scheme;

/// 綁定到每個 ML-DSA-87 簽名的上下文字符串
pub const CONTEXT: &[u8] = b"ZOND";

/// 單個方案的消息與（可選）上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestVector {
    pub message: &'static [u8],
    pub context: Option<&'static [u8]>,
}

/// 取得 `scheme` 的測試向量；僅當方案使用上下文時 `context` 為 `Some`
pub const fn test_vector(scheme: Scheme) -> TestVector {
    match scheme {
        Scheme::Dilithium5 => TestVector {
            message: b"Cross-verification test message from pq-crystals Dilithium5",
            context: None,
        },
        Scheme::MlDsa87 => TestVector {
            message: b"Cross-verification test message from pq-crystals ML-DSA-87",
            context: Some(CONTEXT),
        },
    }
}
