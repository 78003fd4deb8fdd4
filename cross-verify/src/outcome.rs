//! 進程退出碼映射
//!
//! 默認只有 0（成功）和 1（任何失敗）。開啟 `distinct_exit_codes` 後，
//! 前置條件失敗返回 2，配置錯誤返回 3，其餘失敗仍為 1。

use crate::error::CrossVerifyError;

/// 一次運行的最終結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 自驗證通過或交叉驗證通過
    Passed,
    /// 交叉驗證不通過、自驗證失敗或寫入失敗
    Failed,
    /// 產物缺失或不可讀，無法嘗試驗證
    Precondition,
    /// 配置錯誤
    Configuration,
}

impl Outcome {
    pub fn from_verdict(passed: bool) -> Self {
        if passed {
            Outcome::Passed
        } else {
            Outcome::Failed
        }
    }

    pub fn from_error(err: &CrossVerifyError) -> Self {
        if err.is_precondition() {
            Outcome::Precondition
        } else if err.is_configuration() {
            Outcome::Configuration
        } else {
            Outcome::Failed
        }
    }

    pub fn exit_code(self, distinct: bool) -> i32 {
        match (self, distinct) {
            (Outcome::Passed, _) => 0,
            (Outcome::Failed, _) => 1,
            (_, false) => 1,
            (Outcome::Precondition, true) => 2,
            (Outcome::Configuration, true) => 3,
        }
    }
}
