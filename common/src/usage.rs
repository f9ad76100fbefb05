//! 無料枠の利用制限
//!
//! - Pro は常に利用可
//! - 無料ユーザーは1日 FREE_DAILY_LIMIT 回まで
//! - 判定（check_and_consume）と消費（record_success）は分離されており、
//!   生成に失敗した場合は枠を消費しない

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 無料ユーザーの1日あたりの生成回数
pub const FREE_DAILY_LIMIT: u32 = 1;

/// 永続化される利用状況
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStatus {
    #[serde(default)]
    pub is_pro: bool,
    #[serde(default)]
    pub free_uses_today: u32,
    #[serde(alias = "lastUsedDate")]
    pub last_reset_date: String,
}

impl UsageStatus {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            is_pro: false,
            free_uses_today: 0,
            last_reset_date: today.to_string(),
        }
    }

    /// 日付が変わっていればカウンタをリセット（読み込み時に評価）
    pub fn rolled_over(self, today: NaiveDate) -> Self {
        let today = today.to_string();
        if self.last_reset_date == today {
            return self;
        }
        Self {
            free_uses_today: 0,
            last_reset_date: today,
            ..self
        }
    }
}

/// 利用ゲート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageGate {
    status: UsageStatus,
}

impl UsageGate {
    pub fn new(status: UsageStatus) -> Self {
        Self { status }
    }

    pub fn status(&self) -> &UsageStatus {
        &self.status
    }

    pub fn is_pro(&self) -> bool {
        self.status.is_pro
    }

    /// 生成を開始してよいか。状態は変更しない
    pub fn check_and_consume(&self) -> bool {
        if self.status.is_pro {
            return true;
        }
        self.status.free_uses_today < FREE_DAILY_LIMIT
    }

    /// 生成成功後に呼ぶ。Pro はカウントしない
    ///
    /// 変更があれば true
    pub fn record_success(&mut self) -> bool {
        if self.status.is_pro {
            return false;
        }
        self.status.free_uses_today += 1;
        true
    }

    /// サブスクリプション登録
    pub fn upgrade(&mut self) -> bool {
        if self.status.is_pro {
            return false;
        }
        self.status.is_pro = true;
        true
    }

    /// 残り回数（Pro は None = 無制限）
    pub fn remaining_today(&self) -> Option<u32> {
        if self.status.is_pro {
            return None;
        }
        Some(FREE_DAILY_LIMIT.saturating_sub(self.status.free_uses_today))
    }
}
