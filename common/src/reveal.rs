//! ギフトボックス演出のスケジュール
//!
//! バンドル選択時点を基準に:
//! - 0ms: Closed（箱が閉じている）
//! - 1000ms: Opening（箱が開く）
//! - 2500ms: Revealed（中身のカードが出る）
//!
//! どちらの遅延も選択時点から数える（Opening からではない）。

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Opening に切り替わるまで
pub const OPENING_DELAY: Duration = Duration::from_millis(1000);
/// Revealed に切り替わるまで
pub const REVEALED_DELAY: Duration = Duration::from_millis(2500);

/// ローディング中の歩きアニメーションの間隔
pub const WALK_FRAME_INTERVAL: Duration = Duration::from_millis(300);
pub const WALK_FRAME_COUNT: u8 = 3;

/// 演出のフレーム（前進のみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RevealFrame {
    Closed = 1,
    Opening = 2,
    Revealed = 3,
}

impl RevealFrame {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn caption(&self) -> &'static str {
        match self {
            RevealFrame::Closed => "Preparing your perfect gift bundle...",
            RevealFrame::Opening => "Opening your gift bundle...",
            RevealFrame::Revealed => "🎉 Your Perfect Gift Bundle!",
        }
    }
}

/// 選択からの経過時間で表示すべきフレーム
pub fn frame_at(elapsed: Duration) -> RevealFrame {
    if elapsed >= REVEALED_DELAY {
        RevealFrame::Revealed
    } else if elapsed >= OPENING_DELAY {
        RevealFrame::Opening
    } else {
        RevealFrame::Closed
    }
}

/// 歩きアニメーション: 1 → 2 → 3 → 1
pub fn walk_frame_after(frame: u8) -> u8 {
    (frame % WALK_FRAME_COUNT) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_schedule() {
        assert_eq!(frame_at(Duration::ZERO), RevealFrame::Closed);
        assert_eq!(frame_at(Duration::from_millis(999)), RevealFrame::Closed);
        assert_eq!(frame_at(Duration::from_millis(1000)), RevealFrame::Opening);
        assert_eq!(frame_at(Duration::from_millis(2499)), RevealFrame::Opening);
        assert_eq!(frame_at(Duration::from_millis(2500)), RevealFrame::Revealed);
        assert_eq!(frame_at(Duration::from_secs(60)), RevealFrame::Revealed);
    }

    #[test]
    fn test_frame_numbers() {
        assert_eq!(RevealFrame::Closed.number(), 1);
        assert_eq!(RevealFrame::Opening.number(), 2);
        assert_eq!(RevealFrame::Revealed.number(), 3);
        assert!(RevealFrame::Closed < RevealFrame::Revealed);
    }

    #[test]
    fn test_walk_cycle() {
        assert_eq!(walk_frame_after(1), 2);
        assert_eq!(walk_frame_after(2), 3);
        assert_eq!(walk_frame_after(3), 1);
    }
}
