//! ギフトボックス演出のタイマー
//!
//! 選択時点を基準に1本のタスクで Closed → Opening → Revealed を進める。
//! 破棄（閉じる・別バンドル選択）でタスクも止まる。

use gift_wizard_common::reveal::{frame_at, OPENING_DELAY, REVEALED_DELAY};
use gift_wizard_common::RevealFrame;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

pub struct RevealTimer {
    frames: watch::Receiver<RevealFrame>,
    task: JoinHandle<()>,
}

impl RevealTimer {
    /// 演出開始（tokioランタイム内で呼ぶこと）
    pub fn start() -> Self {
        let (tx, rx) = watch::channel(RevealFrame::Closed);
        let started = Instant::now();

        let task = tokio::spawn(async move {
            for deadline in [OPENING_DELAY, REVEALED_DELAY] {
                sleep_until(started + deadline).await;
                if tx.is_closed() {
                    return;
                }
                // 遅れて起きた場合は途中のフレームを飛ばす
                let frame = frame_at(started.elapsed());
                tx.send_if_modified(|current| {
                    if *current == frame {
                        return false;
                    }
                    trace!(frame = frame.number(), "reveal frame");
                    *current = frame;
                    true
                });
            }
        });

        Self { frames: rx, task }
    }

    /// 次のフレームまで待つ。最後まで進んでいれば None
    pub async fn changed(&mut self) -> Option<RevealFrame> {
        self.frames.changed().await.ok()?;
        Some(*self.frames.borrow_and_update())
    }

    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for RevealTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
