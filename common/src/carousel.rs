//! バンドルカルーセル

use serde::{Deserialize, Serialize};

/// 表示中のバンドル位置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carousel {
    index: usize,
    len: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 前後ボタンは2件以上のときだけ有効
    pub fn navigation_enabled(&self) -> bool {
        self.len > 1
    }

    /// 末尾の次は先頭
    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    /// 先頭の前は末尾
    pub fn prev(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    /// ドット選択で直接移動（範囲外は無視）
    pub fn jump(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }

    /// "Bundle 2 of 3"
    pub fn header(&self) -> String {
        format!("Bundle {} of {}", self.index + 1, self.len)
    }
}
