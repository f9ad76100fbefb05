//! fitcreate - バーチャル試着・スタイリングツール
//!
//! 写真からモデル画像を作り、衣服の試着・参照コーデ転写・ポーズ変更・
//! Pro向けレタッチを生成AIで重ねていく。

pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod media;
pub mod store;
pub mod studio;
