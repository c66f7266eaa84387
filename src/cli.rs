use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gift-wizard")]
#[command(about = "コーデ画像からギフトのバンドルを提案するウィザード", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対話式ウィザードを開始
    Run {
        /// 最初に取り込むコーデ画像（ファイル/フォルダ）
        images: Vec<PathBuf>,
    },

    /// 対話なしで1回だけ推薦を取得
    Submit {
        /// 贈る相手
        #[arg(short, long)]
        recipient: String,

        /// コーデ画像（ファイル/フォルダ、複数可）
        #[arg(short, long = "image", required = true)]
        images: Vec<PathBuf>,

        /// 年齢 (1-100)
        #[arg(short, long, default_value = "18")]
        age: u8,

        /// 性別 (M/F/Other/"Prefer not to say")
        #[arg(short, long)]
        gender: String,

        /// 月（名前・略称・1-12）
        #[arg(short, long)]
        month: String,

        /// 用途（Birthday など）
        #[arg(short, long)]
        occasion: String,

        /// 予算（"$75" など）
        #[arg(short, long)]
        budget: String,

        /// ギャラリーで選択する画像のインデックス（0始まり、選択順）
        #[arg(long = "select")]
        selected: Vec<usize>,

        /// レスポンスをJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 画像を送信用と同じ設定で圧縮して保存
    Compress {
        /// 入力画像（ファイル/フォルダ）
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// 出力フォルダ
        #[arg(short, long)]
        output: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 推薦サービスのURLを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// タイムアウト（秒）を設定
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submit() {
        let cli = Cli::try_parse_from([
            "gift-wizard",
            "submit",
            "-r",
            "Sam",
            "-i",
            "a.jpg",
            "--image",
            "looks/",
            "-g",
            "F",
            "-m",
            "June",
            "-o",
            "Birthday",
            "-b",
            "$75",
            "--select",
            "1",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Submit {
                recipient,
                images,
                age,
                selected,
                json,
                ..
            } => {
                assert_eq!(recipient, "Sam");
                assert_eq!(images.len(), 2);
                assert_eq!(age, 18);
                assert_eq!(selected, vec![1]);
                assert!(json);
            }
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn test_submit_requires_image() {
        let result = Cli::try_parse_from([
            "gift-wizard", "submit", "-r", "Sam", "-g", "F", "-m", "6", "-o", "x", "-b", "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_verbose() {
        let cli = Cli::try_parse_from(["gift-wizard", "run", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
