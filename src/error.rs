use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageDecode(String),

    #[error("画像エンコードエラー: {0}")]
    ImageEncode(String),

    /// 通信自体の失敗（接続不可・タイムアウト）
    #[error("{0}")]
    ApiCall(String),

    /// 2xx以外のステータス
    #[error("API returned {status}: {body}")]
    ApiStatus { status: u16, body: String },

    /// レスポンスを読めない（そのまま画面のエラー文に入る）
    #[error("{0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, WizardError>;
