use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ollama-nodes")]
#[command(about = "ローカルLLM(Ollama)によるプロンプト生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// ノード出力をJSONで表示
    #[arg(long, global = true)]
    pub json: bool,
}

/// 接続系オプション（省略時は設定ファイルの値）
#[derive(Args, Clone, Debug, Default)]
pub struct ConnectionArgs {
    /// モデル名
    #[arg(short, long)]
    pub model: Option<String>,

    /// OllamaのURL
    #[arg(short, long)]
    pub url: Option<String>,

    /// 生成後にモデルを保持する時間（分, 0〜240）
    #[arg(short, long)]
    pub keep_alive: Option<u32>,

    /// シード値
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// プロンプトをそのまま送信してテキスト生成
    Generate {
        /// プロンプト
        #[arg(required = true)]
        prompt: String,

        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// テーマから構造化キャラクタープロンプトを生成
    Character {
        /// テーマ
        #[arg(required = true)]
        theme: String,

        #[command(flatten)]
        connection: ConnectionArgs,

        /// 保存先ディレクトリ（デフォルト: 設定のstore_dir）
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// 保存しない
        #[arg(long)]
        no_save: bool,
    },

    /// インストール済みモデルを一覧表示
    Models {
        /// OllamaのURL
        #[arg(short, long)]
        url: Option<String>,

        /// ビジョンモデルのみ
        #[arg(long)]
        vision: bool,
    },

    /// 保存済みプロンプトを復元
    Restore {
        /// プロンプトファイル（デフォルト: store_dir/all.txt）
        file: Option<PathBuf>,

        /// 復元するラベル（省略時は対話選択）
        #[arg(short, long)]
        label: Option<String>,

        /// 復元する番号（1始まり）
        #[arg(short = 'n', long, conflicts_with = "label")]
        index: Option<usize>,
    },

    /// ラベルを表示
    Label {
        /// プロンプトファイル（デフォルト: store_dir/all.txt）
        file: Option<PathBuf>,

        /// ファイルの代わりに指定テキストのラベルを表示
        #[arg(short, long)]
        text: Option<String>,
    },

    /// 画像をキーワード付きのファイル名で保存
    SaveImages {
        /// 画像ファイルまたはフォルダ
        #[arg(required = true)]
        input: PathBuf,

        /// 保存先フォルダ（デフォルト: 設定のoutput_dir）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ファイル名の先頭に付ける文字列
        #[arg(short, long, default_value = "")]
        prefix: String,

        /// ビジョンモデルへの指示（省略時は既定の指示）
        #[arg(long)]
        prompt: Option<String>,

        /// ファイル名に画像サイズを含めない
        #[arg(long)]
        no_dimensions: bool,

        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// 提供ノードを一覧表示
    Nodes,

    /// 設定を表示/編集
    Config {
        /// OllamaのURLを設定
        #[arg(long)]
        set_url: Option<String>,

        /// 既定モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_character() {
        let cli = Cli::parse_from([
            "ollama-nodes",
            "character",
            "neon city",
            "--model",
            "llama3",
            "--seed",
            "42",
            "--no-save",
        ]);
        match cli.command {
            Commands::Character {
                theme,
                connection,
                no_save,
                ..
            } => {
                assert_eq!(theme, "neon city");
                assert_eq!(connection.model.as_deref(), Some("llama3"));
                assert_eq!(connection.seed, Some(42));
                assert!(no_save);
            }
            _ => panic!("characterコマンドとして解析されるべき"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["ollama-nodes", "nodes", "--json", "-v"]);
        assert!(cli.json);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Nodes));
    }

    #[test]
    fn test_restore_label_and_index_conflict() {
        let result = Cli::try_parse_from(["ollama-nodes", "restore", "-l", "a", "-n", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_images_defaults() {
        let cli = Cli::parse_from(["ollama-nodes", "save-images", "renders"]);
        match cli.command {
            Commands::SaveImages {
                input,
                prefix,
                no_dimensions,
                ..
            } => {
                assert_eq!(input, PathBuf::from("renders"));
                assert_eq!(prefix, "");
                assert!(!no_dimensions);
            }
            _ => panic!("save-imagesコマンドとして解析されるべき"),
        }
    }
}
