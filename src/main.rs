use clap::Parser;
use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};
use ollama_nodes::{cli, config, error, nodes, ollama, scanner, store};
use ollama_nodes_common::{
    is_structured, parse_single_line, shorten, FieldSet, ShortMap, DEFAULT_KEYWORD_PROMPT,
};
use cli::{Cli, Commands, ConnectionArgs};
use config::{normalize_host, Config};
use error::{NodeError, Result};
use nodes::{
    CharacterNode, Connection, ImageSaveOptions, ImageSaverNode, LlmNode, NodeOutput, RestoreNode,
};
use std::path::{Path, PathBuf};
use store::{PromptStore, TEXT_STORE_FILE_NAME};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;
    let json = cli.json;

    match cli.command {
        Commands::Generate { prompt, connection } => {
            let conn = build_connection(&connection, &config);
            if !json {
                println!("🤖 ollama-nodes - テキスト生成 ({})\n", conn.model);
            }

            let output = LlmNode.generate_text(&prompt, &conn).await;
            print_output(&output, json)?;
        }

        Commands::Character {
            theme,
            connection,
            store,
            no_save,
        } => {
            let conn = build_connection(&connection, &config);
            if !json {
                println!("🎭 ollama-nodes - キャラクタープロンプト生成 ({})\n", conn.model);
                println!("テーマ: {}\n", theme);
            }

            let store_dir = store.unwrap_or_else(|| config.store_dir.clone());
            let mut node = CharacterNode::new(FieldSet::standard());
            if !no_save {
                node = node.with_store(PromptStore::new(&store_dir));
            }

            let result = node.generate_character_prompt(&theme, &conn).await?;
            print_output(&result.output, json)?;

            if !json && !no_save && !result.fields.is_empty() {
                println!("\n✔ 保存: {}", store_dir.display());
            }
        }

        Commands::Models { url, vision } => {
            let url = url.map(|u| normalize_host(&u)).unwrap_or_else(|| config.url.clone());
            let names = ollama::fetch_model_names(&url, vision).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                println!("モデル一覧 ({}):", url);
                for (i, name) in names.iter().enumerate() {
                    println!("  {}) {}", i + 1, name);
                }
            }
        }

        Commands::Restore { file, label, index } => {
            let path = file.unwrap_or_else(|| default_store_file(&config));
            let node = RestoreNode::default();

            let output = if let Some(label) = label {
                node.restore(&path, &label)?
            } else if let Some(n) = index {
                let index = n
                    .checked_sub(1)
                    .ok_or_else(|| NodeError::EntryNotFound(format!("#{}", n)))?;
                node.restore_index(&path, index)?
            } else {
                let labels = node.labels(&path)?;
                if labels.is_empty() {
                    return Err(NodeError::EntryNotFound(path.display().to_string()));
                }
                let selected = Select::new()
                    .with_prompt("復元するプロンプトを選択")
                    .items(&labels)
                    .default(0)
                    .interact()
                    .map_err(|e| NodeError::Interactive(e.to_string()))?;
                node.restore_index(&path, selected)?
            };

            print_output(&output, json)?;
        }

        Commands::Label { file, text } => {
            if let Some(text) = text {
                let label = if is_structured(&text, &FieldSet::standard()) {
                    shorten(&text, &ShortMap::default())
                } else {
                    parse_single_line(&text)
                };
                println!("{}", label);
                return Ok(());
            }

            let path = file.unwrap_or_else(|| default_store_file(&config));
            let labels = RestoreNode::default().labels(&path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&labels)?);
            } else {
                for (i, label) in labels.iter().enumerate() {
                    println!("  {}) {}", i + 1, label);
                }
            }
        }

        Commands::SaveImages {
            input,
            output,
            prefix,
            prompt,
            no_dimensions,
            connection,
        } => {
            let mut conn = build_connection(&connection, &config);
            if connection.model.is_none() {
                // 未指定ならビジョンモデルの先頭を使う
                let vision = ollama::fetch_model_names(&conn.url, true).await;
                if let Some(model) = vision.into_iter().next() {
                    conn.model = model;
                }
            }

            if !json {
                println!("🖼 ollama-nodes - 画像保存 ({})\n", conn.model);
            }

            let paths = scanner::collect_images(&input)?;
            let options = ImageSaveOptions {
                folder_path: output.unwrap_or_else(|| config.output_dir.clone()),
                prompt: prompt.unwrap_or_else(|| DEFAULT_KEYWORD_PROMPT.to_string()),
                filename_prefix: prefix,
                include_dimensions: !no_dimensions,
            };

            let saved = save_images(&paths, &options, &conn, json).await?;
            let text = saved
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join("\n");
            print_output(&NodeOutput::text(text), json)?;

            if !json {
                println!("\n✅ {}枚を保存: {}", saved.len(), options.folder_path.display());
            }
        }

        Commands::Nodes => {
            let registry = nodes::registry();
            if json {
                println!("{}", serde_json::to_string_pretty(&registry)?);
            } else {
                for node in registry {
                    println!(
                        "  {:<24} {}  [{}]",
                        node.class_name, node.display_name, node.category
                    );
                }
            }
        }

        Commands::Config {
            set_url,
            set_model,
            show,
        } => {
            let mut config = config;
            let edited = set_url.is_some() || set_model.is_some();

            if let Some(url) = set_url {
                config.set_url(url)?;
                println!("✔ URLを設定しました: {}", config.url);
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ 既定モデルを設定しました: {}", config.model);
            }

            if show || !edited {
                println!("設定 ({}):", Config::config_path()?.display());
                println!("  URL: {}", config.url);
                println!("  モデル: {}", config.model);
                println!("  keep_alive: {}分", config.keep_alive);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  保存先: {}", config.store_dir.display());
                println!("  画像保存先: {}", config.output_dir.display());
            }
        }
    }

    Ok(())
}

/// RUST_LOG が優先、なければ --verbose で debug
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 設定値にCLI引数を上書き
fn build_connection(args: &ConnectionArgs, config: &Config) -> Connection {
    let mut conn = Connection::from_config(config);
    if let Some(model) = &args.model {
        conn.model = model.clone();
    }
    if let Some(url) = &args.url {
        conn.url = normalize_host(url);
    }
    if let Some(keep_alive) = args.keep_alive {
        conn.keep_alive = keep_alive;
    }
    conn.seed = args.seed;
    conn
}

fn default_store_file(config: &Config) -> PathBuf {
    config.store_dir.join(TEXT_STORE_FILE_NAME)
}

fn print_output(output: &NodeOutput, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
    } else {
        println!("{}", output.value());
    }
    Ok(())
}

async fn save_images(
    paths: &[PathBuf],
    options: &ImageSaveOptions,
    conn: &Connection,
    json: bool,
) -> Result<Vec<PathBuf>> {
    let pb = if json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(paths.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut saved = Vec::with_capacity(paths.len());
    for path in paths {
        pb.set_message(file_label(path));
        let image = image::open(path)?;
        let result = ImageSaverNode.save_image(&image, options, conn).await?;
        pb.println(format!("✔ {} → {}", file_label(path), result.path.display()));
        saved.push(result.path);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(saved)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
