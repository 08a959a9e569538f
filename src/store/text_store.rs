//! all.txt（空行区切りチャンク）の追記・読み込み

use super::PromptRecord;
use crate::error::Result;
use ollama_nodes_common::{
    parse_saved_entries, render_chunk, split_chunks, FieldSet, SavedEntry, ShortMap,
};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub const TEXT_STORE_FILE_NAME: &str = "all.txt";

#[derive(Debug, Clone)]
pub struct TextStore {
    path: PathBuf,
}

impl TextStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// チャンクを末尾に追記（前のチャンクとは空行で区切る）
    pub fn append(&self, record: &PromptRecord, fields: &FieldSet) -> Result<()> {
        let chunk = render_chunk(&record.theme, &record.fields, fields);
        if chunk.is_empty() {
            return Ok(());
        }

        let separator = self.separator()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write!(file, "{}{}\n\n", separator, chunk)?;
        Ok(())
    }

    /// 末尾2バイトから、次のチャンクの前に必要な改行を決める
    fn separator(&self) -> Result<&'static str> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(""),
            Err(e) => return Err(e.into()),
        };

        let len = file.metadata()?.len();
        if len == 0 {
            return Ok("");
        }
        let tail_len = len.min(2);
        file.seek(SeekFrom::End(-(tail_len as i64)))?;
        let mut buf = [0u8; 2];
        let tail = &mut buf[..tail_len as usize];
        file.read_exact(tail)?;

        Ok(match &*tail {
            [b'\n', b'\n'] => "",
            [.., b'\n'] => "\n",
            _ => "\n\n",
        })
    }

    /// 生テキスト（ファイルがなければ空文字）
    pub fn read_text(&self) -> Result<String> {
        if !self.path.exists() {
            return Ok(String::new());
        }
        Ok(std::fs::read_to_string(&self.path)?)
    }

    /// 空行区切りのチャンク一覧
    pub fn read_chunks(&self) -> Result<Vec<String>> {
        Ok(split_chunks(&self.read_text()?))
    }

    /// ラベル付きエントリ一覧
    pub fn read_entries(&self, fields: &FieldSet, short_map: &ShortMap) -> Result<Vec<SavedEntry>> {
        let text = self.read_text()?;
        Ok(parse_saved_entries(&text, fields, short_map))
    }
}
