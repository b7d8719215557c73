use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, DataType, Reader};
use tokio::fs;

use crate::error::FileError;

/// 从单词表文件加载单词
///
/// 取第一列，跳过表头和空单元格。`.xlsx`/`.xls`/`.ods` 读第一个工作表，
/// `.tsv` 按制表符分隔，其余按 CSV 处理。
pub async fn load_word_list(path: &Path) -> Result<Vec<String>, FileError> {
    let words = match extension(path).as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => load_spreadsheet(path.to_path_buf()).await?,
        ext => {
            let content = fs::read_to_string(path)
                .await
                .map_err(|e| FileError::read_failed(path.display().to_string(), e))?;
            let delimiter = if ext == "tsv" { b'\t' } else { b',' };
            parse_delimited(&content, delimiter)
                .map_err(|e| FileError::word_list_invalid(path.display().to_string(), e))?
        }
    };

    tracing::info!("✓ 从 {} 读取 {} 个单词", path.display(), words.len());
    Ok(words)
}

/// 解析 CSV 文本
pub fn parse_word_list(content: &str) -> Result<Vec<String>, csv::Error> {
    parse_delimited(content, b',')
}

/// 按给定分隔符解析单词表文本
pub fn parse_delimited(content: &str, delimiter: u8) -> Result<Vec<String>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.trim_start_matches('\u{feff}').as_bytes());

    let mut words = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(word) = record.get(0).map(str::trim).filter(|w| !w.is_empty()) {
            words.push(word.to_string());
        }
    }
    Ok(words)
}

/// 读取工作簿第一个工作表的第一列
async fn load_spreadsheet(path: PathBuf) -> Result<Vec<String>, FileError> {
    let display = path.display().to_string();
    let result = tokio::task::spawn_blocking(move || -> Result<Vec<String>, String> {
        let mut workbook = open_workbook_auto(&path).map_err(|e| e.to_string())?;
        match workbook.worksheet_range_at(0) {
            Some(Ok(range)) => Ok(first_column(range.rows())),
            Some(Err(e)) => Err(e.to_string()),
            None => Ok(Vec::new()),
        }
    })
    .await;

    match result {
        Ok(words) => words.map_err(|e| FileError::word_list_invalid(display, e)),
        Err(join_err) => Err(FileError::word_list_invalid(display, join_err)),
    }
}

/// 取每行第一个单元格，跳过表头和空单元格
fn first_column<'a>(rows: impl Iterator<Item = &'a [DataType]>) -> Vec<String> {
    rows.skip(1)
        .filter_map(|row| row.first())
        .map(cell_text)
        .filter(|w| !w.is_empty())
        .collect()
}

fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Float(v) => format!("{v}"),
        DataType::Int(v) => format!("{v}"),
        DataType::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}
