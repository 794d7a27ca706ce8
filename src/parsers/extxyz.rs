//! # 扩展 XYZ (extxyz) 读写
//!
//! ## 帧格式
//! ```text
//! <原子数>
//! Lattice="a 0.0 0.0 0.0 b 0.0 0.0 0.0 c" Properties=species:S:1:pos:R:3:forces:R:3 energy=<E> pbc="T T T"
//! <元素>\t<x>\t<y>\t<z>\t<fx>\t<fy>\t<fz>
//! ...
//! ```
//!
//! 写出时整帧先在内存中拼好，再一次性追加到文件末尾，
//! 中途崩溃只会留下完整帧组成的前缀。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `commands/collect.rs`, `commands/count.rs` 使用
//! - 使用 `models/frame.rs`, `utils/format.rs`
//! - 使用 `regex` 解析注释行中的 key=value

use crate::error::{ConverterError, Result};
use crate::models::{AtomRecord, Frame, Lattice};
use crate::utils::format::format_float;

use regex::Regex;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

/// 写出的逐原子属性定义
pub const PROPERTIES: &str = "species:S:1:pos:R:3:forces:R:3";

/// 能量缺失时写出的占位符
pub const MISSING_VALUE: &str = "None";

// ─────────────────────────────────────────────────────────────
// 写出
// ─────────────────────────────────────────────────────────────

/// 将一帧转换为 extxyz 文本
///
/// 坐标和晶胞长度有原始文本时原样写出，其余数值按 `format_float` 格式化。
pub fn to_extxyz_string(frame: &Frame) -> String {
    let energy = frame
        .energy
        .map(format_float)
        .unwrap_or_else(|| MISSING_VALUE.to_string());

    let mut result = String::new();
    result.push_str(&format!("{}\n", frame.atom_count()));
    result.push_str(&format!(
        "Lattice=\"{}\" Properties={} energy={} pbc=\"T T T\"\n",
        lattice_field(&frame.lattice),
        PROPERTIES,
        energy
    ));

    for atom in &frame.atoms {
        let p = position_columns(atom);
        let f = atom.force;
        result.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            atom.species,
            p[0],
            p[1],
            p[2],
            format_float(f[0]),
            format_float(f[1]),
            format_float(f[2]),
        ));
    }

    result
}

fn lattice_field(lattice: &Lattice) -> String {
    let mut values: Vec<String> = lattice.flatten().iter().map(|v| format_float(*v)).collect();

    // 对角元位于展开后的 0, 4, 8
    if let Some(ref lengths) = lattice.lengths_text {
        for (k, text) in lengths.iter().enumerate() {
            values[k * 4] = text.clone();
        }
    }

    values.join(" ")
}

fn position_columns(atom: &AtomRecord) -> [String; 3] {
    match atom.position_text {
        Some(ref text) => text.clone(),
        None => atom.position.map(format_float),
    }
}

/// 创建（或清空）输出文件
pub fn truncate_output(path: &Path) -> Result<()> {
    File::create(path).map_err(|e| ConverterError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

/// 以追加模式写入一帧，写完即关闭文件
pub fn append_frame(path: &Path, frame: &Frame) -> Result<()> {
    let block = to_extxyz_string(frame);
    let write_err = |e| ConverterError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    };

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(write_err)?;
    file.write_all(block.as_bytes()).map_err(write_err)?;
    file.flush().map_err(write_err)?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────
// 读取
// ─────────────────────────────────────────────────────────────

/// 读取 extxyz 文件中的所有帧
pub fn read_extxyz_file(path: &Path) -> Result<Vec<Frame>> {
    let content = fs::read_to_string(path).map_err(|e| ConverterError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_extxyz_content(&content, &path.display().to_string())
}

/// 统计 extxyz 文件中的帧数
pub fn count_frames(path: &Path) -> Result<usize> {
    read_extxyz_file(path).map(|frames| frames.len())
}

/// 从字符串内容解析所有帧
pub fn parse_extxyz_content(content: &str, source_name: &str) -> Result<Vec<Frame>> {
    let lines: Vec<&str> = content.lines().collect();
    let parse_err = |line_no: usize, reason: String| ConverterError::ParseError {
        format: "extxyz".to_string(),
        path: source_name.to_string(),
        reason: format!("line {}: {}", line_no, reason),
    };

    let mut frames = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        // 文件末尾的空行
        if lines[i..].iter().all(|l| l.trim().is_empty()) {
            break;
        }

        let n_atoms: usize = lines[i].trim().parse().map_err(|_| {
            parse_err(i + 1, format!("expected atom count, found '{}'", lines[i].trim()))
        })?;

        let comment = lines
            .get(i + 1)
            .ok_or_else(|| parse_err(i + 2, "missing comment line".to_string()))?;
        let header = parse_comment_line(comment).map_err(|reason| parse_err(i + 2, reason))?;

        let body_start = i + 2;
        if body_start + n_atoms > lines.len() {
            return Err(parse_err(
                lines.len(),
                format!(
                    "frame {} declares {} atoms but only {} lines remain",
                    frames.len() + 1,
                    n_atoms,
                    lines.len() - body_start
                ),
            ));
        }

        let mut atoms = Vec::with_capacity(n_atoms);
        for (offset, line) in lines[body_start..body_start + n_atoms].iter().enumerate() {
            let atom = header
                .columns
                .parse_atom(line)
                .ok_or_else(|| parse_err(body_start + offset + 1, "invalid atom line".to_string()))?;
            atoms.push(atom);
        }

        frames.push(Frame::new(header.lattice, header.energy, atoms));
        i = body_start + n_atoms;
    }

    Ok(frames)
}

/// 注释行中解析出的帧信息
struct FrameHeader {
    lattice: Lattice,
    energy: Option<f64>,
    columns: ColumnLayout,
}

/// 原子行中各属性所在列
struct ColumnLayout {
    species: usize,
    pos: usize,
    /// 没有 forces 列时为 `None`
    forces: Option<usize>,
    width: usize,
}

impl ColumnLayout {
    fn from_properties(props: &str) -> std::result::Result<Self, String> {
        let fields: Vec<&str> = props.split(':').collect();
        if fields.len() % 3 != 0 {
            return Err(format!("malformed Properties '{}'", props));
        }

        let mut offsets: HashMap<&str, (usize, usize)> = HashMap::new();
        let mut col = 0;
        for chunk in fields.chunks_exact(3) {
            let count: usize = chunk[2]
                .parse()
                .map_err(|_| format!("invalid column count '{}'", chunk[2]))?;
            offsets.insert(chunk[0], (col, count));
            col += count;
        }

        let column = |name: &str, count: usize| match offsets.get(name) {
            Some((start, n)) if *n == count => Ok(*start),
            _ => Err(format!("Properties lacks '{}' with {} column(s)", name, count)),
        };

        let forces = match offsets.get("forces") {
            Some(_) => Some(column("forces", 3)?),
            None => None,
        };

        Ok(ColumnLayout {
            species: column("species", 1)?,
            pos: column("pos", 3)?,
            forces,
            width: col,
        })
    }

    fn parse_atom(&self, line: &str) -> Option<AtomRecord> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < self.width {
            return None;
        }

        let vec3 = |start: usize| -> Option<[f64; 3]> {
            Some([
                tokens[start].parse().ok()?,
                tokens[start + 1].parse().ok()?,
                tokens[start + 2].parse().ok()?,
            ])
        };

        // 无受力数据的文件记为零受力
        let force = match self.forces {
            Some(start) => vec3(start)?,
            None => [0.0; 3],
        };

        Some(AtomRecord::new(tokens[self.species], vec3(self.pos)?, force))
    }
}

fn key_value_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z_][A-Za-z0-9_\-]*)=(?:"([^"]*)"|(\S+))"#)
            .expect("key=value regex is valid")
    })
}

/// 解析注释行的 key=value 对
fn parse_key_values(line: &str) -> HashMap<String, String> {
    key_value_regex()
        .captures_iter(line)
        .map(|cap| {
            let value = cap
                .get(2)
                .or_else(|| cap.get(3))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            (cap[1].to_string(), value)
        })
        .collect()
}

fn parse_comment_line(line: &str) -> std::result::Result<FrameHeader, String> {
    let kv = parse_key_values(line);

    let lattice_str = kv.get("Lattice").ok_or("missing Lattice")?;
    let values: Vec<f64> = lattice_str
        .split_whitespace()
        .map(|t| t.parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| format!("invalid Lattice '{}'", lattice_str))?;
    if values.len() != 9 {
        return Err(format!("Lattice needs 9 values, found {}", values.len()));
    }
    let lattice = Lattice::from_vectors([
        [values[0], values[1], values[2]],
        [values[3], values[4], values[5]],
        [values[6], values[7], values[8]],
    ]);

    let columns = ColumnLayout::from_properties(kv.get("Properties").ok_or("missing Properties")?)?;

    let energy = match kv.get("energy").map(String::as_str) {
        None | Some(MISSING_VALUE) => None,
        Some(s) => Some(
            s.parse::<f64>()
                .map_err(|_| format!("invalid energy '{}'", s))?,
        ),
    };

    Ok(FrameHeader {
        lattice,
        energy,
        columns,
    })
}
