use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use tracing::info;
use tt_hint::{decode_stream, HintConfig, Hinter};

/// Per-field overrides from flags and environment.
pub struct Limits {
    pub max_steps: Option<u64>,
    pub stack_capacity: Option<usize>,
    pub max_program_len: Option<usize>,
}

pub fn load_config(path: Option<&str>, overrides: &Limits) -> Result<HintConfig> {
    let mut cfg = match path {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("read config {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parse config {path}"))?
        }
        None => HintConfig::default(),
    };
    if let Some(v) = overrides.max_steps {
        cfg.max_steps = v;
    }
    if let Some(v) = overrides.stack_capacity {
        cfg.stack_capacity = v;
    }
    if let Some(v) = overrides.max_program_len {
        cfg.max_program_len = v;
    }
    Ok(cfg)
}

/// Program bytes from `--hex`, a file, or stdin (`-`).
pub fn read_program(file: &str, hex_text: Option<&str>) -> Result<Vec<u8>> {
    if let Some(text) = hex_text {
        let cleaned: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let cleaned = cleaned.strip_prefix("0x").unwrap_or(&cleaned);
        return hex::decode(cleaned).context("parse hex program");
    }
    if file == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).context("read stdin")?;
        return Ok(buf);
    }
    fs::read(file).with_context(|| format!("read program {file}"))
}

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    steps: u64,
    depth: usize,
    stack: &'a [i32],
}

// ── run ─────────────────────────────────────────────────────────

pub fn run(cfg: HintConfig, file: &str, hex_text: Option<&str>, json: bool) -> Result<()> {
    let program = read_program(file, hex_text)?;
    info!(bytes = program.len(), ?cfg, "running program");
    let mut hinter = Hinter::new(cfg);
    let outcome = hinter.run(&program)?;

    let report = RunReport { steps: outcome.steps, depth: hinter.depth(), stack: hinter.stack() };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("{} {}", "Steps:".dimmed(), report.steps.to_string().cyan());
    println!("{} {}", "Depth:".dimmed(), report.depth.to_string().cyan());
    for (i, v) in report.stack.iter().enumerate() {
        println!("  {:>4}  {:>11}  {}", i, v, format!("({})", fixed_str(*v)).dimmed());
    }
    Ok(())
}

/// 26.6 value as a decimal, e.g. 161 -> "2.515625".
fn fixed_str(v: i32) -> String {
    format!("{}", v as f64 / 64.0)
}

// ── disasm ──────────────────────────────────────────────────────

pub fn disasm(file: &str, hex_text: Option<&str>) -> Result<()> {
    let program = read_program(file, hex_text)?;
    let code = decode_stream(&program)?;
    for ins in &code {
        let text = ins.to_string();
        let text = match ins.op().def().map(|d| d.info) {
            Some(tt_hint::OpInfo::Pops(_)) => text.normal(),
            Some(tt_hint::OpInfo::Unimplemented) => text.yellow(),
            None => text.red(),
        };
        println!("{:04}: {}", ins.offset, text);
    }
    Ok(())
}
