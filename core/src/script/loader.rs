use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result, bail, ensure};
use tracing::debug;

use crate::ast::{Parser, Program};
use crate::token::{ParseError, Tokenizer};

/// Sidecar extension for precompiled script units.
pub const CACHE_EXTENSION: &str = "clsb";

const MAGIC: [u8; 4] = *b"CLSB";
const CURRENT_VERSION: u16 = 1;

/// An executable unit bound to the path it was loaded from, so diagnostics
/// attribute to the script rather than the host.
#[derive(Debug, Clone)]
pub struct CodeUnit {
    pub path: String,
    pub program: Program,
}

/// Loading failures the embedder discriminates on.
#[derive(Debug)]
pub enum ScriptError {
    FileAccess { path: String, source: io::Error },
    Compile { path: String, error: ParseError },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::FileAccess { path, source } => {
                write!(f, "cannot open script '{}': {}", path, source)
            }
            ScriptError::Compile { path, error } => {
                write!(f, "cannot compile script '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScriptError::FileAccess { source, .. } => Some(source),
            ScriptError::Compile { error, .. } => Some(error),
        }
    }
}

/// Identity of the source a cached unit was compiled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceStamp {
    mtime_secs: u64,
    len: u64,
}

fn source_stamp(meta: &fs::Metadata) -> SourceStamp {
    let mtime_secs = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0);
    SourceStamp {
        mtime_secs,
        len: meta.len(),
    }
}

fn cache_path(path: &Path) -> PathBuf {
    path.with_extension(CACHE_EXTENSION)
}

/// Resolve a path to an executable code unit.
///
/// Prefers the precompiled sidecar when its recorded source stamp matches
/// the file on disk; otherwise reads and compiles the source, attributing
/// errors to the script's own path.
pub fn load_code(path: &str) -> Result<CodeUnit> {
    let meta = fs::metadata(path).map_err(|source| ScriptError::FileAccess {
        path: path.to_string(),
        source,
    })?;
    let stamp = source_stamp(&meta);

    let sidecar = cache_path(Path::new(path));
    if let Ok(bytes) = fs::read(&sidecar) {
        match decode_unit(&bytes, stamp) {
            Ok(program) => {
                debug!(path, cache = %sidecar.display(), "loaded precompiled script");
                return Ok(CodeUnit {
                    path: path.to_string(),
                    program,
                });
            }
            Err(err) => {
                // Stale or undecodable caches fall back to the source
                debug!(path, error = %err, "ignoring script cache");
            }
        }
    }

    let source = fs::read_to_string(path).map_err(|source| ScriptError::FileAccess {
        path: path.to_string(),
        source,
    })?;
    let program = parse_source(&source).map_err(|error| ScriptError::Compile {
        path: path.to_string(),
        error,
    })?;
    debug!(path, "compiled script from source");
    Ok(CodeUnit {
        path: path.to_string(),
        program,
    })
}

fn parse_source(source: &str) -> Result<Program, ParseError> {
    let (tokens, spans) = Tokenizer::tokenize(source)?;
    Parser::new(&tokens, &spans).parse_program()
}

/// Compile a script and write its precompiled sidecar; returns the sidecar
/// path.
pub fn compile_to_cache(path: &str) -> Result<PathBuf> {
    let unit = {
        let source = fs::read_to_string(path).map_err(|source| ScriptError::FileAccess {
            path: path.to_string(),
            source,
        })?;
        parse_source(&source).map_err(|error| ScriptError::Compile {
            path: path.to_string(),
            error,
        })?
    };
    let meta = fs::metadata(path).map_err(|source| ScriptError::FileAccess {
        path: path.to_string(),
        source,
    })?;
    let bytes = encode_unit(&unit, source_stamp(&meta))?;
    let sidecar = cache_path(Path::new(path));
    fs::write(&sidecar, bytes)
        .with_context(|| format!("failed to write cache {}", sidecar.display()))?;
    debug!(path, cache = %sidecar.display(), "wrote precompiled script");
    Ok(sidecar)
}

fn encode_unit(program: &Program, stamp: SourceStamp) -> Result<Vec<u8>> {
    let payload = serde_json::to_vec(program).context("failed to serialize program")?;
    let mut out = Vec::with_capacity(payload.len() + 26);
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
    out.extend_from_slice(&stamp.mtime_secs.to_le_bytes());
    out.extend_from_slice(&stamp.len.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

fn decode_unit(bytes: &[u8], expected: SourceStamp) -> Result<Program> {
    ensure!(bytes.len() >= 26, "cache too small");
    ensure!(bytes[..4] == MAGIC, "invalid CLSB magic");

    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    ensure!(
        version == CURRENT_VERSION,
        "unsupported CLSB version {} (reader supports {})",
        version,
        CURRENT_VERSION
    );

    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[6..14]);
    let mtime_secs = u64::from_le_bytes(word);
    word.copy_from_slice(&bytes[14..22]);
    let len = u64::from_le_bytes(word);
    let recorded = SourceStamp { mtime_secs, len };
    if recorded != expected {
        bail!("source changed since compilation");
    }

    let payload_len = u32::from_le_bytes([bytes[22], bytes[23], bytes[24], bytes[25]]) as usize;
    ensure!(26 + payload_len == bytes.len(), "cache payload length mismatch");

    serde_json::from_slice(&bytes[26..]).context("failed to deserialize program")
}
