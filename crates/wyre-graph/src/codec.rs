//! Binary encode/decode for circuit persistence.
//!
//! All integers are little-endian; kind tokens are length-prefixed
//! UTF-8. The format is intentionally simple — no compression, no
//! alignment padding, no self-describing schema.
//!
//! A circuit file is: magic, format version, the gate list, then the
//! connection list. Gates are decoded before connections are resolved,
//! since connection endpoints reference connectors that only exist once
//! their gate has been rebuilt. Endpoints are addressed structurally as
//! `(kind, serial, slot)` rather than by raw connector ID, so they stay
//! valid across re-construction.
//!
//! A connection that fails to resolve (missing gate, bad slot, occupied
//! target) is dropped and counted, never a decode failure — a damaged
//! edge must not take the rest of the circuit down with it.

use std::io::{Read, Write};

use wyre_core::{GateKind, Position, Signal};

use crate::connector::Direction;
use crate::graph::CircuitGraph;

/// File magic for circuit files.
pub const MAGIC: [u8; 4] = *b"WYRC";

/// Current format version.
pub const FORMAT_VERSION: u8 = 1;

// ── CodecError ──────────────────────────────────────────────────

/// Errors from circuit encode/decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// The file does not start with the circuit magic.
    BadMagic,
    /// The format version is newer than this build understands.
    UnsupportedVersion {
        /// The version found in the header.
        found: u8,
    },
    /// A kind token did not parse.
    UnknownKind {
        /// The unparseable token.
        token: String,
    },
    /// Structurally invalid data (truncated frame, bad enum byte,
    /// duplicate gate serial).
    MalformedFrame {
        /// Description of the problem.
        detail: String,
    },
    /// Underlying I/O failure.
    Io {
        /// Description of the I/O failure.
        detail: String,
    },
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadMagic => write!(f, "not a circuit file (bad magic)"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::UnknownKind { token } => write!(f, "unknown gate kind '{token}'"),
            Self::MalformedFrame { detail } => write!(f, "malformed frame: {detail}"),
            Self::Io { detail } => write!(f, "io error: {detail}"),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            detail: e.to_string(),
        }
    }
}

// ── DecodedCircuit ──────────────────────────────────────────────

/// Result of a successful decode.
#[derive(Debug)]
pub struct DecodedCircuit {
    /// The reconstructed graph.
    pub graph: CircuitGraph,
    /// Connections dropped because an endpoint failed to resolve.
    pub dropped_connections: usize,
}

// ── Primitives ──────────────────────────────────────────────────

fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), CodecError> {
    w.write_all(&[v])?;
    Ok(())
}

fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), CodecError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<(), CodecError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn write_str(w: &mut dyn Write, s: &str) -> Result<(), CodecError> {
    write_u32_le(w, s.len() as u32)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

fn read_u8(r: &mut dyn Read) -> Result<u8, CodecError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32_le(r: &mut dyn Read) -> Result<u32, CodecError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_i32_le(r: &mut dyn Read) -> Result<i32, CodecError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn read_str(r: &mut dyn Read) -> Result<String, CodecError> {
    let len = read_u32_le(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| CodecError::MalformedFrame {
        detail: format!("invalid UTF-8 token: {e}"),
    })
}

fn read_kind(r: &mut dyn Read) -> Result<GateKind, CodecError> {
    let token = read_str(r)?;
    GateKind::parse(&token).ok_or(CodecError::UnknownKind { token })
}

fn write_level(w: &mut dyn Write, level: Signal) -> Result<(), CodecError> {
    write_u8(
        w,
        match level {
            Signal::Unset => 0,
            Signal::Low => 1,
            Signal::High => 2,
        },
    )
}

fn read_level(r: &mut dyn Read) -> Result<Signal, CodecError> {
    match read_u8(r)? {
        0 => Ok(Signal::Unset),
        1 => Ok(Signal::Low),
        2 => Ok(Signal::High),
        other => Err(CodecError::MalformedFrame {
            detail: format!("invalid level byte {other}"),
        }),
    }
}

// ── Encode ──────────────────────────────────────────────────────

/// Serialize a circuit: header, gate list, connection list.
pub fn encode_circuit(graph: &CircuitGraph, w: &mut dyn Write) -> Result<(), CodecError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;

    write_u32_le(w, graph.gate_count() as u32)?;
    for gate in graph.gates() {
        write_str(w, gate.id.kind.code())?;
        write_u32_le(w, gate.id.serial)?;
        write_i32_le(w, gate.position.x)?;
        write_i32_le(w, gate.position.y)?;
        write_level(w, gate.level)?;
    }

    write_u32_le(w, graph.connection_count() as u32)?;
    for conn in graph.connections() {
        for (connector, direction) in [
            (conn.source, Direction::Output),
            (conn.target, Direction::Input),
        ] {
            let owner = graph
                .owner_of(connector)
                .ok_or_else(|| CodecError::MalformedFrame {
                    detail: format!("connection {} has an orphan endpoint", conn.id),
                })?;
            let gate = graph.gate(owner).ok_or_else(|| CodecError::MalformedFrame {
                detail: format!("connector {connector} owned by missing gate {owner}"),
            })?;
            let slots = match direction {
                Direction::Output => &gate.outputs,
                Direction::Input => &gate.inputs,
            };
            let slot = slots.iter().position(|c| *c == connector).ok_or_else(|| {
                CodecError::MalformedFrame {
                    detail: format!("connector {connector} not a slot of {owner}"),
                }
            })?;
            write_str(w, owner.kind.code())?;
            write_u32_le(w, owner.serial)?;
            write_u8(w, slot as u8)?;
        }
    }
    Ok(())
}

// ── Decode ──────────────────────────────────────────────────────

/// Deserialize a circuit: validate the header, rebuild gates, then
/// resolve connections.
pub fn decode_circuit(r: &mut dyn Read) -> Result<DecodedCircuit, CodecError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(CodecError::BadMagic);
    }
    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion { found: version });
    }

    let mut graph = CircuitGraph::new();

    let gate_count = read_u32_le(r)?;
    for _ in 0..gate_count {
        let kind = read_kind(r)?;
        let serial = read_u32_le(r)?;
        let x = read_i32_le(r)?;
        let y = read_i32_le(r)?;
        let level = read_level(r)?;
        let id = graph
            .insert_gate_with_serial(kind, serial, Position::new(x, y))
            .ok_or_else(|| CodecError::MalformedFrame {
                detail: format!("duplicate gate {kind}-{serial}"),
            })?;
        if level.is_set() {
            graph.set_level(id, level);
        }
    }

    let mut dropped = 0usize;
    let conn_count = read_u32_le(r)?;
    for _ in 0..conn_count {
        let source = read_endpoint(r, &graph, Direction::Output)?;
        let target = read_endpoint(r, &graph, Direction::Input)?;
        match (source, target) {
            (Some(s), Some(t)) => {
                if graph.try_connect(s, t).is_err() {
                    dropped += 1;
                }
            }
            _ => dropped += 1,
        }
    }

    Ok(DecodedCircuit {
        graph,
        dropped_connections: dropped,
    })
}

/// Read one `(kind, serial, slot)` endpoint and resolve it against the
/// rebuilt gates. Unresolvable endpoints yield `None` — the caller
/// drops the connection and keeps going.
fn read_endpoint(
    r: &mut dyn Read,
    graph: &CircuitGraph,
    direction: Direction,
) -> Result<Option<wyre_core::ConnectorId>, CodecError> {
    let kind = read_kind(r)?;
    let serial = read_u32_le(r)?;
    let slot = read_u8(r)? as usize;
    let gate = match graph.gate(wyre_core::GateId::new(kind, serial)) {
        Some(g) => g,
        None => return Ok(None),
    };
    let slots = match direction {
        Direction::Output => &gate.outputs,
        Direction::Input => &gate.inputs,
    };
    Ok(slots.get(slot).copied())
}
