//! Persistence for rosters.
//!
//! Rosters are stored as JSON:
//!
//! ```text
//! {"gen": 3, "nets": [{"last_layer": 2, "node_num": 44, "conn_number": 3,
//!   "nodes": [{"layer": 0, "connections": [1]}, ...],
//!   "connections": [{"from": 0, "to": 36, "weight": 0.5, "conn_num": 0,
//!                    "active": "False"}, ...]}]}
//! ```
//!
//! Node array position is the node handle and `conn_num` must equal the
//! connection's array position. `node_num` is the handle of the newest node.
//! Loading rebuilds each brain verbatim and rejects any inconsistency instead
//! of patching it.

// Persistence uses intentional casts for timestamp/date calculations
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use crate::brain::{check_invariants, Brain, Connection, ConnectionId, Node, NodeId};
use crate::error::{Error, Result};
use crate::population::{Population, PopulationConfig};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A whole roster as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterFile {
    /// Generation number.
    #[serde(rename = "gen")]
    pub generation: u32,
    /// One record per brain, in slot order.
    pub nets: Vec<NetRecord>,
}

impl RosterFile {
    /// Input/output shape recorded by the first net, if the writer stored it.
    #[must_use]
    pub fn shape(&self) -> Option<(usize, usize)> {
        let net = self.nets.first()?;
        Some((net.inputs?, net.outputs?))
    }
}

/// One serialized brain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetRecord {
    /// Output layer at save time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_layer: Option<u32>,
    /// Input node count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<usize>,
    /// Output node count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<usize>,
    /// Handle of the most recently created node.
    pub node_num: i64,
    /// Number of connections created.
    pub conn_number: usize,
    /// Nodes in handle order.
    pub nodes: Vec<NodeRecord>,
    /// Connections in id order.
    pub connections: Vec<ConnectionRecord>,
}

/// One serialized node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Evaluation layer.
    pub layer: u32,
    /// Active outgoing connection ids.
    pub connections: Vec<usize>,
}

/// One serialized connection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Source node handle.
    pub from: usize,
    /// Destination node handle.
    pub to: usize,
    /// Edge weight.
    pub weight: f64,
    /// Connection id.
    pub conn_num: usize,
    /// Stored as the text `"True"` or `"False"`.
    #[serde(with = "active_flag")]
    pub active: bool,
}

mod active_flag {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub(super) fn serialize<S: Serializer>(active: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *active { "True" } else { "False" })
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let text = String::deserialize(deserializer)?;
        match text.as_str() {
            "True" => Ok(true),
            "False" => Ok(false),
            other => Err(de::Error::custom(format!(
                "expected \"True\" or \"False\", got {other:?}"
            ))),
        }
    }
}

/// Convert a brain to its stored form.
#[must_use]
pub fn encode_brain(brain: &Brain) -> NetRecord {
    NetRecord {
        last_layer: Some(brain.output_layer()),
        inputs: Some(brain.input_count()),
        outputs: Some(brain.output_count()),
        node_num: brain.nodes().len() as i64 - 1,
        conn_number: brain.connections().len(),
        nodes: brain
            .nodes()
            .iter()
            .map(|node| NodeRecord {
                layer: node.layer(),
                connections: node.outgoing().iter().map(|id| id.index()).collect(),
            })
            .collect(),
        connections: brain
            .connections()
            .iter()
            .map(|conn| ConnectionRecord {
                from: conn.from().index(),
                to: conn.to().index(),
                weight: conn.weight(),
                conn_num: conn.id().index(),
                active: conn.is_active(),
            })
            .collect(),
    }
}

/// Rebuild a brain from its stored form.
///
/// # Errors
///
/// Returns [`Error::Serialization`] describing the first inconsistency.
pub fn decode_brain(record: &NetRecord, inputs: usize, outputs: usize) -> Result<Brain> {
    let invalid = |message: String| Err(Error::Serialization(message));

    if record.inputs.is_some_and(|n| n != inputs) || record.outputs.is_some_and(|n| n != outputs) {
        return invalid(format!(
            "net shape {:?}x{:?} does not match expected {inputs}x{outputs}",
            record.inputs, record.outputs
        ));
    }
    if record.node_num.checked_add(1) != Some(record.nodes.len() as i64) {
        return invalid(format!(
            "node_num {} does not match {} nodes",
            record.node_num,
            record.nodes.len()
        ));
    }
    if record.conn_number != record.connections.len() {
        return invalid(format!(
            "conn_number {} does not match {} connections",
            record.conn_number,
            record.connections.len()
        ));
    }
    if record.nodes.len() < inputs + outputs {
        return invalid(format!(
            "{} nodes cannot hold {inputs} inputs and {outputs} outputs",
            record.nodes.len()
        ));
    }

    let node_count = record.nodes.len();
    let mut connections = Vec::with_capacity(record.connections.len());
    for (position, conn) in record.connections.iter().enumerate() {
        if conn.conn_num != position {
            return invalid(format!("connection at position {position} has conn_num {}", conn.conn_num));
        }
        if conn.from >= node_count || conn.to >= node_count {
            return invalid(format!(
                "connection {position} joins {} -> {} but there are {node_count} nodes",
                conn.from, conn.to
            ));
        }
        if !conn.weight.is_finite() {
            return invalid(format!("connection {position} has weight {}", conn.weight));
        }
        connections.push(Connection {
            id: ConnectionId(position),
            from: NodeId(conn.from),
            to: NodeId(conn.to),
            weight: conn.weight,
            active: conn.active,
        });
    }

    let mut nodes = Vec::with_capacity(node_count);
    for (position, record_node) in record.nodes.iter().enumerate() {
        // Layers are dense, so no layer can exceed the node count
        if record_node.layer as usize >= node_count {
            return invalid(format!(
                "node {position} sits on layer {} with only {node_count} nodes",
                record_node.layer
            ));
        }
        let mut node = Node::new(record_node.layer);
        for &id in &record_node.connections {
            let Some(conn) = connections.get(id) else {
                return invalid(format!("node {position} lists unknown connection {id}"));
            };
            if conn.from.index() != position {
                return invalid(format!(
                    "node {position} lists connection {id}, which leaves node {}",
                    conn.from.index()
                ));
            }
            if !conn.active {
                return invalid(format!("node {position} lists inactive connection {id}"));
            }
            node.outgoing.push(ConnectionId(id));
        }
        nodes.push(node);
    }

    let brain = Brain::from_parts(inputs, outputs, nodes, connections);

    if let Some(violation) = check_invariants(&brain).into_iter().next() {
        return invalid(violation.message);
    }
    if let Some(last_layer) = record.last_layer
        && last_layer != brain.output_layer()
    {
        return invalid(format!(
            "last_layer {last_layer} does not match output layer {}",
            brain.output_layer()
        ));
    }

    Ok(brain)
}

/// Convert a population to its stored form.
#[must_use]
pub fn encode(population: &Population) -> RosterFile {
    RosterFile {
        generation: population.generation(),
        nets: population.brains().iter().map(encode_brain).collect(),
    }
}

/// Rebuild a population from its stored form.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the roster size differs
/// from `config.size`, or any net fails [`decode_brain`].
pub fn decode(file: &RosterFile, config: PopulationConfig) -> Result<Population> {
    config.validate()?;
    if file.nets.len() != config.size {
        return Err(Error::Serialization(format!(
            "roster holds {} nets, expected {}",
            file.nets.len(),
            config.size
        )));
    }

    let brains = file
        .nets
        .iter()
        .enumerate()
        .map(|(i, net)| {
            decode_brain(net, config.inputs, config.outputs).map_err(|e| match e {
                Error::Serialization(message) => Error::Serialization(format!("net {i}: {message}")),
                other => other,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Population::from_roster(brains, file.generation, config))
}

/// Serialize a population to a JSON string.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub fn to_json(population: &Population) -> Result<String> {
    Ok(serde_json::to_string(&encode(population))?)
}

/// Parse and validate a population from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or the roster is inconsistent.
pub fn from_json(json: &str, config: PopulationConfig) -> Result<Population> {
    let file: RosterFile = serde_json::from_str(json)?;
    decode(&file, config)
}

/// Read a roster file without rebuilding brains.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a roster.
pub fn read_roster(path: &Path) -> Result<RosterFile> {
    let file = fs::File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Save a population to `path`.
///
/// The roster is written to a sibling `.tmp` file, synced, then renamed
/// over `path`, so an interrupted save leaves the previous roster intact.
///
/// # Errors
///
/// Returns an error if serialization or file I/O fails.
pub fn save_roster(population: &Population, path: &Path) -> Result<()> {
    let temp = temp_path(path);
    if let Err(e) = write_synced(population, &temp) {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }
    fs::rename(&temp, path)?;
    info!(
        "saved generation {} ({} nets) to {}",
        population.generation(),
        population.len(),
        path.display()
    );
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_synced(population: &Population, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer(&mut writer, &encode(population))?;
    writer.flush()?;
    let file = writer.into_inner().map_err(std::io::IntoInnerError::into_error)?;
    file.sync_all()?;
    Ok(())
}

/// Load and validate a population from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the roster is inconsistent.
pub fn load_roster(path: &Path, config: PopulationConfig) -> Result<Population> {
    let file = read_roster(path)?;
    decode(&file, config).inspect_err(|e| {
        warn!("rejected roster {}: {e}", path.display());
    })
}

impl Population {
    /// Save this population as a JSON roster.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file I/O fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        save_roster(self, path)
    }

    /// Load a population from a JSON roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the roster is
    /// inconsistent with itself or with `config`.
    pub fn load(path: &Path, config: PopulationConfig) -> Result<Self> {
        load_roster(path, config)
    }
}

/// Default roster file name in `dir`: `population_YYYYMMDD_HHMMSS.json` (UTC).
#[must_use]
pub fn default_roster_path(dir: &Path) -> PathBuf {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    dir.join(format!("population_{}.json", format_timestamp(timestamp)))
}

/// Format a Unix timestamp as `YYYYMMDD_HHMMSS` using simple arithmetic.
fn format_timestamp(secs: u64) -> String {
    const SECS_PER_DAY: u64 = 86400;
    const SECS_PER_HOUR: u64 = 3600;
    const SECS_PER_MIN: u64 = 60;

    let time_of_day = secs % SECS_PER_DAY;
    let hour = time_of_day / SECS_PER_HOUR;
    let min = (time_of_day % SECS_PER_HOUR) / SECS_PER_MIN;
    let sec = time_of_day % SECS_PER_MIN;

    let mut days = secs / SECS_PER_DAY;
    let mut year = 1970;
    while days >= days_in_year(year) {
        days -= days_in_year(year);
        year += 1;
    }

    let days_in_months: [u64; 12] = if is_leap(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 0;
    while month < 12 && days >= days_in_months[month] {
        days -= days_in_months[month];
        month += 1;
    }

    format!(
        "{year:04}{:02}{:02}_{hour:02}{min:02}{sec:02}",
        month + 1,
        days + 1
    )
}

fn is_leap(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_year(year: u64) -> u64 {
    if is_leap(year) { 366 } else { 365 }
}
