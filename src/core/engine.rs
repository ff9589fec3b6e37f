// src/core/engine.rs
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{MsgflowError, Result};
use super::interactions::{extract_interactions, Conventions, Extraction, HandlerResolver};
use super::type_graph::{TypeDescription, TypeGraph};

/// Diagram for one command name, possibly defined in several services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDiagram {
    /// Simple name shared by every definition
    pub name: String,
    /// Services defining a command with this name, ordered by namespace
    pub defined_in: Vec<String>,
    /// Absent when no definition has a command handler
    pub extraction: Option<Extraction>,
}

/// Main orchestration engine: owns the populated graph and runs extractions.
pub struct Engine {
    config: Config,
    conventions: Arc<Conventions>,
    graph: Arc<TypeGraph>,
}

impl Engine {
    /// Populates the graph from raw front-end types.
    pub fn new(config: Config, types: Vec<TypeDescription>) -> Result<Self> {
        let conventions = Conventions::from_config(&config)?;
        let graph = TypeGraph::populate(types);

        info!("Loaded {} types", graph.len());

        Ok(Self {
            config,
            conventions: Arc::new(conventions),
            graph: Arc::new(graph),
        })
    }

    /// Loads configuration and the analyzed types JSON produced by the front end.
    pub async fn from_files(config_path: Option<&Path>, input: &Path) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        debug!("Loaded configuration: {:?}", config);

        info!("Reading analyzed types from {}", input.display());
        let content = tokio::fs::read_to_string(input).await?;
        let types: Vec<TypeDescription> = serde_json::from_str(&content)?;

        Self::new(config, types)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    /// Extracts the flow started by one message.
    pub fn extract(&self, message_full_name: &str) -> Result<Extraction> {
        let message = self.graph.require(message_full_name)?;
        let extraction = extract_interactions(&self.graph, &self.conventions, message);

        info!(
            "Extracted {} with {} participant(s)",
            message_full_name,
            extraction.participants.len()
        );
        Ok(extraction)
    }

    /// Command types grouped by simple name, names sorted, each group in graph order.
    pub fn command_groups(&self) -> BTreeMap<String, Vec<&TypeDescription>> {
        let mut groups: BTreeMap<String, Vec<&TypeDescription>> = BTreeMap::new();

        for description in self.graph.iter() {
            if description.full_name != self.conventions.command_type
                && description.implements_type(&self.conventions.command_type)
            {
                groups.entry(description.name().to_string()).or_default().push(description);
            }
        }
        groups
    }

    /// One diagram per command name, extracted concurrently.
    ///
    /// Every extraction runs its own traverser on a blocking task; results keep name order.
    pub async fn extract_commands(&self) -> Result<Vec<CommandDiagram>> {
        let resolver = HandlerResolver::new(&self.graph, &self.conventions);
        let mut pending = Vec::new();

        for (name, group) in self.command_groups() {
            let mut by_namespace = group.clone();
            by_namespace.sort_by(|a, b| a.namespace().cmp(b.namespace()));
            let defined_in: Vec<String> = by_namespace
                .iter()
                .filter_map(|t| self.conventions.services.service_of(t))
                .map(str::to_string)
                .collect();

            // First definition with a handler, in graph order

            let handled = group
                .iter()
                .find(|t| resolver.command_handler_for(t).is_some())
                .map(|t| t.full_name.clone());

            let task = match handled {
                Some(full_name) => {
                    let graph = Arc::clone(&self.graph);
                    let conventions = Arc::clone(&self.conventions);
                    Some(tokio::task::spawn_blocking(move || {
                        graph
                            .get(&full_name)
                            .map(|message| extract_interactions(&graph, &conventions, message))
                    }))
                }
                None => {
                    warn!("No command handler found for {}", name);
                    None
                }
            };

            pending.push((name, defined_in, task));
        }

        let mut diagrams = Vec::with_capacity(pending.len());
        for (name, defined_in, task) in pending {
            let extraction = match task {
                Some(handle) => handle.await.map_err(|e| MsgflowError::Task(e.to_string()))?,
                None => None,
            };
            diagrams.push(CommandDiagram {
                name,
                defined_in,
                extraction,
            });
        }

        info!("Extracted {} command diagram(s)", diagrams.len());
        Ok(diagrams)
    }
}
