//! Privilege level management with graph-based navigation.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;

use crate::error::{DriverError, Result};
use crate::platform::PrivilegeLevel;

/// Manages privilege level navigation using a graph structure.
///
/// Privilege levels form a bidirectional graph where each level connects
/// to its parent (previous_priv). This manager handles:
/// - Determining current privilege from a prompt
/// - Finding paths between privilege levels
/// - Tracking current privilege state
#[derive(Debug, Clone)]
pub struct PrivilegeManager {
    /// All defined privilege levels.
    levels: IndexMap<String, PrivilegeLevel>,

    /// Adjacency list for the privilege graph.
    graph: HashMap<String, HashSet<String>>,

    /// Current privilege level name.
    current: Option<String>,
}

impl PrivilegeManager {
    /// Create a new privilege manager from privilege level definitions.
    pub fn new(levels: IndexMap<String, PrivilegeLevel>) -> Self {
        let graph = Self::build_graph(&levels);

        // Start at the root level (no previous_priv)
        let current = levels
            .iter()
            .find(|(_, l)| l.previous_priv.is_none())
            .map(|(name, _)| name.clone());

        Self {
            levels,
            graph,
            current,
        }
    }

    /// Build the bidirectional adjacency list from privilege definitions.
    fn build_graph(levels: &IndexMap<String, PrivilegeLevel>) -> HashMap<String, HashSet<String>> {
        let mut graph: HashMap<String, HashSet<String>> = HashMap::new();

        for (name, level) in levels {
            graph.entry(name.clone()).or_default();

            if let Some(ref parent) = level.previous_priv {
                graph.entry(name.clone()).or_default().insert(parent.clone());
                graph.entry(parent.clone()).or_default().insert(name.clone());
            }
        }

        graph
    }

    /// Determine the privilege level from a prompt string.
    pub fn determine_from_prompt(&self, prompt: &str) -> Result<&PrivilegeLevel> {
        self.levels
            .values()
            .find(|level| level.matches(prompt))
            .ok_or_else(|| {
                DriverError::UnknownPrivilege {
                    prompt: prompt.to_string(),
                }
                .into()
            })
    }

    /// Get the current privilege level.
    pub fn current(&self) -> Option<&PrivilegeLevel> {
        self.current.as_ref().and_then(|name| self.levels.get(name))
    }

    /// Set the current privilege level by name.
    pub fn set_current(&mut self, name: &str) -> Result<()> {
        if self.levels.contains_key(name) {
            self.current = Some(name.to_string());
            Ok(())
        } else {
            Err(DriverError::UnknownPrivilege {
                prompt: name.to_string(),
            }
            .into())
        }
    }

    /// Get a privilege level by name.
    pub fn get(&self, name: &str) -> Option<&PrivilegeLevel> {
        self.levels.get(name)
    }

    /// Find the shortest path from one privilege level to another.
    ///
    /// Returns a list of privilege level names to traverse, including
    /// both the start and end nodes.
    pub fn find_path(&self, from: &str, to: &str) -> Result<Vec<String>> {
        if from == to {
            return Ok(vec![from.to_string()]);
        }

        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        let mut parent: HashMap<String, String> = HashMap::new();

        queue.push_back(from.to_string());
        visited.insert(from.to_string());

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![to.to_string()];
                let mut node = to.to_string();

                while let Some(prev) = parent.get(&node) {
                    path.push(prev.clone());
                    node = prev.clone();
                }

                path.reverse();
                return Ok(path);
            }

            if let Some(neighbors) = self.graph.get(&current) {
                for neighbor in neighbors {
                    if visited.insert(neighbor.clone()) {
                        parent.insert(neighbor.clone(), current.clone());
                        queue.push_back(neighbor.clone());
                    }
                }
            }
        }

        Err(DriverError::NoPrivilegePath {
            from: from.to_string(),
            to: to.to_string(),
        }
        .into())
    }

    /// Get the transition from one level to an adjacent level.
    pub fn get_transition(&self, from: &str, to: &str) -> Option<TransitionInfo> {
        let from_level = self.levels.get(from)?;
        let to_level = self.levels.get(to)?;

        // Escalating: use escalate_command from target
        if to_level.previous_priv.as_deref() == Some(from) {
            return Some(TransitionInfo {
                command: to_level.escalate_command.clone()?,
                auth_prompt: to_level.escalate_prompt.clone(),
            });
        }

        // De-escalating: use deescalate_command from current
        if from_level.previous_priv.as_deref() == Some(to) {
            return Some(TransitionInfo {
                command: from_level.deescalate_command.clone()?,
                auth_prompt: None,
            });
        }

        None
    }
}

/// Information about a privilege level transition.
#[derive(Debug, Clone)]
pub struct TransitionInfo {
    /// Command to execute for the transition.
    pub command: String,

    /// Password prompt the device may raise. Answered only if it appears.
    pub auth_prompt: Option<String>,
}
