//! Recipe dependency graph.
//!
//! Provides the `RecipeGraph` type, which represents entity-on-entity
//! recipe dependencies as a directed graph. Used by the resolver's
//! topological ordering to make sure every entity is costed after the
//! entities it consumes.

use crate::catalog::Catalog;
use crate::entity_id::EntityId;
use crate::error::CostError;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// A directed graph of recipe dependencies between entities.
///
/// Nodes are `EntityId`s, edges point from an ingredient entity to the
/// entity whose recipe consumes it. Base commodities never appear.
///
/// # Examples
///
/// ```rust
/// use recipecost::graph::RecipeGraph;
/// use recipecost::EntityId;
///
/// let mut graph = RecipeGraph::new();
/// let t1 = EntityId::from_str("X_1");
/// let t2 = EntityId::from_str("X_2");
///
/// // X_2 consumes X_1
/// graph.add_edge(t2.clone(), t1.clone());
///
/// let order = graph.topological_sort().unwrap();
/// assert_eq!(order, vec![t1, t2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecipeGraph {
    graph: DiGraph<EntityId, ()>,
    node_map: HashMap<EntityId, NodeIndex>,
}

impl RecipeGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Build the graph of a catalog.
    ///
    /// Nodes are added in catalog order, so node order doubles as the
    /// tie-break order of [`RecipeGraph::topological_sort`].
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut graph = RecipeGraph::new();
        for id in catalog.ids() {
            graph.add_node(id.clone());
        }
        for entity in catalog.entities() {
            for ingredient in entity.recipe.ingredients() {
                if catalog.contains(ingredient.as_str()) {
                    graph.add_edge(entity.id.clone(), ingredient.clone());
                }
            }
        }
        graph
    }

    /// Add a node to the graph if it doesn't exist, returning its index.
    pub fn add_node(&mut self, id: EntityId) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&id) {
            idx
        } else {
            let idx = self.graph.add_node(id.clone());
            self.node_map.insert(id, idx);
            idx
        }
    }

    /// Add a dependency edge: `dependent` consumes `ingredient`.
    ///
    /// Both nodes are added if missing. Repeated edges are ignored.
    pub fn add_edge(&mut self, dependent: EntityId, ingredient: EntityId) {
        let dependent_idx = self.add_node(dependent);
        let ingredient_idx = self.add_node(ingredient);
        self.graph.update_edge(ingredient_idx, dependent_idx, ());
    }

    /// Detect cycles in the graph.
    ///
    /// Returns `Err(CostError::Cycle)` carrying a closed path such as
    /// `[A, B, C, A]`.
    pub fn detect_cycles(&self) -> Result<(), CostError> {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();

        for node_idx in self.graph.node_indices() {
            if !visited.contains(&node_idx) {
                let mut cycle_path = Vec::new();
                if let Some(cycle) =
                    self.dfs_cycle_detect(node_idx, &mut visited, &mut rec_stack, &mut cycle_path)
                {
                    return Err(cycle);
                }
            }
        }

        Ok(())
    }

    fn dfs_cycle_detect(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        rec_stack: &mut HashSet<NodeIndex>,
        cycle_path: &mut Vec<EntityId>,
    ) -> Option<CostError> {
        visited.insert(node);
        rec_stack.insert(node);
        cycle_path.push(self.graph[node].clone());

        for neighbor in self.sorted_neighbors(node, Direction::Outgoing) {
            if !visited.contains(&neighbor) {
                if let Some(cycle) = self.dfs_cycle_detect(neighbor, visited, rec_stack, cycle_path)
                {
                    return Some(cycle);
                }
            } else if rec_stack.contains(&neighbor) {
                let neighbor_id = self.graph[neighbor].clone();
                let start = cycle_path
                    .iter()
                    .position(|id| id == &neighbor_id)
                    .unwrap_or(0);
                let mut path = cycle_path[start..].to_vec();
                path.push(neighbor_id);
                return Some(CostError::Cycle { path });
            }
        }

        rec_stack.remove(&node);
        cycle_path.pop();
        None
    }

    /// Neighbors in node insertion order, independent of edge insertion order.
    fn sorted_neighbors(&self, node: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> =
            self.graph.neighbors_directed(node, direction).collect();
        neighbors.sort();
        neighbors.dedup();
        neighbors
    }

    /// Get a topological sort of all nodes.
    ///
    /// Ingredients come before the entities consuming them. Among nodes
    /// that are ready at the same time, the one added first goes first,
    /// so the result is stable for a given catalog.
    ///
    /// # Errors
    ///
    /// `CostError::Cycle` if any cycle exists.
    pub fn topological_sort(&self) -> Result<Vec<EntityId>, CostError> {
        self.detect_cycles()?;

        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|idx| (idx, self.sorted_neighbors(idx, Direction::Incoming).len()))
            .collect();

        let mut ready: BinaryHeap<Reverse<NodeIndex>> = in_degree
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(&idx, _)| Reverse(idx))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(idx)) = ready.pop() {
            order.push(self.graph[idx].clone());
            for dependent in self.sorted_neighbors(idx, Direction::Outgoing) {
                if let Some(degree) = in_degree.get_mut(&dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse(dependent));
                    }
                }
            }
        }

        if order.len() != self.graph.node_count() {
            // Only reachable if detect_cycles missed a cycle.
            let stuck = self
                .graph
                .node_indices()
                .find(|idx| in_degree.get(idx).is_some_and(|&d| d > 0))
                .map(|idx| vec![self.graph[idx].clone()])
                .unwrap_or_default();
            return Err(CostError::Cycle { path: stuck });
        }

        Ok(order)
    }

    /// Entity-ingredients consumed directly by an entity, in node order.
    pub fn dependencies_of(&self, id: &EntityId) -> Vec<EntityId> {
        match self.node_map.get(id) {
            Some(&idx) => self
                .sorted_neighbors(idx, Direction::Incoming)
                .into_iter()
                .map(|dep| self.graph[dep].clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Get all nodes in insertion order.
    pub fn nodes(&self) -> Vec<EntityId> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// Check if a node exists in the graph.
    pub fn contains_node(&self, id: &EntityId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Extract the targets and everything they transitively consume.
    ///
    /// Unknown targets are ignored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipecost::graph::RecipeGraph;
    /// use recipecost::EntityId;
    ///
    /// let mut graph = RecipeGraph::new();
    /// let t1 = EntityId::from_str("X_1");
    /// let t2 = EntityId::from_str("X_2");
    /// let other = EntityId::from_str("Y_1");
    ///
    /// graph.add_edge(t2.clone(), t1.clone());
    /// graph.add_node(other.clone());
    ///
    /// let sub = graph.subgraph_for_targets(&[t2.clone()]);
    /// assert!(sub.contains_node(&t1));
    /// assert!(sub.contains_node(&t2));
    /// assert!(!sub.contains_node(&other));
    /// ```
    pub fn subgraph_for_targets(&self, targets: &[EntityId]) -> RecipeGraph {
        let mut subgraph = RecipeGraph::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<EntityId> = targets.to_vec();

        while let Some(id) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            if !self.contains_node(&id) {
                continue;
            }
            subgraph.add_node(id.clone());
            for dep in self.dependencies_of(&id) {
                if !visited.contains(&dep) {
                    stack.push(dep.clone());
                }
                subgraph.add_edge(id.clone(), dep);
            }
        }

        subgraph
    }
}
