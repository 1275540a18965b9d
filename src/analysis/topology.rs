use crate::store::{ComponentId, GraphRegistry};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet, VecDeque};

/// The root followed by its subcomponents, depth first, children in
/// declaration order. This is the order in which components are validated
/// and assembled.
pub fn subtree_preorder(registry: &GraphRegistry, root: ComponentId) -> Vec<ComponentId> {
    let mut order = Vec::new();
    let mut stack = vec![root];
    let mut seen = HashSet::new();

    while let Some(node) = stack.pop() {
        if !seen.insert(node) {
            continue;
        }
        order.push(node);
        // Reverse push so the first declared child is visited first.
        for &child in registry.children(node).iter().rev() {
            stack.push(child);
        }
    }
    order
}

/// Every component reachable from `root` through children, parents, and
/// explicit dependencies, in discovery order.
pub fn reachable_from(registry: &GraphRegistry, root: ComponentId) -> Vec<ComponentId> {
    let mut visited = HashSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::from(vec![root]);

    while let Some(node) = queue.pop_front() {
        if visited.insert(node) {
            order.push(node);
            let component = registry.node(node);
            queue.extend(component.children.iter().copied());
            queue.extend(component.explicit_dependencies.iter().copied());
            queue.extend(component.parent);
        }
    }
    order
}

/// Finds cycles in the graph formed by parent edges (child -> parent) and
/// explicit-dependency edges (component -> dependency).
///
/// Each cycle lists its members in discovery order from `root`; cycles are
/// ordered by their first member so the result is stable across runs.
pub fn dependency_cycles(registry: &GraphRegistry, root: ComponentId) -> Vec<Vec<ComponentId>> {
    let order = reachable_from(registry, root);
    let position: HashMap<ComponentId, usize> = order.iter().enumerate().map(|(i, &c)| (c, i)).collect();

    let mut graph: DiGraph<ComponentId, ()> = DiGraph::with_capacity(order.len(), order.len());
    let indices: Vec<NodeIndex> = order.iter().map(|&c| graph.add_node(c)).collect();

    for (i, &id) in order.iter().enumerate() {
        let component = registry.node(id);
        let targets = component.explicit_dependencies.iter().chain(component.parent.iter());
        for target in targets {
            graph.add_edge(indices[i], indices[position[target]], ());
        }
    }

    let mut cycles: Vec<Vec<ComponentId>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|scc| {
            let mut members: Vec<ComponentId> = scc.into_iter().map(|n| graph[n]).collect();
            members.sort_by_key(|c| position[c]);
            members
        })
        .collect();
    cycles.sort_by_key(|members| position[&members[0]]);
    cycles
}

/// Direct explicit dependencies that carry a scope, in declaration order.
pub fn scoped_dependencies(registry: &GraphRegistry, id: ComponentId) -> Vec<ComponentId> {
    registry
        .dependencies(id)
        .iter()
        .copied()
        .filter(|&dep| registry.node(dep).is_scoped())
        .collect()
}
