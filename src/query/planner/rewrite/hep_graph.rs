//! 启发式重写的工作图
//!
//! 顶点存放在按下标索引的 arena 中，顶点之间用下标引用。
//! 每个顶点缓存一个物化后的计划节点；子顶点被替换后，父顶点在下一次物化时重建。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::core::error::{PlanError, PlanResult};
use crate::query::planner::plan::PlanNode;

/// 顶点下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

#[derive(Debug, Clone)]
struct HepVertex {
    node: Arc<PlanNode>,
    inputs: Vec<VertexId>,
}

/// 工作图
#[derive(Debug, Clone)]
pub struct HepGraph {
    vertices: Vec<Option<HepVertex>>,
    root: VertexId,
    /// 缓存节点地址到顶点的映射，用于识别替换结果中复用的已有子树
    by_node: HashMap<usize, VertexId>,
}

impl HepGraph {
    pub fn new(tree: &Arc<PlanNode>) -> Self {
        let mut graph = Self {
            vertices: Vec::new(),
            root: VertexId(0),
            by_node: HashMap::new(),
        };
        graph.root = graph.add_tree(tree);
        graph
    }

    pub fn root(&self) -> VertexId {
        self.root
    }

    /// 顶点当前缓存的节点
    pub fn node(&self, vertex: VertexId) -> Option<&Arc<PlanNode>> {
        self.vertex(vertex).map(|v| &v.node)
    }

    /// 存活顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_some()).count()
    }

    /// 从根出发的前序（自顶向下、从左到右）顶点序列
    pub fn preorder(&self) -> Vec<VertexId> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![self.root];
        while let Some(v) = stack.pop() {
            if !visited.insert(v) {
                continue;
            }
            order.push(v);
            if let Some(vertex) = self.vertex(v) {
                for input in vertex.inputs.iter().rev() {
                    stack.push(*input);
                }
            }
        }
        order
    }

    /// 用新子树替换顶点：所有父顶点改为指向新顶点，随后重新物化并回收不可达顶点
    pub fn replace(&mut self, target: VertexId, replacement: &Arc<PlanNode>) -> PlanResult<VertexId> {
        let first_added = self.vertices.len();
        let new_vertex = self.add_tree(replacement);
        if new_vertex != target {
            // 新加入的顶点可能以原顶点为输入，不能改写
            for vertex in self.vertices[..first_added].iter_mut().flatten() {
                for input in vertex.inputs.iter_mut() {
                    if *input == target {
                        *input = new_vertex;
                    }
                }
            }
            if self.root == target {
                self.root = new_vertex;
            }
        }
        self.materialize_root()?;
        self.collect_garbage();
        Ok(new_vertex)
    }

    /// 重建根节点，子节点发生变化的顶点通过 `with_children` 得到新节点
    pub fn materialize_root(&mut self) -> PlanResult<Arc<PlanNode>> {
        let mut done = HashSet::new();
        self.materialize(self.root, &mut done)
    }

    fn materialize(
        &mut self,
        vertex: VertexId,
        done: &mut HashSet<VertexId>,
    ) -> PlanResult<Arc<PlanNode>> {
        let (node, inputs) = match self.vertex(vertex) {
            Some(v) => (v.node.clone(), v.inputs.clone()),
            None => {
                return Err(PlanError::schema_mismatch(format!(
                    "工作图中不存在顶点 {}",
                    vertex.0
                )))
            }
        };
        if !done.insert(vertex) {
            return Ok(node);
        }
        let mut children = Vec::with_capacity(inputs.len());
        for input in inputs {
            children.push(self.materialize(input, done)?);
        }
        let unchanged = children.len() == node.children().len()
            && children
                .iter()
                .zip(node.children())
                .all(|(a, b)| Arc::ptr_eq(a, b));
        if unchanged {
            return Ok(node);
        }
        let rebuilt = Arc::new(node.with_children(children)?);
        self.by_node.remove(&node_key(&node));
        self.by_node.insert(node_key(&rebuilt), vertex);
        if let Some(Some(v)) = self.vertices.get_mut(vertex.0) {
            v.node = rebuilt.clone();
        }
        Ok(rebuilt)
    }

    fn vertex(&self, vertex: VertexId) -> Option<&HepVertex> {
        self.vertices.get(vertex.0).and_then(|v| v.as_ref())
    }

    /// 已在图中的节点复用原顶点，其余节点新建顶点
    fn add_tree(&mut self, node: &Arc<PlanNode>) -> VertexId {
        if let Some(existing) = self.by_node.get(&node_key(node)) {
            return *existing;
        }
        let inputs = node.children().iter().map(|c| self.add_tree(c)).collect();
        let id = VertexId(self.vertices.len());
        self.vertices.push(Some(HepVertex {
            node: node.clone(),
            inputs,
        }));
        self.by_node.insert(node_key(node), id);
        id
    }

    fn collect_garbage(&mut self) {
        let live: HashSet<VertexId> = self.preorder().into_iter().collect();
        for (i, slot) in self.vertices.iter_mut().enumerate() {
            if live.contains(&VertexId(i)) {
                continue;
            }
            if let Some(dead) = slot.take() {
                self.by_node.remove(&node_key(&dead.node));
            }
        }
    }
}

fn node_key(node: &Arc<PlanNode>) -> usize {
    Arc::as_ptr(node) as usize
}
