//! OID reference graph.
//!
//! Indexes every identifier declared in the document and every place an
//! identifier is consumed. Entities live in the document model; the graph
//! holds only OID strings and positional indexes, so lookups are O(log n)
//! and iteration order is always document declaration order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use define_model::{DocumentModel, EntityKind};

/// One OID declaration site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: EntityKind,
    pub oid: String,
    pub name: String,
    /// Position in document declaration order.
    pub index: usize,
}

/// What a reference edge means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RefKind {
    /// Dataset `ItemRef` → variable.
    DatasetVariable,
    /// Variable `CodeListOID` → codelist.
    VariableCodeList,
    /// Variable `def:MethodOID` → method.
    VariableMethod,
    /// Codelist `def:StandardOID` → standard.
    CodeListStandard,
}

impl RefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::DatasetVariable => "ItemOID",
            RefKind::VariableCodeList => "CodeListOID",
            RefKind::VariableMethod => "MethodOID",
            RefKind::CodeListStandard => "StandardOID",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A (source entity, referenced OID, reference kind) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEdge {
    pub source_kind: EntityKind,
    pub source_oid: String,
    pub source_name: String,
    pub target_oid: String,
    pub kind: RefKind,
}

/// Identifier registry plus adjacency for one document.
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    declarations: Vec<Declaration>,
    by_oid: BTreeMap<String, Vec<usize>>,
    edges: Vec<ReferenceEdge>,
    referencers: BTreeMap<String, Vec<usize>>,
}

impl ReferenceGraph {
    /// Walk every entity's outbound references and build the registry.
    pub fn build(model: &DocumentModel) -> Self {
        let mut graph = ReferenceGraph::default();

        for (kind, oid, name) in model.declarations() {
            let index = graph.declarations.len();
            graph.declarations.push(Declaration {
                kind,
                oid: oid.to_string(),
                name: name.to_string(),
                index,
            });
            graph.by_oid.entry(oid.to_string()).or_default().push(index);
        }

        for dataset in &model.datasets {
            for variable_ref in &dataset.variable_refs {
                graph.push_edge(ReferenceEdge {
                    source_kind: EntityKind::Dataset,
                    source_oid: dataset.oid.clone(),
                    source_name: dataset.name.clone(),
                    target_oid: variable_ref.item_oid.clone(),
                    kind: RefKind::DatasetVariable,
                });
            }
        }
        for variable in &model.variables {
            if let Some(codelist_oid) = &variable.codelist_oid {
                graph.push_edge(ReferenceEdge {
                    source_kind: EntityKind::Variable,
                    source_oid: variable.oid.clone(),
                    source_name: variable.name.clone(),
                    target_oid: codelist_oid.clone(),
                    kind: RefKind::VariableCodeList,
                });
            }
            if let Some(method_oid) = &variable.method_oid {
                graph.push_edge(ReferenceEdge {
                    source_kind: EntityKind::Variable,
                    source_oid: variable.oid.clone(),
                    source_name: variable.name.clone(),
                    target_oid: method_oid.clone(),
                    kind: RefKind::VariableMethod,
                });
            }
        }
        for codelist in &model.codelists {
            if let Some(standard_oid) = &codelist.standard_oid {
                graph.push_edge(ReferenceEdge {
                    source_kind: EntityKind::CodeList,
                    source_oid: codelist.oid.clone(),
                    source_name: codelist.name.clone(),
                    target_oid: standard_oid.clone(),
                    kind: RefKind::CodeListStandard,
                });
            }
        }

        graph
    }

    fn push_edge(&mut self, edge: ReferenceEdge) {
        let index = self.edges.len();
        self.referencers
            .entry(edge.target_oid.clone())
            .or_default()
            .push(index);
        self.edges.push(edge);
    }

    /// Resolve an OID to its declaration. When an OID is (illegally) declared
    /// more than once, the first declaration wins; [`declarers_of`] exposes
    /// the full set for duplicate detection.
    ///
    /// [`declarers_of`]: ReferenceGraph::declarers_of
    pub fn resolve(&self, oid: &str) -> Option<&Declaration> {
        self.by_oid
            .get(oid)
            .and_then(|indexes| indexes.first())
            .map(|&index| &self.declarations[index])
    }

    /// Every declaration site for an OID, in document order.
    pub fn declarers_of(&self, oid: &str) -> Vec<&Declaration> {
        self.by_oid
            .get(oid)
            .map(|indexes| indexes.iter().map(|&i| &self.declarations[i]).collect())
            .unwrap_or_default()
    }

    /// Every edge consuming an OID, in document order.
    pub fn referencers_of(&self, oid: &str) -> Vec<&ReferenceEdge> {
        self.referencers
            .get(oid)
            .map(|indexes| indexes.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    /// All reference edges in document order.
    pub fn edges(&self) -> &[ReferenceEdge] {
        &self.edges
    }

    /// OIDs with more than one declaration site, ordered by first
    /// declaration so output is reproducible across runs.
    pub fn duplicate_oids(&self) -> Vec<(&str, Vec<&Declaration>)> {
        let mut duplicates: Vec<(&str, Vec<&Declaration>)> = self
            .by_oid
            .iter()
            .filter(|(_, indexes)| indexes.len() > 1)
            .map(|(oid, indexes)| {
                (
                    oid.as_str(),
                    indexes.iter().map(|&i| &self.declarations[i]).collect::<Vec<_>>(),
                )
            })
            .collect();
        duplicates.sort_by_key(|(_, declarers)| declarers[0].index);
        duplicates
    }

    /// Edges whose target OID has no declaration, deduplicated to one per
    /// distinct (source, target, kind) triple, in document order.
    pub fn orphaned_edges(&self) -> Vec<&ReferenceEdge> {
        let mut seen = BTreeSet::new();
        let mut orphans = Vec::new();
        for edge in &self.edges {
            if self.by_oid.contains_key(&edge.target_oid) {
                continue;
            }
            let key = (edge.source_oid.clone(), edge.kind, edge.target_oid.clone());
            if seen.insert(key) {
                orphans.push(edge);
            }
        }
        orphans
    }

    /// Declarations of the given kind that no edge references,
    /// in document order.
    pub fn unused_of_kind(&self, kind: EntityKind) -> Vec<&Declaration> {
        self.declarations
            .iter()
            .filter(|decl| decl.kind == kind && !self.referencers.contains_key(&decl.oid))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use define_model::{
        CodeList, Dataset, DocumentModel, Method, OriginKind, Variable, VariableRef,
    };

    fn variable(oid: &str, name: &str) -> Variable {
        Variable {
            oid: oid.to_string(),
            name: name.to_string(),
            label: Some(name.to_string()),
            data_type: Some("text".to_string()),
            origin: Some(OriginKind::Collected),
            method_oid: None,
            codelist_oid: None,
        }
    }

    fn model() -> DocumentModel {
        DocumentModel {
            study_oid: "STUDY".to_string(),
            study_name: None,
            metadata_version_oid: "MDV".to_string(),
            define_version: None,
            standards: vec![],
            datasets: vec![Dataset {
                oid: "IG.DM".to_string(),
                name: "DM".to_string(),
                description: None,
                structure: Some("One record per subject".to_string()),
                variable_refs: vec![
                    VariableRef {
                        item_oid: "IT.DM.STUDYID".to_string(),
                        order_number: Some("1".to_string()),
                        mandatory: true,
                    },
                    VariableRef {
                        item_oid: "IT.DM.MISSING".to_string(),
                        order_number: Some("2".to_string()),
                        mandatory: false,
                    },
                ],
            }],
            variables: vec![
                Variable {
                    codelist_oid: Some("CL.SEX".to_string()),
                    ..variable("IT.DM.STUDYID", "STUDYID")
                },
                variable("IT.DM.STUDYID", "STUDYID2"),
            ],
            codelists: vec![CodeList {
                oid: "CL.SEX".to_string(),
                name: "SEX".to_string(),
                data_type: None,
                standard_oid: None,
                terms: vec![],
            }],
            methods: vec![Method {
                oid: "MT.ORPHANED".to_string(),
                name: "Unreferenced".to_string(),
                method_type: None,
                description: None,
                formal_expression: None,
            }],
            value_lists: vec![],
        }
    }

    #[test]
    fn resolve_and_declarers() {
        let model = model();
        let graph = ReferenceGraph::build(&model);
        let decl = graph.resolve("CL.SEX").expect("resolve codelist");
        assert_eq!(decl.kind, EntityKind::CodeList);
        assert!(graph.resolve("CL.NOPE").is_none());
        assert_eq!(graph.declarers_of("IT.DM.STUDYID").len(), 2);
    }

    #[test]
    fn duplicates_ordered_by_first_declaration() {
        let graph = ReferenceGraph::build(&model());
        let duplicates = graph.duplicate_oids();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].0, "IT.DM.STUDYID");
        assert_eq!(duplicates[0].1[0].name, "STUDYID");
        assert_eq!(duplicates[0].1[1].name, "STUDYID2");
    }

    #[test]
    fn orphaned_edges_are_distinct_and_ordered() {
        let graph = ReferenceGraph::build(&model());
        let orphans = graph.orphaned_edges();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].target_oid, "IT.DM.MISSING");
        assert_eq!(orphans[0].kind, RefKind::DatasetVariable);
    }

    #[test]
    fn reverse_lookup_finds_referencers() {
        let graph = ReferenceGraph::build(&model());
        let referencers = graph.referencers_of("CL.SEX");
        assert_eq!(referencers.len(), 1);
        assert_eq!(referencers[0].source_name, "STUDYID");
        assert!(graph.referencers_of("MT.ORPHANED").is_empty());
    }

    #[test]
    fn unused_methods_detected() {
        let graph = ReferenceGraph::build(&model());
        let unused = graph.unused_of_kind(EntityKind::Method);
        assert_eq!(unused.len(), 1);
        assert_eq!(unused[0].oid, "MT.ORPHANED");
        assert!(graph.unused_of_kind(EntityKind::CodeList).is_empty());
    }
}
