use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Origin of a variable's values per Define-XML `def:Origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginKind {
    /// Captured on a CRF or transferred from an external source.
    Collected,
    /// Computed from other variables; must cite a method.
    Derived,
    /// Assigned by the sponsor (protocol constants, coding decisions).
    Assigned,
}

impl OriginKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OriginKind::Collected => "Collected",
            OriginKind::Derived => "Derived",
            OriginKind::Assigned => "Assigned",
        }
    }
}

impl fmt::Display for OriginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OriginKind {
    type Err = String;

    /// Parse an origin string as found in define.xml files. Legacy spellings
    /// ("CRF", "eDT") map onto the collected kind.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "COLLECTED" | "CRF" | "EDT" => Ok(OriginKind::Collected),
            "DERIVED" => Ok(OriginKind::Derived),
            "ASSIGNED" | "PROTOCOL" | "PREDECESSOR" => Ok(OriginKind::Assigned),
            _ => Err(format!("Unknown origin kind: {}", s)),
        }
    }
}

/// A variable definition (`ItemDef`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub oid: String,
    pub name: String,
    pub label: Option<String>,
    pub data_type: Option<String>,
    pub origin: Option<OriginKind>,
    /// Reference to a computational method. Required when origin is derived.
    pub method_oid: Option<String>,
    /// Reference to a controlled-terminology codelist.
    pub codelist_oid: Option<String>,
}

impl Variable {
    pub fn is_derived(&self) -> bool {
        self.origin == Some(OriginKind::Derived)
    }
}

/// One ordered variable reference inside a dataset (`ItemRef`).
///
/// `order_number` keeps the raw attribute text: non-numeric values are a
/// reportable ordering defect, not a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableRef {
    pub item_oid: String,
    pub order_number: Option<String>,
    pub mandatory: bool,
}

/// A dataset definition (`ItemGroupDef`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub oid: String,
    pub name: String,
    pub description: Option<String>,
    /// Structure keyword, e.g. "One record per subject".
    pub structure: Option<String>,
    pub variable_refs: Vec<VariableRef>,
}

/// One controlled term: (submission value, decoded value).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    pub coded_value: String,
    pub decode: Option<String>,
}

/// A named controlled-terminology codelist (`CodeList`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeList {
    pub oid: String,
    pub name: String,
    pub data_type: Option<String>,
    /// Reference to a published CT standard (`def:StandardOID`).
    pub standard_oid: Option<String>,
    pub terms: Vec<Term>,
}

/// A value-level metadata definition (`def:ValueListDef`): per-value
/// variable metadata keyed by an ordered list of item references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueList {
    pub oid: String,
    pub item_refs: Vec<VariableRef>,
}

/// A computational method (`def:MethodDef`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    pub oid: String,
    pub name: String,
    pub method_type: Option<String>,
    pub description: Option<String>,
    /// Deterministic code fragment (`FormalExpression`), when present.
    pub formal_expression: Option<String>,
}

/// A declared standard (`def:Standard`), e.g. SDTMIG 3.4.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardDecl {
    pub oid: String,
    pub name: String,
    pub standard_type: Option<String>,
    pub version: Option<String>,
}

/// The kind of entity an OID declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Dataset,
    Variable,
    CodeList,
    Method,
    Standard,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Dataset => "Dataset",
            EntityKind::Variable => "Variable",
            EntityKind::CodeList => "CodeList",
            EntityKind::Method => "Method",
            EntityKind::Standard => "Standard",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable in-memory representation of one parsed define.xml document.
///
/// Entity vectors preserve document declaration order; all downstream
/// reporting relies on that order for reproducible output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentModel {
    pub study_oid: String,
    pub study_name: Option<String>,
    pub metadata_version_oid: String,
    pub define_version: Option<String>,
    pub standards: Vec<StandardDecl>,
    pub datasets: Vec<Dataset>,
    pub variables: Vec<Variable>,
    pub codelists: Vec<CodeList>,
    pub methods: Vec<Method>,
    pub value_lists: Vec<ValueList>,
}

impl DocumentModel {
    /// Every declared (kind, oid, name) triple in document order.
    pub fn declarations(&self) -> Vec<(EntityKind, &str, &str)> {
        let mut out = Vec::new();
        for standard in &self.standards {
            out.push((EntityKind::Standard, standard.oid.as_str(), standard.name.as_str()));
        }
        for dataset in &self.datasets {
            out.push((EntityKind::Dataset, dataset.oid.as_str(), dataset.name.as_str()));
        }
        for variable in &self.variables {
            out.push((EntityKind::Variable, variable.oid.as_str(), variable.name.as_str()));
        }
        for codelist in &self.codelists {
            out.push((EntityKind::CodeList, codelist.oid.as_str(), codelist.name.as_str()));
        }
        for method in &self.methods {
            out.push((EntityKind::Method, method.oid.as_str(), method.name.as_str()));
        }
        out
    }

    pub fn variable(&self, oid: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.oid == oid)
    }

    pub fn method(&self, oid: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.oid == oid)
    }

    pub fn codelist(&self, oid: &str) -> Option<&CodeList> {
        self.codelists.iter().find(|c| c.oid == oid)
    }

    /// Locate a codelist by name containment or exact OID, the lookup rule
    /// used for the RACE/SEX terminology checks.
    pub fn codelist_by_name_or_oid(&self, needle: &str, oid: &str) -> Option<&CodeList> {
        self.codelists
            .iter()
            .find(|c| c.name.to_uppercase().contains(&needle.to_uppercase()) || c.oid == oid)
    }
}
