//! Document model construction from a parsed element tree.
//!
//! Construction is a pure function of the input tree: identical input yields
//! an identical model, which keeps downstream findings reproducible. A
//! document can be schema-valid and still fail here when a domain-required
//! container or attribute is absent.

use tracing::debug;

use define_model::{
    CodeList, Dataset, DefineError, DocumentModel, Method, OriginKind, Result, StandardDecl,
    Term, ValueList, Variable, VariableRef,
};

use crate::tree::Element;

/// Build the typed document model from a parsed tree.
pub fn build_document(root: &Element) -> Result<DocumentModel> {
    if root.local_name() != "ODM" {
        return Err(DefineError::Structural(format!(
            "expected ODM root element, found '{}'",
            root.name
        )));
    }
    let study = root
        .child("Study")
        .ok_or_else(|| DefineError::Structural("missing Study element".to_string()))?;
    let study_oid = required_attr(study, "OID", "Study")?;
    let study_name = study
        .child("GlobalVariables")
        .and_then(|gv| gv.child("StudyName"))
        .map(|e| e.text.trim().to_string())
        .filter(|s| !s.is_empty());

    let mdv = study.child("MetaDataVersion").ok_or_else(|| {
        DefineError::Structural("missing MetaDataVersion element".to_string())
    })?;
    let metadata_version_oid = required_attr(mdv, "OID", "MetaDataVersion")?;
    let define_version = mdv.attr("DefineVersion").map(str::to_string);

    let mut model = DocumentModel {
        study_oid,
        study_name,
        metadata_version_oid,
        define_version,
        standards: Vec::new(),
        datasets: Vec::new(),
        variables: Vec::new(),
        codelists: Vec::new(),
        methods: Vec::new(),
        value_lists: Vec::new(),
    };

    // Single ordered pass over MetaDataVersion children keeps every entity
    // vector in document declaration order.
    for child in &mdv.children {
        match child.local_name() {
            "Standards" => {
                for standard in child.children_named("Standard") {
                    model.standards.push(build_standard(standard)?);
                }
            }
            "Standard" => model.standards.push(build_standard(child)?),
            "ItemGroupDef" => model.datasets.push(build_dataset(child)?),
            "ItemDef" => model.variables.push(build_variable(child)?),
            "CodeList" => model.codelists.push(build_codelist(child)?),
            "MethodDef" => model.methods.push(build_method(child)?),
            "ValueListDef" => model.value_lists.push(build_value_list(child)?),
            _ => {}
        }
    }

    debug!(
        datasets = model.datasets.len(),
        variables = model.variables.len(),
        codelists = model.codelists.len(),
        methods = model.methods.len(),
        value_lists = model.value_lists.len(),
        "document model built"
    );
    Ok(model)
}

fn required_attr(element: &Element, name: &str, context: &str) -> Result<String> {
    element
        .attr(name)
        .map(str::to_string)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            DefineError::Structural(format!("{context} is missing required attribute {name}"))
        })
}

fn build_standard(element: &Element) -> Result<StandardDecl> {
    Ok(StandardDecl {
        oid: required_attr(element, "OID", "Standard")?,
        name: required_attr(element, "Name", "Standard")?,
        standard_type: element.attr("Type").map(str::to_string),
        version: element.attr("Version").map(str::to_string),
    })
}

fn build_item_refs(element: &Element, owner: &str) -> Result<Vec<VariableRef>> {
    let mut refs = Vec::new();
    for item_ref in element.children_named("ItemRef") {
        let item_oid = required_attr(item_ref, "ItemOID", &format!("ItemRef in {owner}"))?;
        refs.push(VariableRef {
            item_oid,
            order_number: item_ref.attr("OrderNumber").map(str::to_string),
            mandatory: item_ref.attr("Mandatory") == Some("Yes"),
        });
    }
    Ok(refs)
}

fn build_dataset(element: &Element) -> Result<Dataset> {
    let oid = required_attr(element, "OID", "ItemGroupDef")?;
    let name = required_attr(element, "Name", &format!("ItemGroupDef {oid}"))?;
    let variable_refs = build_item_refs(element, &format!("dataset {name}"))?;
    Ok(Dataset {
        oid,
        name,
        description: element.translated_text(),
        structure: element
            .attr("Structure")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        variable_refs,
    })
}

fn build_variable(element: &Element) -> Result<Variable> {
    let oid = required_attr(element, "OID", "ItemDef")?;
    let name = required_attr(element, "Name", &format!("ItemDef {oid}"))?;
    // Origin appears as def:Origin (2.0 style attribute) or an Origin child
    // with a Type attribute (2.1 style); accept both.
    let origin_text = element
        .attr("Origin")
        .map(str::to_string)
        .or_else(|| {
            element
                .child("Origin")
                .and_then(|o| o.attr("Type"))
                .map(str::to_string)
        });
    let origin = origin_text.and_then(|text| text.parse::<OriginKind>().ok());
    let codelist_oid = element
        .attr("CodeListOID")
        .map(str::to_string)
        .or_else(|| {
            element
                .child("CodeListRef")
                .and_then(|r| r.attr("CodeListOID"))
                .map(str::to_string)
        });
    Ok(Variable {
        oid,
        name,
        label: element.translated_text(),
        data_type: element.attr("DataType").map(str::to_string),
        origin,
        method_oid: element
            .attr("MethodOID")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        codelist_oid,
    })
}

fn build_codelist(element: &Element) -> Result<CodeList> {
    let oid = required_attr(element, "OID", "CodeList")?;
    let name = required_attr(element, "Name", &format!("CodeList {oid}"))?;
    let mut terms = Vec::new();
    for item in &element.children {
        let local = item.local_name();
        if local != "CodeListItem" && local != "EnumeratedItem" {
            continue;
        }
        let coded_value =
            required_attr(item, "CodedValue", &format!("item in codelist {name}"))?;
        let decode = item
            .child("Decode")
            .and_then(|d| d.child("TranslatedText"))
            .map(|t| t.text.trim().to_string())
            .filter(|s| !s.is_empty());
        terms.push(Term {
            coded_value,
            decode,
        });
    }
    Ok(CodeList {
        oid,
        name,
        data_type: element.attr("DataType").map(str::to_string),
        standard_oid: element.attr("StandardOID").map(str::to_string),
        terms,
    })
}

fn build_value_list(element: &Element) -> Result<ValueList> {
    let oid = required_attr(element, "OID", "ValueListDef")?;
    let item_refs = build_item_refs(element, &format!("value list {oid}"))?;
    Ok(ValueList { oid, item_refs })
}

fn build_method(element: &Element) -> Result<Method> {
    let oid = required_attr(element, "OID", "MethodDef")?;
    let name = required_attr(element, "Name", &format!("MethodDef {oid}"))?;
    Ok(Method {
        oid,
        name,
        method_type: element.attr("Type").map(str::to_string),
        description: element.translated_text(),
        formal_expression: element
            .child("FormalExpression")
            .map(|e| e.text.trim().to_string())
            .filter(|s| !s.is_empty()),
    })
}
