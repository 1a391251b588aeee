//! End-to-end validation scenarios over complete define.xml documents.

use define_model::{LayerId, RunStatus, SchemaOutcome, Severity, ValidationConfig};
use define_validate::{ValidationOptions, validate_bytes};

/// A minimal fully-compliant document: one dataset, one collected variable,
/// every required field present.
const CLEAN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ODM xmlns="http://www.cdisc.org/ns/odm/v1.3"
     xmlns:def="http://www.cdisc.org/ns/def/v2.1"
     FileOID="TEST.DEFINE.001" FileType="Snapshot" ODMVersion="1.3.2">
  <Study OID="TEST.STUDY">
    <GlobalVariables><StudyName>Test Study</StudyName></GlobalVariables>
    <MetaDataVersion OID="MDV.TEST" Name="Test MetaData" def:DefineVersion="2.1.0">
      <def:Standard OID="STD.SDTM" Name="SDTMIG" Type="IG" Version="3.4"/>
      <ItemGroupDef OID="IG.DM" Name="DM" Repeating="No" def:Structure="One record per subject">
        <Description><TranslatedText>Demographics</TranslatedText></Description>
        <ItemRef ItemOID="IT.DM.STUDYID" Mandatory="Yes" OrderNumber="1"/>
      </ItemGroupDef>
      <ItemDef OID="IT.DM.STUDYID" Name="STUDYID" DataType="text" def:Origin="CRF">
        <Description><TranslatedText>Study Identifier</TranslatedText></Description>
      </ItemDef>
    </MetaDataVersion>
  </Study>
</ODM>"#;

/// A derived variable without a MethodOID, otherwise compliant.
const DERIVED_NO_METHOD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ODM xmlns="http://www.cdisc.org/ns/odm/v1.3"
     xmlns:def="http://www.cdisc.org/ns/def/v2.1">
  <Study OID="TEST.STUDY">
    <MetaDataVersion OID="MDV.TEST" Name="Test MetaData">
      <def:Standard OID="STD.SDTM" Name="SDTMIG" Type="IG" Version="3.4"/>
      <ItemGroupDef OID="IG.DM" Name="DM" def:Structure="One record per subject">
        <Description><TranslatedText>Demographics</TranslatedText></Description>
        <ItemRef ItemOID="IT.DM.USUBJID" Mandatory="Yes" OrderNumber="1"/>
      </ItemGroupDef>
      <ItemDef OID="IT.DM.USUBJID" Name="USUBJID" DataType="text" def:Origin="Derived">
        <Description><TranslatedText>Unique Subject Identifier</TranslatedText></Description>
      </ItemDef>
    </MetaDataVersion>
  </Study>
</ODM>"#;

/// A RACE codelist missing OTHER from the required 9-term set.
const RACE_MISSING_OTHER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ODM xmlns="http://www.cdisc.org/ns/odm/v1.3"
     xmlns:def="http://www.cdisc.org/ns/def/v2.1">
  <Study OID="TEST.STUDY">
    <MetaDataVersion OID="MDV.TEST" Name="Test MetaData">
      <def:Standard OID="STD.SDTM" Name="SDTMIG" Type="IG" Version="3.4"/>
      <ItemGroupDef OID="IG.DM" Name="DM" def:Structure="One record per subject">
        <Description><TranslatedText>Demographics</TranslatedText></Description>
        <ItemRef ItemOID="IT.DM.RACE" Mandatory="Yes" OrderNumber="1"/>
      </ItemGroupDef>
      <ItemDef OID="IT.DM.RACE" Name="RACE" DataType="text" def:Origin="CRF" CodeListOID="CL.RACE">
        <Description><TranslatedText>Race</TranslatedText></Description>
      </ItemDef>
      <CodeList OID="CL.RACE" Name="RACE" DataType="text" def:StandardOID="STD.CT">
        <CodeListItem CodedValue="AMERICAN INDIAN OR ALASKA NATIVE"/>
        <CodeListItem CodedValue="ASIAN"/>
        <CodeListItem CodedValue="BLACK OR AFRICAN AMERICAN"/>
        <CodeListItem CodedValue="NATIVE HAWAIIAN OR OTHER PACIFIC ISLANDER"/>
        <CodeListItem CodedValue="WHITE"/>
        <CodeListItem CodedValue="MULTIPLE"/>
        <CodeListItem CodedValue="NOT REPORTED"/>
        <CodeListItem CodedValue="UNKNOWN"/>
      </CodeList>
    </MetaDataVersion>
  </Study>
</ODM>"#;

/// Two variables declared with the same OID.
const DUPLICATE_OID: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ODM xmlns="http://www.cdisc.org/ns/odm/v1.3"
     xmlns:def="http://www.cdisc.org/ns/def/v2.1">
  <Study OID="TEST.STUDY">
    <MetaDataVersion OID="MDV.TEST" Name="Test MetaData">
      <def:Standard OID="STD.SDTM" Name="SDTMIG" Type="IG" Version="3.4"/>
      <ItemGroupDef OID="IG.DM" Name="DM" def:Structure="One record per subject">
        <Description><TranslatedText>Demographics</TranslatedText></Description>
        <ItemRef ItemOID="IT.DM.AGE" Mandatory="Yes" OrderNumber="1"/>
      </ItemGroupDef>
      <ItemDef OID="IT.DM.AGE" Name="AGE" DataType="integer" def:Origin="CRF">
        <Description><TranslatedText>Age</TranslatedText></Description>
      </ItemDef>
      <ItemDef OID="IT.DM.AGE" Name="AGEU" DataType="text" def:Origin="CRF">
        <Description><TranslatedText>Age Units</TranslatedText></Description>
      </ItemDef>
    </MetaDataVersion>
  </Study>
</ODM>"#;

#[test]
fn scenario_a_clean_document_passes_with_zero_findings() {
    let config = ValidationConfig::default();
    let result = validate_bytes(CLEAN.as_bytes(), &config, &ValidationOptions::default())
        .expect("validate");
    assert_eq!(result.finding_count(), 0, "findings: {:?}", result.findings().collect::<Vec<_>>());
    assert_eq!(result.status, RunStatus::Pass);
}

#[test]
fn scenario_b_derived_without_method_is_one_critical() {
    let config = ValidationConfig::default();
    let result = validate_bytes(
        DERIVED_NO_METHOD.as_bytes(),
        &config,
        &ValidationOptions::default(),
    )
    .expect("validate");

    let bus_001: Vec<_> = result
        .findings()
        .filter(|f| f.rule_id == "BUS-001")
        .collect();
    assert_eq!(bus_001.len(), 1);
    assert_eq!(bus_001[0].severity, Severity::Critical);
    assert_eq!(bus_001[0].check, "derived_no_method");
    assert_eq!(bus_001[0].oid.as_deref(), Some("IT.DM.USUBJID"));
    assert_eq!(result.count_at(Severity::Critical), 1);
    assert_eq!(result.status, RunStatus::Fail);
}

#[test]
fn scenario_c_race_missing_other_names_the_term() {
    let config = ValidationConfig::default();
    assert_eq!(config.required_race_terms.len(), 9);

    let result = validate_bytes(
        RACE_MISSING_OTHER.as_bytes(),
        &config,
        &ValidationOptions::default(),
    )
    .expect("validate");

    let term_findings: Vec<_> = result
        .findings()
        .filter(|f| f.rule_id == "TERM-001")
        .collect();
    assert_eq!(term_findings.len(), 1);
    assert_eq!(term_findings[0].severity, Severity::Major);
    assert!(term_findings[0].message.contains("'OTHER'"));
    assert_eq!(term_findings[0].oid.as_deref(), Some("CL.RACE"));
}

#[test]
fn scenario_d_duplicate_oid_is_one_finding_citing_both_sites() {
    let config = ValidationConfig::default();
    let result = validate_bytes(
        DUPLICATE_OID.as_bytes(),
        &config,
        &ValidationOptions::default(),
    )
    .expect("validate");

    let duplicates: Vec<_> = result
        .findings()
        .filter(|f| f.rule_id == "PAT-002")
        .collect();
    assert_eq!(duplicates.len(), 1, "one finding per duplicated OID, not per site");
    assert_eq!(duplicates[0].severity, Severity::Critical);
    assert!(duplicates[0].message.contains("'AGE'"));
    assert!(duplicates[0].message.contains("'AGEU'"));
    assert_eq!(duplicates[0].oid.as_deref(), Some("IT.DM.AGE"));
}

#[test]
fn orphaned_reference_is_one_finding_per_distinct_edge() {
    // The same missing OID referenced twice from one dataset collapses to
    // one finding; a second referencing entity adds another.
    let doc = r#"<ODM><Study OID="S"><MetaDataVersion OID="MDV" Name="MDV">
        <ItemGroupDef OID="IG.DM" Name="DM" Structure="One record per subject">
          <Description><TranslatedText>Demographics</TranslatedText></Description>
          <ItemRef ItemOID="IT.DM.GONE" OrderNumber="1"/>
          <ItemRef ItemOID="IT.DM.GONE" OrderNumber="2"/>
        </ItemGroupDef>
        <ItemDef OID="IT.DM.SEX" Name="SEX" DataType="text" Origin="CRF" CodeListOID="CL.GONE">
          <Description><TranslatedText>Sex</TranslatedText></Description>
        </ItemDef>
    </MetaDataVersion></Study></ODM>"#;
    let config = ValidationConfig::default();
    let result = validate_bytes(
        doc.as_bytes(),
        &config,
        &ValidationOptions::new()
            .with_layers(ValidationOptions::layer_set(&[7]).expect("layer set")),
    )
    .expect("validate");

    let orphans: Vec<_> = result
        .findings()
        .filter(|f| f.rule_id == "PAT-001")
        .collect();
    assert_eq!(orphans.len(), 2);
    assert!(orphans.iter().all(|f| f.severity == Severity::Critical));
    assert_eq!(orphans[0].oid.as_deref(), Some("IT.DM.GONE"));
    assert_eq!(orphans[1].oid.as_deref(), Some("CL.GONE"));
}

#[test]
fn layer_subset_matches_filtered_full_run() {
    let config = ValidationConfig::default();
    let full = validate_bytes(
        DERIVED_NO_METHOD.as_bytes(),
        &config,
        &ValidationOptions::default(),
    )
    .expect("validate");
    let only_business = validate_bytes(
        DERIVED_NO_METHOD.as_bytes(),
        &config,
        &ValidationOptions::new()
            .with_layers(ValidationOptions::layer_set(&[3]).expect("layer set")),
    )
    .expect("validate");

    assert_eq!(only_business.layers.len(), 1);
    let from_full = full.layer(LayerId::Business).expect("business layer");
    let from_subset = only_business.layer(LayerId::Business).expect("business layer");
    let a = serde_json::to_string(&from_full.findings).expect("serialize");
    let b = serde_json::to_string(&from_subset.findings).expect("serialize");
    assert_eq!(a, b);
}

#[test]
fn unrequested_layers_are_absent_not_passed() {
    let config = ValidationConfig::default();
    let result = validate_bytes(
        CLEAN.as_bytes(),
        &config,
        &ValidationOptions::new()
            .with_layers(ValidationOptions::layer_set(&[2, 3]).expect("layer set")),
    )
    .expect("validate");
    assert_eq!(result.layers.len(), 2);
    assert!(result.layer(LayerId::Terminology).is_none());
}

#[test]
fn schema_layer_is_skipped_without_an_outcome() {
    let config = ValidationConfig::default();
    let result = validate_bytes(CLEAN.as_bytes(), &config, &ValidationOptions::default())
        .expect("validate");
    assert!(result.layer(LayerId::Schema).is_none());

    let failed = validate_bytes(
        CLEAN.as_bytes(),
        &config,
        &ValidationOptions::new().with_schema_outcome(SchemaOutcome {
            valid: false,
            messages: vec![],
        }),
    )
    .expect("validate");
    let schema = failed.layer(LayerId::Schema).expect("schema layer");
    assert_eq!(schema.findings.len(), 1);
    assert_eq!(failed.status, RunStatus::Fail);
}

#[test]
fn repeated_runs_are_byte_identical_apart_from_the_clock() {
    let config = ValidationConfig::default();
    let options = ValidationOptions::default();
    let a = validate_bytes(RACE_MISSING_OTHER.as_bytes(), &config, &options).expect("validate");
    let b = validate_bytes(RACE_MISSING_OTHER.as_bytes(), &config, &options).expect("validate");

    let layers_a = serde_json::to_string(&a.layers).expect("serialize");
    let layers_b = serde_json::to_string(&b.layers).expect("serialize");
    assert_eq!(layers_a, layers_b);
    assert_eq!(a.audit.sha256, b.audit.sha256);
    assert_eq!(a.status, b.status);
}

#[test]
fn strict_flag_only_tightens_status() {
    let config = ValidationConfig::default();
    // COMP-002: dataset description missing -> WARNING.
    let doc = r#"<ODM><Study OID="S"><MetaDataVersion OID="MDV" Name="MDV">
        <ItemGroupDef OID="IG.DM" Name="DM" Structure="One record per subject">
          <ItemRef ItemOID="IT.DM.STUDYID" OrderNumber="1"/>
        </ItemGroupDef>
        <ItemDef OID="IT.DM.STUDYID" Name="STUDYID" DataType="text" Origin="CRF">
          <Description><TranslatedText>Study Identifier</TranslatedText></Description>
        </ItemDef>
    </MetaDataVersion></Study></ODM>"#;
    let layers = ValidationOptions::layer_set(&[2, 3, 5, 6, 7]).expect("layer set");

    let relaxed = validate_bytes(
        doc.as_bytes(),
        &config,
        &ValidationOptions::new().with_layers(layers.clone()),
    )
    .expect("validate");
    let strict = validate_bytes(
        doc.as_bytes(),
        &config,
        &ValidationOptions::new().with_layers(layers).with_strict(true),
    )
    .expect("validate");

    assert!(relaxed.count_at(Severity::Warning) > 0);
    assert_eq!(relaxed.status, RunStatus::Pass);
    assert_eq!(strict.status, RunStatus::Fail);
}

#[test]
fn severity_override_applies_under_the_published_check_id() {
    // Overrides are keyed by the check id a finding carries, the same id
    // the check catalog lists, for every rule sharing that id.
    let doc = r#"<ODM><Study OID="S"><MetaDataVersion OID="MDV" Name="MDV">
        <ItemGroupDef OID="IG.DM" Name="DM" Structure="One record per subject">
          <Description><TranslatedText>Demographics</TranslatedText></Description>
          <ItemRef ItemOID="IT.DM.AGE" OrderNumber="2"/>
          <ItemRef ItemOID="IT.DM.SEX" OrderNumber="1"/>
        </ItemGroupDef>
        <ItemDef OID="IT.DM.AGE" Name="AGE" DataType="integer" Origin="Derived" MethodOID="MT.AGE">
          <Description><TranslatedText>Age</TranslatedText></Description>
        </ItemDef>
        <ItemDef OID="IT.DM.SEX" Name="SEX" DataType="text" Origin="CRF">
          <Description><TranslatedText>Sex</TranslatedText></Description>
        </ItemDef>
        <MethodDef OID="MT.AGE" Name="Age Derivation" Type="Computation">
          <Description><TranslatedText>AGE computed from BRTHDTC</TranslatedText></Description>
        </MethodDef>
    </MetaDataVersion></Study></ODM>"#;
    let config = ValidationConfig::from_json_str(
        r#"{"validation_criticality": {"method_quality": "CRITICAL", "variable_ordering": "MAJOR"}}"#,
    )
    .expect("config");
    let result = validate_bytes(doc.as_bytes(), &config, &ValidationOptions::default())
        .expect("validate");

    let brief = result
        .findings()
        .find(|f| f.rule_id == "METH-002")
        .expect("brief-description finding");
    assert_eq!(brief.check, "method_quality");
    assert_eq!(brief.severity, Severity::Critical);

    let ordering = result
        .findings()
        .find(|f| f.rule_id == "PAT-005")
        .expect("ordering finding");
    assert_eq!(ordering.check, "variable_ordering");
    assert_eq!(ordering.severity, Severity::Major);
}

#[test]
fn empty_value_list_is_one_warning() {
    let doc = r#"<ODM xmlns:def="http://www.cdisc.org/ns/def/v2.1">
      <Study OID="S"><MetaDataVersion OID="MDV" Name="MDV">
        <ItemGroupDef OID="IG.DM" Name="DM" Structure="One record per subject">
          <Description><TranslatedText>Demographics</TranslatedText></Description>
          <ItemRef ItemOID="IT.DM.STUDYID" OrderNumber="1"/>
        </ItemGroupDef>
        <ItemDef OID="IT.DM.STUDYID" Name="STUDYID" DataType="text" Origin="CRF">
          <Description><TranslatedText>Study Identifier</TranslatedText></Description>
        </ItemDef>
        <def:ValueListDef OID="VL.EMPTY"/>
        <def:ValueListDef OID="VL.LBORRES">
          <ItemRef ItemOID="IT.DM.STUDYID" OrderNumber="1"/>
        </def:ValueListDef>
    </MetaDataVersion></Study></ODM>"#;
    let config = ValidationConfig::default();
    let result = validate_bytes(
        doc.as_bytes(),
        &config,
        &ValidationOptions::new()
            .with_layers(ValidationOptions::layer_set(&[7]).expect("layer set")),
    )
    .expect("validate");

    let vlm: Vec<_> = result
        .findings()
        .filter(|f| f.rule_id == "PAT-006")
        .collect();
    assert_eq!(vlm.len(), 1, "only the empty list is reported");
    assert_eq!(vlm[0].severity, Severity::Warning);
    assert_eq!(vlm[0].check, "vlm_validation");
    assert_eq!(vlm[0].oid.as_deref(), Some("VL.EMPTY"));
}

#[test]
fn severity_override_reclassifies_a_check() {
    let config = ValidationConfig::from_json_str(
        r#"{"validation_criticality": {"derived_no_method": "WARNING"}}"#,
    )
    .expect("config");
    let result = validate_bytes(
        DERIVED_NO_METHOD.as_bytes(),
        &config,
        &ValidationOptions::default(),
    )
    .expect("validate");
    let bus_001 = result
        .findings()
        .find(|f| f.rule_id == "BUS-001")
        .expect("finding");
    assert_eq!(bus_001.severity, Severity::Warning);
    assert_eq!(result.status, RunStatus::Pass);
}
