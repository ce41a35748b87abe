//! Pipeline-level contracts: report wire shape, fallback behavior,
//! explanation degradation, and extended drug-map handling.

use pgxguard::{
    AnalysisError, AnalysisRequest, Analyzer, Explanation, ExplanationProvider, Pharmacogene,
    Phenotype, PipelineConfig, RiskLabel, VariantInput,
};
use std::io::Write;

fn request_for(drugs: &[&str]) -> AnalysisRequest {
    AnalysisRequest {
        patient_id: "PATIENT_100".to_string(),
        drugs: drugs.iter().map(|d| d.to_string()).collect(),
        variants: None,
        vcf_content: None,
    }
}

#[test]
fn report_serializes_with_the_published_field_names() {
    let analyzer = Analyzer::with_defaults();
    let mut request = request_for(&["warfarin"]);
    request.variants = Some(vec![VariantInput {
        gene: "CYP2C9".to_string(),
        diplotype: "*3/*3".to_string(),
        marker_id: Some("rs1057910".to_string()),
    }]);

    let report = analyzer.analyze(&request).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert!(json["patient_id"].is_string());
    assert!(json["timestamp"].is_string());

    let result = &json["results"][0];
    assert_eq!(result["drug"], "warfarin");
    assert_eq!(result["risk_assessment"]["risk_label"], "Toxic");
    assert_eq!(result["risk_assessment"]["confidence_score"], 0.95);
    assert_eq!(result["risk_assessment"]["severity"], "high");
    assert_eq!(
        result["pharmacogenomic_profile"]["primary_gene"],
        "CYP2C9"
    );
    assert_eq!(result["pharmacogenomic_profile"]["diplotype"], "*3/*3");
    assert_eq!(result["pharmacogenomic_profile"]["phenotype"], "PM");
    assert_eq!(
        result["pharmacogenomic_profile"]["detected_variants"][0]["marker_id"],
        "rs1057910"
    );
    assert_eq!(result["clinical_recommendation"]["action"], "Reduce dose");
    assert!(result["clinical_recommendation"]["details"].is_string());
    assert!(result["llm_generated_explanation"]["summary"].is_string());
    assert!(result["llm_generated_explanation"]["mechanism"].is_string());

    let metrics = &json["quality_metrics"];
    assert_eq!(metrics["vcf_parsing_success"], true);
    assert_eq!(metrics["parsed_variant_count"], 1);
    assert_eq!(metrics["missing_gene_fallback_count"], 0);
}

#[test]
fn structured_input_round_trips_through_the_profile() {
    let analyzer = Analyzer::with_defaults();
    let mut request = request_for(&["codeine"]);
    request.variants = Some(vec![VariantInput {
        gene: "cyp2d6".to_string(),
        diplotype: "*4/*4".to_string(),
        marker_id: Some("rs3892097".to_string()),
    }]);

    let report = analyzer.analyze(&request).unwrap();
    let profile = &report.results[0].pharmacogenomic_profile;
    assert_eq!(profile.primary_gene, Pharmacogene::CYP2D6);
    assert_eq!(profile.diplotype, "*4/*4");
    assert_eq!(
        profile.detected_variants[0].marker_id.as_deref(),
        Some("rs3892097")
    );
}

#[test]
fn confidence_tracks_the_three_resolution_tiers() {
    let analyzer = Analyzer::with_defaults();
    let mut request = request_for(&["warfarin"]);

    // Exact rule: grade A.
    request.variants = Some(vec![VariantInput {
        gene: "CYP2C9".to_string(),
        diplotype: "*3/*3".to_string(),
        marker_id: None,
    }]);
    let exact = analyzer.analyze(&request).unwrap().results[0]
        .risk_assessment
        .confidence_score;

    // Known-safe phenotype: grade B.
    request.variants = Some(vec![VariantInput {
        gene: "CYP2C9".to_string(),
        diplotype: "*1/*1".to_string(),
        marker_id: None,
    }]);
    let known_safe = analyzer.analyze(&request).unwrap().results[0]
        .risk_assessment
        .confidence_score;

    // Unrecognized diplotype: Unknown phenotype, grade C.
    request.variants = Some(vec![VariantInput {
        gene: "CYP2C9".to_string(),
        diplotype: "*77/*77".to_string(),
        marker_id: None,
    }]);
    let unknown = analyzer.analyze(&request).unwrap().results[0]
        .risk_assessment
        .confidence_score;

    assert_eq!(exact, 0.95);
    assert_eq!(known_safe, 0.85);
    assert_eq!(unknown, 0.70);
    assert!(exact > known_safe && known_safe > unknown);
}

#[test]
fn unknown_diplotype_yields_consult_clinician() {
    let analyzer = Analyzer::with_defaults();
    let mut request = request_for(&["simvastatin"]);
    request.variants = Some(vec![VariantInput {
        gene: "SLCO1B1".to_string(),
        diplotype: "*1/*2/*3".to_string(),
        marker_id: None,
    }]);

    let report = analyzer.analyze(&request).unwrap();
    let result = &report.results[0];
    assert_eq!(result.pharmacogenomic_profile.phenotype, Phenotype::Unknown);
    assert_eq!(result.risk_assessment.risk_label, RiskLabel::Unknown);
    assert_eq!(result.clinical_recommendation.action, "Consult clinician");
}

#[test]
fn drug_aliases_resolve_to_the_same_assessment() {
    let analyzer = Analyzer::with_defaults();
    let variants = vec![VariantInput {
        gene: "CYP2C19".to_string(),
        diplotype: "*2/*2".to_string(),
        marker_id: None,
    }];

    for name in ["Plavix", "plavix", "clopidogrel"] {
        let mut request = request_for(&[name]);
        request.variants = Some(variants.clone());
        let report = analyzer.analyze(&request).unwrap();
        let result = &report.results[0];
        assert_eq!(
            result.pharmacogenomic_profile.primary_gene,
            Pharmacogene::CYP2C19,
            "{name} should resolve to CYP2C19"
        );
        assert_eq!(result.risk_assessment.risk_label, RiskLabel::Ineffective);
        // The submitted name is echoed back untouched.
        assert_eq!(result.drug, name);
    }
}

struct FlakyProvider;

impl ExplanationProvider for FlakyProvider {
    fn generate(
        &self,
        _gene: Pharmacogene,
        _phenotype: Phenotype,
        _drug: &str,
        _risk: RiskLabel,
    ) -> anyhow::Result<Explanation> {
        anyhow::bail!("credential missing")
    }
}

#[test]
fn explanation_failure_is_visible_but_not_fatal() {
    let analyzer = Analyzer::with_defaults().with_provider(Box::new(FlakyProvider));
    let report = analyzer.analyze(&request_for(&["azathioprine"])).unwrap();

    let outcome = &report.results[0].llm_generated_explanation;
    assert!(outcome.is_degraded());
    assert_eq!(outcome.degradation_reason(), Some("credential missing"));

    // The wire shape stays a plain explanation object.
    let json = serde_json::to_value(&report.results[0]).unwrap();
    assert!(json["llm_generated_explanation"]["summary"]
        .as_str()
        .unwrap()
        .contains("TPMT"));
    assert!(json["llm_generated_explanation"].get("reason").is_none());
}

#[test]
fn extended_map_adds_drugs_without_touching_required_pairs() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "Entity1_name\tEntity1_type\tEntity2_name\tEntity2_type\tAssociation\n\
         CYP2D6\tGene\ttramadol\tChemical\tmetabolizes\n\
         CYP2C9\tGene\tcodeine\tChemical\tmetabolizes\n"
    )
    .unwrap();

    let analyzer = Analyzer::with_config(PipelineConfig {
        use_extended_drug_map: true,
        extended_map_path: file.path().to_path_buf(),
        ..PipelineConfig::default()
    });

    // The extended drug resolves.
    let report = analyzer.analyze(&request_for(&["tramadol"])).unwrap();
    assert_eq!(
        report.results[0].pharmacogenomic_profile.primary_gene,
        Pharmacogene::CYP2D6
    );

    // The dataset's conflicting row for codeine does not shadow the
    // required mapping.
    let report = analyzer.analyze(&request_for(&["codeine"])).unwrap();
    assert_eq!(
        report.results[0].pharmacogenomic_profile.primary_gene,
        Pharmacogene::CYP2D6
    );
}

#[test]
fn extension_load_failure_degrades_to_required_mapping() {
    let analyzer = Analyzer::with_config(PipelineConfig {
        use_extended_drug_map: true,
        extended_map_path: "/nonexistent/relationships.tsv".into(),
        ..PipelineConfig::default()
    });

    for drug in ["codeine", "warfarin", "clopidogrel", "simvastatin", "azathioprine", "fluorouracil"]
    {
        assert!(
            analyzer.analyze(&request_for(&[drug])).is_ok(),
            "{drug} must resolve without the extended dataset"
        );
    }

    let err = analyzer.analyze(&request_for(&["tramadol"])).unwrap_err();
    assert!(matches!(err, AnalysisError::UnsupportedDrug { .. }));
}

#[test]
fn unsupported_drug_reports_name_and_sample() {
    let analyzer = Analyzer::with_defaults();
    let err = analyzer.analyze(&request_for(&["ibuprofen"])).unwrap_err();
    assert!(err.is_client_error());
    let message = err.to_string();
    assert!(message.contains("ibuprofen"));
    assert!(message.contains("warfarin"));
}
