//! End-to-end calibration of the decision pipeline against the
//! reference patient profiles: an all-reference genotype and a
//! high-risk genotype across all six genes.

use pgxguard::{AnalysisRequest, Analyzer, DrugResult, Phenotype, RiskLabel, VariantInput};
use std::collections::HashMap;

const ALL_DRUGS: [&str; 6] = [
    "codeine",
    "warfarin",
    "clopidogrel",
    "simvastatin",
    "azathioprine",
    "fluorouracil",
];

fn vcf_line(chrom: &str, pos: &str, marker: &str, info: &str, genotype: &str) -> String {
    format!("{chrom}\t{pos}\t{marker}\tG\tA\t.\tPASS\t{info}\tGT:DP\t{genotype}:35")
}

fn vcf_document(genotype: &str) -> String {
    let mut lines = vec![
        "##fileformat=VCFv4.2".to_string(),
        "##source=pgxguard-tests".to_string(),
        "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE".to_string(),
    ];
    lines.push(vcf_line(
        "22",
        "42522613",
        "rs3892097",
        "GENE=CYP2D6;STAR=*4",
        genotype,
    ));
    lines.push(vcf_line(
        "10",
        "94781859",
        "rs4244285",
        "GENE=CYP2C19;STAR=*2",
        genotype,
    ));
    lines.push(vcf_line(
        "10",
        "94981296",
        "rs1057910",
        "GENE=CYP2C9;STAR=*3",
        genotype,
    ));
    lines.push(vcf_line(
        "12",
        "21178615",
        "rs4149056",
        "GENE=SLCO1B1;STAR=*5",
        genotype,
    ));
    lines.push(vcf_line(
        "6",
        "18130918",
        "rs1142345",
        "GENE=TPMT;STAR=*3A",
        genotype,
    ));
    lines.push(vcf_line(
        "1",
        "97915614",
        "rs3918290",
        "GENE=DPYD;STAR=*2A",
        genotype,
    ));
    lines.join("\n")
}

fn analyze_vcf(patient_id: &str, vcf: String) -> HashMap<String, DrugResult> {
    let analyzer = Analyzer::with_defaults();
    let request = AnalysisRequest {
        patient_id: patient_id.to_string(),
        drugs: ALL_DRUGS.iter().map(|d| d.to_string()).collect(),
        variants: None,
        vcf_content: Some(vcf),
    };
    let report = analyzer.analyze(&request).unwrap();

    assert_eq!(report.patient_id, patient_id);
    assert!(report.quality_metrics.vcf_parsing_success);
    assert_eq!(report.quality_metrics.parsed_variant_count, 6);
    assert_eq!(report.quality_metrics.missing_gene_fallback_count, 0);

    report
        .results
        .into_iter()
        .map(|r| (r.drug.clone(), r))
        .collect()
}

#[test]
fn normal_profile_is_safe_across_the_panel() {
    let by_drug = analyze_vcf("PATIENT_001", vcf_document("0/0"));

    for drug in ["warfarin", "clopidogrel", "simvastatin", "azathioprine", "fluorouracil"] {
        assert_eq!(
            by_drug[drug].risk_assessment.risk_label,
            RiskLabel::Safe,
            "{drug} should be safe for an all-reference genotype"
        );
        assert_eq!(by_drug[drug].pharmacogenomic_profile.diplotype, "*1/*1");
    }

    // Codeine is Safe when *1/*1 maps to NM for CYP2D6.
    assert!(matches!(
        by_drug["codeine"].risk_assessment.risk_label,
        RiskLabel::Safe | RiskLabel::Unknown
    ));
}

#[test]
fn high_risk_profile_flags_every_drug() {
    let by_drug = analyze_vcf("PATIENT_002", vcf_document("1/1"));

    assert_eq!(
        by_drug["codeine"].risk_assessment.risk_label,
        RiskLabel::Ineffective
    );
    assert_eq!(
        by_drug["warfarin"].risk_assessment.risk_label,
        RiskLabel::Toxic
    );
    assert_eq!(
        by_drug["clopidogrel"].risk_assessment.risk_label,
        RiskLabel::Ineffective
    );
    assert_eq!(
        by_drug["simvastatin"].risk_assessment.risk_label,
        RiskLabel::Toxic
    );
    assert_eq!(
        by_drug["azathioprine"].risk_assessment.risk_label,
        RiskLabel::Toxic
    );
    assert_eq!(
        by_drug["fluorouracil"].risk_assessment.risk_label,
        RiskLabel::Toxic
    );

    assert_eq!(by_drug["warfarin"].clinical_recommendation.action, "Reduce dose");
    assert_eq!(
        by_drug["clopidogrel"].clinical_recommendation.action,
        "Use alternative antiplatelet therapy"
    );

    assert_eq!(
        by_drug["codeine"].pharmacogenomic_profile.phenotype,
        Phenotype::PM
    );
    assert_eq!(
        by_drug["fluorouracil"].pharmacogenomic_profile.phenotype,
        Phenotype::Deficient
    );
}

#[test]
fn ultrarapid_metabolizer_makes_codeine_toxic() {
    let analyzer = Analyzer::with_defaults();
    let request = AnalysisRequest {
        patient_id: "PATIENT_003".to_string(),
        drugs: vec!["codeine".to_string()],
        variants: Some(vec![VariantInput {
            gene: "CYP2D6".to_string(),
            diplotype: "*1/*1XN".to_string(),
            marker_id: None,
        }]),
        vcf_content: None,
    };

    let report = analyzer.analyze(&request).unwrap();
    let result = &report.results[0];
    assert_eq!(result.pharmacogenomic_profile.phenotype, Phenotype::UM);
    assert_eq!(result.risk_assessment.risk_label, RiskLabel::Toxic);
    assert_eq!(result.clinical_recommendation.action, "Avoid use");
}

#[test]
fn partial_evidence_mixes_findings_with_wild_type_fallback() {
    // Only the CYP2C19 variant is presented; the other five genes fall
    // back to wild-type and stay safe.
    let analyzer = Analyzer::with_defaults();
    let request = AnalysisRequest {
        patient_id: "PATIENT_004".to_string(),
        drugs: ALL_DRUGS.iter().map(|d| d.to_string()).collect(),
        variants: Some(vec![VariantInput {
            gene: "CYP2C19".to_string(),
            diplotype: "*2/*2".to_string(),
            marker_id: Some("rs4244285".to_string()),
        }]),
        vcf_content: None,
    };

    let report = analyzer.analyze(&request).unwrap();
    assert_eq!(report.quality_metrics.parsed_variant_count, 1);
    assert_eq!(report.quality_metrics.missing_gene_fallback_count, 5);

    let by_drug: HashMap<&str, &DrugResult> = report
        .results
        .iter()
        .map(|r| (r.drug.as_str(), r))
        .collect();
    assert_eq!(
        by_drug["clopidogrel"].risk_assessment.risk_label,
        RiskLabel::Ineffective
    );
    assert_eq!(
        by_drug["warfarin"].risk_assessment.risk_label,
        RiskLabel::Safe
    );
}
