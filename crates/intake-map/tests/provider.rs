use std::collections::BTreeMap;
use std::time::Duration;

use intake_map::{
    FixtureSuggestionProvider, FuzzySuggestionProvider, ProviderError, SuggestionProvider,
    SuggestionRequest, UnavailableProvider,
};
use intake_model::{ColumnHint, ColumnMapping, Confidence, FieldTarget, TargetSchema};

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn test_fuzzy_provider_maps_known_headers() {
    let request = SuggestionRequest::new(
        TargetSchema::advance_recon(),
        columns(&["Trans Date", "Vendor Name", "Invoice Amt", "Loan #", "Inv ID", "zzqx"]),
    );
    let mappings = FuzzySuggestionProvider::default()
        .suggest(&request)
        .await
        .expect("fuzzy suggestions");

    assert_eq!(mappings.len(), 6);
    let target_of = |col: &str| {
        mappings
            .iter()
            .find(|m| m.source_column == col)
            .map(|m| m.target.clone())
            .unwrap()
    };
    assert_eq!(target_of("Trans Date"), FieldTarget::field("Date"));
    assert_eq!(target_of("Vendor Name"), FieldTarget::field("Payee"));
    assert_eq!(target_of("Invoice Amt"), FieldTarget::field("Amount"));
    assert_eq!(target_of("Loan #"), FieldTarget::field("Loan Number"));
    assert_eq!(target_of("Inv ID"), FieldTarget::field("Invoice ID"));
    assert_eq!(target_of("zzqx"), FieldTarget::Unmapped);

    for mapping in mappings.iter().filter(|m| m.is_mapped()) {
        let confidence = mapping.reported_confidence().value();
        assert!((90..=99).contains(&confidence), "{confidence}");
    }
}

#[tokio::test]
async fn test_fuzzy_provider_keeps_column_order() {
    let request = SuggestionRequest::new(
        TargetSchema::loan_tape(),
        columns(&["Pool ID", "Rate", "Loan #"]),
    )
    .with_hints(BTreeMap::from([(
        "Rate".to_string(),
        ColumnHint {
            is_numeric: true,
            unique_ratio: 1.0,
            null_ratio: 0.0,
        },
    )]));
    let mappings = FuzzySuggestionProvider::new(Confidence::saturating(80))
        .suggest(&request)
        .await
        .unwrap();
    let order: Vec<&str> = mappings.iter().map(|m| m.source_column.as_str()).collect();
    assert_eq!(order, vec!["Pool ID", "Rate", "Loan #"]);
    assert!(mappings[1].target.is("Interest Rate"));
}

#[tokio::test(start_paused = true)]
async fn test_fixture_provider_waits_then_answers() {
    let fixture = vec![
        ColumnMapping::suggested(
            "Trans Date",
            FieldTarget::field("Date"),
            Confidence::saturating(95),
        ),
        ColumnMapping::unmapped("Status"),
    ];
    let provider = FixtureSuggestionProvider::new(fixture.clone())
        .with_delay(Duration::from_millis(1500));
    let request = SuggestionRequest::new(TargetSchema::advance_recon(), Vec::new());

    let started = tokio::time::Instant::now();
    let answer = provider.suggest(&request).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(1500));
    assert_eq!(answer, fixture);
}

#[tokio::test]
async fn test_unavailable_provider_errors() {
    let provider = UnavailableProvider {
        reason: "timeout".to_string(),
    };
    let request = SuggestionRequest::new(TargetSchema::advance_recon(), Vec::new());
    let err = provider.suggest(&request).await.unwrap_err();
    assert_eq!(err, ProviderError::Unavailable("timeout".to_string()));
}
